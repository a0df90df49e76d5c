use fx_compiler::CompileFlags;

/// Per-effect compile settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FxConfig {
    pub flags: CompileFlags,
    /// Ask the backend for hardware limits and reject passes that exceed
    /// them.
    pub use_resource_limits: bool,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            flags: CompileFlags::effect_default(),
            use_resource_limits: true,
        }
    }
}
