//! Fixed compiler configuration flags.

use bitflags::bitflags;

bitflags! {
    /// Layout and output constraints every pass is compiled with.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CompileFlags: u32 {
        /// One scalar per register component; no packing of small uniforms.
        const UNPACKED_SCALARS = 1 << 0;
        /// Matrices and arrays occupy consecutive registers.
        const CONTIGUOUS_LAYOUT = 1 << 1;
        /// Each stage must compile to exactly one program.
        const SINGLE_PASS = 1 << 2;
    }
}

impl CompileFlags {
    /// The flag set effects are compiled with unless configured otherwise.
    pub fn effect_default() -> Self {
        Self::UNPACKED_SCALARS | Self::CONTIGUOUS_LAYOUT | Self::SINGLE_PASS
    }
}

impl Default for CompileFlags {
    fn default() -> Self {
        Self::effect_default()
    }
}
