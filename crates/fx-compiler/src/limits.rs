//! Hardware resource limits handed to the compiler.

use fx_core::Stage;

/// Per-stage program limits. Zero means "no limit known".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageLimits {
    pub instructions: u32,
    pub alu_instructions: u32,
    pub temporaries: u32,
    /// Constant (local parameter) registers.
    pub parameters: u32,
    pub tex_instructions: u32,
    pub tex_indirections: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceLimits {
    pub vertex: StageLimits,
    pub fragment: StageLimits,
}

impl ResourceLimits {
    pub fn stage(&self, stage: Stage) -> &StageLimits {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }
}
