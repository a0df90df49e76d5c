//! GPU program backends for compiled FX passes.
//!
//! [`ProgramBackend`] is the seam between the effect lifecycle and the
//! graphics API. [`GlProgramBackend`] drives ARB assembly programs through
//! the host's current OpenGL context.

mod arb;
mod gl_backend;
pub mod render_state;

pub use gl_backend::GlProgramBackend;

use fx_compiler::ResourceLimits;
use fx_core::{RenderState, SamplerType, Stage, TextureHandle};

/// GPU-side name of one stage program. Zero is never a live program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u32);

/// Everything the effect needs from the graphics API.
///
/// All calls assume the context the programs were created in is current.
pub trait ProgramBackend {
    fn create_program(&mut self, stage: Stage) -> Result<ProgramHandle, String>;

    /// Upload assembly into a program created by [`create_program`].
    /// On failure the returned text is the driver's diagnostic.
    ///
    /// [`create_program`]: ProgramBackend::create_program
    fn load_program(
        &mut self,
        stage: Stage,
        program: ProgramHandle,
        assembly: &str,
    ) -> Result<(), String>;

    fn destroy_program(&mut self, stage: Stage, program: ProgramHandle);

    fn bind_program(&mut self, stage: Stage, program: ProgramHandle);

    fn enable_stage(&mut self, stage: Stage);

    fn disable_stage(&mut self, stage: Stage);

    /// Write one four-component constant register of the bound program.
    fn set_local_parameter(&mut self, stage: Stage, index: u32, value: [f32; 4]);

    fn bind_texture(&mut self, unit: u32, ty: SamplerType, texture: TextureHandle);

    fn apply_render_state(&mut self, state: &RenderState);

    /// Hardware limits to compile against, when the backend can query them.
    fn resource_limits(&self) -> Option<ResourceLimits>;
}

impl<B: ProgramBackend + ?Sized> ProgramBackend for Box<B> {
    fn create_program(&mut self, stage: Stage) -> Result<ProgramHandle, String> {
        (**self).create_program(stage)
    }

    fn load_program(
        &mut self,
        stage: Stage,
        program: ProgramHandle,
        assembly: &str,
    ) -> Result<(), String> {
        (**self).load_program(stage, program, assembly)
    }

    fn destroy_program(&mut self, stage: Stage, program: ProgramHandle) {
        (**self).destroy_program(stage, program)
    }

    fn bind_program(&mut self, stage: Stage, program: ProgramHandle) {
        (**self).bind_program(stage, program)
    }

    fn enable_stage(&mut self, stage: Stage) {
        (**self).enable_stage(stage)
    }

    fn disable_stage(&mut self, stage: Stage) {
        (**self).disable_stage(stage)
    }

    fn set_local_parameter(&mut self, stage: Stage, index: u32, value: [f32; 4]) {
        (**self).set_local_parameter(stage, index, value)
    }

    fn bind_texture(&mut self, unit: u32, ty: SamplerType, texture: TextureHandle) {
        (**self).bind_texture(unit, ty, texture)
    }

    fn apply_render_state(&mut self, state: &RenderState) {
        (**self).apply_render_state(state)
    }

    fn resource_limits(&self) -> Option<ResourceLimits> {
        (**self).resource_limits()
    }
}
