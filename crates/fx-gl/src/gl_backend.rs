//! ARB assembly program backend on the host's current OpenGL context.

use anyhow::{Context, Result};
use gl::types::GLenum;

use fx_compiler::{ResourceLimits, StageLimits};
use fx_core::{RenderState, SamplerType, Stage, TextureHandle};

use crate::arb::{self, ArbPrograms};
use crate::render_state::{blend_factor, cull_face, texture_target, ALPHA_TEST};
use crate::{ProgramBackend, ProgramHandle};

/// Drives `GL_ARB_vertex_program` / `GL_ARB_fragment_program` objects.
///
/// This backend assumes it is only used on the thread that owns the GL
/// context the effect was built in, with that context current. Using it
/// outside that context is undefined behavior.
#[derive(Debug)]
pub struct GlProgramBackend {
    arb: &'static ArbPrograms,
    src_blend: GLenum,
    dst_blend: GLenum,
}

impl GlProgramBackend {
    /// GL function pointers are loaded exactly once via `gl_loader`.
    pub fn new() -> Result<Self> {
        let arb = ArbPrograms::get().context("ARB assembly programs are unavailable")?;
        Ok(Self {
            arb,
            src_blend: gl::ONE,
            dst_blend: gl::ZERO,
        })
    }

    fn set_capability(cap: GLenum, enabled: bool) {
        unsafe {
            if enabled {
                gl::Enable(cap);
            } else {
                gl::Disable(cap);
            }
        }
    }

    fn query_limits(&self, stage: Stage) -> StageLimits {
        let target = arb::target(stage);
        let get = |pname| unsafe { self.arb.get_program(target, pname).max(0) as u32 };
        let mut limits = StageLimits {
            instructions: get(arb::MAX_PROGRAM_NATIVE_INSTRUCTIONS_ARB),
            temporaries: get(arb::MAX_PROGRAM_NATIVE_TEMPORARIES_ARB),
            parameters: get(arb::MAX_PROGRAM_NATIVE_PARAMETERS_ARB),
            ..StageLimits::default()
        };
        if stage == Stage::Fragment {
            limits.alu_instructions = get(arb::MAX_PROGRAM_NATIVE_ALU_INSTRUCTIONS_ARB);
            limits.tex_instructions = get(arb::MAX_PROGRAM_NATIVE_TEX_INSTRUCTIONS_ARB);
            limits.tex_indirections = get(arb::MAX_PROGRAM_NATIVE_TEX_INDIRECTIONS_ARB);
        }
        limits
    }
}

impl ProgramBackend for GlProgramBackend {
    fn create_program(&mut self, stage: Stage) -> Result<ProgramHandle, String> {
        let name = unsafe { self.arb.gen_program() };
        if name == 0 {
            return Err(format!("driver returned no {stage:?} program name"));
        }
        Ok(ProgramHandle(name))
    }

    fn load_program(
        &mut self,
        stage: Stage,
        program: ProgramHandle,
        assembly: &str,
    ) -> Result<(), String> {
        let target = arb::target(stage);
        unsafe {
            self.arb.bind_program(target, program.0);
            self.arb.program_string(target, assembly)?;
            if self.arb.get_program(target, arb::PROGRAM_UNDER_NATIVE_LIMITS_ARB) == 0 {
                tracing::warn!(?stage, program = program.0, "program exceeds native limits");
            }
        }
        Ok(())
    }

    fn destroy_program(&mut self, stage: Stage, program: ProgramHandle) {
        if program.0 == 0 {
            return;
        }
        tracing::trace!(?stage, program = program.0, "deleting program");
        unsafe { self.arb.delete_program(program.0) }
    }

    fn bind_program(&mut self, stage: Stage, program: ProgramHandle) {
        unsafe { self.arb.bind_program(arb::target(stage), program.0) }
    }

    fn enable_stage(&mut self, stage: Stage) {
        Self::set_capability(arb::target(stage), true);
    }

    fn disable_stage(&mut self, stage: Stage) {
        Self::set_capability(arb::target(stage), false);
    }

    fn set_local_parameter(&mut self, stage: Stage, index: u32, value: [f32; 4]) {
        unsafe { self.arb.local_parameter(arb::target(stage), index, &value) }
    }

    fn bind_texture(&mut self, unit: u32, ty: SamplerType, texture: TextureHandle) {
        let Some(target) = texture_target(ty) else {
            tracing::debug!(unit, "sampler of unknown dimensionality left unbound");
            return;
        };
        unsafe {
            gl::ActiveTexture(gl::TEXTURE0 + unit);
            gl::BindTexture(target, texture.0);
            gl::ActiveTexture(gl::TEXTURE0);
        }
    }

    fn apply_render_state(&mut self, state: &RenderState) {
        match state {
            RenderState::DepthTest(on) => Self::set_capability(gl::DEPTH_TEST, *on),
            RenderState::DepthWrite(on) => unsafe {
                gl::DepthMask(if *on { gl::TRUE } else { gl::FALSE });
            },
            RenderState::AlphaBlend(on) => Self::set_capability(gl::BLEND, *on),
            RenderState::AlphaTest(on) => Self::set_capability(ALPHA_TEST, *on),
            RenderState::SrcBlend(factor) => {
                self.src_blend = blend_factor(*factor);
                unsafe { gl::BlendFunc(self.src_blend, self.dst_blend) }
            }
            RenderState::DestBlend(factor) => {
                self.dst_blend = blend_factor(*factor);
                unsafe { gl::BlendFunc(self.src_blend, self.dst_blend) }
            }
            RenderState::CullMode(mode) => match cull_face(*mode) {
                Some(face) => unsafe {
                    gl::Enable(gl::CULL_FACE);
                    gl::FrontFace(gl::CCW);
                    gl::CullFace(face);
                },
                None => Self::set_capability(gl::CULL_FACE, false),
            },
            RenderState::Other { name, value } => {
                tracing::trace!(%name, %value, "render state not applied");
            }
        }
    }

    fn resource_limits(&self) -> Option<ResourceLimits> {
        Some(ResourceLimits {
            vertex: self.query_limits(Stage::Vertex),
            fragment: self.query_limits(Stage::Fragment),
        })
    }
}
