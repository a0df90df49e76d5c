//! FX effect shaders: load an effect, compile every pass, track its
//! parameters and drive the GPU programs of the active technique.
//!
//! [`FxShader`] is the entry point. It is generic over the compiler
//! ([`ShaderCompiler`]) and the GPU program backend ([`ProgramBackend`]);
//! [`FxShader::with_gl`] wires up the stock `cgc` + OpenGL ARB pair.

mod config;
mod programs;
mod shader;
pub mod upload;

pub use config::FxConfig;
pub use programs::{ProgramPair, ProgramSet};
pub use shader::FxShader;
pub use upload::pack_uniform;

pub use fx_compiler::{CgcCompiler, CgcConfig, CompileFlags, ResourceLimits, ShaderCompiler};
pub use fx_core::{
    EffectDesc, FxError, ParameterDesc, ParameterUsage, PassDesc, RenderState, SamplerType,
    Semantic, ShaderEntry, Stage, TechniqueDesc, TextureHandle, UniformType, UniformValue,
    UNBOUND,
};
pub use fx_core::logging::init as init_logging;
pub use fx_gl::{GlProgramBackend, ProgramBackend, ProgramHandle};
