//! Core data model for FX effects.
//!
//! This crate knows nothing about compilers or GPUs. It provides:
//!
//! - [`EffectDesc`], the pre-parsed effect (techniques, passes, the flat
//!   parameter list), and the FX text front-end that produces it.
//! - [`ParameterTable`], the typed uniform/sampler/attribute tables with
//!   semantics and literal default values.
//! - [`PassStateBuilder`] and [`RegisterMap`], the per-pass name → register
//!   bookkeeping fed by compilation events.
//! - [`FxError`] and [`ErrorLog`], shared by every other crate in the
//!   workspace.

pub mod defaults;
pub mod effect;
pub mod error;
pub mod logging;
pub mod params;
pub mod pass;
mod parser;
#[cfg(test)]
mod proptests;
pub mod semantic;
pub mod state;
pub mod types;

pub use defaults::{parse_default, UniformValue, MAX_COMPONENTS};
pub use effect::{EffectDesc, ParameterDesc, ParameterUsage, PassDesc, ShaderEntry, TechniqueDesc};
pub use error::{ErrorLog, FxError};
pub use params::{AttributeParam, ParameterTable, SamplerParam, UniformParam};
pub use pass::{Pass, PassEvent, PassState, PassStateBuilder, RegisterMap, Technique, UNBOUND};
pub use semantic::Semantic;
pub use state::{BlendFactor, CullMode, RenderState};
pub use types::{SamplerType, Stage, TextureHandle, UniformType};
