//! Shader compiler adapter for FX passes.
//!
//! The compiler itself is an opaque collaborator behind [`ShaderCompiler`].
//! [`compile_pass`] drives it for one pass and turns its output into the
//! [`PassEvent`](fx_core::PassEvent)s consumed by the pass state builder.
//! [`CgcCompiler`] is the stock implementation, running the external `cgc`
//! cross-compiler to ARB assembly.

mod adapter;
pub mod cgc;
mod flags;
mod limits;
pub mod metadata;

pub use adapter::{compile_pass, PassCompilation};
pub use cgc::{CgcCompiler, CgcConfig};
pub use flags::CompileFlags;
pub use limits::{ResourceLimits, StageLimits};

use fx_core::{ShaderEntry, Stage};

/// Source and entry point for one stage of a compile request.
#[derive(Debug, Clone, Copy)]
pub struct StageSource<'a> {
    pub source: &'a str,
    pub entry: &'a str,
    pub profile: &'a str,
}

impl<'a> From<&'a ShaderEntry> for StageSource<'a> {
    fn from(entry: &'a ShaderEntry) -> Self {
        Self {
            source: &entry.source,
            entry: &entry.entry,
            profile: &entry.profile,
        }
    }
}

/// Everything the compiler needs for one pass.
#[derive(Debug, Clone)]
pub struct CompileRequest<'a> {
    pub vertex: Option<StageSource<'a>>,
    pub pixel: Option<StageSource<'a>>,
    pub flags: CompileFlags,
    pub limits: Option<ResourceLimits>,
}

impl CompileRequest<'_> {
    pub fn stage(&self, stage: Stage) -> Option<&StageSource<'_>> {
        match stage {
            Stage::Vertex => self.vertex.as_ref(),
            Stage::Fragment => self.pixel.as_ref(),
        }
    }
}

/// How a parameter is bound in compiled output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Constant (local parameter) register.
    Constant,
    TextureUnit,
}

/// One `name → register` assignment reported by the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterBinding {
    pub name: String,
    pub index: i32,
    pub kind: BindingKind,
}

/// Compiled output of one stage. Empty assembly means the stage was absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageOutput {
    pub assembly: String,
    /// Number of programs the compiler needed to fit the stage.
    pub segments: usize,
    pub bindings: Vec<RegisterBinding>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOutput {
    pub vertex: StageOutput,
    pub fragment: StageOutput,
}

impl CompileOutput {
    pub fn stage(&self, stage: Stage) -> &StageOutput {
        match stage {
            Stage::Vertex => &self.vertex,
            Stage::Fragment => &self.fragment,
        }
    }
}

/// An external shader compiler / cross-compiler.
///
/// Implementations compile every stage present in the request and return
/// the compiler's own diagnostic text on failure.
pub trait ShaderCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, String>;
}

impl<C: ShaderCompiler + ?Sized> ShaderCompiler for Box<C> {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, String> {
        (**self).compile(request)
    }
}
