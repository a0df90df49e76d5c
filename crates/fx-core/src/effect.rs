//! In-memory effect description: techniques, passes and the flat parameter
//! list, as produced by the FX parser or assembled by an embedding
//! application.

use std::path::Path;

use crate::error::FxError;
use crate::state::RenderState;

/// How a parameter participates in the effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterUsage {
    /// Settable from outside the effect.
    Uniform,
    /// Compile-time constant (`const` / `static`); never exposed.
    Const,
    /// Per-vertex input.
    Varying,
}

/// One entry of the effect's flat parameter list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDesc {
    pub usage: ParameterUsage,
    pub type_name: String,
    pub name: String,
    /// Empty when the declaration carries no semantic.
    pub semantic: String,
    /// Literal initializer text; empty when absent.
    pub default_expr: String,
}

impl ParameterDesc {
    pub fn uniform(type_name: &str, name: &str) -> Self {
        Self {
            usage: ParameterUsage::Uniform,
            type_name: type_name.to_string(),
            name: name.to_string(),
            semantic: String::new(),
            default_expr: String::new(),
        }
    }

    pub fn with_semantic(mut self, semantic: &str) -> Self {
        self.semantic = semantic.to_string();
        self
    }

    pub fn with_default(mut self, expr: &str) -> Self {
        self.default_expr = expr.to_string();
        self
    }

    pub fn with_usage(mut self, usage: ParameterUsage) -> Self {
        self.usage = usage;
        self
    }
}

/// Source and entry point for one programmable stage of a pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderEntry {
    pub source: String,
    pub entry: String,
    /// Profile named by the `compile` clause, e.g. `vs_2_0`.
    pub profile: String,
}

impl ShaderEntry {
    pub fn new(source: &str, entry: &str, profile: &str) -> Self {
        Self {
            source: source.to_string(),
            entry: entry.to_string(),
            profile: profile.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassDesc {
    pub name: String,
    pub vertex: Option<ShaderEntry>,
    pub pixel: Option<ShaderEntry>,
    pub states: Vec<RenderState>,
}

impl PassDesc {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            vertex: None,
            pixel: None,
            states: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechniqueDesc {
    pub name: String,
    pub passes: Vec<PassDesc>,
}

/// A pre-parsed effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectDesc {
    pub techniques: Vec<TechniqueDesc>,
    pub parameters: Vec<ParameterDesc>,
}

impl EffectDesc {
    /// Parse FX text.
    pub fn parse(text: &str) -> Result<Self, FxError> {
        crate::parser::parse_effect(text)
    }

    /// Read and parse an FX file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FxError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| FxError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "read effect file");
        Self::parse(&text)
    }

    /// Reject effects that cannot be loaded at all.
    pub fn validate(&self) -> Result<(), FxError> {
        if self.techniques.is_empty() {
            return Err(FxError::Load("effect declares no techniques".into()));
        }
        if let Some(t) = self.techniques.iter().find(|t| t.passes.is_empty()) {
            return Err(FxError::Load(format!("technique '{}' has no passes", t.name)));
        }
        Ok(())
    }

    pub fn pass_count(&self) -> usize {
        self.techniques.iter().map(|t| t.passes.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_effect_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "float4 tint;\n\
             float4 ps() : COLOR {{ return tint; }}\n\
             technique T {{ pass P {{ PixelShader = compile ps_2_0 ps(); }} }}"
        )
        .unwrap();

        let effect = EffectDesc::from_file(file.path()).unwrap();
        assert_eq!(effect.techniques[0].name, "T");
        assert_eq!(effect.pass_count(), 1);
        assert_eq!(effect.parameters.len(), 1);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = EffectDesc::from_file(dir.path().join("absent.fx")).unwrap_err();
        assert!(matches!(err, FxError::Io { .. }));
    }

    #[test]
    fn validate_rejects_empty_effects() {
        assert!(matches!(
            EffectDesc::default().validate(),
            Err(FxError::Load(_))
        ));
        let effect = EffectDesc {
            techniques: vec![TechniqueDesc {
                name: "t".into(),
                passes: vec![],
            }],
            parameters: vec![],
        };
        assert!(effect.validate().is_err());
    }
}
