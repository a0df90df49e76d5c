//! Error kinds and the aggregate error log.

use thiserror::Error;

use crate::types::Stage;

/// Every failure the effect pipeline can report.
#[derive(Debug, Error)]
pub enum FxError {
    /// Malformed FX source, or one with zero techniques.
    #[error("load error: {0}")]
    Load(String),
    #[error("cannot read effect file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// The compiler rejected a pass.
    #[error("pass '{pass}' failed to compile: {detail}")]
    Compile { pass: String, detail: String },
    /// The pass compiled but does not fit the supplied hardware limits.
    #[error("pass '{pass}' {stage:?} program exceeded available resources")]
    ResourceLimit { pass: String, stage: Stage },
    /// The GPU backend rejected compiled assembly.
    #[error("pass '{pass}' {stage:?} program failed to build: {detail}")]
    Build {
        pass: String,
        stage: Stage,
        detail: String,
    },
    /// Operation called in the wrong state or with an out-of-range index.
    #[error("{0}")]
    State(String),
}

/// Human-readable accumulation of every error since the last reset, one per
/// line.
#[derive(Debug, Default, Clone)]
pub struct ErrorLog {
    text: String,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, err: &FxError) {
        tracing::warn!("{err}");
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(&err.to_string());
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
