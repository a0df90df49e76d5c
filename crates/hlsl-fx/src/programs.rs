//! GPU programs of the active technique.

use fx_core::{FxError, Pass, Stage};
use fx_gl::{ProgramBackend, ProgramHandle};

/// Vertex and fragment program of one pass. `None` when the stage is unused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramPair {
    pub vertex: Option<ProgramHandle>,
    pub fragment: Option<ProgramHandle>,
}

impl ProgramPair {
    pub fn get(&self, stage: Stage) -> Option<ProgramHandle> {
        match stage {
            Stage::Vertex => self.vertex,
            Stage::Fragment => self.fragment,
        }
    }

    fn slot(&mut self, stage: Stage) -> &mut Option<ProgramHandle> {
        match stage {
            Stage::Vertex => &mut self.vertex,
            Stage::Fragment => &mut self.fragment,
        }
    }
}

/// One [`ProgramPair`] per pass, in pass order.
///
/// Handles are released only through [`ProgramSet::release`]; the owner must
/// call it before dropping a non-empty set.
#[derive(Debug, Default)]
pub struct ProgramSet {
    pairs: Vec<ProgramPair>,
}

impl ProgramSet {
    /// Create and load a program for every compiled stage of `passes`.
    ///
    /// Every pass is attempted. If any stage fails, everything created so
    /// far is destroyed and all failures are returned.
    pub fn build<B>(backend: &mut B, passes: &[Pass]) -> Result<Self, Vec<FxError>>
    where
        B: ProgramBackend + ?Sized,
    {
        let mut set = Self::default();
        let mut errors = Vec::new();

        for pass in passes {
            let mut pair = ProgramPair::default();
            for stage in Stage::ALL {
                let assembly = pass.compiled(stage);
                if assembly.is_empty() {
                    continue;
                }
                match load_stage(backend, stage, assembly) {
                    Ok(program) => *pair.slot(stage) = Some(program),
                    Err(detail) => errors.push(FxError::Build {
                        pass: pass.name.clone(),
                        stage,
                        detail,
                    }),
                }
            }
            set.pairs.push(pair);
        }

        if errors.is_empty() {
            tracing::debug!(passes = set.pairs.len(), "built programs");
            Ok(set)
        } else {
            set.release(backend);
            Err(errors)
        }
    }

    pub fn pair(&self, pass: usize) -> Option<&ProgramPair> {
        self.pairs.get(pass)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Destroy every program and empty the set.
    pub fn release<B>(&mut self, backend: &mut B)
    where
        B: ProgramBackend + ?Sized,
    {
        for pair in self.pairs.drain(..) {
            for stage in Stage::ALL {
                if let Some(program) = pair.get(stage) {
                    backend.destroy_program(stage, program);
                }
            }
        }
    }
}

fn load_stage<B>(backend: &mut B, stage: Stage, assembly: &str) -> Result<ProgramHandle, String>
where
    B: ProgramBackend + ?Sized,
{
    let program = backend.create_program(stage)?;
    if let Err(detail) = backend.load_program(stage, program, assembly) {
        backend.destroy_program(stage, program);
        return Err(detail);
    }
    Ok(program)
}
