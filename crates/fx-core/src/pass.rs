//! Per-pass register maps and the builder that assembles them from the
//! events produced while a pass is compiled.

use std::collections::HashMap;

use crate::effect::{PassDesc, ShaderEntry};
use crate::state::RenderState;
use crate::types::Stage;

/// Register index used for "not bound in this pass".
pub const UNBOUND: i32 = -1;

/// Parameter name → register (or texture unit) index for one stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterMap {
    entries: HashMap<String, i32>,
}

impl RegisterMap {
    pub fn insert(&mut self, name: &str, index: i32) {
        self.entries.insert(name.to_string(), index);
    }

    /// Register bound to `name`, or [`UNBOUND`].
    pub fn get(&self, name: &str) -> i32 {
        self.entries.get(name).copied().unwrap_or(UNBOUND)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything compilation tells us about one pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassEvent {
    /// Constant register of a uniform.
    Register {
        stage: Stage,
        name: String,
        index: i32,
    },
    /// Texture unit a sampler was assigned to.
    TextureUnit { name: String, unit: i32 },
    RenderState(RenderState),
}

/// Register assignments and fixed render state of one compiled pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassState {
    pub vertex_registers: RegisterMap,
    pub fragment_registers: RegisterMap,
    pub texture_units: RegisterMap,
    pub render_states: Vec<RenderState>,
}

impl PassState {
    pub fn registers(&self, stage: Stage) -> &RegisterMap {
        match stage {
            Stage::Vertex => &self.vertex_registers,
            Stage::Fragment => &self.fragment_registers,
        }
    }

    fn registers_mut(&mut self, stage: Stage) -> &mut RegisterMap {
        match stage {
            Stage::Vertex => &mut self.vertex_registers,
            Stage::Fragment => &mut self.fragment_registers,
        }
    }
}

/// Accumulates [`PassEvent`]s into one [`PassState`] at a time.
#[derive(Debug, Default)]
pub struct PassStateBuilder {
    current: PassState,
    finished: Vec<PassState>,
}

impl PassStateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, event: PassEvent) {
        match event {
            PassEvent::Register { stage, name, index } => {
                self.current.registers_mut(stage).insert(&name, index);
            }
            PassEvent::TextureUnit { name, unit } => {
                self.current.texture_units.insert(&name, unit);
            }
            PassEvent::RenderState(state) => self.current.render_states.push(state),
        }
    }

    /// Close the pass being accumulated; subsequent events go to the next one.
    pub fn finalize_pass(&mut self) -> &PassState {
        let done = std::mem::take(&mut self.current);
        self.finished.push(done);
        &self.finished[self.finished.len() - 1]
    }

    /// All finalized passes, in order. Events not yet finalized are dropped.
    pub fn finish(self) -> Vec<PassState> {
        self.finished
    }
}

/// A loaded pass: uncompiled source, compiled output and its state record.
#[derive(Debug, Clone, Default)]
pub struct Pass {
    pub name: String,
    pub vertex: Option<ShaderEntry>,
    pub pixel: Option<ShaderEntry>,
    /// Empty when the stage is unused or failed to compile.
    pub compiled_vertex: String,
    pub compiled_pixel: String,
    pub state: PassState,
}

impl Pass {
    pub fn from_desc(desc: &PassDesc) -> Self {
        Self {
            name: desc.name.clone(),
            vertex: desc.vertex.clone(),
            pixel: desc.pixel.clone(),
            ..Self::default()
        }
    }

    pub fn compiled(&self, stage: Stage) -> &str {
        match stage {
            Stage::Vertex => &self.compiled_vertex,
            Stage::Fragment => &self.compiled_pixel,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Technique {
    pub name: String,
    pub passes: Vec<Pass>,
}
