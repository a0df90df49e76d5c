//! Recording collaborators shared by the integration tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use fx_compiler::{
    BindingKind, CompileOutput, CompileRequest, RegisterBinding, ResourceLimits, ShaderCompiler,
    StageOutput,
};
use hlsl_fx::{
    EffectDesc, FxShader, ParameterDesc, PassDesc, ProgramBackend, ProgramHandle, RenderState,
    SamplerType, ShaderEntry, Stage, TechniqueDesc, TextureHandle,
};

pub type TestShader = FxShader<MockBackend, MockCompiler>;

/// Compiles every entry point to a stub program. Register bindings, failures
/// and oversized output are configured per entry point name.
#[derive(Default)]
pub struct MockCompiler {
    bindings: HashMap<String, Vec<RegisterBinding>>,
    failing: HashSet<String>,
    oversized: HashSet<String>,
    calls: Cell<usize>,
}

impl MockCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(self, entry: &str, name: &str, index: i32) -> Self {
        self.binding(entry, name, index, BindingKind::Constant)
    }

    pub fn texture_unit(self, entry: &str, name: &str, unit: i32) -> Self {
        self.binding(entry, name, unit, BindingKind::TextureUnit)
    }

    fn binding(mut self, entry: &str, name: &str, index: i32, kind: BindingKind) -> Self {
        self.bindings
            .entry(entry.to_string())
            .or_default()
            .push(RegisterBinding {
                name: name.to_string(),
                index,
                kind,
            });
        self
    }

    pub fn failing(mut self, entry: &str) -> Self {
        self.failing.insert(entry.to_string());
        self
    }

    pub fn oversized(mut self, entry: &str) -> Self {
        self.oversized.insert(entry.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ShaderCompiler for MockCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, String> {
        self.calls.set(self.calls.get() + 1);
        let mut output = CompileOutput::default();
        for stage in Stage::ALL {
            let Some(input) = request.stage(stage) else {
                continue;
            };
            if self.failing.contains(input.entry) {
                return Err(format!("{}(3) : error C0000: syntax error", input.entry));
            }
            let header = match stage {
                Stage::Vertex => "!!ARBvp1.0",
                Stage::Fragment => "!!ARBfp1.0",
            };
            let mut assembly = format!("{header}\n#program {}\nEND\n", input.entry);
            let mut segments = 1;
            if self.oversized.contains(input.entry) {
                assembly.push_str(&format!("{header}\nEND\n"));
                segments = 2;
            }
            let compiled = StageOutput {
                assembly,
                segments,
                bindings: self.bindings.get(input.entry).cloned().unwrap_or_default(),
            };
            match stage {
                Stage::Vertex => output.vertex = compiled,
                Stage::Fragment => output.fragment = compiled,
            }
        }
        Ok(output)
    }
}

/// Everything a [`MockBackend`] was asked to do.
#[derive(Debug, Default)]
pub struct BackendLog {
    next_program: u32,
    pub created: Vec<(Stage, ProgramHandle)>,
    pub destroyed: Vec<(Stage, ProgramHandle)>,
    pub bound: Vec<(Stage, ProgramHandle)>,
    pub enabled: Vec<Stage>,
    pub disabled: Vec<Stage>,
    pub params: Vec<(Stage, u32, [f32; 4])>,
    pub textures: Vec<(u32, SamplerType, TextureHandle)>,
    pub states: Vec<RenderState>,
}

impl BackendLog {
    pub fn live_programs(&self) -> usize {
        self.created.len() - self.destroyed.len()
    }
}

/// Records every call into a log shared with the test, so it stays readable
/// after the shader is dropped.
#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    pub log: Rc<RefCell<BackendLog>>,
    /// Assembly containing this text fails to load.
    pub reject: Option<String>,
    pub limits: Option<ResourceLimits>,
}

impl MockBackend {
    pub fn new() -> Self {
        hlsl_fx::init_logging();
        Self::default()
    }
}

impl ProgramBackend for MockBackend {
    fn create_program(&mut self, stage: Stage) -> Result<ProgramHandle, String> {
        let mut log = self.log.borrow_mut();
        log.next_program += 1;
        let program = ProgramHandle(log.next_program);
        log.created.push((stage, program));
        Ok(program)
    }

    fn load_program(
        &mut self,
        _stage: Stage,
        _program: ProgramHandle,
        assembly: &str,
    ) -> Result<(), String> {
        match &self.reject {
            Some(marker) if assembly.contains(marker.as_str()) => {
                Err(format!("line 2, column 1: invalid instruction near {marker}"))
            }
            _ => Ok(()),
        }
    }

    fn destroy_program(&mut self, stage: Stage, program: ProgramHandle) {
        self.log.borrow_mut().destroyed.push((stage, program));
    }

    fn bind_program(&mut self, stage: Stage, program: ProgramHandle) {
        self.log.borrow_mut().bound.push((stage, program));
    }

    fn enable_stage(&mut self, stage: Stage) {
        self.log.borrow_mut().enabled.push(stage);
    }

    fn disable_stage(&mut self, stage: Stage) {
        self.log.borrow_mut().disabled.push(stage);
    }

    fn set_local_parameter(&mut self, stage: Stage, index: u32, value: [f32; 4]) {
        self.log.borrow_mut().params.push((stage, index, value));
    }

    fn bind_texture(&mut self, unit: u32, ty: SamplerType, texture: TextureHandle) {
        self.log.borrow_mut().textures.push((unit, ty, texture));
    }

    fn apply_render_state(&mut self, state: &RenderState) {
        self.log.borrow_mut().states.push(state.clone());
    }

    fn resource_limits(&self) -> Option<ResourceLimits> {
        self.limits
    }
}

pub fn pass(name: &str, vertex: Option<&str>, pixel: Option<&str>) -> PassDesc {
    let mut pass = PassDesc::new(name);
    pass.vertex = vertex.map(|entry| ShaderEntry::new("// vertex source", entry, "vs_2_0"));
    pass.pixel = pixel.map(|entry| ShaderEntry::new("// pixel source", entry, "ps_2_0"));
    pass
}

pub fn technique(name: &str, passes: Vec<PassDesc>) -> TechniqueDesc {
    TechniqueDesc {
        name: name.to_string(),
        passes,
    }
}

/// One technique, two passes, and a `float4x4 wvp : WorldViewProjection`
/// bound to vertex register 0 in both passes.
pub fn wvp_effect() -> (EffectDesc, MockCompiler) {
    let effect = EffectDesc {
        techniques: vec![technique(
            "Main",
            vec![
                pass("P0", Some("vs0"), Some("ps0")),
                pass("P1", Some("vs1"), Some("ps1")),
            ],
        )],
        parameters: vec![
            ParameterDesc::uniform("float4x4", "wvp").with_semantic("WorldViewProjection")
        ],
    };
    let compiler = MockCompiler::new()
        .constant("vs0", "wvp", 0)
        .constant("vs1", "wvp", 0);
    (effect, compiler)
}
