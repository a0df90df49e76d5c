//! [`FxShader`]: one loaded effect and the programs of its active technique.

use std::path::Path;

use anyhow::Result;
use fx_compiler::{compile_pass, CgcCompiler, CgcConfig, ShaderCompiler};
use fx_core::{
    EffectDesc, ErrorLog, FxError, ParameterTable, Pass, PassStateBuilder, SamplerType, Semantic,
    Stage, Technique, TextureHandle, UniformType, UniformValue, UNBOUND,
};
use fx_gl::{GlProgramBackend, ProgramBackend};

use crate::config::FxConfig;
use crate::programs::ProgramSet;
use crate::upload::pack_uniform;

/// Everything derived from one load. Replaced wholesale on reload.
#[derive(Debug, Default)]
struct EffectState {
    techniques: Vec<Technique>,
    params: ParameterTable,
}

impl EffectState {
    fn passes(&self) -> impl Iterator<Item = &Pass> {
        self.techniques.iter().flat_map(|t| t.passes.iter())
    }
}

/// A loaded effect.
///
/// Public operations report failure through their return value and append
/// the cause to [`FxShader::error_string`]; nothing panics across this
/// boundary.
pub struct FxShader<B: ProgramBackend, C: ShaderCompiler> {
    backend: B,
    compiler: C,
    config: FxConfig,
    effect: EffectState,
    programs: ProgramSet,
    built: bool,
    technique: usize,
    pass: usize,
    valid: bool,
    errors: ErrorLog,
}

impl FxShader<GlProgramBackend, CgcCompiler> {
    /// The stock pairing: `cgc` (see [`CgcConfig::from_env`]) and ARB
    /// programs on the current GL context.
    pub fn with_gl(config: FxConfig) -> Result<Self> {
        let backend = GlProgramBackend::new()?;
        let compiler = CgcCompiler::new(CgcConfig::from_env());
        Ok(Self::with_config(backend, compiler, config))
    }
}

impl<B: ProgramBackend, C: ShaderCompiler> FxShader<B, C> {
    pub fn new(backend: B, compiler: C) -> Self {
        Self::with_config(backend, compiler, FxConfig::default())
    }

    pub fn with_config(backend: B, compiler: C, config: FxConfig) -> Self {
        Self {
            backend,
            compiler,
            config,
            effect: EffectState::default(),
            programs: ProgramSet::default(),
            built: false,
            technique: 0,
            pass: 0,
            valid: false,
            errors: ErrorLog::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn compiler(&self) -> &C {
        &self.compiler
    }

    pub fn config(&self) -> &FxConfig {
        &self.config
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Read, parse and compile an FX file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> bool {
        match EffectDesc::from_file(path) {
            Ok(desc) => self.load_effect(&desc),
            Err(err) => {
                self.reset();
                self.errors.clear();
                self.fail(err);
                false
            }
        }
    }

    /// Compile every pass of `desc` and replace the current effect.
    ///
    /// Returns `false` when the effect has no techniques (nothing else is
    /// attempted) or when any pass failed to compile. Failed passes do not
    /// stop the remaining ones from compiling.
    pub fn load_effect(&mut self, desc: &EffectDesc) -> bool {
        self.reset();
        self.errors.clear();

        if let Err(err) = desc.validate() {
            self.fail(err);
            return false;
        }

        let limits = if self.config.use_resource_limits {
            self.backend.resource_limits()
        } else {
            None
        };

        let mut builder = PassStateBuilder::new();
        let mut techniques = Vec::with_capacity(desc.techniques.len());
        let mut failed = 0;
        for technique in &desc.techniques {
            let mut passes = Vec::with_capacity(technique.passes.len());
            for pass_desc in &technique.passes {
                let mut pass = Pass::from_desc(pass_desc);
                match compile_pass(&self.compiler, pass_desc, self.config.flags, limits.as_ref()) {
                    Ok(compiled) => {
                        pass.compiled_vertex = compiled.vertex_assembly;
                        pass.compiled_pixel = compiled.pixel_assembly;
                        for event in compiled.events {
                            builder.observe(event);
                        }
                    }
                    Err(err) => {
                        failed += 1;
                        self.errors.push(&err);
                    }
                }
                pass.state = builder.finalize_pass().clone();
                passes.push(pass);
            }
            techniques.push(Technique {
                name: technique.name.clone(),
                passes,
            });
        }

        let mut params = ParameterTable::build(&desc.parameters);
        params.remap_registers(&techniques[0].passes);
        self.effect = EffectState { techniques, params };
        self.valid = failed == 0;

        tracing::debug!(
            techniques = self.effect.techniques.len(),
            failed,
            "loaded effect"
        );
        self.valid
    }

    /// Drop programs and the loaded effect.
    fn reset(&mut self) {
        self.release_programs();
        self.effect = EffectState::default();
        self.technique = 0;
        self.pass = 0;
        self.valid = false;
    }

    fn fail(&mut self, err: FxError) {
        self.errors.push(&err);
    }

    fn release_programs(&mut self) {
        self.programs.release(&mut self.backend);
        self.built = false;
    }

    // ------------------------------------------------------------------
    // Technique / pass selection and program lifecycle
    // ------------------------------------------------------------------

    pub fn set_technique(&mut self, technique: usize) -> bool {
        if technique >= self.effect.techniques.len() {
            self.fail(FxError::State(format!(
                "technique {technique} out of range ({} techniques)",
                self.effect.techniques.len()
            )));
            return false;
        }
        if technique != self.technique {
            tracing::debug!(from = self.technique, to = technique, "switching technique");
            self.release_programs();
            self.technique = technique;
            self.pass = 0;
            self.effect
                .params
                .remap_registers(&self.effect.techniques[technique].passes);
        }
        true
    }

    pub fn set_pass(&mut self, pass: usize) -> bool {
        let count = self.pass_count(self.technique);
        if pass >= count {
            self.fail(FxError::State(format!(
                "pass {pass} out of range ({count} passes)"
            )));
            return false;
        }
        self.pass = pass;
        true
    }

    pub fn active_technique(&self) -> usize {
        self.technique
    }

    pub fn active_pass(&self) -> usize {
        self.pass
    }

    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Create GPU programs for every pass of the active technique.
    /// Succeeds without touching the backend when already built.
    pub fn build(&mut self) -> bool {
        if self.built {
            tracing::trace!("programs already built");
            return true;
        }
        if !self.valid {
            self.fail(FxError::State("no successfully compiled effect to build".into()));
            return false;
        }

        self.release_programs();
        let passes = &self.effect.techniques[self.technique].passes;
        match ProgramSet::build(&mut self.backend, passes) {
            Ok(programs) => {
                self.programs = programs;
                self.built = true;
                true
            }
            Err(errors) => {
                for err in errors {
                    self.fail(err);
                }
                false
            }
        }
    }

    /// Activate the current pass: programs, render state, dirty uniforms and
    /// every sampler texture that has a unit in this pass. Dirty flags are
    /// cleared once the last pass of the technique has been bound.
    pub fn bind(&mut self) -> bool {
        if !self.built {
            self.fail(FxError::State("bind called before a successful build".into()));
            return false;
        }

        let pass_index = self.pass;
        let technique = &self.effect.techniques[self.technique];
        let Some(pass) = technique.passes.get(pass_index) else {
            self.fail(FxError::State(format!("pass {pass_index} is not built")));
            return false;
        };
        let pair = self.programs.pair(pass_index).copied().unwrap_or_default();
        let last_pass = pass_index + 1 == technique.passes.len();
        let backend = &mut self.backend;

        for stage in Stage::ALL {
            match pair.get(stage) {
                Some(program) => {
                    backend.bind_program(stage, program);
                    backend.enable_stage(stage);
                }
                None => backend.disable_stage(stage),
            }
        }
        for state in &pass.state.render_states {
            backend.apply_render_state(state);
        }

        let params = &mut self.effect.params;
        for uniform in params.uniforms.iter_mut().filter(|u| u.dirty) {
            let rows = pack_uniform(uniform.ty, &uniform.value);
            for stage in Stage::ALL {
                let register = uniform.register(stage, pass_index);
                if register == UNBOUND || pair.get(stage).is_none() {
                    continue;
                }
                for (offset, row) in rows.iter().enumerate() {
                    backend.set_local_parameter(stage, register as u32 + offset as u32, *row);
                }
            }
            if last_pass {
                uniform.dirty = false;
            }
        }
        // Texture units are shared by every pass, so they are rebound each
        // time regardless of the dirty flag.
        for sampler in params.samplers.iter_mut() {
            let unit = sampler.texture_unit(pass_index);
            match sampler.texture {
                Some(texture) if unit != UNBOUND => {
                    backend.bind_texture(unit as u32, sampler.ty, texture);
                }
                _ => {}
            }
            if last_pass {
                sampler.dirty = false;
            }
        }

        tracing::trace!(
            technique = self.technique,
            pass = pass_index,
            last_pass,
            "bound pass"
        );
        true
    }

    /// Disable both program stages. Safe to call in any state.
    pub fn unbind(&mut self) {
        for stage in Stage::ALL {
            self.backend.disable_stage(stage);
        }
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    /// `false` until an effect loads and every pass compiles.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Every error since the last load, one per line.
    pub fn error_string(&self) -> &str {
        self.errors.as_str()
    }

    // ------------------------------------------------------------------
    // Techniques and passes
    // ------------------------------------------------------------------

    pub fn technique_count(&self) -> usize {
        self.effect.techniques.len()
    }

    pub fn technique_name(&self, technique: usize) -> Option<&str> {
        self.effect
            .techniques
            .get(technique)
            .map(|t| t.name.as_str())
    }

    pub fn pass_count(&self, technique: usize) -> usize {
        self.effect
            .techniques
            .get(technique)
            .map_or(0, |t| t.passes.len())
    }

    pub fn pass_name(&self, technique: usize, pass: usize) -> Option<&str> {
        self.effect
            .techniques
            .get(technique)?
            .passes
            .get(pass)
            .map(|p| p.name.as_str())
    }

    /// Index of the first pass of `technique` in the global pass numbering
    /// used by the source and assembly queries.
    pub fn technique_offset(&self, technique: usize) -> Option<usize> {
        if technique >= self.effect.techniques.len() {
            return None;
        }
        Some(
            self.effect.techniques[..technique]
                .iter()
                .map(|t| t.passes.len())
                .sum(),
        )
    }

    fn global_pass(&self, index: usize) -> Option<&Pass> {
        self.effect.passes().nth(index)
    }

    /// Uncompiled vertex source of a pass, by global pass index.
    pub fn vertex_source(&self, pass: usize) -> Option<&str> {
        let entry = self.global_pass(pass)?.vertex.as_ref()?;
        Some(&entry.source)
    }

    pub fn pixel_source(&self, pass: usize) -> Option<&str> {
        let entry = self.global_pass(pass)?.pixel.as_ref()?;
        Some(&entry.source)
    }

    /// Compiled vertex assembly, by global pass index. Empty when the stage
    /// is unused or failed to compile.
    pub fn compiled_vertex(&self, pass: usize) -> Option<&str> {
        self.global_pass(pass).map(|p| p.compiled(Stage::Vertex))
    }

    pub fn compiled_pixel(&self, pass: usize) -> Option<&str> {
        self.global_pass(pass).map(|p| p.compiled(Stage::Fragment))
    }

    // ------------------------------------------------------------------
    // Uniforms
    // ------------------------------------------------------------------

    pub fn uniform_count(&self) -> usize {
        self.effect.params.uniforms.len()
    }

    pub fn uniform_index(&self, name: &str) -> Option<usize> {
        self.effect.params.uniform_index(name)
    }

    pub fn uniform_name(&self, index: usize) -> Option<&str> {
        self.effect
            .params
            .uniforms
            .get(index)
            .map(|u| u.name.as_str())
    }

    pub fn uniform_type(&self, index: usize) -> Option<UniformType> {
        self.effect.params.uniforms.get(index).map(|u| u.ty)
    }

    pub fn uniform_semantic(&self, index: usize) -> Option<Semantic> {
        self.effect.params.uniforms.get(index).map(|u| u.semantic)
    }

    pub fn uniform_default(&self, index: usize) -> Option<&UniformValue> {
        self.effect.params.uniforms.get(index).map(|u| &u.default)
    }

    pub fn uniform_value(&self, index: usize) -> Option<&UniformValue> {
        self.effect.params.uniforms.get(index).map(|u| &u.value)
    }

    /// Whether the value still has to be pushed to some pass.
    pub fn uniform_dirty(&self, index: usize) -> Option<bool> {
        self.effect.params.uniforms.get(index).map(|u| u.dirty)
    }

    /// `(vertex, fragment)` registers of a uniform in a pass of the active
    /// technique; [`UNBOUND`] where unused.
    pub fn uniform_registers(&self, index: usize, pass: usize) -> Option<(i32, i32)> {
        let uniform = self.effect.params.uniforms.get(index)?;
        Some((
            uniform.register(Stage::Vertex, pass),
            uniform.register(Stage::Fragment, pass),
        ))
    }

    pub fn set_uniform_bool(&mut self, index: usize, value: &[bool]) -> bool {
        let components: Vec<f32> = value.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect();
        self.set_uniform(index, &components, "bool", UniformType::is_bool)
    }

    pub fn set_uniform_int(&mut self, index: usize, value: &[i32]) -> bool {
        let components: Vec<f32> = value.iter().map(|&i| i as f32).collect();
        self.set_uniform(index, &components, "int", UniformType::is_int)
    }

    pub fn set_uniform_float(&mut self, index: usize, value: f32) -> bool {
        self.set_uniform(index, &[value], "float", |ty| ty == UniformType::Float)
    }

    /// Any scalar or vector uniform, given as floats.
    pub fn set_uniform_vector(&mut self, index: usize, value: &[f32]) -> bool {
        self.set_uniform(index, value, "vector", |ty| {
            ty.matrix_dim().is_none() && ty != UniformType::Unknown
        })
    }

    /// Row-major matrix components.
    pub fn set_uniform_matrix(&mut self, index: usize, value: &[f32]) -> bool {
        self.set_uniform(index, value, "matrix", |ty| ty.matrix_dim().is_some())
    }

    /// Double-precision variant of [`set_uniform_matrix`]; components are
    /// narrowed to `f32`.
    ///
    /// [`set_uniform_matrix`]: FxShader::set_uniform_matrix
    pub fn set_uniform_matrix_f64(&mut self, index: usize, value: &[f64]) -> bool {
        let components: Vec<f32> = value.iter().map(|&d| d as f32).collect();
        self.set_uniform_matrix(index, &components)
    }

    fn set_uniform(
        &mut self,
        index: usize,
        components: &[f32],
        kind: &str,
        accepts: impl Fn(UniformType) -> bool,
    ) -> bool {
        let Some(uniform) = self.effect.params.uniforms.get_mut(index) else {
            self.fail(FxError::State(format!("no uniform at index {index}")));
            return false;
        };
        if !accepts(uniform.ty) {
            let err = FxError::State(format!(
                "uniform '{}' of type {} cannot take a {kind} value",
                uniform.name,
                uniform.ty.name()
            ));
            self.fail(err);
            return false;
        }
        uniform.set_components(components);
        true
    }

    // ------------------------------------------------------------------
    // Samplers and attributes
    // ------------------------------------------------------------------

    pub fn sampler_count(&self) -> usize {
        self.effect.params.samplers.len()
    }

    pub fn sampler_index(&self, name: &str) -> Option<usize> {
        self.effect.params.sampler_index(name)
    }

    pub fn sampler_name(&self, index: usize) -> Option<&str> {
        self.effect
            .params
            .samplers
            .get(index)
            .map(|s| s.name.as_str())
    }

    pub fn sampler_type(&self, index: usize) -> Option<SamplerType> {
        self.effect.params.samplers.get(index).map(|s| s.ty)
    }

    /// Texture unit of a sampler in a pass of the active technique.
    pub fn sampler_texture_unit(&self, index: usize, pass: usize) -> Option<i32> {
        self.effect
            .params
            .samplers
            .get(index)
            .map(|s| s.texture_unit(pass))
    }

    /// Whether the sampler's texture changed since the last pass of the
    /// technique was bound.
    pub fn sampler_dirty(&self, index: usize) -> Option<bool> {
        self.effect.params.samplers.get(index).map(|s| s.dirty)
    }

    /// Attach an externally owned texture; bound on the next [`bind`].
    ///
    /// [`bind`]: FxShader::bind
    pub fn set_sampler_texture(&mut self, index: usize, texture: TextureHandle) -> bool {
        match self.effect.params.samplers.get_mut(index) {
            Some(sampler) => {
                sampler.texture = Some(texture);
                sampler.dirty = true;
                true
            }
            None => {
                self.fail(FxError::State(format!("no sampler at index {index}")));
                false
            }
        }
    }

    pub fn attribute_count(&self) -> usize {
        self.effect.params.attributes.len()
    }

    pub fn attribute_name(&self, index: usize) -> Option<&str> {
        self.effect
            .params
            .attributes
            .get(index)
            .map(|a| a.name.as_str())
    }

    /// Declared type string of an attribute.
    pub fn attribute_type(&self, index: usize) -> Option<&str> {
        self.effect
            .params
            .attributes
            .get(index)
            .map(|a| a.type_name.as_str())
    }
}

impl<B: ProgramBackend, C: ShaderCompiler> Drop for FxShader<B, C> {
    fn drop(&mut self) {
        self.release_programs();
    }
}
