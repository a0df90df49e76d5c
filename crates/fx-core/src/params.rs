//! Typed uniform/sampler/attribute tables built from the flat FX parameter
//! list, and the per-technique register remap.

use std::collections::HashSet;

use crate::defaults::{parse_default, UniformValue};
use crate::effect::{ParameterDesc, ParameterUsage};
use crate::pass::{Pass, UNBOUND};
use crate::semantic::Semantic;
use crate::types::{is_string_type, SamplerType, Stage, TextureHandle, UniformType};

#[derive(Debug, Clone)]
pub struct UniformParam {
    pub name: String,
    pub ty: UniformType,
    pub semantic: Semantic,
    pub default: UniformValue,
    pub value: UniformValue,
    /// Indexed by pass of the active technique; [`UNBOUND`] when unused.
    pub vertex_registers: Vec<i32>,
    pub fragment_registers: Vec<i32>,
    /// Value not yet pushed to every pass of the active technique.
    pub dirty: bool,
}

impl UniformParam {
    pub fn register(&self, stage: Stage, pass: usize) -> i32 {
        let registers = match stage {
            Stage::Vertex => &self.vertex_registers,
            Stage::Fragment => &self.fragment_registers,
        };
        registers.get(pass).copied().unwrap_or(UNBOUND)
    }

    /// Overwrite the leading components of the value and mark it dirty.
    /// Components beyond the type's size are ignored.
    pub fn set_components(&mut self, components: &[f32]) {
        let count = self.ty.component_count().min(components.len());
        self.value[..count].copy_from_slice(&components[..count]);
        self.dirty = true;
    }
}

#[derive(Debug, Clone)]
pub struct SamplerParam {
    pub name: String,
    pub ty: SamplerType,
    /// Texture unit per pass of the active technique; [`UNBOUND`] when unused.
    pub texture_units: Vec<i32>,
    pub texture: Option<TextureHandle>,
    pub dirty: bool,
}

impl SamplerParam {
    pub fn texture_unit(&self, pass: usize) -> i32 {
        self.texture_units.get(pass).copied().unwrap_or(UNBOUND)
    }
}

/// Per-vertex input. Listed for the embedding application; never bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeParam {
    pub name: String,
    pub type_name: String,
    pub ty: UniformType,
}

#[derive(Debug, Clone, Default)]
pub struct ParameterTable {
    pub uniforms: Vec<UniformParam>,
    pub samplers: Vec<SamplerParam>,
    pub attributes: Vec<AttributeParam>,
}

impl ParameterTable {
    /// Classify every non-constant parameter. Register arrays start empty
    /// until [`ParameterTable::remap_registers`] sizes them for a technique.
    pub fn build(parameters: &[ParameterDesc]) -> Self {
        let mut table = Self::default();
        let mut seen = HashSet::new();

        for param in parameters {
            if param.usage == ParameterUsage::Const {
                continue;
            }
            if !seen.insert(param.name.as_str()) {
                tracing::warn!(name = %param.name, "duplicate parameter ignored");
                continue;
            }

            if param.usage == ParameterUsage::Varying {
                table.attributes.push(AttributeParam {
                    name: param.name.clone(),
                    type_name: param.type_name.clone(),
                    ty: UniformType::parse(&param.type_name),
                });
            } else if let Some(ty) = SamplerType::parse(&param.type_name) {
                table.samplers.push(SamplerParam {
                    name: param.name.clone(),
                    ty,
                    texture_units: Vec::new(),
                    texture: None,
                    dirty: true,
                });
            } else if is_string_type(&param.type_name) {
                tracing::trace!(name = %param.name, "dropping string parameter");
            } else {
                let ty = UniformType::parse(&param.type_name);
                if ty == UniformType::Unknown {
                    tracing::debug!(name = %param.name, type_name = %param.type_name, "unknown uniform type");
                }
                let default = parse_default(ty, &param.default_expr);
                table.uniforms.push(UniformParam {
                    name: param.name.clone(),
                    ty,
                    semantic: Semantic::parse(&param.semantic),
                    default,
                    value: default,
                    vertex_registers: Vec::new(),
                    fragment_registers: Vec::new(),
                    dirty: true,
                });
            }
        }

        tracing::debug!(
            uniforms = table.uniforms.len(),
            samplers = table.samplers.len(),
            attributes = table.attributes.len(),
            "built parameter table"
        );
        table
    }

    /// Re-resolve every register for the passes of one technique and mark
    /// everything dirty. Arrays are resized to exactly `passes.len()`.
    pub fn remap_registers(&mut self, passes: &[Pass]) {
        for uniform in &mut self.uniforms {
            uniform.vertex_registers = passes
                .iter()
                .map(|p| p.state.vertex_registers.get(&uniform.name))
                .collect();
            uniform.fragment_registers = passes
                .iter()
                .map(|p| p.state.fragment_registers.get(&uniform.name))
                .collect();
            uniform.dirty = true;
        }
        for sampler in &mut self.samplers {
            sampler.texture_units = passes
                .iter()
                .map(|p| p.state.texture_units.get(&sampler.name))
                .collect();
            sampler.dirty = true;
        }
    }

    pub fn mark_all_dirty(&mut self) {
        self.uniforms.iter_mut().for_each(|u| u.dirty = true);
        self.samplers.iter_mut().for_each(|s| s.dirty = true);
    }

    pub fn uniform_index(&self, name: &str) -> Option<usize> {
        self.uniforms.iter().position(|u| u.name == name)
    }

    pub fn sampler_index(&self, name: &str) -> Option<usize> {
        self.samplers.iter().position(|s| s.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pass::{PassEvent, PassStateBuilder};
    use pretty_assertions::assert_eq;

    fn params() -> Vec<ParameterDesc> {
        vec![
            ParameterDesc::uniform("float4x4", "wvp").with_semantic("WorldViewProjection"),
            ParameterDesc::uniform("float3", "color")
                .with_semantic("diffuse")
                .with_default("{1, 0.5f, 0}"),
            ParameterDesc::uniform("half3", "odd"),
            ParameterDesc::uniform("string", "label"),
            ParameterDesc::uniform("float", "k").with_usage(ParameterUsage::Const),
            ParameterDesc::uniform("samplerCUBE", "env"),
            ParameterDesc::uniform("float4", "position").with_usage(ParameterUsage::Varying),
        ]
    }

    #[test]
    fn classifies_parameters() {
        let table = ParameterTable::build(&params());
        let names: Vec<_> = table.uniforms.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["wvp", "color", "odd"]);
        assert_eq!(table.uniforms[0].semantic, Semantic::WorldViewProjection);
        assert_eq!(table.uniforms[1].semantic, Semantic::Diffuse);
        assert_eq!(table.uniforms[1].default[..3].to_vec(), vec![1.0, 0.5, 0.0]);
        assert_eq!(table.uniforms[2].ty, UniformType::Unknown);
        assert_eq!(table.uniforms[2].semantic, Semantic::None);

        assert_eq!(table.samplers.len(), 1);
        assert_eq!(table.samplers[0].ty, SamplerType::SamplerCube);
        assert_eq!(table.attributes.len(), 1);
        assert_eq!(table.attributes[0].ty, UniformType::Float4);
    }

    #[test]
    fn remap_sizes_arrays_to_technique() {
        let mut table = ParameterTable::build(&params());
        let mut builder = PassStateBuilder::new();
        builder.observe(PassEvent::Register {
            stage: Stage::Vertex,
            name: "wvp".into(),
            index: 0,
        });
        builder.finalize_pass();
        builder.observe(PassEvent::TextureUnit {
            name: "env".into(),
            unit: 3,
        });
        // A constant register under a sampler's name is not a texture unit.
        builder.observe(PassEvent::Register {
            stage: Stage::Vertex,
            name: "env".into(),
            index: 9,
        });
        builder.observe(PassEvent::Register {
            stage: Stage::Fragment,
            name: "color".into(),
            index: 1,
        });
        builder.finalize_pass();

        let passes: Vec<Pass> = builder
            .finish()
            .into_iter()
            .map(|state| Pass {
                state,
                ..Pass::default()
            })
            .collect();

        for u in &mut table.uniforms {
            u.dirty = false;
        }
        table.remap_registers(&passes);

        let wvp = &table.uniforms[0];
        assert_eq!(wvp.vertex_registers, vec![0, UNBOUND]);
        assert_eq!(wvp.fragment_registers, vec![UNBOUND, UNBOUND]);
        assert!(wvp.dirty);
        assert_eq!(table.uniforms[1].register(Stage::Fragment, 1), 1);
        assert_eq!(table.uniforms[1].register(Stage::Fragment, 7), UNBOUND);
        assert_eq!(table.samplers[0].texture_units, vec![UNBOUND, 3]);

        table.remap_registers(&passes[..1]);
        assert_eq!(table.uniforms[0].vertex_registers.len(), 1);
    }

    #[test]
    fn set_components_clamps_to_type() {
        let mut table = ParameterTable::build(&params());
        let color = &mut table.uniforms[1];
        color.dirty = false;
        color.set_components(&[0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(color.value[..4].to_vec(), vec![0.1, 0.2, 0.3, 0.0]);
        assert!(color.dirty);
    }
}
