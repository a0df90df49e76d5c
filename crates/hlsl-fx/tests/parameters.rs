mod common;

use common::{pass, technique, MockBackend, MockCompiler, TestShader};
use hlsl_fx::{
    EffectDesc, ParameterDesc, ParameterUsage, SamplerType, Semantic, Stage, TextureHandle,
    UniformType, UNBOUND,
};
use pretty_assertions::assert_eq;

fn effect(parameters: Vec<ParameterDesc>) -> EffectDesc {
    EffectDesc {
        techniques: vec![technique(
            "T",
            vec![pass("P0", Some("vs"), Some("ps")), pass("P1", Some("vs"), Some("ps2"))],
        )],
        parameters,
    }
}

fn loaded(parameters: Vec<ParameterDesc>, compiler: MockCompiler) -> TestShader {
    let mut shader = TestShader::new(MockBackend::new(), compiler);
    assert!(shader.load_effect(&effect(parameters)), "{}", shader.error_string());
    shader
}

#[test]
fn sampler_unit_is_unbound_until_assigned() {
    let params = vec![ParameterDesc::uniform("sampler2D", "diffuseMap")];

    let shader = loaded(params.clone(), MockCompiler::new());
    assert_eq!(shader.sampler_count(), 1);
    assert_eq!(shader.sampler_name(0), Some("diffuseMap"));
    assert_eq!(shader.sampler_type(0), Some(SamplerType::Sampler2D));
    assert_eq!(shader.sampler_texture_unit(0, 0), Some(UNBOUND));

    let compiler = MockCompiler::new().texture_unit("ps", "diffuseMap", 3);
    let shader = loaded(params, compiler);
    assert_eq!(shader.sampler_texture_unit(0, 0), Some(3));
    assert_eq!(shader.sampler_texture_unit(0, 1), Some(UNBOUND));
}

#[test]
fn sampler_texture_is_bound_on_its_unit() {
    let compiler = MockCompiler::new()
        .texture_unit("ps", "envMap", 2)
        .texture_unit("ps2", "envMap", 0);
    let mut shader = loaded(
        vec![ParameterDesc::uniform("samplerCUBE", "envMap")],
        compiler,
    );
    let log = shader.backend().log.clone();

    assert!(shader.build());
    // No texture attached yet.
    assert!(shader.bind());
    assert!(log.borrow().textures.is_empty());

    assert!(shader.set_sampler_texture(0, TextureHandle(7)));
    assert!(shader.bind());
    assert!(shader.set_pass(1));
    assert!(shader.bind());
    assert_eq!(
        log.borrow().textures,
        vec![
            (2, SamplerType::SamplerCube, TextureHandle(7)),
            (0, SamplerType::SamplerCube, TextureHandle(7)),
        ]
    );

    assert!(!shader.set_sampler_texture(1, TextureHandle(8)));
}

#[test]
fn shared_unit_is_rebound_every_frame() {
    let compiler = MockCompiler::new()
        .texture_unit("ps", "a", 0)
        .texture_unit("ps2", "b", 0);
    let mut shader = loaded(
        vec![
            ParameterDesc::uniform("sampler2D", "a"),
            ParameterDesc::uniform("sampler2D", "b"),
        ],
        compiler,
    );
    let log = shader.backend().log.clone();
    assert!(shader.set_sampler_texture(0, TextureHandle(10)));
    assert!(shader.set_sampler_texture(1, TextureHandle(20)));
    assert!(shader.build());

    for _frame in 0..2 {
        for pass in 0..2 {
            assert!(shader.set_pass(pass));
            assert!(shader.bind());
        }
    }
    assert_eq!(shader.sampler_dirty(0), Some(false));
    assert_eq!(
        log.borrow().textures,
        vec![
            (0, SamplerType::Sampler2D, TextureHandle(10)),
            (0, SamplerType::Sampler2D, TextureHandle(20)),
            (0, SamplerType::Sampler2D, TextureHandle(10)),
            (0, SamplerType::Sampler2D, TextureHandle(20)),
        ]
    );
}

#[test]
fn uniform_metadata_and_defaults() {
    let shader = loaded(
        vec![
            ParameterDesc::uniform("float3", "tint")
                .with_semantic("Diffuse")
                .with_default("float3(1, 0.5, 0.25)"),
            ParameterDesc::uniform("half3", "odd")
                .with_semantic("Shininess")
                .with_default("half3(1, 2, 3)"),
            ParameterDesc::uniform("string", "label").with_default("\"hello\""),
            ParameterDesc::uniform("bool", "enabled").with_default("true"),
            ParameterDesc::uniform("float4", "pos").with_usage(ParameterUsage::Varying),
        ],
        MockCompiler::new(),
    );

    assert_eq!(shader.uniform_count(), 3);
    assert_eq!(shader.uniform_name(0), Some("tint"));
    assert_eq!(shader.uniform_type(0), Some(UniformType::Float3));
    assert_eq!(shader.uniform_semantic(0), Some(Semantic::Diffuse));
    assert_eq!(shader.uniform_default(0).unwrap()[..4], [1.0, 0.5, 0.25, 0.0]);
    assert_eq!(shader.uniform_value(0), shader.uniform_default(0));

    assert_eq!(shader.uniform_type(1), Some(UniformType::Unknown));
    assert_eq!(shader.uniform_default(1).unwrap(), &[0.0; 16]);
    assert_eq!(shader.uniform_semantic(1), Some(Semantic::Unknown));

    assert_eq!(shader.uniform_type(2), Some(UniformType::Bool));
    assert_eq!(shader.uniform_default(2).unwrap()[0], 1.0);

    assert_eq!(shader.attribute_count(), 1);
    assert_eq!(shader.attribute_name(0), Some("pos"));
    assert_eq!(shader.attribute_type(0), Some("float4"));
}

#[test]
fn typed_setters_check_the_declared_type() {
    let mut shader = loaded(
        vec![
            ParameterDesc::uniform("float", "scale"),
            ParameterDesc::uniform("int2", "counts"),
            ParameterDesc::uniform("bool3", "flags"),
            ParameterDesc::uniform("float4x4", "wvp"),
        ],
        MockCompiler::new(),
    );

    assert!(shader.set_uniform_float(0, 2.5));
    assert_eq!(shader.uniform_value(0).unwrap()[0], 2.5);

    assert!(shader.set_uniform_int(1, &[3, -4]));
    assert_eq!(shader.uniform_value(1).unwrap()[..2], [3.0, -4.0]);

    assert!(shader.set_uniform_bool(2, &[true, false, true]));
    assert_eq!(shader.uniform_value(2).unwrap()[..3], [1.0, 0.0, 1.0]);

    assert!(shader.set_uniform_vector(1, &[5.0, 6.0]));
    assert_eq!(shader.uniform_value(1).unwrap()[..2], [5.0, 6.0]);

    assert!(!shader.set_uniform_float(3, 1.0));
    assert!(!shader.set_uniform_vector(3, &[1.0; 4]));
    assert!(!shader.set_uniform_matrix(0, &[1.0; 16]));
    assert!(!shader.set_uniform_bool(0, &[true]));
    assert!(!shader.set_uniform_float(9, 1.0));
    assert_eq!(shader.error_string().lines().count(), 5);
    assert!(shader.error_string().contains("'wvp' of type float4x4"));
}

#[test]
fn double_matrix_is_narrowed() {
    let mut shader = loaded(
        vec![
            ParameterDesc::uniform("float2x2", "rot"),
            ParameterDesc::uniform("float2", "offset"),
        ],
        MockCompiler::new(),
    );

    assert!(shader.set_uniform_matrix_f64(0, &[0.5, -1.25, 2.0, 4.0]));
    assert_eq!(shader.uniform_value(0).unwrap()[..4], [0.5, -1.25, 2.0, 4.0]);
    assert_eq!(shader.uniform_dirty(0), Some(true));
    assert!(!shader.set_uniform_matrix_f64(1, &[1.0, 2.0]));
}

#[test]
fn setting_a_value_marks_it_dirty_again() {
    let compiler = MockCompiler::new().constant("vs", "scale", 4);
    let mut shader = loaded(vec![ParameterDesc::uniform("float", "scale")], compiler);
    let log = shader.backend().log.clone();

    assert!(shader.build());
    assert!(shader.bind());
    assert!(shader.set_pass(1));
    assert!(shader.bind());
    assert_eq!(shader.uniform_dirty(0), Some(false));

    assert!(shader.set_uniform_float(0, 0.75));
    assert_eq!(shader.uniform_dirty(0), Some(true));
    assert!(shader.bind());
    assert_eq!(
        log.borrow().params.last(),
        Some(&(Stage::Vertex, 4, [0.75; 4]))
    );
}
