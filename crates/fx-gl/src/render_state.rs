//! Mapping of FX render-state directives and sampler types onto GL enums.

use gl::types::GLenum;

use fx_core::{BlendFactor, CullMode, SamplerType};

/// Fixed-function alpha test; absent from the core-profile bindings.
pub const ALPHA_TEST: GLenum = 0x0BC0;

pub fn blend_factor(factor: BlendFactor) -> GLenum {
    match factor {
        BlendFactor::Zero => gl::ZERO,
        BlendFactor::One => gl::ONE,
        BlendFactor::SrcColor => gl::SRC_COLOR,
        BlendFactor::InvSrcColor => gl::ONE_MINUS_SRC_COLOR,
        BlendFactor::SrcAlpha => gl::SRC_ALPHA,
        BlendFactor::InvSrcAlpha => gl::ONE_MINUS_SRC_ALPHA,
        BlendFactor::DestColor => gl::DST_COLOR,
        BlendFactor::InvDestColor => gl::ONE_MINUS_DST_COLOR,
        BlendFactor::DestAlpha => gl::DST_ALPHA,
        BlendFactor::InvDestAlpha => gl::ONE_MINUS_DST_ALPHA,
    }
}

/// Face to cull, or `None` to disable culling.
///
/// FX cull modes name the winding that is discarded. With GL's default
/// counter-clockwise front faces, culling clockwise triangles is culling
/// back faces.
pub fn cull_face(mode: CullMode) -> Option<GLenum> {
    match mode {
        CullMode::None => None,
        CullMode::Clockwise => Some(gl::BACK),
        CullMode::CounterClockwise => Some(gl::FRONT),
    }
}

/// Texture target for a sampler, or `None` when the dimensionality is unknown.
pub fn texture_target(ty: SamplerType) -> Option<GLenum> {
    match ty {
        SamplerType::Sampler1D => Some(gl::TEXTURE_1D),
        SamplerType::Sampler2D => Some(gl::TEXTURE_2D),
        SamplerType::Sampler3D => Some(gl::TEXTURE_3D),
        SamplerType::SamplerCube => Some(gl::TEXTURE_CUBE_MAP),
        SamplerType::Unknown => None,
    }
}
