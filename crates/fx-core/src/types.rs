//! Parameter type tags parsed from FX type strings.

/// Programmable pipeline stage a register or program belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub const ALL: [Stage; 2] = [Stage::Vertex, Stage::Fragment];
}

/// Declared data type of a uniform parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformType {
    Float,
    Float2,
    Float3,
    Float4,
    Int,
    Int2,
    Int3,
    Int4,
    Bool,
    Bool2,
    Bool3,
    Bool4,
    Float2x2,
    Float3x3,
    Float4x4,
    Unknown,
}

impl UniformType {
    /// Map an FX type string onto its tag. Anything outside the closed
    /// vocabulary is [`UniformType::Unknown`].
    pub fn parse(type_name: &str) -> Self {
        match type_name.trim() {
            "float" | "float1" => Self::Float,
            "float2" => Self::Float2,
            "float3" => Self::Float3,
            "float4" => Self::Float4,
            "int" | "int1" => Self::Int,
            "int2" => Self::Int2,
            "int3" => Self::Int3,
            "int4" => Self::Int4,
            "bool" | "bool1" => Self::Bool,
            "bool2" => Self::Bool2,
            "bool3" => Self::Bool3,
            "bool4" => Self::Bool4,
            "float2x2" => Self::Float2x2,
            "float3x3" => Self::Float3x3,
            "float4x4" => Self::Float4x4,
            _ => Self::Unknown,
        }
    }

    /// Number of scalar components stored in the value buffer.
    pub fn component_count(self) -> usize {
        match self {
            Self::Float | Self::Int | Self::Bool => 1,
            Self::Float2 | Self::Int2 | Self::Bool2 => 2,
            Self::Float3 | Self::Int3 | Self::Bool3 => 3,
            Self::Float4 | Self::Int4 | Self::Bool4 => 4,
            Self::Float2x2 => 4,
            Self::Float3x3 => 9,
            Self::Float4x4 => 16,
            Self::Unknown => 0,
        }
    }

    /// Row/column count for square matrix types.
    pub fn matrix_dim(self) -> Option<usize> {
        match self {
            Self::Float2x2 => Some(2),
            Self::Float3x3 => Some(3),
            Self::Float4x4 => Some(4),
            _ => None,
        }
    }

    pub fn is_bool(self) -> bool {
        matches!(self, Self::Bool | Self::Bool2 | Self::Bool3 | Self::Bool4)
    }

    pub fn is_int(self) -> bool {
        matches!(self, Self::Int | Self::Int2 | Self::Int3 | Self::Int4)
    }

    /// The prefix used by constructor-style literals, e.g. `float3` in
    /// `float3(1, 0, 0)`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Float => "float",
            Self::Float2 => "float2",
            Self::Float3 => "float3",
            Self::Float4 => "float4",
            Self::Int => "int",
            Self::Int2 => "int2",
            Self::Int3 => "int3",
            Self::Int4 => "int4",
            Self::Bool => "bool",
            Self::Bool2 => "bool2",
            Self::Bool3 => "bool3",
            Self::Bool4 => "bool4",
            Self::Float2x2 => "float2x2",
            Self::Float3x3 => "float3x3",
            Self::Float4x4 => "float4x4",
            Self::Unknown => "unknown",
        }
    }
}

/// Dimensionality of a sampler parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SamplerType {
    Sampler1D,
    Sampler2D,
    Sampler3D,
    SamplerCube,
    Unknown,
}

impl SamplerType {
    /// Returns `None` when `type_name` is not a sampler type at all.
    pub fn parse(type_name: &str) -> Option<Self> {
        let lower = type_name.trim().to_ascii_lowercase();
        let suffix = lower.strip_prefix("sampler")?;
        Some(match suffix {
            "1d" => Self::Sampler1D,
            "2d" => Self::Sampler2D,
            "3d" => Self::Sampler3D,
            "cube" => Self::SamplerCube,
            _ => Self::Unknown,
        })
    }
}

/// Externally owned texture object bound to a sampler. The effect never
/// creates or destroys textures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Is `type_name` a string-valued parameter (never stored as a uniform)?
pub fn is_string_type(type_name: &str) -> bool {
    type_name.trim().eq_ignore_ascii_case("string")
}
