//! Fixed render-state directives declared inside a pass block.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcColor,
    InvSrcColor,
    SrcAlpha,
    InvSrcAlpha,
    DestColor,
    InvDestColor,
    DestAlpha,
    InvDestAlpha,
}

impl BlendFactor {
    fn parse(value: &str) -> Option<Self> {
        let factor = match value.to_ascii_lowercase().as_str() {
            "zero" => Self::Zero,
            "one" => Self::One,
            "srccolor" => Self::SrcColor,
            "invsrccolor" => Self::InvSrcColor,
            "srcalpha" => Self::SrcAlpha,
            "invsrcalpha" => Self::InvSrcAlpha,
            "destcolor" => Self::DestColor,
            "invdestcolor" => Self::InvDestColor,
            "destalpha" => Self::DestAlpha,
            "invdestalpha" => Self::InvDestAlpha,
            _ => return None,
        };
        Some(factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CullMode {
    None,
    Clockwise,
    CounterClockwise,
}

/// One `Key = Value;` directive applied when the pass is bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    DepthTest(bool),
    DepthWrite(bool),
    AlphaBlend(bool),
    AlphaTest(bool),
    SrcBlend(BlendFactor),
    DestBlend(BlendFactor),
    CullMode(CullMode),
    /// Recognised syntactically but not interpreted.
    Other { name: String, value: String },
}

impl RenderState {
    pub fn parse(name: &str, value: &str) -> Self {
        let key = name.trim();
        let value = value.trim();
        let parsed = match key.to_ascii_lowercase().as_str() {
            "zenable" | "depthtestenable" => parse_bool(value).map(Self::DepthTest),
            "zwriteenable" | "depthmask" => parse_bool(value).map(Self::DepthWrite),
            "alphablendenable" | "blendenable" => parse_bool(value).map(Self::AlphaBlend),
            "alphatestenable" => parse_bool(value).map(Self::AlphaTest),
            "srcblend" => BlendFactor::parse(value).map(Self::SrcBlend),
            "destblend" => BlendFactor::parse(value).map(Self::DestBlend),
            "cullmode" => match value.to_ascii_lowercase().as_str() {
                "none" => Some(Self::CullMode(CullMode::None)),
                "cw" => Some(Self::CullMode(CullMode::Clockwise)),
                "ccw" => Some(Self::CullMode(CullMode::CounterClockwise)),
                _ => None,
            },
            _ => None,
        };
        parsed.unwrap_or_else(|| Self::Other {
            name: key.to_string(),
            value: value.to_string(),
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
