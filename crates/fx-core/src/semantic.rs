//! Semantic roles inferred from parameter semantic strings.

/// The role a uniform plays for the embedding application, inferred from its
/// FX semantic string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Semantic {
    World,
    WorldInverse,
    WorldTranspose,
    WorldInverseTranspose,
    View,
    ViewInverse,
    ViewTranspose,
    ViewInverseTranspose,
    Projection,
    ProjectionInverse,
    ProjectionTranspose,
    ProjectionInverseTranspose,
    WorldView,
    WorldViewInverse,
    WorldViewTranspose,
    WorldViewInverseTranspose,
    ViewProjection,
    ViewProjectionInverse,
    ViewProjectionTranspose,
    ViewProjectionInverseTranspose,
    WorldViewProjection,
    WorldViewProjectionInverse,
    WorldViewProjectionTranspose,
    WorldViewProjectionInverseTranspose,
    ViewPosition,
    Time,
    ViewportSize,
    Ambient,
    Diffuse,
    Emissive,
    Specular,
    Opacity,
    SpecularPower,
    Height,
    Normal,
    /// The parameter carries no semantic string.
    None,
    /// A semantic string outside the vocabulary.
    Unknown,
}

/// Every accepted spelling. The `I`, `T` and `IT` suffixes are shorthand for
/// `Inverse`, `Transpose` and `InverseTranspose`.
const VOCABULARY: &[(&str, Semantic)] = &[
    ("world", Semantic::World),
    ("view", Semantic::View),
    ("projection", Semantic::Projection),
    ("worldview", Semantic::WorldView),
    ("viewprojection", Semantic::ViewProjection),
    ("worldviewprojection", Semantic::WorldViewProjection),
    ("worldi", Semantic::WorldInverse),
    ("worldinverse", Semantic::WorldInverse),
    ("viewi", Semantic::ViewInverse),
    ("viewinverse", Semantic::ViewInverse),
    ("projectioni", Semantic::ProjectionInverse),
    ("projectioninverse", Semantic::ProjectionInverse),
    ("worldviewi", Semantic::WorldViewInverse),
    ("worldviewinverse", Semantic::WorldViewInverse),
    ("viewprojectioni", Semantic::ViewProjectionInverse),
    ("viewprojectioninverse", Semantic::ViewProjectionInverse),
    ("worldviewprojectioni", Semantic::WorldViewProjectionInverse),
    ("worldviewprojectioninverse", Semantic::WorldViewProjectionInverse),
    ("worldt", Semantic::WorldTranspose),
    ("worldtranspose", Semantic::WorldTranspose),
    ("viewt", Semantic::ViewTranspose),
    ("viewtranspose", Semantic::ViewTranspose),
    ("projectiont", Semantic::ProjectionTranspose),
    ("projectiontranspose", Semantic::ProjectionTranspose),
    ("worldviewt", Semantic::WorldViewTranspose),
    ("worldviewtranspose", Semantic::WorldViewTranspose),
    ("viewprojectiont", Semantic::ViewProjectionTranspose),
    ("viewprojectiontranspose", Semantic::ViewProjectionTranspose),
    ("worldviewprojectiont", Semantic::WorldViewProjectionTranspose),
    ("worldviewprojectiontranspose", Semantic::WorldViewProjectionTranspose),
    ("worldit", Semantic::WorldInverseTranspose),
    ("worldinversetranspose", Semantic::WorldInverseTranspose),
    ("viewit", Semantic::ViewInverseTranspose),
    ("viewinversetranspose", Semantic::ViewInverseTranspose),
    ("projectionit", Semantic::ProjectionInverseTranspose),
    ("projectioninversetranspose", Semantic::ProjectionInverseTranspose),
    ("worldviewit", Semantic::WorldViewInverseTranspose),
    ("worldviewinversetranspose", Semantic::WorldViewInverseTranspose),
    ("viewprojectionit", Semantic::ViewProjectionInverseTranspose),
    ("viewprojectioninversetranspose", Semantic::ViewProjectionInverseTranspose),
    ("worldviewprojectionit", Semantic::WorldViewProjectionInverseTranspose),
    (
        "worldviewprojectioninversetranspose",
        Semantic::WorldViewProjectionInverseTranspose,
    ),
    ("viewposition", Semantic::ViewPosition),
    ("eyeposition", Semantic::ViewPosition),
    ("time", Semantic::Time),
    ("rendertargetdimensions", Semantic::ViewportSize),
    ("viewportpixelsize", Semantic::ViewportSize),
    ("ambient", Semantic::Ambient),
    ("diffuse", Semantic::Diffuse),
    ("emissive", Semantic::Emissive),
    ("specular", Semantic::Specular),
    ("opacity", Semantic::Opacity),
    ("specularpower", Semantic::SpecularPower),
    ("height", Semantic::Height),
    ("normal", Semantic::Normal),
];

impl Semantic {
    /// Case-insensitive lookup. A blank string yields [`Semantic::None`],
    /// anything unmatched [`Semantic::Unknown`].
    pub fn parse(semantic: &str) -> Self {
        let trimmed = semantic.trim();
        if trimmed.is_empty() {
            return Semantic::None;
        }
        VOCABULARY
            .iter()
            .find(|(name, _)| trimmed.eq_ignore_ascii_case(name))
            .map(|&(_, s)| s)
            .unwrap_or(Semantic::Unknown)
    }

    /// True for the transform-matrix family.
    pub fn is_matrix(self) -> bool {
        !matches!(
            self,
            Self::ViewPosition
                | Self::Time
                | Self::ViewportSize
                | Self::Ambient
                | Self::Diffuse
                | Self::Emissive
                | Self::Specular
                | Self::Opacity
                | Self::SpecularPower
                | Self::Height
                | Self::Normal
                | Self::None
                | Self::Unknown
        )
    }
}
