//! Compositing and blending operators.
//!
//! Operator names and enum values live in one table; lookups in both
//! directions go through it.

/// A compositing or blending operator settable via `globalCompositeOperation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CompositeOperator {
    Normal,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    Clear,
    /// Replaces the destination with the source. Never paints shadows.
    Copy,
    #[default]
    SourceOver,
    DestinationOver,
    SourceIn,
    DestinationIn,
    SourceOut,
    DestinationOut,
    SourceAtop,
    DestinationAtop,
    Xor,
    Lighter,
    PlusDarker,
    PlusLighter,
}

static OPERATORS: [(&str, CompositeOperator); 30] = [
    ("normal", CompositeOperator::Normal),
    ("multiply", CompositeOperator::Multiply),
    ("screen", CompositeOperator::Screen),
    ("overlay", CompositeOperator::Overlay),
    ("darken", CompositeOperator::Darken),
    ("lighten", CompositeOperator::Lighten),
    ("color-dodge", CompositeOperator::ColorDodge),
    ("color-burn", CompositeOperator::ColorBurn),
    ("hard-light", CompositeOperator::HardLight),
    ("soft-light", CompositeOperator::SoftLight),
    ("difference", CompositeOperator::Difference),
    ("exclusion", CompositeOperator::Exclusion),
    ("hue", CompositeOperator::Hue),
    ("saturation", CompositeOperator::Saturation),
    ("color", CompositeOperator::Color),
    ("luminosity", CompositeOperator::Luminosity),
    ("clear", CompositeOperator::Clear),
    ("copy", CompositeOperator::Copy),
    ("source-over", CompositeOperator::SourceOver),
    ("destination-over", CompositeOperator::DestinationOver),
    ("source-in", CompositeOperator::SourceIn),
    ("destination-in", CompositeOperator::DestinationIn),
    ("source-out", CompositeOperator::SourceOut),
    ("destination-out", CompositeOperator::DestinationOut),
    ("source-atop", CompositeOperator::SourceAtop),
    ("destination-atop", CompositeOperator::DestinationAtop),
    ("xor", CompositeOperator::Xor),
    ("lighter", CompositeOperator::Lighter),
    ("plus-darker", CompositeOperator::PlusDarker),
    ("plus-lighter", CompositeOperator::PlusLighter),
];

impl CompositeOperator {
    /// Look up an operator by its canonical name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATORS
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, op)| *op)
    }

    /// Canonical name of this operator.
    pub fn name(self) -> &'static str {
        OPERATORS
            .iter()
            .find(|(_, op)| *op == self)
            .map(|(name, _)| *name)
            .unwrap_or("source-over")
    }

    /// All operators in table order.
    pub fn all() -> impl Iterator<Item = CompositeOperator> {
        OPERATORS.iter().map(|(_, op)| *op)
    }
}

impl From<CompositeOperator> for tiny_skia::BlendMode {
    fn from(op: CompositeOperator) -> Self {
        use tiny_skia::BlendMode;
        match op {
            CompositeOperator::Normal | CompositeOperator::SourceOver => BlendMode::SourceOver,
            CompositeOperator::Multiply => BlendMode::Multiply,
            CompositeOperator::Screen => BlendMode::Screen,
            CompositeOperator::Overlay => BlendMode::Overlay,
            CompositeOperator::Darken => BlendMode::Darken,
            CompositeOperator::Lighten => BlendMode::Lighten,
            CompositeOperator::ColorDodge => BlendMode::ColorDodge,
            CompositeOperator::ColorBurn => BlendMode::ColorBurn,
            CompositeOperator::HardLight => BlendMode::HardLight,
            CompositeOperator::SoftLight => BlendMode::SoftLight,
            CompositeOperator::Difference => BlendMode::Difference,
            CompositeOperator::Exclusion => BlendMode::Exclusion,
            CompositeOperator::Hue => BlendMode::Hue,
            CompositeOperator::Saturation => BlendMode::Saturation,
            CompositeOperator::Color => BlendMode::Color,
            CompositeOperator::Luminosity => BlendMode::Luminosity,
            CompositeOperator::Clear => BlendMode::Clear,
            CompositeOperator::Copy => BlendMode::Source,
            CompositeOperator::DestinationOver => BlendMode::DestinationOver,
            CompositeOperator::SourceIn => BlendMode::SourceIn,
            CompositeOperator::DestinationIn => BlendMode::DestinationIn,
            CompositeOperator::SourceOut => BlendMode::SourceOut,
            CompositeOperator::DestinationOut => BlendMode::DestinationOut,
            CompositeOperator::SourceAtop => BlendMode::SourceAtop,
            CompositeOperator::DestinationAtop => BlendMode::DestinationAtop,
            CompositeOperator::Xor => BlendMode::Xor,
            CompositeOperator::Lighter | CompositeOperator::PlusLighter => BlendMode::Plus,
            // tiny-skia has no plus-darker stage
            CompositeOperator::PlusDarker => BlendMode::Darken,
        }
    }
}
