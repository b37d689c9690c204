use palette::Srgba;

/// RGBA color with normalized `f32` channels.
/// Wraps `palette::Srgba<f32>`; opaque colors carry an alpha of exactly 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorValue(Srgba<f32>);

impl ColorValue {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self(Srgba::new(r, g, b, a))
    }

    /// Opaque color from three channels.
    pub fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Build from a channel list: 3 channels get an alpha of 1.0, 4 are taken
    /// as-is. Any other length returns `None`.
    pub fn from_channels(channels: &[f32]) -> Option<Self> {
        match *channels {
            [r, g, b] => Some(Self::opaque(r, g, b)),
            [r, g, b, a] => Some(Self::new(r, g, b, a)),
            _ => None,
        }
    }

    pub fn channels(self) -> [f32; 4] {
        let (r, g, b, a) = self.0.into_components();
        [r, g, b, a]
    }

    pub fn rgb(self) -> [f32; 3] {
        let [r, g, b, _] = self.channels();
        [r, g, b]
    }

    pub fn alpha(self) -> f32 {
        self.0.alpha
    }

    /// 8-bit channels, clamped and rounded.
    pub fn to_srgba_u8(self) -> Srgba<u8> {
        let clamped = Srgba::new(
            self.0.red.clamp(0.0, 1.0),
            self.0.green.clamp(0.0, 1.0),
            self.0.blue.clamp(0.0, 1.0),
            self.0.alpha.clamp(0.0, 1.0),
        );
        clamped.into_format()
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(self) -> String {
        let c = self.to_srgba_u8();
        format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
    }

    /// Lowercase `#rrggbbaa`.
    pub fn to_hex_rgba(self) -> String {
        let c = self.to_srgba_u8();
        format!("#{:02x}{:02x}{:02x}{:02x}", c.red, c.green, c.blue, c.alpha)
    }
}

/// A color extracted from one CSV record together with its label.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColor {
    pub label: String,
    pub color: ColorValue,
}

impl NamedColor {
    pub fn new(label: impl Into<String>, color: ColorValue) -> Self {
        Self {
            label: label.into(),
            color,
        }
    }
}
