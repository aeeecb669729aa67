use serde::Deserialize;

/// RGB color with components in [0, 1], sRGB-encoded as written in hex.
///
/// Deserializes from either a packed integer (`0x4a9eff` written as a number)
/// or a CSS-style string (`"#4a9eff"` / `"0x4a9eff"`).
#[derive(Debug, Copy, Clone, PartialEq, Deserialize)]
#[serde(try_from = "ColorRepr")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_hex(self) -> u32 {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        (c(self.r) << 16) | (c(self.g) << 8) | c(self.b)
    }

    /// Decode sRGB components to linear light for shading and blending.
    pub fn to_linear(self) -> Self {
        Self::new(
            srgb_to_linear(self.r),
            srgb_to_linear(self.g),
            srgb_to_linear(self.b),
        )
    }

    pub fn scale(self, s: f32) -> Self {
        Self::new(self.r * s, self.g * s, self.b * s)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn with_alpha(self, a: f32) -> [f32; 4] {
        [self.r, self.g, self.b, a]
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Packed(u32),
    Text(String),
}

impl TryFrom<ColorRepr> for Rgb {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Packed(hex) if hex <= 0xff_ffff => Ok(Rgb::from_hex(hex)),
            ColorRepr::Packed(hex) => Err(format!("color {hex:#x} exceeds 24 bits")),
            ColorRepr::Text(s) => parse_hex_color(&s).ok_or_else(|| format!("invalid color {s:?}")),
        }
    }
}

pub fn parse_hex_color(s: &str) -> Option<Rgb> {
    let s = s.trim();
    let digits = s
        .strip_prefix('#')
        .or_else(|| s.strip_prefix("0x"))
        .unwrap_or(s);
    if digits.len() != 6 {
        return None;
    }
    u32::from_str_radix(digits, 16).ok().map(Rgb::from_hex)
}
