use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{KitError, KitResult};
use serde::{Deserialize, Serialize};

/// Opaque sRGB color written as `#rrggbb` (or the `#rgb` shorthand).
///
/// Comparison is by value, so `#FFFFFF`, `#fff` and `#ffffff` are the same color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    /// Pure white. As a garment base color this means "no tint".
    pub const WHITE: HexColor = HexColor::rgb(255, 255, 255);
    /// Pure black, the default lettering color.
    pub const BLACK: HexColor = HexColor::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_white(self) -> bool {
        self == Self::WHITE
    }

    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, 255)
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl std::fmt::Display for HexColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl std::str::FromStr for HexColor {
    type Err = KitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

fn parse_hex(s: &str) -> KitResult<HexColor> {
    let s = s.trim();
    let digits = s.strip_prefix('#').unwrap_or(s);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(KitError::validation(format!("invalid hex color \"{s}\"")));
    }

    fn hex_byte(pair: &str) -> KitResult<u8> {
        u8::from_str_radix(pair, 16)
            .map_err(|_| KitError::validation(format!("invalid hex byte \"{pair}\"")))
    }

    match digits.len() {
        6 => Ok(HexColor::rgb(
            hex_byte(&digits[0..2])?,
            hex_byte(&digits[2..4])?,
            hex_byte(&digits[4..6])?,
        )),
        3 => {
            let mut out = [0u8; 3];
            for (slot, i) in out.iter_mut().zip(0..3) {
                let nibble = hex_byte(&digits[i..i + 1])?;
                *slot = nibble * 17;
            }
            Ok(HexColor::rgb(out[0], out[1], out[2]))
        }
        _ => Err(KitError::validation(
            "hex color must be #RRGGBB or #RGB (case-insensitive)",
        )),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
