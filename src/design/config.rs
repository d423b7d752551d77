use serde::{Deserialize, Serialize};

use crate::assets::color::HexColor;
use crate::assets::decode::PreparedImage;
use crate::assets::loader::PatternId;
use crate::foundation::core::{Side, Vec2};
use crate::foundation::error::{KitError, KitResult};

/// Every user-controllable rendering option.
///
/// Percent fields use 100 as "unchanged"/"fully opaque". Offsets are in frame pixels and may be
/// negative; whatever falls outside the frame is clipped. Nothing here is clamped: opacity is
/// clamped to `[0, 1]` only when it is composited.
///
/// Design files are JSON documents of this struct; every field is optional and defaults as below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Active garment face.
    pub side: Side,
    /// Tint color. White disables tinting.
    pub base_color: HexColor,
    pub color_opacity: f64,
    pub color_brightness: f64,
    pub color_contrast: f64,

    /// Selected pattern swatch.
    pub pattern: Option<PatternId>,
    /// Pattern offset from the centered placement.
    pub pattern_offset: Vec2,
    /// Pattern size as a percentage of the frame's limiting dimension.
    pub pattern_scale: f64,
    /// Pattern rotation about the frame center, in degrees.
    pub pattern_rotation_deg: f64,
    pub pattern_opacity: f64,

    /// Decoded logo; set at runtime, never part of a design file.
    #[serde(skip)]
    pub logo: Option<PreparedImage>,
    /// Logo edge length (the logo is drawn square).
    pub logo_size: f64,
    /// Logo top-left corner.
    pub logo_offset: Vec2,
    pub logo_brightness: f64,
    pub logo_contrast: f64,

    /// Player name; drawn upper-cased on the back.
    pub player_name: String,
    /// Player number; drawn verbatim on the back.
    pub player_number: String,
    pub name_size: f64,
    pub number_size: f64,
    /// Center of the name's em box.
    pub name_offset: Vec2,
    /// Center of the number's em box.
    pub number_offset: Vec2,
    pub name_color: HexColor,
    pub number_color: HexColor,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            side: Side::Front,
            base_color: HexColor::WHITE,
            color_opacity: 100.0,
            color_brightness: 100.0,
            color_contrast: 100.0,
            pattern: None,
            pattern_offset: Vec2::ZERO,
            pattern_scale: 100.0,
            pattern_rotation_deg: 0.0,
            pattern_opacity: 100.0,
            logo: None,
            logo_size: 150.0,
            logo_offset: Vec2::new(200.0, 100.0),
            logo_brightness: 100.0,
            logo_contrast: 100.0,
            player_name: String::new(),
            player_number: String::new(),
            name_size: 40.0,
            number_size: 120.0,
            name_offset: Vec2::new(200.0, 250.0),
            number_offset: Vec2::new(200.0, 150.0),
            name_color: HexColor::BLACK,
            number_color: HexColor::BLACK,
        }
    }
}

impl RenderConfig {
    /// Parse a JSON design document.
    pub fn from_json(text: &str) -> KitResult<Self> {
        serde_json::from_str(text).map_err(|e| KitError::serde(format!("design json: {e}")))
    }

    /// Serialize to pretty JSON. The logo is not included.
    pub fn to_json(&self) -> KitResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| KitError::serde(format!("design json: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/design/config.rs"]
mod tests;
