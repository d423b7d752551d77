use serde::{Deserialize, Serialize};

use crate::assets::color::HexColor;
use crate::assets::loader::PatternId;
use crate::design::config::RenderConfig;
use crate::foundation::core::{Side, Vec2};
use crate::foundation::error::{KitError, KitResult};

/// One configuration change, as issued by a control panel.
///
/// Serialized adjacently tagged, e.g. `{"op": "set_pattern_scale", "value": 80}` or
/// `{"op": "clear_logo"}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Command {
    SetSide(Side),
    SetBaseColor(HexColor),
    SetColorOpacity(f64),
    SetColorBrightness(f64),
    SetColorContrast(f64),
    /// `None` deselects the pattern.
    SelectPattern(Option<PatternId>),
    SetPatternOffset(Vec2),
    SetPatternScale(f64),
    SetPatternRotation(f64),
    SetPatternOpacity(f64),
    /// Removes the logo. Loading one goes through the session, which decodes the file first.
    ClearLogo,
    SetLogoSize(f64),
    SetLogoOffset(Vec2),
    SetLogoBrightness(f64),
    SetLogoContrast(f64),
    SetPlayerName(String),
    SetPlayerNumber(String),
    SetNameSize(f64),
    SetNameOffset(Vec2),
    SetNameColor(HexColor),
    SetNumberSize(f64),
    SetNumberOffset(Vec2),
    SetNumberColor(HexColor),
}

fn set<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}

impl Command {
    /// Apply to `config`, returning whether any field changed.
    pub fn apply_to(self, config: &mut RenderConfig) -> bool {
        match self {
            Command::SetSide(v) => set(&mut config.side, v),
            Command::SetBaseColor(v) => set(&mut config.base_color, v),
            Command::SetColorOpacity(v) => set(&mut config.color_opacity, v),
            Command::SetColorBrightness(v) => set(&mut config.color_brightness, v),
            Command::SetColorContrast(v) => set(&mut config.color_contrast, v),
            Command::SelectPattern(v) => set(&mut config.pattern, v),
            Command::SetPatternOffset(v) => set(&mut config.pattern_offset, v),
            Command::SetPatternScale(v) => set(&mut config.pattern_scale, v),
            Command::SetPatternRotation(v) => set(&mut config.pattern_rotation_deg, v),
            Command::SetPatternOpacity(v) => set(&mut config.pattern_opacity, v),
            Command::ClearLogo => config.logo.take().is_some(),
            Command::SetLogoSize(v) => set(&mut config.logo_size, v),
            Command::SetLogoOffset(v) => set(&mut config.logo_offset, v),
            Command::SetLogoBrightness(v) => set(&mut config.logo_brightness, v),
            Command::SetLogoContrast(v) => set(&mut config.logo_contrast, v),
            Command::SetPlayerName(v) => set(&mut config.player_name, v),
            Command::SetPlayerNumber(v) => set(&mut config.player_number, v),
            Command::SetNameSize(v) => set(&mut config.name_size, v),
            Command::SetNameOffset(v) => set(&mut config.name_offset, v),
            Command::SetNameColor(v) => set(&mut config.name_color, v),
            Command::SetNumberSize(v) => set(&mut config.number_size, v),
            Command::SetNumberOffset(v) => set(&mut config.number_offset, v),
            Command::SetNumberColor(v) => set(&mut config.number_color, v),
        }
    }

    /// Parse a JSON array of commands.
    pub fn list_from_json(text: &str) -> KitResult<Vec<Command>> {
        serde_json::from_str(text).map_err(|e| KitError::serde(format!("command json: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/design/command.rs"]
mod tests;
