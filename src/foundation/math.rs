pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

pub(crate) fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

/// Map a unit float to a byte with rounding and clamping.
pub(crate) fn unit_to_u8(x: f32) -> u8 {
    (x * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Map a percentage (100 = 1.0) to an opacity in `[0, 1]`.
pub(crate) fn percent_to_opacity(percent: f64) -> f32 {
    if !percent.is_finite() {
        return 0.0;
    }
    (percent / 100.0).clamp(0.0, 1.0) as f32
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
