//! Brightness/contrast filters applied as sequential 4x5 color matrices.

use crate::foundation::math::unit_to_u8;

/// Percent-based brightness and contrast, 100 meaning unchanged.
///
/// Brightness multiplies each color channel; contrast scales channels around mid-gray. They are
/// applied one after the other with clamping in between, so the order is observable.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorFilter {
    pub brightness: f64,
    pub contrast: f64,
}

impl Default for ColorFilter {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
        }
    }
}

impl ColorFilter {
    pub fn new(brightness: f64, contrast: f64) -> Self {
        Self {
            brightness,
            contrast,
        }
    }

    /// Whether applying the filter would leave every pixel unchanged.
    pub fn is_identity(&self) -> bool {
        self.brightness == 100.0 && self.contrast == 100.0
    }

    /// Filter premultiplied RGBA8 pixels in place.
    pub fn apply_in_place(&self, rgba8_premul: &mut [u8]) {
        if self.is_identity() {
            return;
        }
        let passes = [
            brightness_matrix(factor(self.brightness)),
            contrast_matrix(factor(self.contrast)),
        ];
        for m in passes {
            color_matrix_rgba8_premul_in_place(rgba8_premul, m);
        }
    }
}

fn factor(percent: f64) -> f32 {
    if percent.is_finite() {
        (percent / 100.0).max(0.0) as f32
    } else {
        1.0
    }
}

fn brightness_matrix(b: f32) -> [f32; 20] {
    [
        b, 0.0, 0.0, 0.0, 0.0, //
        0.0, b, 0.0, 0.0, 0.0, //
        0.0, 0.0, b, 0.0, 0.0, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

fn contrast_matrix(k: f32) -> [f32; 20] {
    let t = 0.5 - 0.5 * k;
    [
        k, 0.0, 0.0, 0.0, t, //
        0.0, k, 0.0, 0.0, t, //
        0.0, 0.0, k, 0.0, t, //
        0.0, 0.0, 0.0, 1.0, 0.0,
    ]
}

pub(crate) fn color_matrix_rgba8_premul_in_place(data: &mut [u8], m: [f32; 20]) {
    for d in data.chunks_exact_mut(4) {
        if d[3] == 0 {
            continue;
        }
        let pa = d[3] as f32 / 255.0;

        // Premul -> straight for matrix application.
        let inv_a = 1.0 / pa;
        let r = (d[0] as f32 / 255.0) * inv_a;
        let g = (d[1] as f32 / 255.0) * inv_a;
        let b = (d[2] as f32 / 255.0) * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        d[0] = unit_to_u8(out_r * out_a);
        d[1] = unit_to_u8(out_g * out_a);
        d[2] = unit_to_u8(out_b * out_a);
        d[3] = unit_to_u8(out_a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/filter.rs"]
mod tests;
