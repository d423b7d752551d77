//! Premultiplied RGBA8 compositing kernels.
//!
//! Every function works on tightly packed, equally sized layers. Separable blend modes follow the
//! standard Porter-Duff source-over formulation with the blend function applied to
//! un-premultiplied channels:
//!
//! ```text
//! out_a = sa + da * (1 - sa)
//! out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
//! ```

use crate::foundation::error::{KitError, KitResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8, unit_to_u8};

/// Blend modes used by the garment pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Plain source-over.
    Normal,
    /// `B(s, d) = s * d`; recolors while keeping the base's shading.
    Multiply,
    /// Overlay with source and destination swapped; keeps the source's texture contrast.
    HardLight,
}

/// Composite `src` onto `dst` with `blend`, scaling the source by `opacity` (clamped to `[0, 1]`).
pub fn composite(dst: &mut [u8], src: &[u8], opacity: f32, blend: BlendMode) -> KitResult<()> {
    check_same_len(dst, src, "composite")?;

    // Dispatch once per layer; each branch monomorphizes its own kernel.
    match blend {
        BlendMode::Normal => over_in_place(dst, src, opacity),
        BlendMode::Multiply => blend_in_place(dst, src, opacity, |s, d| s * d),
        BlendMode::HardLight => blend_in_place(dst, src, opacity, |s, d| {
            if s <= 0.5 {
                2.0 * s * d
            } else {
                1.0 - 2.0 * (1.0 - s) * (1.0 - d)
            }
        }),
    }
    Ok(())
}

/// Keep `layer` only where `mask` has coverage (`destination-in`): every channel of `layer` is
/// scaled by the mask's alpha.
pub fn alpha_intersect(layer: &mut [u8], mask: &[u8]) -> KitResult<()> {
    check_same_len(layer, mask, "alpha_intersect")?;
    for (px, m) in layer.chunks_exact_mut(4).zip(mask.chunks_exact(4)) {
        let w = u16::from(m[3]);
        if w == 255 {
            continue;
        }
        for c in px.iter_mut() {
            *c = mul_div255_u8(u16::from(*c), w);
        }
    }
    Ok(())
}

fn check_same_len(dst: &[u8], src: &[u8], op: &str) -> KitResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(KitError::validation(format!(
            "{op} expects equal-length rgba8 buffers"
        )));
    }
    Ok(())
}

fn over_in_place(dst: &mut [u8], src: &[u8], opacity: f32) {
    let op = ((opacity.clamp(0.0, 1.0) * 255.0).round() as i32).clamp(0, 255) as u16;
    if op == 0 {
        return;
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = mul_div255_u8(u16::from(s[3]), op);
        if sa == 0 {
            continue;
        }
        let inv = 255u16 - u16::from(sa);

        d[3] = add_sat_u8(sa, mul_div255_u8(u16::from(d[3]), inv));
        for c in 0..3 {
            let sc = mul_div255_u8(u16::from(s[c]), op);
            let dc = mul_div255_u8(u16::from(d[c]), inv);
            d[c] = add_sat_u8(sc, dc);
        }
    }
}

#[inline(always)]
fn blend_in_place<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F)
where
    F: Fn(f32, f32) -> f32,
{
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return;
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }

        let sa = (s[3] as f32 / 255.0) * opacity;
        let da = d[3] as f32 / 255.0;
        let inv_sa = 1.0 - sa;
        let out_a = (sa + da * inv_sa).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = (s[c] as f32 / 255.0) * opacity;
            let dp = d[c] as f32 / 255.0;
            let sc = if sa > 0.0 {
                (sp / sa).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let dc = if da > 0.0 {
                (dp / da).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out_p = (sp * (1.0 - da) + dp * inv_sa + b * sa * da).clamp(0.0, 1.0);
            d[c] = unit_to_u8(out_p);
        }
        d[3] = unit_to_u8(out_a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/blend.rs"]
mod tests;
