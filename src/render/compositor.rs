//! Garment layering: fit, tint, color filter and pattern.

use crate::assets::decode::PreparedImage;
use crate::design::config::RenderConfig;
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::error::KitResult;
use crate::foundation::math::percent_to_opacity;
use crate::render::blend::{BlendMode, alpha_intersect, composite};
use crate::render::filter::ColorFilter;
use crate::render::surface::{Frame, Rasterizer, fill_rgba8, image_to_rect};

/// Turns a silhouette, an optional pattern and the configuration into a flattened garment frame.
///
/// Overlays (logo, lettering) are not part of this stage.
pub struct Compositor {
    raster: Rasterizer,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            raster: Rasterizer::new(),
        }
    }

    /// Composite the garment layers into a new frame of `canvas` size.
    ///
    /// The fitted silhouette is the alpha mask for every layer, so nothing is ever drawn where
    /// the silhouette is transparent.
    #[tracing::instrument(skip_all, fields(w = canvas.width, h = canvas.height))]
    pub fn composite(
        &mut self,
        silhouette: &PreparedImage,
        pattern: Option<&PreparedImage>,
        config: &RenderConfig,
        canvas: Canvas,
    ) -> KitResult<Frame> {
        let mut frame = Frame::transparent(canvas);
        if silhouette.is_empty() {
            return Ok(frame);
        }

        let fit = fit_rect(silhouette.width, silhouette.height, canvas);
        let mask = self.raster.image_layer(
            canvas,
            silhouette,
            image_to_rect(silhouette.width, silhouette.height, fit),
        )?;

        let mut garment = mask.clone();
        if !config.base_color.is_white() {
            let mut tint = vec![0u8; canvas.byte_len()];
            fill_rgba8(&mut tint, config.base_color.to_rgba8_premul().to_array());
            alpha_intersect(&mut tint, &mask)?;
            composite(&mut garment, &tint, 1.0, BlendMode::Multiply)?;
        }

        ColorFilter::new(config.color_brightness, config.color_contrast)
            .apply_in_place(&mut garment);
        composite(
            &mut frame.data,
            &garment,
            percent_to_opacity(config.color_opacity),
            BlendMode::Normal,
        )?;

        if let Some(pattern) = pattern
            && let Some(transform) = pattern_transform(pattern, config, canvas)
        {
            let mut layer = self.raster.image_layer(canvas, pattern, transform)?;
            alpha_intersect(&mut layer, &mask)?;
            composite(
                &mut frame.data,
                &layer,
                percent_to_opacity(config.pattern_opacity),
                BlendMode::HardLight,
            )?;
        }

        Ok(frame)
    }
}

/// Largest rectangle with the image's aspect ratio that fits `canvas`, centered.
pub fn fit_rect(image_w: u32, image_h: u32, canvas: Canvas) -> Rect {
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    if image_w == 0 || image_h == 0 {
        return Rect::new(0.0, 0.0, cw, ch);
    }
    let image_aspect = f64::from(image_w) / f64::from(image_h);
    if image_aspect > cw / ch {
        let h = cw / image_aspect;
        let y = (ch - h) / 2.0;
        Rect::new(0.0, y, cw, y + h)
    } else {
        let w = ch * image_aspect;
        let x = (cw - w) / 2.0;
        Rect::new(x, 0.0, x + w, ch)
    }
}

/// Pattern pixel space -> canvas transform, or `None` when the pattern would have no area.
///
/// The pattern is sized to `pattern_scale`% of the canvas' limiting dimension, placed centered
/// plus `pattern_offset`, and the placement is then rotated about the canvas center.
pub fn pattern_transform(
    pattern: &PreparedImage,
    config: &RenderConfig,
    canvas: Canvas,
) -> Option<Affine> {
    if pattern.is_empty() {
        return None;
    }
    let (cw, ch) = (f64::from(canvas.width), f64::from(canvas.height));
    let scale = config.pattern_scale / 100.0;
    let aspect = f64::from(pattern.width) / f64::from(pattern.height);
    let (sw, sh) = if aspect > cw / ch {
        let sw = cw * scale;
        (sw, sw / aspect)
    } else {
        let sh = ch * scale;
        (sh * aspect, sh)
    };
    if !(sw.is_finite() && sh.is_finite() && sw > 0.0 && sh > 0.0) {
        return None;
    }

    let x = (cw - sw) / 2.0 + config.pattern_offset.x;
    let y = (ch - sh) / 2.0 + config.pattern_offset.y;
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    let center = canvas.center().to_vec2();
    let theta = config.pattern_rotation_deg.to_radians();
    let rotate = if theta.is_finite() {
        Affine::translate(center) * Affine::rotate(theta) * Affine::translate(-center)
    } else {
        Affine::IDENTITY
    };
    let dst = Rect::new(x, y, x + sw, y + sh);
    Some(rotate * image_to_rect(pattern.width, pattern.height, dst))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
