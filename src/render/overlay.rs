use crate::assets::fonts::ResolvedFont;
use crate::design::config::RenderConfig;
use crate::foundation::core::{Point, Rect, Side};
use crate::foundation::error::KitResult;
use crate::render::blend::{BlendMode, composite};
use crate::render::filter::ColorFilter;
use crate::render::surface::{Frame, Rasterizer, image_to_rect};
use crate::render::text::TextPainter;

/// Draws the side-specific decorations on top of a composited garment: the logo on the front,
/// player name and number on the back.
///
/// Overlays are not masked by the silhouette.
pub struct OverlayRenderer {
    raster: Rasterizer,
    painter: Option<TextPainter>,
}

impl OverlayRenderer {
    /// `font` is used for lettering; without one, text overlays are skipped.
    pub fn new(font: Option<&ResolvedFont>) -> Self {
        let painter = font.and_then(|f| match TextPainter::new(f) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(error = %e, family = %f.family, "lettering font unusable");
                None
            }
        });
        Self {
            raster: Rasterizer::new(),
            painter,
        }
    }

    pub fn has_font(&self) -> bool {
        self.painter.is_some()
    }

    pub(crate) fn painter_mut(&mut self) -> Option<&mut TextPainter> {
        self.painter.as_mut()
    }

    #[tracing::instrument(skip_all, fields(side = %config.side))]
    pub fn draw(&mut self, frame: &mut Frame, config: &RenderConfig) -> KitResult<()> {
        match config.side {
            Side::Front => self.draw_logo(frame, config),
            Side::Back => self.draw_lettering(frame, config),
        }
    }

    fn draw_logo(&mut self, frame: &mut Frame, config: &RenderConfig) -> KitResult<()> {
        let Some(logo) = config.logo.as_ref() else {
            return Ok(());
        };
        let size = config.logo_size;
        if logo.is_empty() || !size.is_finite() || size <= 0.0 {
            return Ok(());
        }

        let at = config.logo_offset;
        let dst = Rect::new(at.x, at.y, at.x + size, at.y + size);
        let mut layer = self.raster.image_layer(
            frame.canvas(),
            logo,
            image_to_rect(logo.width, logo.height, dst),
        )?;
        ColorFilter::new(config.logo_brightness, config.logo_contrast).apply_in_place(&mut layer);
        composite(&mut frame.data, &layer, 1.0, BlendMode::Normal)
    }

    fn draw_lettering(&mut self, frame: &mut Frame, config: &RenderConfig) -> KitResult<()> {
        let name = config.player_name.to_uppercase();
        let number = config.player_number.as_str();
        if name.is_empty() && number.is_empty() {
            return Ok(());
        }
        let Some(painter) = self.painter.as_mut() else {
            tracing::warn!("no lettering font available; skipping name and number");
            return Ok(());
        };

        let layer = self.raster.draw_layer(frame.canvas(), |ctx| {
            painter.fill_centered(
                ctx,
                &name,
                config.name_size,
                config.name_color,
                Point::new(config.name_offset.x, config.name_offset.y),
            )?;
            painter.fill_centered(
                ctx,
                number,
                config.number_size,
                config.number_color,
                Point::new(config.number_offset.x, config.number_offset.y),
            )
        })?;
        composite(&mut frame.data, &layer, 1.0, BlendMode::Normal)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
