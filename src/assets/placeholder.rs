//! Stand-in rasters for assets that failed to load and for the loading state.

use crate::assets::color::HexColor;
use crate::assets::decode::PreparedImage;
use crate::assets::fonts::ResolvedFont;
use crate::foundation::core::{Canvas, Point};
use crate::render::blend::{BlendMode, composite};
use crate::render::surface::{Frame, Rasterizer};
use crate::render::text::TextPainter;

/// Placeholder dimensions.
pub const PLACEHOLDER_WIDTH: u32 = 200;
pub const PLACEHOLDER_HEIGHT: u32 = 240;

const PLACEHOLDER_FILL: HexColor = HexColor::rgb(0xe0, 0xe0, 0xe0);
const LOADING_FILL: HexColor = HexColor::rgb(0xf0, 0xf0, 0xf0);
const LABEL_COLOR: HexColor = HexColor::rgb(0x99, 0x99, 0x99);
const LABEL_SIZE_PX: f64 = 20.0;

/// Text shown while the active silhouette has not resolved.
pub const LOADING_LABEL: &str = "Loading jersey...";

/// A 200x240 gray panel labelled with `label` (label drawn only when a font is available).
pub fn placeholder_image(label: &str, font: Option<&ResolvedFont>) -> PreparedImage {
    let canvas = Canvas {
        width: PLACEHOLDER_WIDTH,
        height: PLACEHOLDER_HEIGHT,
    };
    let mut painter = font.and_then(|f| match TextPainter::new(f) {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::warn!(error = %e, "placeholder label font unusable");
            None
        }
    });
    labelled_panel(canvas, PLACEHOLDER_FILL, label, painter.as_mut()).to_image()
}

/// Full-canvas frame shown while the active silhouette is loading.
pub(crate) fn loading_frame(canvas: Canvas, painter: Option<&mut TextPainter>) -> Frame {
    labelled_panel(canvas, LOADING_FILL, LOADING_LABEL, painter)
}

/// Solid panel with a centered label. Never fails: a label that cannot be drawn is left out.
fn labelled_panel(
    canvas: Canvas,
    fill: HexColor,
    label: &str,
    painter: Option<&mut TextPainter>,
) -> Frame {
    let mut frame = Frame::filled(canvas, fill.to_rgba8_premul());
    let Some(painter) = painter else {
        return frame;
    };

    let center = Point::new(
        f64::from(canvas.width) / 2.0,
        f64::from(canvas.height) / 2.0,
    );
    let text = Rasterizer::new().draw_layer(canvas, |ctx| {
        painter.fill_centered(ctx, label, LABEL_SIZE_PX, LABEL_COLOR, center)
    });
    match text.and_then(|layer| composite(&mut frame.data, &layer, 1.0, BlendMode::Normal)) {
        Ok(()) => {}
        Err(e) => tracing::warn!(error = %e, label, "placeholder label not drawn"),
    }
    frame
}

#[cfg(test)]
#[path = "../../tests/unit/assets/placeholder.rs"]
mod tests;
