use super::*;
use crate::assets::fonts::{FontSource, resolve_font};
use crate::foundation::core::Canvas;
use crate::render::surface::Rasterizer;

fn system_font() -> Option<ResolvedFont> {
    resolve_font(&FontSource::default(), std::path::Path::new("/nonexistent")).ok()?
}

fn inked_bounds(data: &[u8], width: u32) -> Option<(u32, u32, u32, u32)> {
    let mut b: Option<(u32, u32, u32, u32)> = None;
    for (i, px) in data.chunks_exact(4).enumerate() {
        if px[3] < 128 {
            continue;
        }
        let (x, y) = (i as u32 % width, i as u32 / width);
        b = Some(match b {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
    b
}

#[test]
fn brush_from_hex_is_opaque() {
    let b = TextBrushRgba8::from(HexColor::rgb(1, 2, 3));
    assert_eq!((b.r, b.g, b.b, b.a), (1, 2, 3, 255));
}

#[test]
fn centered_text_is_centered_on_anchor() {
    let Some(font) = system_font() else {
        return;
    };
    let mut painter = TextPainter::new(&font).unwrap();
    let canvas = Canvas::new(200, 120).unwrap();
    let mut raster = Rasterizer::new();
    let data = raster
        .draw_layer(canvas, |ctx| {
            painter.fill_centered(ctx, "HOH", 40.0, HexColor::BLACK, Point::new(100.0, 60.0))
        })
        .unwrap();

    let (x0, y0, x1, y1) = inked_bounds(&data, canvas.width).expect("text was drawn");
    let cx = (x0 + x1) as f64 / 2.0;
    let cy = (y0 + y1) as f64 / 2.0;
    assert!((cx - 100.0).abs() <= 6.0, "horizontal center {cx}");
    assert!((cy - 60.0).abs() <= 10.0, "vertical center {cy}");
    assert_eq!(&data[0..4], &[0, 0, 0, 0]);
}

#[test]
fn empty_text_and_zero_size_draw_nothing() {
    let Some(font) = system_font() else {
        return;
    };
    let mut painter = TextPainter::new(&font).unwrap();
    let canvas = Canvas::new(64, 64).unwrap();
    let mut raster = Rasterizer::new();
    let data = raster
        .draw_layer(canvas, |ctx| {
            painter.fill_centered(ctx, "", 20.0, HexColor::BLACK, Point::new(32.0, 32.0))?;
            painter.fill_centered(ctx, "X", 0.0, HexColor::BLACK, Point::new(32.0, 32.0))
        })
        .unwrap();
    assert!(data.iter().all(|b| *b == 0));
}
