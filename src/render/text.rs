use std::borrow::Cow;

use crate::assets::color::HexColor;
use crate::assets::fonts::ResolvedFont;
use crate::foundation::core::{Affine, Point};
use crate::foundation::error::{KitError, KitResult};
use crate::render::surface::affine_to_cpu;

/// RGBA8 brush color carried through Parley layouts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<HexColor> for TextBrushRgba8 {
    fn from(c: HexColor) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: 255,
        }
    }
}

/// Shapes single-line labels with Parley and fills them as glyph runs.
///
/// The font is registered once; layout contexts are reused between calls.
pub(crate) struct TextPainter {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family: String,
    font: vello_cpu::peniko::FontData,
}

impl TextPainter {
    pub(crate) fn new(font: &ResolvedFont) -> KitResult<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.as_ref().clone()),
            None,
        );
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| KitError::validation("no font families registered from font bytes"))?;
        let family = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| KitError::validation("registered font family has no name"))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family,
            font: vello_cpu::peniko::FontData::new(
                vello_cpu::peniko::Blob::from(font.bytes.as_ref().clone()),
                font.index,
            ),
        })
    }

    fn layout_bold(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> parley::Layout<TextBrushRgba8> {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(self.family.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::BOLD,
        ));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        layout
    }

    /// Fill `text` in bold so its advance is centered on `anchor.x` and the middle of its em box
    /// sits on `anchor.y`. Empty text and non-positive sizes draw nothing.
    pub(crate) fn fill_centered(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        text: &str,
        size_px: f64,
        color: HexColor,
        anchor: Point,
    ) -> KitResult<()> {
        let size_px = size_px as f32;
        if text.is_empty() || !size_px.is_finite() || size_px <= 0.0 {
            return Ok(());
        }

        let layout = self.layout_bold(text, size_px, color.into());
        let Some(line) = layout.lines().next() else {
            return Ok(());
        };
        let m = line.metrics();
        let em_middle = m.baseline - (m.ascent - m.descent) / 2.0;
        let origin = Affine::translate((
            anchor.x - f64::from(layout.width()) / 2.0,
            anchor.y - f64::from(em_middle),
        ));

        ctx.set_transform(affine_to_cpu(origin));
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let mut pen_x = run.offset();
                let baseline = run.baseline();
                let glyphs = run.glyphs().map(|g| {
                    let glyph = vello_cpu::Glyph {
                        id: g.id,
                        x: pen_x + g.x,
                        y: baseline - g.y,
                    };
                    pen_x += g.advance;
                    glyph
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
