use std::sync::Arc;

use crate::assets::decode::{PreparedImage, unpremultiply_rgba8_in_place};
use crate::foundation::core::{Affine, Canvas, Rect, Rgba8Premul};
use crate::foundation::error::{KitError, KitResult};

/// A rendered frame as premultiplied RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl Frame {
    /// A fully transparent frame.
    pub fn transparent(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0; canvas.byte_len()],
        }
    }

    /// A frame filled with one color.
    pub fn filled(canvas: Canvas, color: Rgba8Premul) -> Self {
        let mut frame = Self::transparent(canvas);
        fill_rgba8(&mut frame.data, color.to_array());
        frame
    }

    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Premultiplied pixel at `(x, y)`; transparent when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    /// Copy of the pixels with alpha un-premultiplied, as image encoders expect.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        out
    }

    /// View the frame as an image usable as a drawing source.
    pub fn to_image(&self) -> PreparedImage {
        PreparedImage {
            width: self.width,
            height: self.height,
            rgba8_premul: Arc::new(self.data.clone()),
        }
    }
}

/// Reusable `vello_cpu` context plus the helpers to draw images and solid rects into RGBA8 layers.
pub(crate) struct Rasterizer {
    ctx: Option<vello_cpu::RenderContext>,
}

impl Rasterizer {
    pub(crate) fn new() -> Self {
        Self { ctx: None }
    }

    /// Run `f` against a reset context of the canvas size and read the result into a new layer.
    pub(crate) fn draw_layer(
        &mut self,
        canvas: Canvas,
        f: impl FnOnce(&mut vello_cpu::RenderContext) -> KitResult<()>,
    ) -> KitResult<Vec<u8>> {
        let width = canvas.width_u16()?;
        let height = canvas.height_u16()?;
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let drawn = f(&mut ctx);
        let out = drawn.map(|()| {
            ctx.flush();
            let mut pixmap = vello_cpu::Pixmap::new(width, height);
            ctx.render_to_pixmap(&mut pixmap);
            pixmap.data_as_u8_slice().to_vec()
        });
        self.ctx = Some(ctx);
        out
    }

    /// Draw `image` mapped into canvas space by `transform` (image pixel space -> canvas).
    pub(crate) fn image_layer(
        &mut self,
        canvas: Canvas,
        image: &PreparedImage,
        transform: Affine,
    ) -> KitResult<Vec<u8>> {
        let paint = image_paint(image)?;
        let (w, h) = (f64::from(image.width), f64::from(image.height));
        self.draw_layer(canvas, |ctx| {
            ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_transform(affine_to_cpu(transform));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            Ok(())
        })
    }
}

/// Affine that draws an image of `image_w x image_h` pixels into `dst`.
pub(crate) fn image_to_rect(image_w: u32, image_h: u32, dst: Rect) -> Affine {
    let sx = dst.width() / f64::from(image_w.max(1));
    let sy = dst.height() / f64::from(image_h.max(1));
    Affine::translate((dst.x0, dst.y0)) * Affine::scale_non_uniform(sx, sy)
}

pub(crate) fn fill_rgba8(data: &mut [u8], rgba: [u8; 4]) {
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn image_paint(image: &PreparedImage) -> KitResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&image.rgba8_premul, image.width, image.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> KitResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| KitError::validation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| KitError::validation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(KitError::validation("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let mut pixels = Vec::<vello_cpu::peniko::color::PremulRgba8>::with_capacity(
        (width as usize) * (height as usize),
    );
    for px in bytes.chunks_exact(4) {
        pixels.push(vello_cpu::peniko::color::PremulRgba8::from_u8_array([
            px[0], px[1], px[2], px[3],
        ]));
    }
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}
