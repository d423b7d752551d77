use super::*;
use crate::assets::color::HexColor;
use crate::assets::decode::PreparedImage;
use crate::assets::fonts::{FontSource, resolve_font};
use crate::foundation::core::{Canvas, Rgba8Premul, Vec2};

fn system_font() -> Option<ResolvedFont> {
    resolve_font(&FontSource::default(), std::path::Path::new("/nonexistent")).ok()?
}

fn red_logo() -> PreparedImage {
    PreparedImage::solid(10, 10, Rgba8Premul::from_straight_rgba(255, 0, 0, 255))
}

fn logo_config(side: Side) -> RenderConfig {
    RenderConfig {
        side,
        logo: Some(red_logo()),
        logo_size: 20.0,
        logo_offset: Vec2::new(5.0, 5.0),
        ..RenderConfig::default()
    }
}

#[test]
fn front_logo_is_drawn_square_at_offset() {
    let mut overlay = OverlayRenderer::new(None);
    let mut frame = Frame::transparent(Canvas::new(40, 40).unwrap());
    overlay.draw(&mut frame, &logo_config(Side::Front)).unwrap();

    for (x, y) in [(15, 15), (6, 23)] {
        let px = frame.pixel(x, y);
        assert!(px[0] >= 254 && px[1] <= 1 && px[2] <= 1 && px[3] >= 254, "{px:?}");
    }
    assert_eq!(frame.pixel(2, 2), [0, 0, 0, 0]);
    assert_eq!(frame.pixel(30, 30), [0, 0, 0, 0]);
}

#[test]
fn logo_uses_its_own_brightness() {
    let mut overlay = OverlayRenderer::new(None);
    let mut frame = Frame::transparent(Canvas::new(40, 40).unwrap());
    let config = RenderConfig {
        logo_brightness: 50.0,
        ..logo_config(Side::Front)
    };
    overlay.draw(&mut frame, &config).unwrap();
    let px = frame.pixel(15, 15);
    assert!((i16::from(px[0]) - 128).abs() <= 1, "{px:?}");
    assert_eq!(px[3], 255);
}

#[test]
fn back_side_ignores_logo() {
    let mut overlay = OverlayRenderer::new(None);
    let mut frame = Frame::transparent(Canvas::new(40, 40).unwrap());
    overlay.draw(&mut frame, &logo_config(Side::Back)).unwrap();
    assert!(frame.data.iter().all(|b| *b == 0));
}

#[test]
fn zero_logo_size_draws_nothing() {
    let mut overlay = OverlayRenderer::new(None);
    let mut frame = Frame::transparent(Canvas::new(40, 40).unwrap());
    let config = RenderConfig {
        logo_size: 0.0,
        ..logo_config(Side::Front)
    };
    overlay.draw(&mut frame, &config).unwrap();
    assert!(frame.data.iter().all(|b| *b == 0));
}

#[test]
fn lettering_without_font_is_skipped() {
    let mut overlay = OverlayRenderer::new(None);
    assert!(!overlay.has_font());
    let mut frame = Frame::transparent(Canvas::default());
    let config = RenderConfig {
        side: Side::Back,
        player_name: "ortega".to_string(),
        player_number: "10".to_string(),
        ..RenderConfig::default()
    };
    overlay.draw(&mut frame, &config).unwrap();
    assert!(frame.data.iter().all(|b| *b == 0));
}

#[test]
fn name_is_upper_cased_and_only_drawn_on_back() {
    let Some(font) = system_font() else {
        return;
    };
    let mut overlay = OverlayRenderer::new(Some(&font));
    let canvas = Canvas::default();
    let back = |name: &str| RenderConfig {
        side: Side::Back,
        player_name: name.to_string(),
        name_color: HexColor::rgb(0, 0, 255),
        ..RenderConfig::default()
    };

    let mut lower = Frame::transparent(canvas);
    overlay.draw(&mut lower, &back("ortega")).unwrap();
    let mut upper = Frame::transparent(canvas);
    overlay.draw(&mut upper, &back("ORTEGA")).unwrap();
    assert_eq!(lower, upper);

    let inked_near_name = (230..270).any(|y| (100..300).any(|x| lower.pixel(x, y)[3] > 128));
    assert!(inked_near_name);
    assert_eq!(lower.pixel(5, 5), [0, 0, 0, 0]);

    let mut front = Frame::transparent(canvas);
    let cfg = RenderConfig {
        side: Side::Front,
        ..back("ortega")
    };
    overlay.draw(&mut front, &cfg).unwrap();
    assert!(front.data.iter().all(|b| *b == 0));
}

#[test]
fn number_is_drawn_without_name() {
    let Some(font) = system_font() else {
        return;
    };
    let mut overlay = OverlayRenderer::new(Some(&font));
    let mut frame = Frame::transparent(Canvas::default());
    let config = RenderConfig {
        side: Side::Back,
        player_number: "07".to_string(),
        ..RenderConfig::default()
    };
    overlay.draw(&mut frame, &config).unwrap();
    let inked_near_number = (110..190).any(|y| (120..280).any(|x| frame.pixel(x, y)[3] > 128));
    assert!(inked_near_number);
    let inked_near_name = (240..260).any(|y| (0..400).any(|x| frame.pixel(x, y)[3] > 0));
    assert!(!inked_near_name);
}
