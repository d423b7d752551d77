use super::*;

fn px(rgba: [u8; 4]) -> Vec<u8> {
    rgba.to_vec()
}

#[test]
fn normal_opacity_0_is_noop() {
    let mut dst = px([1, 2, 3, 4]);
    composite(&mut dst, &px([200, 200, 200, 200]), 0.0, BlendMode::Normal).unwrap();
    assert_eq!(dst, px([1, 2, 3, 4]));
}

#[test]
fn normal_onto_transparent_returns_src() {
    let mut dst = px([0, 0, 0, 0]);
    composite(&mut dst, &px([100, 110, 120, 200]), 1.0, BlendMode::Normal).unwrap();
    assert_eq!(dst, px([100, 110, 120, 200]));
}

#[test]
fn normal_half_opacity_halves_coverage() {
    let mut dst = px([0, 0, 0, 0]);
    composite(&mut dst, &px([255, 0, 0, 255]), 0.5, BlendMode::Normal).unwrap();
    assert_eq!(dst, px([128, 0, 0, 128]));
}

#[test]
fn multiply_opaque_is_channel_product() {
    let mut dst = px([255, 128, 0, 255]);
    let src = px([128, 255, 255, 255]);
    composite(&mut dst, &src, 1.0, BlendMode::Multiply).unwrap();
    assert_eq!(dst, px([128, 128, 0, 255]));
}

#[test]
fn blend_with_transparent_src_leaves_dst_untouched() {
    for mode in [BlendMode::Multiply, BlendMode::HardLight] {
        let mut dst = px([10, 20, 30, 40]);
        composite(&mut dst, &px([0, 0, 0, 0]), 1.0, mode).unwrap();
        assert_eq!(dst, px([10, 20, 30, 40]), "{mode:?}");
    }
}

#[test]
fn hard_light_keeps_saturated_source_over_white() {
    let mut dst = px([255, 255, 255, 255]);
    composite(&mut dst, &px([255, 0, 0, 255]), 1.0, BlendMode::HardLight).unwrap();
    assert_eq!(dst, px([255, 0, 0, 255]));

    // A mid-gray source leaves the backdrop nearly unchanged.
    let mut dst = px([100, 100, 100, 255]);
    let src = px([128, 128, 128, 255]);
    composite(&mut dst, &src, 1.0, BlendMode::HardLight).unwrap();
    for c in &dst[0..3] {
        assert!((i16::from(*c) - 101).abs() <= 2);
    }
}

#[test]
fn hard_light_onto_transparent_is_source_over() {
    let mut dst = px([0, 0, 0, 0]);
    composite(&mut dst, &px([0, 0, 200, 200]), 1.0, BlendMode::HardLight).unwrap();
    assert_eq!(dst, px([0, 0, 200, 200]));
}

#[test]
fn alpha_intersect_scales_by_mask_alpha() {
    let mut layer = [px([255, 0, 0, 255]), px([255, 0, 0, 255]), px([200, 100, 50, 255])].concat();
    let mask = [px([9, 9, 9, 255]), px([0, 0, 0, 0]), px([0, 0, 0, 128])].concat();
    alpha_intersect(&mut layer, &mask).unwrap();
    assert_eq!(&layer[0..4], &[255, 0, 0, 255]);
    assert_eq!(&layer[4..8], &[0, 0, 0, 0]);
    assert_eq!(&layer[8..12], &[100, 50, 25, 128]);
}

#[test]
fn mismatched_lengths_are_rejected() {
    let mut dst = vec![0u8; 8];
    assert!(composite(&mut dst, &[0u8; 4], 1.0, BlendMode::Normal).is_err());
    assert!(alpha_intersect(&mut dst, &[0u8; 12]).is_err());
}
