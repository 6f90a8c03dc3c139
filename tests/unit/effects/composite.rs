use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4], 1.0).is_err());
}

#[test]
fn white_opaque_mask_is_fully_visible() {
    assert_eq!(luminance_alpha([255, 255, 255, 255]), 255);
}

#[test]
fn black_opaque_mask_is_fully_hidden() {
    assert_eq!(luminance_alpha([0, 0, 0, 255]), 0);
}

#[test]
fn half_alpha_white_mask_is_clamped_to_its_alpha() {
    let a = luminance_alpha([255, 255, 255, 128]);
    assert!(a <= 128);
    assert_eq!(a, 128);
}

#[test]
fn luminance_stencil_is_one_byte_per_pixel() {
    let px = [255u8, 255, 255, 255, 0, 0, 0, 255, 255, 255, 255, 128];
    assert_eq!(luminance_stencil(&px), vec![255, 0, 128]);
}

#[test]
fn stencil_scales_premultiplied_pixels() {
    let mut dst = vec![200u8, 100, 50, 255, 200, 100, 50, 255];
    stencil_in_place(&mut dst, &[255, 0]).unwrap();
    assert_eq!(dst, vec![200, 100, 50, 255, 0, 0, 0, 0]);
    assert!(stencil_in_place(&mut dst, &[255]).is_err());
}

#[test]
fn circle_stencil_center_visible_corners_hidden() {
    let s = circle_stencil(8, 8, 4.0, 4.0, 4.0);
    assert_eq!(s.len(), 64);
    assert_eq!(s[3 * 8 + 3], 255);
    assert_eq!(s[4 * 8 + 4], 255);
    assert_eq!(s[0], 0);
    assert_eq!(s[7], 0);
    assert_eq!(s[63], 0);
}
