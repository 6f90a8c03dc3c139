use std::io::Cursor;

use super::*;

#[test]
fn decode_image_png_keeps_straight_alpha() {
    let src_rgba = vec![100u8, 50u8, 200u8, 128u8];
    let img = image::RgbaImage::from_raw(1, 1, src_rgba.clone()).unwrap();

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();

    let decoded = decode_image("px.png", &buf).unwrap();
    assert_eq!(decoded.dimensions(), (1, 1));
    assert_eq!(decoded.as_raw().as_slice(), src_rgba.as_slice());
}

#[test]
fn decode_garbage_is_asset_load_error() {
    let err = decode_image("broken.png", b"not an image").unwrap_err();
    match err {
        FrameError::AssetLoad { path, .. } => assert_eq!(path, "broken.png"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn premultiply_then_unpremultiply_is_stable_for_opaque_and_clear() {
    let mut px = vec![10u8, 20, 30, 255, 40, 50, 60, 0];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255, 0, 0, 0, 0]);
}

#[test]
fn unpremultiply_restores_white_at_half_alpha() {
    let mut px = vec![255u8, 255, 255, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![128, 128, 128, 128]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![255, 255, 255, 128]);
}
