use super::*;

#[test]
fn constructors_map_to_variants() {
    assert!(matches!(
        FrameError::asset_load("a.png", "bad header"),
        FrameError::AssetLoad { .. }
    ));
    assert!(matches!(
        FrameError::store_write("x"),
        FrameError::StoreWrite(_)
    ));
    assert!(matches!(
        FrameError::config_invalid("x"),
        FrameError::ConfigInvalid(_)
    ));
    assert!(matches!(
        FrameError::validation("x"),
        FrameError::Validation(_)
    ));
    assert!(matches!(FrameError::entity("x"), FrameError::Entity(_)));
    assert!(matches!(
        FrameError::permission_denied("x"),
        FrameError::PermissionDenied(_)
    ));
}

#[test]
fn asset_load_display_names_path() {
    let e = FrameError::asset_load("art/hero.png", "unexpected eof");
    assert_eq!(
        e.to_string(),
        "asset load error: 'art/hero.png': unexpected eof"
    );
}

#[test]
fn anyhow_errors_wrap_transparently() {
    let e: FrameError = anyhow::anyhow!("boom").into();
    assert_eq!(e.to_string(), "boom");
}
