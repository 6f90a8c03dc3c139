use serde_json::{Map, Value, json};

use super::*;
use crate::cache::namespace::CachePathMatch;
use crate::foundation::core::{EntityId, Role};

fn framed_entity() -> Entity {
    Entity::new("t1", Role::Instance, Some("token-frames/frame_token_t1_a.webp".into()))
        .with_config(FrameConfig::enabled_with("frames/gold.png"))
}

fn merge(v: Value) -> ConfigChange {
    match v {
        Value::Object(m) => ConfigChange::Merge(m),
        _ => ConfigChange::Merge(Map::new()),
    }
}

#[test]
fn new_base_image_with_active_config_is_intercepted() {
    let d = StalenessDetector::default();
    let verdict = d.classify(
        &framed_entity(),
        &EntityPatch::image("art/new.png"),
        &UpdateOptions::default(),
    );
    match verdict {
        Staleness::SuppressAndRegenerate { base_image, config } => {
            assert_eq!(base_image, "art/new.png");
            assert_eq!(config.frame_image.as_deref(), Some("frames/gold.png"));
        }
        other => panic!("unexpected verdict: {other:?}"),
    }
}

#[test]
fn artifact_paths_pass_through() {
    let d = StalenessDetector::default();
    let verdict = d.classify(
        &framed_entity(),
        &EntityPatch::image("token-frames/frame_token_t1_b.webp?v=5"),
        &UpdateOptions::default(),
    );
    assert_eq!(verdict, Staleness::Pass);
}

#[test]
fn frame_core_writes_pass_without_inspection() {
    let d = StalenessDetector::default();
    let e = framed_entity();
    let opts = UpdateOptions::default().frame_write_for(&e.id);
    assert_eq!(
        d.classify(&e, &EntityPatch::image("art/new.png"), &opts),
        Staleness::Pass
    );

    // A marker for another entity does not count.
    let other = UpdateOptions::default().frame_write_for(&EntityId::new("t2"));
    assert!(matches!(
        d.classify(&e, &EntityPatch::image("art/new.png"), &other),
        Staleness::SuppressAndRegenerate { .. }
    ));
}

#[test]
fn disabling_in_same_update_takes_precedence() {
    let d = StalenessDetector::default();
    let patch = EntityPatch::image("art/new.png").with_config(merge(json!({"enabled": false})));
    assert_eq!(
        d.classify(&framed_entity(), &patch, &UpdateOptions::default()),
        Staleness::Restore
    );

    let cleared = EntityPatch::image("art/new.png").with_config(ConfigChange::Clear);
    assert_eq!(
        d.classify(&framed_entity(), &cleared, &UpdateOptions::default()),
        Staleness::Restore
    );
}

#[test]
fn enabling_in_same_update_intercepts() {
    let d = StalenessDetector::default();
    let plain = Entity::new("t1", Role::Instance, Some("art/a.png".into()));
    let patch = EntityPatch::image("art/b.png").with_config(merge(json!({
        "enabled": true,
        "frameImage": "frames/gold.png"
    })));
    assert!(matches!(
        d.classify(&plain, &patch, &UpdateOptions::default()),
        Staleness::SuppressAndRegenerate { .. }
    ));
}

#[test]
fn inert_or_missing_config_passes() {
    let d = StalenessDetector::default();
    let plain = Entity::new("t1", Role::Instance, Some("art/a.png".into()));
    assert_eq!(
        d.classify(&plain, &EntityPatch::image("art/b.png"), &UpdateOptions::default()),
        Staleness::Pass
    );

    let no_frame = plain.clone().with_config(FrameConfig {
        enabled: true,
        ..FrameConfig::default()
    });
    assert_eq!(
        d.classify(&no_frame, &EntityPatch::image("art/b.png"), &UpdateOptions::default()),
        Staleness::Pass
    );
}

#[test]
fn unrelated_updates_pass() {
    let d = StalenessDetector::default();
    let patch = EntityPatch::default().with_extra("hp", json!(4));
    assert_eq!(
        d.classify(&framed_entity(), &patch, &UpdateOptions::default()),
        Staleness::Pass
    );
    let scale = EntityPatch::config(merge(json!({"frameScale": 1.1})));
    assert_eq!(
        d.classify(&framed_entity(), &scale, &UpdateOptions::default()),
        Staleness::Pass
    );
}

#[test]
fn prefix_mode_intercepts_lookalike_folders() {
    let loose = StalenessDetector::default();
    let strict = StalenessDetector::new(CacheNamespace::new(
        "token-frames",
        CachePathMatch::Prefix,
    ));
    let patch = EntityPatch::image("my-token-frames-art/hero.png");
    assert_eq!(
        loose.classify(&framed_entity(), &patch, &UpdateOptions::default()),
        Staleness::Pass
    );
    assert!(matches!(
        strict.classify(&framed_entity(), &patch, &UpdateOptions::default()),
        Staleness::SuppressAndRegenerate { .. }
    ));
}
