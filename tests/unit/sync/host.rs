use serde_json::json;

use super::*;

#[test]
fn frame_write_marker_is_scoped_to_one_entity() {
    let a = EntityId::new("a");
    let b = EntityId::new("b");
    let opts = UpdateOptions::by("gm").frame_write_for(&a);
    assert!(opts.is_frame_write_for(&a));
    assert!(!opts.is_frame_write_for(&b));
    assert!(opts.is_frame_write());
    assert_eq!(opts.actor.as_deref(), Some("gm"));
    assert!(!UpdateOptions::default().is_frame_write());
}

#[test]
fn commit_applies_patch_and_logs_options() {
    let store = InMemoryEntityStore::new();
    store.insert(Entity::new("t1", Role::Instance, Some("art/a.png".into())));
    let id = EntityId::new("t1");

    let opts = UpdateOptions::default().frame_write_for(&id);
    let committed = store
        .commit(
            &id,
            &EntityPatch::image("art/b.png").with_extra("hp", json!(3)),
            &opts,
        )
        .unwrap();
    assert_eq!(committed.image.as_deref(), Some("art/b.png"));
    assert_eq!(committed.extra.get("hp"), Some(&json!(3)));

    let log = store.commits_for(&id);
    assert_eq!(log.len(), 1);
    assert!(log[0].opts.is_frame_write_for(&id));

    // The marker never lands on the persisted entity.
    let persisted = serde_json::to_value(store.get(&id).unwrap()).unwrap();
    assert!(!persisted.to_string().contains("frameWrite"));
}

#[test]
fn commit_unknown_entity_fails() {
    let store = InMemoryEntityStore::new();
    let err = store
        .commit(
            &EntityId::new("ghost"),
            &EntityPatch::image("x.png"),
            &UpdateOptions::default(),
        )
        .unwrap_err();
    assert!(matches!(err, FrameError::Entity(_)));
    assert!(store.commits().is_empty());
}

#[test]
fn instances_and_templates_are_split_by_role() {
    let store = InMemoryEntityStore::new();
    store.insert(Entity::new("t1", Role::Instance, None));
    store.insert(Entity::new("p1", Role::Prototype, None));
    store.insert(Entity::new("t2", Role::Instance, None));
    assert_eq!(store.instances().len(), 2);
    assert_eq!(store.templates().len(), 1);
}

#[test]
fn recording_texture_cache_strips_busting_suffix() {
    let cache = RecordingTextureCache::default();
    cache.invalidate("token-frames/a.webp?v=99");
    assert_eq!(cache.invalidated(), vec!["token-frames/a.webp".to_string()]);
}

#[test]
fn closures_are_confirmations() {
    let yes = |_: &str| true;
    let no = |_: &str| false;
    assert!(yes.confirm("go?"));
    assert!(!no.confirm("go?"));
}
