use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::assets::store::MemoryStore;
use crate::cache::key::derive_key;
use crate::foundation::core::{EntityId, Role};

#[test]
fn write_lands_in_namespace_with_busted_display_path() {
    let store = Arc::new(MemoryStore::new());
    let writer = ArtifactWriter::new(
        store.clone(),
        CacheNamespace::default(),
        ArtifactFormat::Png,
        NotificationGate::silent(),
    );
    let key = derive_key("art/hero.png", &EntityId::new("t1"), Role::Instance);
    let artifact = writer.write(&key, b"bytes").unwrap();

    assert_eq!(artifact.path, "token-frames/frame_token_t1_hero.png");
    assert!(artifact.display_path.starts_with("token-frames/frame_token_t1_hero.png?v="));
    assert!(store.contains(&artifact.path));
    assert_eq!(store.namespaces(), vec!["token-frames".to_string()]);
}

#[test]
fn write_suppresses_notifications_for_the_upload_only() {
    let restored = Arc::new(AtomicUsize::new(0));
    let r = Arc::clone(&restored);
    let gate = NotificationGate::new(|| {}, move || {
        r.fetch_add(1, Ordering::SeqCst);
    });
    let writer = ArtifactWriter::new(
        Arc::new(MemoryStore::new()),
        CacheNamespace::default(),
        ArtifactFormat::Webp,
        gate.clone(),
    );
    let key = derive_key("hero.png", &EntityId::new("t1"), Role::Instance);
    writer.write(&key, b"x").unwrap();
    assert_eq!(gate.active(), 0);
    assert_eq!(restored.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_upload_still_restores_notifications() {
    let store = Arc::new(MemoryStore::new());
    store.set_fail_writes(true);
    let gate = NotificationGate::silent();
    let writer = ArtifactWriter::new(
        store,
        CacheNamespace::default(),
        ArtifactFormat::Webp,
        gate.clone(),
    );
    let key = derive_key("hero.png", &EntityId::new("t1"), Role::Instance);
    assert!(writer.write(&key, b"x").is_err());
    assert_eq!(gate.active(), 0);
}

#[test]
fn cache_busting_replaces_existing_suffix() {
    let p = cache_busted("a/b.webp?v=1");
    assert!(p.starts_with("a/b.webp?v="));
    assert_eq!(p.matches('?').count(), 1);
}
