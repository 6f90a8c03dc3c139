use super::*;

fn temp_root(tag: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "tokenframe_{tag}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn normalize_path_slash_normalization() {
    assert_eq!(normalize_rel_path("a/b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a\\b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("./a//b.png").unwrap(), "a/b.png");
    assert_eq!(normalize_rel_path("a/b.webp?v=123").unwrap(), "a/b.webp");
    assert!(normalize_rel_path("../x.png").is_err());
    assert!(normalize_rel_path("/abs.png").is_err());
    assert!(normalize_rel_path("").is_err());
}

#[test]
fn strip_query_removes_cache_busting_suffix() {
    assert_eq!(strip_query("f/a.webp?v=1"), "f/a.webp");
    assert_eq!(strip_query("f/a.webp#x"), "f/a.webp");
    assert_eq!(strip_query("f/a.webp"), "f/a.webp");
}

#[test]
fn memory_store_put_then_read() {
    let store = MemoryStore::new();
    store.ensure_namespace("token-frames").unwrap();
    store.ensure_namespace("token-frames").unwrap();
    assert_eq!(store.namespaces(), vec!["token-frames".to_string()]);

    let path = store.put("token-frames", "a.webp", b"abc").unwrap();
    assert_eq!(path, "token-frames/a.webp");
    assert_eq!(
        ArtifactStore::read(&store, "token-frames/a.webp?v=9").unwrap(),
        b"abc"
    );
}

#[test]
fn memory_store_write_failure_is_store_write() {
    let store = MemoryStore::new();
    store.set_fail_writes(true);
    let err = store.put("ns", "a.webp", b"x").unwrap_err();
    assert!(matches!(err, FrameError::StoreWrite(_)));
}

#[test]
fn memory_source_missing_is_asset_load() {
    let store = MemoryStore::new();
    let err = AssetSource::read(&store, "art/none.png").unwrap_err();
    assert!(matches!(err, FrameError::AssetLoad { .. }));
}

#[test]
fn fs_store_creates_namespace_and_overwrites_in_place() {
    let root = temp_root("fs_store");
    let store = FsArtifactStore::new(&root);
    store.ensure_namespace("token-frames").unwrap();
    assert!(root.join("token-frames").is_dir());

    let p1 = store.put("token-frames", "k.webp", b"one").unwrap();
    let p2 = store.put("token-frames", "k.webp", b"two").unwrap();
    assert_eq!(p1, p2);
    assert_eq!(ArtifactStore::read(&store, &p1).unwrap(), b"two");

    let source = FsAssetSource::new(&root);
    assert_eq!(source.read("token-frames/k.webp").unwrap(), b"two");
    assert!(source.read("token-frames/missing.webp").is_err());

    std::fs::remove_dir_all(&root).ok();
}
