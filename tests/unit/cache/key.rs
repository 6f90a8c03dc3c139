use super::*;

fn id(s: &str) -> EntityId {
    EntityId::new(s)
}

#[test]
fn key_shape_matches_artifact_filename_convention() {
    let k = derive_key("art/heroes/Goblin King.png", &id("abc123"), Role::Instance);
    assert_eq!(k.as_str(), "frame_token_abc123_Goblin_King");
    assert_eq!(
        k.file_name(ArtifactFormat::Webp),
        "frame_token_abc123_Goblin_King.webp"
    );

    let p = derive_key("art/heroes/Goblin King.png", &id("abc123"), Role::Prototype);
    assert_eq!(p.as_str(), "frame_proto_abc123_Goblin_King");
}

#[test]
fn derivation_is_deterministic() {
    let a = derive_key("a/b/c.png", &id("t1"), Role::Instance);
    let b = derive_key("a/b/c.png", &id("t1"), Role::Instance);
    assert_eq!(a, b);
}

#[test]
fn extension_and_directory_do_not_affect_key() {
    let png = derive_key("art/hero.png", &id("t1"), Role::Instance);
    let webp = derive_key("other/dir/hero.webp", &id("t1"), Role::Instance);
    let bare = derive_key("hero", &id("t1"), Role::Instance);
    let busted = derive_key("art/hero.png?v=1700000000", &id("t1"), Role::Instance);
    assert_eq!(png, webp);
    assert_eq!(png, bare);
    assert_eq!(png, busted);
}

#[test]
fn different_stems_and_ids_give_different_keys() {
    let a = derive_key("art/hero.png", &id("t1"), Role::Instance);
    let b = derive_key("art/villain.png", &id("t1"), Role::Instance);
    let c = derive_key("art/hero.png", &id("t2"), Role::Instance);
    assert_ne!(a, b);
    assert_ne!(a, c);
}

#[test]
fn sanitize_keeps_safe_set_only() {
    assert_eq!(sanitize_stem("a-b_C9"), "a-b_C9");
    assert_eq!(sanitize_stem("a b.c(1)"), "a_b_c_1_");
    assert_eq!(sanitize_stem("élan"), "_lan");
}

#[test]
fn base_stem_handles_dotfiles_and_backslashes() {
    assert_eq!(base_stem("dir\\sub\\pic.jpeg"), "pic");
    assert_eq!(base_stem(".hidden"), ".hidden");
    assert_eq!(base_stem("archive.tar.gz"), "archive.tar");
}
