use super::*;

#[test]
fn role_key_segments_round_trip() {
    assert_eq!(Role::Instance.key_segment(), "token");
    assert_eq!(Role::Prototype.key_segment(), "proto");
    assert_eq!(Role::from_key_segment("token"), Some(Role::Instance));
    assert_eq!(Role::from_key_segment("proto"), Some(Role::Prototype));
    assert_eq!(Role::from_key_segment("actor"), None);
}

#[test]
fn rgb_hex_is_lowercase_padded() {
    assert_eq!(Rgb::new(255, 0, 10).to_hex(), "#ff000a");
}

#[test]
fn opaque_rgb_premultiplies_to_itself() {
    assert_eq!(Rgb::new(12, 34, 56).to_rgba8_premul().to_array(), [12, 34, 56, 255]);
}

#[test]
fn entity_id_serializes_as_plain_string() {
    let id = EntityId::new("tok1");
    assert_eq!(serde_json::to_string(&id).unwrap(), "\"tok1\"");
    assert_eq!(id.to_string(), "tok1");
}
