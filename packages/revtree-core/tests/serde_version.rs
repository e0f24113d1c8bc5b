#[cfg(feature = "serde")]
#[test]
fn version_json_keeps_every_field() {
    use revtree_core::{make_patch, Version, VersionId};

    let version = Version::new("v2", 1_700_000_000_000, make_patch("a", "ab"), Some("v1".into()));

    let json = serde_json::to_value(&version).expect("serialize Version");
    assert_eq!(json["id"], "v2");
    assert_eq!(json["date"], 1_700_000_000_000_i64);
    assert_eq!(json["parent"], "v1");
    assert!(json["patch"].is_array(), "patch must serialize as a hunk list, got: {json}");

    let roundtrip: Version = serde_json::from_value(json).expect("deserialize Version");
    assert_eq!(roundtrip, version);

    let root: Version =
        serde_json::from_str(r#"{"id":"v1","date":1,"patch":[]}"#).expect("parse root");
    assert_eq!(root.id, VersionId::from("v1"));
    assert!(root.is_root());
}
