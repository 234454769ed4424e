//! Codec Tests
//!
//! Tests for the plist section codec.

use gdsave::codec::{Codec, Mapping, PlistCodec, MAX_DEPTH};
use gdsave::SaveError;
use serde_json::{json, Value};

// =============================================================================
// Helper Functions
// =============================================================================

fn as_mapping(value: Value) -> Mapping {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {:?}", other),
    }
}

fn decode_str(text: &str) -> gdsave::Result<Mapping> {
    PlistCodec.decode(text.as_bytes())
}

/// A document whose root dict holds `levels` nested dicts
fn nested_document(levels: usize) -> String {
    format!(
        "<plist><dict>{}{}</dict></plist>",
        "<k>a</k><d>".repeat(levels),
        "</d>".repeat(levels)
    )
}

// =============================================================================
// Decoding Tests
// =============================================================================

#[test]
fn test_decode_all_value_tags() {
    let text = concat!(
        r#"<?xml version="1.0"?><plist version="1.0" gjver="2.0"><dict>"#,
        "<k>GJA_001</k><s>RobTop</s>",
        "<k>GJA_003</k><i>71</i>",
        "<k>bgVolume</k><r>0.5</r>",
        "<k>showSongMarkers</k><t />",
        "<k>hidden</k><f />",
        "<k>nested</k><d><k>a</k><s>b</s></d>",
        "<k>empty</k><d />",
        "</dict></plist>"
    );

    let map = decode_str(text).unwrap();

    assert_eq!(map["GJA_001"], json!("RobTop"));
    assert_eq!(map["GJA_003"], json!(71));
    assert_eq!(map["bgVolume"], json!(0.5));
    assert_eq!(map["showSongMarkers"], json!(true));
    assert_eq!(map["hidden"], json!(false));
    assert_eq!(map["nested"], json!({"a": "b"}));
    assert_eq!(map["empty"], json!({}));
}

#[test]
fn test_decode_preserves_key_order() {
    let text = r#"<plist version="1.0"><dict><k>z</k><i>1</i><k>a</k><i>2</i><k>m</k><i>3</i></dict></plist>"#;

    let map = decode_str(text).unwrap();
    let keys: Vec<&str> = map.keys().map(String::as_str).collect();

    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn test_decode_indented_document() {
    let text = "<?xml version=\"1.0\"?>\n<plist version=\"1.0\" gjver=\"2.0\">\n  <dict>\n    <k>name</k>\n    <s>  spaced  </s>\n    <k>inner</k>\n    <d>\n      <k>x</k>\n      <i>-4</i>\n    </d>\n  </dict>\n</plist>\n";

    let map = decode_str(text).unwrap();

    assert_eq!(map["name"], json!("  spaced  "));
    assert_eq!(map["inner"], json!({"x": -4}));
}

#[test]
fn test_decode_empty_root_dict() {
    let map = decode_str(r#"<?xml version="1.0"?><plist version="1.0"><dict /></plist>"#).unwrap();
    assert!(map.is_empty());
}

#[test]
fn test_decode_entities() {
    let text = r#"<plist><dict><k>a&amp;b</k><s>x &lt;y&gt; &quot;z&quot; &apos;w&apos; &#65;&#x42;</s></dict></plist>"#;

    let map = decode_str(text).unwrap();

    assert_eq!(map["a&b"], json!("x <y> \"z\" 'w' AB"));
}

#[test]
fn test_decode_empty_string_forms() {
    let text = r#"<plist><dict><k>a</k><s></s><k>b</k><s /></dict></plist>"#;

    let map = decode_str(text).unwrap();

    assert_eq!(map["a"], json!(""));
    assert_eq!(map["b"], json!(""));
}

#[test]
fn test_decode_duplicate_key_last_wins() {
    let text = r#"<plist><dict><k>a</k><i>1</i><k>a</k><i>2</i></dict></plist>"#;

    let map = decode_str(text).unwrap();

    assert_eq!(map.len(), 1);
    assert_eq!(map["a"], json!(2));
}

#[test]
fn test_decode_large_unsigned_integer() {
    let text = r#"<plist><dict><k>big</k><i>18446744073709551615</i></dict></plist>"#;

    let map = decode_str(text).unwrap();

    assert_eq!(map["big"], json!(u64::MAX));
}

// =============================================================================
// Decoding Error Tests
// =============================================================================

#[test]
fn test_decode_rejects_malformed_input() {
    let cases: &[&[u8]] = &[
        b"",
        b"not xml at all",
        b"<?xml version=\"1.0\"?>",
        b"<plist><dict><k>a</k><s>unterminated",
        b"<plist><dict><k>a</k><x>1</x></dict></plist>",
        b"<plist><dict><k>a</k><i>abc</i></dict></plist>",
        b"<plist><dict><k>a</k><r>1.2.3</r></dict></plist>",
        b"<plist><dict><s>no key</s></dict></plist>",
        b"<plist><dict></dict></plist>trailing",
        b"<dict></dict>",
        b"<plist><dict><k>a</k><s>&bogus;</s></dict></plist>",
        &[0xff, 0xfe, 0x00, 0x3c],
    ];

    for case in cases {
        let result = PlistCodec.decode(case);
        assert!(
            matches!(result, Err(SaveError::Decode(_))),
            "expected decode error for {:?}, got {:?}",
            String::from_utf8_lossy(case),
            result
        );
    }
}

#[test]
fn test_decode_accepts_nesting_up_to_limit() {
    let map = decode_str(&nested_document(MAX_DEPTH - 1)).unwrap();

    let mut depth = 1;
    let mut current = &map;
    while let Some(Value::Object(inner)) = current.get("a") {
        depth += 1;
        current = inner;
    }
    assert_eq!(depth, MAX_DEPTH);
}

#[test]
fn test_decode_rejects_nesting_past_limit() {
    for levels in [MAX_DEPTH, 20_000] {
        let result = decode_str(&nested_document(levels));
        assert!(matches!(result, Err(SaveError::Decode(ref e)) if e.contains("nesting too deep")));
    }
}

// =============================================================================
// Encoding Tests
// =============================================================================

#[test]
fn test_encode_layout() {
    let map = as_mapping(json!({"GJA_001": "x", "flag": true, "off": false, "n": 3}));

    let text = PlistCodec.encode(&map);

    assert!(text.starts_with(r#"<?xml version="1.0"?><plist version="1.0" gjver="2.0"><dict>"#));
    assert!(text.contains("<k>GJA_001</k><s>x</s>"));
    assert!(text.contains("<k>flag</k><t />"));
    assert!(text.contains("<k>off</k><f />"));
    assert!(text.contains("<k>n</k><i>3</i>"));
    assert!(text.ends_with("</dict></plist>"));
}

#[test]
fn test_encode_empty_mapping() {
    let text = PlistCodec.encode(&Mapping::new());

    assert!(text.contains("<dict />"));
    assert!(PlistCodec.decode(text.as_bytes()).unwrap().is_empty());
}

#[test]
fn test_encode_escapes_markup() {
    let map = as_mapping(json!({"<key&>": "a < b && c > d"}));

    let text = PlistCodec.encode(&map);

    assert!(text.contains("<k>&lt;key&amp;&gt;</k>"));
    assert!(text.contains("<s>a &lt; b &amp;&amp; c &gt; d</s>"));
}

#[test]
fn test_encode_skips_nulls() {
    let map = as_mapping(json!({"kept": 1, "dropped": null}));

    let decoded = PlistCodec.decode(PlistCodec.encode(&map).as_bytes()).unwrap();

    assert_eq!(decoded, as_mapping(json!({"kept": 1})));
}

#[test]
fn test_encode_sequence_as_pseudo_array() {
    let map = as_mapping(json!({"list": ["a", 2]}));

    let decoded = PlistCodec.decode(PlistCodec.encode(&map).as_bytes()).unwrap();

    assert_eq!(
        decoded["list"],
        json!({"_isArr": true, "k_0": "a", "k_1": 2})
    );
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_round_trip_nested_mapping() {
    let map = as_mapping(json!({
        "GJA_001": "Player One",
        "GJA_003": 12345,
        "negative": -77,
        "big": u64::MAX,
        "volume": 0.25,
        "tiny": 1e-7,
        "whole_real": 2.0,
        "on": true,
        "off": false,
        "empty_string": "",
        "unicode": "日本語 ✓",
        "markup": "<b>&amp;</b>",
        "valueKeeper": {},
        "GLM_03": {
            "128": {"k1": 128, "k2": "1st level", "k5": "RobTop"},
            "3": {"k1": 3, "k2": "Polargeist", "extra": {"deep": {"deeper": 1}}}
        }
    }));

    let encoded = PlistCodec.encode(&map);
    let decoded = PlistCodec.decode(encoded.as_bytes()).unwrap();

    assert_eq!(decoded, map);
}

#[test]
fn test_round_trip_is_stable() {
    let map = as_mapping(json!({"a": {"b": {"c": [1, 2, 3]}}, "d": 1.5}));

    let once = PlistCodec.encode(&PlistCodec.decode(PlistCodec.encode(&map).as_bytes()).unwrap());
    let twice = PlistCodec.encode(&PlistCodec.decode(once.as_bytes()).unwrap());

    assert_eq!(once, twice);
}
