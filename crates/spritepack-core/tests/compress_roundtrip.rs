use image::{DynamicImage, Rgba, RgbaImage};
use spritepack_core::prelude::*;

fn sprite(path: &str, color: [u8; 4]) -> InputSprite {
    let img = RgbaImage::from_pixel(6, 4, Rgba(color));
    InputSprite {
        path: path.into(),
        image: DynamicImage::ImageRgba8(img),
    }
}

fn build_doc() -> AtlasDocument {
    let inputs = vec![
        sprite("run_0.png", [255, 0, 0, 255]),
        sprite("run_1.png", [0, 255, 0, 255]),
        sprite("hud/coin.png", [0, 0, 255, 255]),
    ];
    let manifest: ProjectManifest = serde_json::from_value(serde_json::json!({
        "animations": { "run": { "frames": [{ "path": "run_*" }] } }
    }))
    .expect("manifest");
    build_atlas(
        inputs,
        &manifest,
        &AtlasConfig::default(),
        "atlas",
        OutputFormat::Png,
    )
    .expect("build")
    .document
}

#[test]
fn compressed_keys_are_fixed_length_and_consistent() {
    let mut doc = build_doc();
    let mapping = compress_keys(&mut doc).expect("compress");

    assert_eq!(doc.frames.len(), 3);
    assert_eq!(mapping.len(), 3);
    for key in doc.frames.keys() {
        assert_eq!(key.len(), 16, "unexpected key {key}");
        assert!(key.bytes().all(|b| b.is_ascii_hexdigit()));
        assert!(mapping.contains_key(key));
    }

    // Animation references follow the frames into hash space, in order.
    let run = &doc.animations["run"];
    assert_eq!(run.len(), 2);
    for key in run {
        assert!(doc.frames.contains_key(key), "dangling ref {key}");
    }
    assert_eq!(mapping[&run[0]], "run_0.png");
    assert_eq!(mapping[&run[1]], "run_1.png");
}

#[test]
fn decompress_restores_the_original_document() {
    let original = build_doc();
    let mut doc = build_doc();

    let mapping = compress_keys(&mut doc).expect("compress");
    decompress_keys(&mut doc, &mapping).expect("decompress");

    let restored = serde_json::to_value(&doc).expect("json");
    let expected = serde_json::to_value(&original).expect("json");
    assert_eq!(restored, expected);
}

#[test]
fn decompress_rejects_keys_missing_from_the_mapping() {
    let mut doc = build_doc();
    let mut mapping = compress_keys(&mut doc).expect("compress");
    let (dropped, _) = mapping.pop_first().expect("nonempty");

    let err = decompress_keys(&mut doc, &mapping).expect_err("unknown key");
    match err {
        AtlasError::UnknownKey(key) => assert_eq!(key, dropped),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn identical_pixels_under_different_names_still_get_distinct_keys() {
    let inputs = vec![
        sprite("twin_a.png", [7, 7, 7, 255]),
        sprite("twin_b.png", [7, 7, 7, 255]),
    ];
    let mut doc = build_atlas(
        inputs,
        &ProjectManifest::default(),
        &AtlasConfig::default(),
        "atlas",
        OutputFormat::Png,
    )
    .expect("build")
    .document;

    compress_keys(&mut doc).expect("compress");
    // Both frames share a placement but keep separate manifest entries.
    assert_eq!(doc.frames.len(), 2);
}
