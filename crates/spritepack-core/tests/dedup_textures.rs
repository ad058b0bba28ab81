use image::{Rgba, RgbaImage};
use spritepack_core::prelude::*;
use std::sync::Arc;

fn tex(w: u32, h: u32, color: [u8; 4]) -> Arc<SpriteTexture> {
    let img = RgbaImage::from_pixel(w, h, Rgba(color));
    Arc::new(SpriteTexture::from_image(&img).expect("texture"))
}

#[test]
fn first_seen_representative_wins() {
    let a = tex(4, 4, [255, 0, 0, 255]);
    let b = tex(4, 4, [255, 0, 0, 255]);
    let c = tex(4, 4, [0, 255, 0, 255]);

    let out = dedup_textures(&[a.clone(), b, c]);
    assert_eq!(out.uniques.len(), 2);
    assert_eq!(out.assignment, vec![0, 0, 1]);
    // The representative is the earliest input, not a later duplicate.
    assert!(Arc::ptr_eq(&out.uniques[0], &a));
}

#[test]
fn duplicates_interleaved_with_distinct_textures() {
    let inputs = vec![
        tex(4, 4, [1, 2, 3, 255]),
        tex(2, 6, [9, 9, 9, 255]),
        tex(4, 4, [1, 2, 3, 255]),
        tex(2, 6, [9, 9, 9, 255]),
        tex(4, 4, [1, 2, 3, 128]),
    ];
    let out = dedup_textures(&inputs);
    assert_eq!(out.uniques.len(), 3);
    assert_eq!(out.assignment, vec![0, 1, 0, 1, 2]);
}

#[test]
fn dedup_is_idempotent() {
    let inputs = vec![
        tex(4, 4, [255, 0, 0, 255]),
        tex(4, 4, [255, 0, 0, 255]),
        tex(8, 2, [0, 0, 255, 255]),
    ];
    let first = dedup_textures(&inputs);
    let second = dedup_textures(&first.uniques);

    assert_eq!(second.uniques.len(), first.uniques.len());
    // Running again over an already-unique set maps every texture to itself.
    assert_eq!(second.assignment, (0..first.uniques.len()).collect::<Vec<_>>());
    for (a, b) in first.uniques.iter().zip(second.uniques.iter()) {
        assert!(Arc::ptr_eq(a, b));
    }
}
