use image::{Rgba, RgbaImage};
use spritepack_core::prelude::*;
use spritepack_core::trim::opaque_bounds;

fn paint(img: &mut RgbaImage, x: u32, y: u32) {
    img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
}

#[test]
fn bounds_track_content_extent() {
    let mut img = RgbaImage::new(8, 8);
    paint(&mut img, 2, 1);
    paint(&mut img, 5, 6);

    let b = opaque_bounds(&img).expect("bounds");
    assert_eq!(b.left, 2);
    assert_eq!(b.right, 5);
    assert_eq!(b.top, 1);
    assert_eq!(b.bottom, 6);
    assert_eq!(b.width(), 4);
    assert_eq!(b.height(), 6);
}

#[test]
fn single_pixel_bounds() {
    let mut img = RgbaImage::new(16, 16);
    paint(&mut img, 7, 3);

    let b = opaque_bounds(&img).expect("bounds");
    assert_eq!((b.left, b.right, b.top, b.bottom), (7, 7, 3, 3));
}

#[test]
fn padding_reconstructs_source_dimensions() {
    let mut img = RgbaImage::new(10, 7);
    for y in 2..=4 {
        for x in 3..=6 {
            paint(&mut img, x, y);
        }
    }

    let tex = SpriteTexture::from_image(&img).expect("texture");
    let pad = tex.padding();
    assert_eq!(tex.width(), 4);
    assert_eq!(tex.height(), 3);
    assert_eq!(pad.left + tex.width() + pad.right, 10);
    assert_eq!(pad.top + tex.height() + pad.bottom, 7);
    assert_eq!(tex.source_size(), (10, 7));
}

#[test]
fn very_wide_source_trims_correctly() {
    // Byte offsets into a row-major buffer get large fast on wide sources;
    // content at the far right exercises the biggest offsets.
    let mut img = RgbaImage::new(70_000, 3);
    paint(&mut img, 69_998, 1);
    paint(&mut img, 69_999, 2);

    let tex = SpriteTexture::from_image(&img).expect("texture");
    assert_eq!((tex.width(), tex.height()), (2, 2));
    let pad = tex.padding();
    assert_eq!(pad.left, 69_998);
    assert_eq!(pad.right, 0);
    assert_eq!(tex.source_size(), (70_000, 3));
    // Opaque corners of the trimmed buffer survived the copy.
    let px = tex.pixels();
    assert_eq!(px[3], 255);
    assert_eq!(px[px.len() - 1], 255);
}

#[test]
fn fully_transparent_is_the_empty_sentinel() {
    let img = RgbaImage::new(8, 8);
    assert!(opaque_bounds(&img).is_none());
    assert!(SpriteTexture::from_image(&img).is_none());
}

#[test]
fn transparent_sprite_fails_the_build() {
    let inputs = vec![InputSprite {
        path: "empty.png".into(),
        image: image::DynamicImage::ImageRgba8(RgbaImage::new(8, 8)),
    }];
    let err = build_atlas(
        inputs,
        &ProjectManifest::default(),
        &AtlasConfig::default(),
        "atlas",
        OutputFormat::Png,
    )
    .expect_err("empty sprite must abort the build");
    assert!(matches!(err, AtlasError::EmptySprite(p) if p == "empty.png"));
}
