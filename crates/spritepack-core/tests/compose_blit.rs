use image::{Rgba, RgbaImage};
use spritepack_core::compositing::{blit_rgba, compose_page};
use spritepack_core::prelude::*;
use std::sync::Arc;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

#[test]
fn plain_blit_copies_pixels_at_offset() {
    let mut src = RgbaImage::new(2, 1);
    src.put_pixel(0, 0, RED);
    src.put_pixel(1, 0, BLUE);

    let mut canvas = RgbaImage::new(4, 4);
    blit_rgba(&src, &mut canvas, 1, 2, false);

    assert_eq!(*canvas.get_pixel(1, 2), RED);
    assert_eq!(*canvas.get_pixel(2, 2), BLUE);
    assert_eq!(*canvas.get_pixel(0, 0), CLEAR);
}

#[test]
fn rotated_blit_turns_the_block_clockwise() {
    let mut src = RgbaImage::new(2, 1);
    src.put_pixel(0, 0, RED);
    src.put_pixel(1, 0, BLUE);

    let mut canvas = RgbaImage::new(4, 4);
    blit_rgba(&src, &mut canvas, 0, 0, true);

    // A horizontal [red, blue] strip rotated 90 degrees clockwise reads
    // top-to-bottom as red, blue.
    assert_eq!(*canvas.get_pixel(0, 0), RED);
    assert_eq!(*canvas.get_pixel(0, 1), BLUE);
    assert_eq!(*canvas.get_pixel(1, 0), CLEAR);
}

#[test]
fn compose_page_places_each_texture() {
    let red = RgbaImage::from_pixel(2, 2, RED);
    let blue = RgbaImage::from_pixel(1, 2, BLUE);
    let textures = vec![
        Arc::new(SpriteTexture::from_image(&red).expect("red")),
        Arc::new(SpriteTexture::from_image(&blue).expect("blue")),
    ];

    let layout = PageLayout {
        width: 8,
        height: 8,
        rects: vec![
            PackedRect {
                token: 0,
                x: 0,
                y: 0,
                w: 2,
                h: 2,
                rotated: false,
            },
            PackedRect {
                token: 1,
                x: 4,
                y: 4,
                w: 2,
                h: 1,
                rotated: true,
            },
        ],
    };

    let canvas = compose_page(&layout, &textures);
    assert_eq!(canvas.dimensions(), (8, 8));
    assert_eq!(*canvas.get_pixel(0, 0), RED);
    assert_eq!(*canvas.get_pixel(1, 1), RED);
    // Rotated 1x2 texture renders as 2x1.
    assert_eq!(*canvas.get_pixel(4, 4), BLUE);
    assert_eq!(*canvas.get_pixel(5, 4), BLUE);
    assert_eq!(*canvas.get_pixel(4, 5), CLEAR);
}
