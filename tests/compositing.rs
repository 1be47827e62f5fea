mod common;

use billboard::image::{DynamicImage, Rgb, RgbImage};
use billboard::{
    colours, compose_with, BackgroundCache, BillboardOptions, MemoryBackground, Px, Shadow,
};
use common::{gradient, ink_bounds, BlockFont};

fn cache() -> BackgroundCache {
    BackgroundCache::new(MemoryBackground::Decoded(DynamicImage::ImageRgb8(gradient(
        800, 533,
    ))))
}

#[test]
fn rendering_is_idempotent_across_copies() {
    let cache = cache();
    let font = BlockFont::new(50.0);
    let options = BillboardOptions::classic();

    let mut a = cache.canvas();
    let mut b = cache.canvas();
    compose_with(&mut a, "Greetings from\n\nthe coast", &font, &options).unwrap();
    compose_with(&mut b, "Greetings from\n\nthe coast", &font, &options).unwrap();

    assert_eq!(a, b);
    assert_ne!(a, cache.canvas());
}

#[test]
fn cached_background_is_never_drawn_on() {
    let cache = cache();
    let pristine = cache.canvas();
    let font = BlockFont::new(50.0);

    let mut canvas = cache.canvas();
    compose_with(&mut canvas, "Hello", &font, &BillboardOptions::default()).unwrap();

    assert_eq!(cache.canvas(), pristine);
}

#[test]
fn concurrent_renders_match_sequential_ones() {
    let cache = cache();
    let options = BillboardOptions::banded();
    let messages: Vec<String> = (0..8)
        .map(|i| format!("message number {i}\nwith {} words", "many ".repeat(i)))
        .collect();

    let sequential: Vec<RgbImage> = messages
        .iter()
        .map(|m| {
            let mut canvas = cache.canvas();
            compose_with(&mut canvas, m, &BlockFont::new(40.0), &options).unwrap();
            canvas
        })
        .collect();

    let concurrent: Vec<RgbImage> = std::thread::scope(|scope| {
        let handles: Vec<_> = messages
            .iter()
            .map(|m| {
                let cache = &cache;
                scope.spawn(move || {
                    let mut canvas = cache.canvas();
                    compose_with(&mut canvas, m, &BlockFont::new(40.0), &options).unwrap();
                    canvas
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(sequential, concurrent);
}

#[test]
fn single_line_is_centred_horizontally() {
    let font = BlockFont::new(20.0);
    let mut canvas = RgbImage::from_pixel(400, 200, Rgb([0, 0, 0]));
    let options = BillboardOptions {
        text_colour: colours::WHITE,
        shadow: None,
        ..BillboardOptions::classic()
    };

    // 4 chars at 12px advance => 48px wide, x origin (400 - 48) / 2 = 176
    let plan = compose_with(&mut canvas, "abcd", &font, &options).unwrap();
    assert_eq!(plan.lines[0].origin.0, Px(176.0));

    let (x0, _, x1, _) = ink_bounds(&canvas, colours::WHITE).unwrap();
    // each block leaves a 1px gap either side of its advance
    assert_eq!(x0, 177);
    assert_eq!(x1, 176 + 48 - 2);
}

#[test]
fn shadow_sits_under_and_behind_fill() {
    let font = BlockFont::new(20.0);
    let mut canvas = RgbImage::from_pixel(400, 200, Rgb([0, 0, 0]));
    let options = BillboardOptions {
        text_colour: colours::WHITE,
        shadow: Some(Shadow {
            offset: (3, 3),
            colour: colours::RED,
        }),
        ..BillboardOptions::classic()
    };

    compose_with(&mut canvas, "x", &font, &options).unwrap();
    let (fx0, fy0, fx1, fy1) = ink_bounds(&canvas, colours::WHITE).unwrap();
    let (sx0, sy0, sx1, sy1) = ink_bounds(&canvas, colours::RED).unwrap();

    // the fill is painted last, so the shadow only peeks out bottom-right
    assert_eq!((sx1, sy1), (fx1 + 3, fy1 + 3));
    assert!(sx0 >= fx0 && sy0 >= fy0);
    assert_eq!(*canvas.get_pixel(fx0, fy0), Rgb([255, 255, 255]));
}

#[test]
fn banded_text_stays_inside_band() {
    let font = BlockFont::new(30.0);
    let mut canvas = RgbImage::from_pixel(800, 533, Rgb([0, 0, 0]));
    let options = BillboardOptions {
        font_size: Px(30.0),
        ..BillboardOptions::banded()
    };

    let plan = compose_with(&mut canvas, "keep oregon green", &font, &options).unwrap();
    let band = options.band_for(533).unwrap();
    let (_, y0, _, y1) = ink_bounds(&canvas, colours::WHITE).unwrap();

    assert_eq!(plan.len(), 1);
    assert!(y0 as f32 >= band.top.0);
    assert!((y1 as f32) <= band.bottom.0);
}

#[test]
fn long_messages_overflow_rather_than_disappear() {
    let font = BlockFont::new(60.0);
    let mut canvas = RgbImage::from_pixel(300, 200, Rgb([0, 0, 0]));
    let options = BillboardOptions {
        font_size: Px(60.0),
        ..BillboardOptions::classic()
    };
    let message = "one two three four five six seven eight";

    let plan = compose_with(&mut canvas, message, &font, &options).unwrap();
    let words: Vec<&str> = plan.lines.iter().flat_map(|l| l.text.words()).collect();
    assert_eq!(words, message.to_uppercase().split_whitespace().collect::<Vec<_>>());
    // the block is taller than the canvas, so it starts at the very top
    assert_eq!(plan.lines[0].origin.1, Px(0.0));
}
