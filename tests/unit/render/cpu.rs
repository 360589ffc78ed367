use super::*;
use crate::foundation::core::Vec2;

const RED: [u8; 4] = [255, 0, 0, 255];
const GREEN: [u8; 4] = [0, 255, 0, 255];

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> LayerImage {
    LayerImage::solid(
        w,
        h,
        Rgba8Premul {
            r: rgba[0],
            g: rgba[1],
            b: rgba[2],
            a: rgba[3],
        },
    )
}

fn compositor() -> CpuCompositor {
    CpuCompositor::new(CpuCompositorOpts::default())
}

#[test]
fn alloc_is_transparent_and_sized() {
    let mut c = compositor();
    let s = c.alloc(5, 3).unwrap();
    assert_eq!(c.surface_size(&s), (5, 3));
    assert!(s.data().iter().all(|&b| b == 0));
    assert_eq!(s.pixel(5, 0), None);
}

#[test]
fn alloc_rejects_zero_and_oversized() {
    let mut c = compositor();
    assert!(c.alloc(0, 4).is_err());
    assert!(c.alloc(70_000, 4).is_err());
}

#[test]
fn upload_preserves_pixels() {
    let mut c = compositor();
    let s = c.upload(&solid(2, 2, RED)).unwrap();
    assert_eq!(s.pixel(1, 1), Some(RED));
}

#[test]
fn draw_translated_lands_on_integer_pixels() {
    let mut c = compositor();
    let src = c.upload(&solid(2, 2, RED)).unwrap();
    let mut dst = c.alloc(4, 4).unwrap();
    c.draw(&mut dst, &src, Affine::translate(Vec2::new(1.0, 1.0)))
        .unwrap();

    assert_eq!(dst.pixel(1, 1), Some(RED));
    assert_eq!(dst.pixel(2, 2), Some(RED));
    assert_eq!(dst.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(dst.pixel(3, 3), Some([0, 0, 0, 0]));
}

#[test]
fn draw_blends_over_existing_content() {
    let mut c = compositor();
    let src = c.upload(&solid(1, 1, RED)).unwrap();
    let mut dst = c.alloc(2, 1).unwrap();
    dst.fill(Rgba8Premul {
        r: 0,
        g: 0,
        b: 255,
        a: 255,
    });
    c.draw(&mut dst, &src, Affine::IDENTITY).unwrap();
    assert_eq!(dst.pixel(0, 0), Some(RED));
    assert_eq!(dst.pixel(1, 0), Some([0, 0, 255, 255]));
}

#[test]
fn batch_is_painters_order() {
    let mut c = compositor();
    let red = c.upload(&solid(2, 2, RED)).unwrap();
    let green = c.upload(&solid(2, 2, GREEN)).unwrap();
    let mut dst = c.alloc(3, 3).unwrap();
    c.draw_batch(
        &mut dst,
        &[
            (&red, Affine::IDENTITY),
            (&green, Affine::translate(Vec2::new(1.0, 1.0))),
        ],
    )
    .unwrap();

    assert_eq!(dst.pixel(0, 0), Some(RED));
    assert_eq!(dst.pixel(1, 1), Some(GREEN));
    assert_eq!(dst.pixel(2, 2), Some(GREEN));
}

#[test]
fn clear_resets_to_transparent() {
    let mut c = compositor();
    let mut s = c.upload(&solid(2, 2, RED)).unwrap();
    c.clear(&mut s);
    assert!(s.data().iter().all(|&b| b == 0));
}

#[test]
fn scratch_survives_destination_resizes() {
    let mut c = compositor();
    let src = c.upload(&solid(1, 1, GREEN)).unwrap();
    let mut small = c.alloc(2, 2).unwrap();
    let mut big = c.alloc(8, 8).unwrap();
    c.draw(&mut small, &src, Affine::IDENTITY).unwrap();
    c.draw(&mut big, &src, Affine::translate(Vec2::new(7.0, 7.0)))
        .unwrap();
    c.draw(&mut small, &src, Affine::translate(Vec2::new(1.0, 1.0)))
        .unwrap();
    assert_eq!(small.pixel(0, 0), Some(GREEN));
    assert_eq!(small.pixel(1, 1), Some(GREEN));
    assert_eq!(big.pixel(7, 7), Some(GREEN));
    assert_eq!(big.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn alternating_destination_sizes_reuse_cached_buffers() {
    let mut c = compositor();
    let src = c.upload(&solid(1, 1, GREEN)).unwrap();
    let mut small = c.alloc(2, 2).unwrap();
    let mut big = c.alloc(8, 8).unwrap();
    c.draw(&mut small, &src, Affine::IDENTITY).unwrap();
    c.draw(&mut big, &src, Affine::IDENTITY).unwrap();
    // One context and one scratch pixmap per size.
    assert_eq!(c.allocations(), 4);

    for _ in 0..10 {
        c.draw(&mut small, &src, Affine::IDENTITY).unwrap();
        c.draw(&mut big, &src, Affine::IDENTITY).unwrap();
    }
    assert_eq!(c.allocations(), 4);
}

#[test]
fn cache_evicts_the_least_recently_used_size() {
    let mut c = compositor();
    let src = c.upload(&solid(1, 1, GREEN)).unwrap();
    let mut targets: Vec<CpuSurface> = (1..=CACHED_SIZES as u32 + 1)
        .map(|n| c.alloc(n, n).unwrap())
        .collect();
    for t in &mut targets {
        c.draw(t, &src, Affine::IDENTITY).unwrap();
    }
    let after_fill = c.allocations();
    assert_eq!(after_fill, 2 * (CACHED_SIZES as u64 + 1));

    // The most recent size is still cached; the first one was evicted.
    let last = targets.len() - 1;
    c.draw(&mut targets[last], &src, Affine::IDENTITY).unwrap();
    assert_eq!(c.allocations(), after_fill);
    c.draw(&mut targets[0], &src, Affine::IDENTITY).unwrap();
    assert_eq!(c.allocations(), after_fill + 2);
}

#[test]
fn filter_parses_and_defaults_to_nearest() {
    assert_eq!(ImageFilter::default(), ImageFilter::Nearest);
    assert_eq!(ImageFilter::parse(" Linear "), Some(ImageFilter::Linear));
    assert_eq!(ImageFilter::parse("bilinear"), Some(ImageFilter::Linear));
    assert_eq!(ImageFilter::parse("nearest"), Some(ImageFilter::Nearest));
    assert_eq!(ImageFilter::parse("cubic"), None);
    assert_eq!(
        CpuCompositorOpts::default()
            .with_filter(ImageFilter::Linear)
            .filter(),
        ImageFilter::Linear
    );
}

#[test]
fn save_png_writes_straight_alpha() {
    let dir = std::path::PathBuf::from("target").join("unit_cpu_png");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("half.png");

    let mut s = CpuSurface::new(1, 1).unwrap();
    s.fill(Rgba8Premul::from_straight_rgba(200, 100, 0, 255));
    s.save_png(&path).unwrap();

    let back = image::open(&path).unwrap().to_rgba8();
    assert_eq!(back.get_pixel(0, 0).0, [200, 100, 0, 255]);
}
