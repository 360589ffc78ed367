use super::*;

fn strip(width: u32, height: u32) -> LayerImage {
    // Each pixel encodes its column in red so tiles can be told apart.
    let mut buf = Vec::new();
    for _y in 0..height {
        for x in 0..width {
            buf.extend_from_slice(&[x as u8, 0, 0, 255]);
        }
    }
    LayerImage::from_premul_rgba8(width, height, buf).unwrap()
}

#[test]
fn slices_left_to_right() {
    let layers = slice_row(&strip(12, 4), 4, 4).unwrap();
    assert_eq!(layers.len(), 3);
    assert_eq!(layers[0].pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(layers[1].pixel(0, 3), Some([4, 0, 0, 255]));
    assert_eq!(layers[2].pixel(3, 1), Some([11, 0, 0, 255]));
}

#[test]
fn trailing_partial_tile_is_padded() {
    let layers = slice_row(&strip(10, 4), 4, 4).unwrap();
    assert_eq!(layers.len(), 3);
    let last = &layers[2];
    assert_eq!(last.size(), (4, 4));
    assert_eq!(last.pixel(1, 0), Some([9, 0, 0, 255]));
    assert_eq!(last.pixel(2, 0), Some([0, 0, 0, 0]));
}

#[test]
fn only_the_first_row_is_used() {
    let layers = slice_row(&strip(8, 6), 4, 2).unwrap();
    assert_eq!(layers.len(), 2);
    assert_eq!(layers[1].size(), (4, 2));
}

#[test]
fn rejects_bad_tiles() {
    let sheet = strip(8, 4);
    assert!(slice_row(&sheet, 0, 4).is_err());
    assert!(slice_row(&sheet, 4, 0).is_err());
    assert!(slice_row(&sheet, 4, 5).is_err());
}

#[test]
fn missing_file_reports_path() {
    let err = load_sprite_row(Path::new("does/not/exist.png"), 16).unwrap_err();
    assert!(err.to_string().contains("exist.png"));
}
