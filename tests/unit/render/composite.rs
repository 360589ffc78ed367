use super::*;

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_dst_transparent_returns_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src), src);
}

#[test]
fn over_keeps_premultiplied_source_channels() {
    // A half-transparent premultiplied source is not scaled a second time.
    let out = over([0, 0, 0, 0], [60, 0, 0, 128]);
    assert_eq!(out, [60, 0, 0, 128]);
    let out = over([0, 0, 0, 255], [60, 0, 0, 128]);
    assert_eq!(out, [60, 0, 0, 255]);
}

#[test]
fn over_half_alpha_blends_toward_dst() {
    let dst = [0, 0, 200, 255];
    let src = [128, 0, 0, 128];
    let out = over(dst, src);
    assert_eq!(out[3], 255);
    assert_eq!(out[0], 128);
    assert_eq!(out[2], mul_div255_u8(200, 127));
}

#[test]
fn over_in_place_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(over_in_place(&mut dst, &[0u8; 4]).is_err());
    assert!(over_in_place(&mut dst[..6], &[0u8; 6]).is_err());
}

#[test]
fn over_in_place_is_painters_order() {
    let mut dst = vec![0u8; 4];
    over_in_place(&mut dst, &[255, 0, 0, 255]).unwrap();
    over_in_place(&mut dst, &[0, 255, 0, 255]).unwrap();
    assert_eq!(dst, vec![0, 255, 0, 255]);
}

#[test]
fn unpremultiply_inverts_opaque_and_clears_transparent() {
    assert_eq!(
        unpremultiply_rgba8(&[10, 20, 30, 255, 9, 9, 9, 0]),
        vec![10, 20, 30, 255, 0, 0, 0, 0]
    );
    let half = unpremultiply_rgba8(&[64, 0, 0, 128]);
    assert_eq!(half[3], 128);
    assert!((i32::from(half[0]) - 127).abs() <= 1);
}
