use super::*;

#[test]
fn scale_then_translate_applies_in_call_order() {
    let cam = Camera::default();
    cam.scale(2.0, 2.0);
    cam.translate(Vec2::new(160.0, 120.0));

    let p = cam.get() * kurbo::Point::new(1.0, 1.0);
    assert_eq!(p, kurbo::Point::new(162.0, 122.0));
}

#[test]
fn clones_share_state() {
    let cam = Camera::default();
    let other = cam.clone();
    other.translate(Vec2::new(3.0, 0.0));
    assert_eq!(cam.get(), Affine::translate(Vec2::new(3.0, 0.0)));
}

#[test]
fn weak_view_tracks_updates_and_expires() {
    let cam = Camera::default();
    let view = cam.downgrade();
    assert_eq!(view.resolve(), Some(Affine::IDENTITY));

    cam.rotate(std::f64::consts::FRAC_PI_2);
    assert_eq!(view.resolve(), Some(cam.get()));

    drop(cam);
    assert_eq!(view.resolve(), None);
}
