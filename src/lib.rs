//! stacksprite renders "stacked sprites": pseudo-3D objects drawn from a pile of horizontal
//! slices, as popularised by top-down pixel-art games.
//!
//! # Pipeline overview
//!
//! 1. **Slice**: decode a sprite sheet and cut its first row into equally sized layers
//!    ([`load_sprite_row`], [`slice_row`]). Layer 0 is the bottom of the object.
//! 2. **Stack**: [`StackedSprite::new`] uploads the layers and allocates a composite large
//!    enough for any rotation plus one pixel of lift per layer.
//! 3. **Animate**: each frame the caller rotates and moves the sprite. Rotation marks the
//!    composite dirty; movement accumulates sub-pixel deltas into whole pixels.
//! 4. **Draw**: [`StackedSprite::draw_to`] rebuilds the composite if needed and blits it at the
//!    sprite's integer position through an optional shared [`Camera`].
//!
//! Pixels are premultiplied RGBA8 end to end. Rendering goes through the [`Compositor`]
//! trait; [`CpuCompositor`] is the bundled implementation on `vello_cpu`.
#![forbid(unsafe_code)]

mod assets;
mod demo;
mod foundation;
mod render;
mod sprite;

/// Shared world/camera transform handles.
pub mod camera;

pub use assets::decode::decode_image;
pub use assets::sheet::{load_sprite_row, slice_row};
pub use camera::{Camera, CameraRef};
pub use demo::car::{Car, FRICTION, Input, Steer, TURN_THETA, Throttle};
pub use demo::config::{CameraConfig, DemoConfig, DriveScript, DriveSpan};
pub use foundation::core::{Affine, LayerImage, Point, Rgba8Premul, Vec2};
pub use foundation::error::{StackError, StackResult};
pub use foundation::math::{normalize_angle, split_whole};
pub use render::composite::{over, over_in_place, unpremultiply_rgba8};
pub use render::cpu::{
    CACHED_SIZES, CpuCompositor, CpuCompositorOpts, CpuSurface, FILTER_ENV, ImageFilter,
};
pub use render::surface::Compositor;
pub use sprite::position::SubpixelAxis;
pub use sprite::stacked::{SpriteStats, StackedSprite, frame_size};
