use std::f64::consts::SQRT_2;

use crate::camera::{Camera, CameraRef};
use crate::foundation::core::{Affine, LayerImage, Vec2};
use crate::foundation::error::{StackError, StackResult};
use crate::foundation::math::normalize_angle;
use crate::render::surface::Compositor;
use crate::sprite::position::SubpixelAxis;

/// Counters for how often a sprite drew and rebuilt its composite.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpriteStats {
    pub reframes: u64,
    pub draws: u64,
}

/// A pseudo-3D sprite built from horizontal slices.
///
/// The slices are pre-rendered into a single composite ("frame") at the current rotation,
/// each slice one pixel above the previous. The frame is rebuilt lazily on the next draw after
/// a rotation, and positioned in integer world pixels through [`SubpixelAxis`] accumulators.
pub struct StackedSprite<C: Compositor> {
    layers: Vec<C::Surface>,
    layer_size: (u32, u32),
    frame: C::Surface,
    frame_size: (u32, u32),

    camera: Option<CameraRef>,

    x: SubpixelAxis,
    y: SubpixelAxis,
    z: SubpixelAxis,

    theta: f64,
    needs_reframe: bool,
    stats: SpriteStats,
}

impl<C: Compositor> std::fmt::Debug for StackedSprite<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StackedSprite")
            .field("layers", &self.layers.len())
            .field("layer_size", &self.layer_size)
            .field("frame_size", &self.frame_size)
            .field("position", &self.position())
            .field("theta", &self.theta)
            .field("needs_reframe", &self.needs_reframe)
            .finish()
    }
}

/// Composite size for `n` layers of `width x height`: room for any rotation plus one pixel
/// of lift per layer.
pub fn frame_size(width: u32, height: u32, n: usize) -> (u32, u32) {
    let w = (SQRT_2 * f64::from(width)).ceil() as u32;
    let h = (SQRT_2 * f64::from(height) + n as f64).ceil() as u32;
    (w, h)
}

impl<C: Compositor> StackedSprite<C> {
    /// Upload `layers` (bottom slice first) and allocate the composite.
    ///
    /// Fails if `layers` is empty or the layers differ in size.
    pub fn new(compositor: &mut C, layers: &[LayerImage]) -> StackResult<Self> {
        let Some(first) = layers.first() else {
            return Err(StackError::validation(
                "stacked sprite needs at least one layer",
            ));
        };
        let layer_size = first.size();
        if let Some((i, bad)) = layers
            .iter()
            .enumerate()
            .find(|(_, l)| l.size() != layer_size)
        {
            return Err(StackError::validation(format!(
                "layer {i} is {}x{}, expected {}x{}",
                bad.width, bad.height, layer_size.0, layer_size.1
            )));
        }

        let frame_size = frame_size(layer_size.0, layer_size.1, layers.len());
        let frame = compositor.alloc(frame_size.0, frame_size.1)?;
        let layers = layers
            .iter()
            .map(|l| compositor.upload(l))
            .collect::<StackResult<Vec<_>>>()?;

        tracing::debug!(
            layers = layers.len(),
            layer_w = layer_size.0,
            layer_h = layer_size.1,
            frame_w = frame_size.0,
            frame_h = frame_size.1,
            "created stacked sprite"
        );

        Ok(Self {
            layers,
            layer_size,
            frame,
            frame_size,
            camera: None,
            x: SubpixelAxis::new(),
            y: SubpixelAxis::new(),
            z: SubpixelAxis::new(),
            theta: 0.0,
            needs_reframe: true,
            stats: SpriteStats::default(),
        })
    }

    /// Attach a camera; its transform is applied after the sprite's own placement.
    pub fn set_camera(&mut self, camera: &Camera) {
        self.camera = Some(camera.downgrade());
    }

    pub fn clear_camera(&mut self) {
        self.camera = None;
    }

    /// Rotate by `theta` radians. A zero delta does not invalidate the composite.
    pub fn rotate(&mut self, theta: f64) {
        if theta == 0.0 {
            return;
        }
        if !theta.is_finite() {
            tracing::warn!(theta, "ignoring non-finite rotation");
            return;
        }
        self.theta = normalize_angle(self.theta + theta);
        self.needs_reframe = true;
    }

    pub fn move_x(&mut self, amt: f64) {
        self.x.fold(amt);
    }

    pub fn move_y(&mut self, amt: f64) {
        self.y.fold(amt);
    }

    /// Move along the height axis; positive `amt` lifts the sprite up the screen.
    pub fn move_z(&mut self, amt: f64) {
        self.z.fold(amt);
    }

    /// Anchor of the sprite inside the composite: the rotation pivot of the bottom slice.
    pub fn origin(&self) -> (f64, f64) {
        let (w, h) = self.frame_size;
        let n = self.layers.len() as u32;
        (f64::from(w / 2), f64::from(h / 2 + n))
    }

    /// Angle in radians, in `[0, 2π)`.
    pub fn angle(&self) -> f64 {
        self.theta
    }

    pub fn is_dirty(&self) -> bool {
        self.needs_reframe
    }

    /// Settled integer position `(x, y, z)`.
    pub fn position(&self) -> (i64, i64, i64) {
        (self.x.settled(), self.y.settled(), self.z.settled())
    }

    /// Sub-pixel remainders `(x, y, z)`, each with magnitude below one.
    pub fn fractional(&self) -> (f64, f64, f64) {
        (self.x.frac(), self.y.frac(), self.z.frac())
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer_size(&self) -> (u32, u32) {
        self.layer_size
    }

    pub fn composite_size(&self) -> (u32, u32) {
        self.frame_size
    }

    /// The cached composite. May be stale while [`Self::is_dirty`] is true.
    pub fn composite(&self) -> &C::Surface {
        &self.frame
    }

    pub fn stats(&self) -> SpriteStats {
        self.stats
    }

    /// Placement of the composite in world space, before any camera.
    pub fn local_transform(&self) -> Affine {
        let (cx, cy) = self.origin();
        let (x, y, z) = self.position();
        Affine::translate(Vec2::new(x as f64, y.saturating_sub(z) as f64))
            * Affine::translate(Vec2::new(-cx, -cy))
    }

    /// Full transform used by [`Self::draw_to`]: camera (if attached and alive) after placement.
    pub fn draw_transform(&self) -> Affine {
        let local = self.local_transform();
        match self.camera.as_ref().and_then(CameraRef::resolve) {
            Some(global) => global * local,
            None => local,
        }
    }

    /// Whether a camera is attached. A dropped camera is detached on the next draw.
    pub fn has_camera(&self) -> bool {
        self.camera.is_some()
    }

    fn detach_dropped_camera(&mut self) {
        if self.camera.as_ref().is_some_and(|cam| cam.resolve().is_none()) {
            tracing::warn!("attached camera was dropped; drawing without it");
            self.camera = None;
        }
    }

    /// Draw the sprite onto `target`, rebuilding the composite first if the angle changed.
    pub fn draw_to(&mut self, compositor: &mut C, target: &mut C::Surface) -> StackResult<()> {
        self.detach_dropped_camera();
        if self.needs_reframe {
            self.reframe(compositor)?;
        }
        let transform = self.draw_transform();
        compositor.draw(target, &self.frame, transform)?;
        self.stats.draws += 1;
        Ok(())
    }

    #[tracing::instrument(
        level = "debug",
        skip(self, compositor),
        fields(theta = self.theta, layers = self.layers.len())
    )]
    fn reframe(&mut self, compositor: &mut C) -> StackResult<()> {
        compositor.clear(&mut self.frame);

        let (ox, oy) = self.origin();
        let (lw, lh) = self.layer_size;
        let base = Affine::translate(Vec2::new(ox, oy))
            * Affine::rotate(self.theta)
            * Affine::translate(Vec2::new(-f64::from(lw) / 2.0, -f64::from(lh) / 2.0));

        let draws: Vec<(&C::Surface, Affine)> = self
            .layers
            .iter()
            .enumerate()
            .map(|(i, layer)| (layer, Affine::translate(Vec2::new(0.0, -(i as f64))) * base))
            .collect();
        compositor.draw_batch(&mut self.frame, &draws)?;

        self.needs_reframe = false;
        self.stats.reframes += 1;
        tracing::debug!(reframes = self.stats.reframes, "rebuilt stacked sprite frame");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/stacked.rs"]
mod tests;
