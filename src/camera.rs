//! Shared world/camera transform.
//!
//! A [`Camera`] is owned by the caller (usually the game or scene) and may be shared by any
//! number of sprites. Sprites only keep a [`CameraRef`], a weak view resolved at draw time,
//! so they never extend the camera's lifetime or write through it.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::foundation::core::{Affine, Vec2};

/// Caller-owned camera transform. Cloning shares the same underlying transform.
#[derive(Clone, Debug)]
pub struct Camera {
    inner: Rc<Cell<Affine>>,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Affine::IDENTITY)
    }
}

impl Camera {
    pub fn new(transform: Affine) -> Self {
        Self {
            inner: Rc::new(Cell::new(transform)),
        }
    }

    pub fn get(&self) -> Affine {
        self.inner.get()
    }

    pub fn set(&self, transform: Affine) {
        self.inner.set(transform);
    }

    /// Apply a translation after the current transform.
    pub fn translate(&self, v: Vec2) {
        self.set(Affine::translate(v) * self.get());
    }

    /// Apply a non-uniform scale after the current transform.
    pub fn scale(&self, sx: f64, sy: f64) {
        self.set(Affine::scale_non_uniform(sx, sy) * self.get());
    }

    /// Apply a rotation (radians) after the current transform.
    pub fn rotate(&self, theta: f64) {
        self.set(Affine::rotate(theta) * self.get());
    }

    pub fn downgrade(&self) -> CameraRef {
        CameraRef {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

/// Non-owning, read-only view of a [`Camera`].
#[derive(Clone, Debug)]
pub struct CameraRef {
    inner: Weak<Cell<Affine>>,
}

impl CameraRef {
    /// Current camera transform, or `None` once the camera has been dropped.
    pub fn resolve(&self) -> Option<Affine> {
        self.inner.upgrade().map(|c| c.get())
    }
}

#[cfg(test)]
#[path = "../tests/unit/camera.rs"]
mod tests;
