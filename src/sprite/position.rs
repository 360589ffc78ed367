use crate::foundation::math::split_whole;

/// One axis of a sprite position: settled integer pixels plus a signed sub-pixel remainder.
///
/// Deltas are accumulated in `frac` and whole pixels are moved into `settled` by truncation
/// toward zero, so positive and negative motion behave symmetrically and `settled + frac`
/// always equals the running sum of all deltas.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SubpixelAxis {
    settled: i64,
    frac: f64,
}

impl SubpixelAxis {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold `delta` into the axis. Non-finite deltas are ignored.
    pub fn fold(&mut self, delta: f64) {
        if !delta.is_finite() {
            tracing::warn!(delta, "ignoring non-finite movement delta");
            return;
        }
        let (whole, rem) = split_whole(self.frac + delta);
        self.settled = self.settled.saturating_add(whole);
        self.frac = rem;
    }

    pub fn settled(&self) -> i64 {
        self.settled
    }

    /// Signed remainder, `|frac| < 1`.
    pub fn frac(&self) -> f64 {
        self.frac
    }

    /// `settled + frac`.
    pub fn total(&self) -> f64 {
        self.settled as f64 + self.frac
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sprite/position.rs"]
mod tests;
