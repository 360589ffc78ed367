use std::path::Path;

use anyhow::Context;

use crate::demo::car::{Input, Steer, Throttle};
use crate::foundation::core::{Affine, Rgba8Premul, Vec2};
use crate::foundation::error::{StackError, StackResult};
use crate::render::cpu::ImageFilter;

/// A run of identical inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DriveSpan {
    pub frames: u32,
    #[serde(default)]
    pub input: Input,
}

/// Scripted driver input for headless runs.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DriveScript {
    pub spans: Vec<DriveSpan>,
}

impl Default for DriveScript {
    fn default() -> Self {
        let span = |frames, throttle, steer| DriveSpan {
            frames,
            input: Input { throttle, steer },
        };
        Self {
            spans: vec![
                span(60, Throttle::Gas, Steer::Straight),
                span(120, Throttle::Gas, Steer::Left),
                span(60, Throttle::Coast, Steer::Right),
                span(30, Throttle::Brake, Steer::Straight),
            ],
        }
    }
}

impl DriveScript {
    pub fn total_frames(&self) -> u64 {
        self.spans.iter().map(|s| u64::from(s.frames)).sum()
    }

    /// Input for tick `frame`, or `None` past the end of the script.
    pub fn input_at(&self, frame: u64) -> Option<Input> {
        let mut start = 0u64;
        for span in &self.spans {
            let end = start + u64::from(span.frames);
            if frame < end {
                return Some(span.input);
            }
            start = end;
        }
        None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub scale: [f64; 2],
    pub translate: [f64; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            scale: [2.0, 2.0],
            translate: [160.0, 120.0],
        }
    }
}

impl CameraConfig {
    /// Scale first, then translate.
    pub fn to_affine(self) -> Affine {
        Affine::translate(Vec2::new(self.translate[0], self.translate[1]))
            * Affine::scale_non_uniform(self.scale[0], self.scale[1])
    }
}

/// Configuration for the headless car demo.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub width: u32,
    pub height: u32,
    /// Simulation ticks per second.
    pub tps: f64,
    /// Straight-alpha background colour.
    pub clear_rgba: [u8; 4],
    pub camera: CameraConfig,
    /// Sampling filter; `None` leaves the compositor's own default.
    pub filter: Option<ImageFilter>,
    pub script: DriveScript,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            tps: 60.0,
            clear_rgba: [150, 150, 150, 255],
            camera: CameraConfig::default(),
            filter: None,
            script: DriveScript::default(),
        }
    }
}

impl DemoConfig {
    pub fn from_json(s: &str) -> StackResult<Self> {
        let cfg: Self = serde_json::from_str(s).map_err(|e| StackError::serde(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> StackResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read demo config '{}'", path.display()))?;
        Self::from_json(&s)
    }

    pub fn validate(&self) -> StackResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(StackError::validation("canvas dimensions must be > 0"));
        }
        if !(self.tps.is_finite() && self.tps > 0.0) {
            return Err(StackError::validation("tps must be a positive number"));
        }
        if self.camera.scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
            return Err(StackError::validation("camera scale must be finite and non-zero"));
        }
        Ok(())
    }

    pub fn clear_color(&self) -> Rgba8Premul {
        let [r, g, b, a] = self.clear_rgba;
        Rgba8Premul::from_straight_rgba(r, g, b, a)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/demo/config.rs"]
mod tests;
