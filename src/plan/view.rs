use crate::foundation::core::{OutputIndex, Quality};
use crate::foundation::error::{PanoError, PanoResult};

/// Camera and output parameters shared by every view of a batch.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewParams {
    /// Horizontal field of view in degrees.
    pub h_fov: f64,
    /// Vertical field of view in degrees.
    pub v_fov: f64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Encoder quality.
    pub quality: Quality,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            h_fov: 130.0,
            v_fov: 120.0,
            width: 1280,
            height: 720,
            quality: Quality::default(),
        }
    }
}

impl ViewParams {
    /// Reject parameters the projector can never honour.
    pub fn validate(&self) -> PanoResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PanoError::validation("output width/height must be non-zero"));
        }
        for (name, fov) in [("h_fov", self.h_fov), ("v_fov", self.v_fov)] {
            if !fov.is_finite() || fov <= 0.0 || fov > 360.0 {
                return Err(PanoError::validation(format!(
                    "{name} must be within (0, 360] degrees, got {fov}"
                )));
            }
        }
        Ok(())
    }
}

/// One rectilinear view to extract from the panorama.
///
/// `yaw` is already canonical, in `(-180, 180]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewSpec {
    /// Canonical yaw in degrees.
    pub yaw: i32,
    /// Sweep yaw in `[0, 360)` this view was generated from.
    pub sweep_yaw: i32,
    /// Pitch in degrees, positive looks up.
    pub pitch: i32,
    /// Horizontal field of view in degrees.
    pub h_fov: f64,
    /// Vertical field of view in degrees.
    pub v_fov: f64,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Position in the batch, starting at 1.
    pub output_index: OutputIndex,
    /// Encoder quality.
    pub quality: Quality,
}

impl ViewSpec {
    /// Output file name, e.g. `25.jpg`.
    pub fn file_name(&self) -> String {
        self.output_index.file_name()
    }
}

/// Map a sweep yaw in `[0, 360)` to `(-180, 180]`.
pub fn canonical_yaw(yaw: i32) -> i32 {
    if yaw <= 180 { yaw } else { yaw - 360 }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/view.rs"]
mod tests;
