use std::path::Path;

use crate::foundation::error::PanoResult;
use crate::plan::view::ViewSpec;

/// Capability that turns one panorama into one rectilinear view on disk.
///
/// Implementations must be callable from several threads at once when the runner is in
/// parallel mode; every call writes to its own `out_path`.
pub trait Projector: Send + Sync {
    /// Produce `view` from `source` and write it to `out_path`.
    fn project(&self, source: &Path, view: &ViewSpec, out_path: &Path) -> PanoResult<()>;
}

impl<P: Projector + ?Sized> Projector for &P {
    fn project(&self, source: &Path, view: &ViewSpec, out_path: &Path) -> PanoResult<()> {
        (**self).project(source, view, out_path)
    }
}

impl<P: Projector + ?Sized> Projector for Box<P> {
    fn project(&self, source: &Path, view: &ViewSpec, out_path: &Path) -> PanoResult<()> {
        (**self).project(source, view, out_path)
    }
}

/// Equirectangular to rectilinear directive for `ffmpeg`'s `v360` filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectionDirective {
    /// Horizontal field of view in degrees.
    pub h_fov: f64,
    /// Vertical field of view in degrees.
    pub v_fov: f64,
    /// Canonical yaw in degrees.
    pub yaw: i32,
    /// Pitch in degrees.
    pub pitch: i32,
    /// Roll in degrees; the grid never rolls.
    pub roll: i32,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
}

impl ProjectionDirective {
    /// Directive for a planned view.
    pub fn for_view(view: &ViewSpec) -> Self {
        Self {
            h_fov: view.h_fov,
            v_fov: view.v_fov,
            yaw: view.yaw,
            pitch: view.pitch,
            roll: 0,
            width: view.width,
            height: view.height,
        }
    }

    /// Render as a `-vf` filter string.
    pub fn to_filter(&self) -> String {
        format!(
            "v360=input=equirect:output=rectilinear:h_fov={}:v_fov={}:yaw={}:pitch={}:roll={}:w={}:h={}",
            self.h_fov, self.v_fov, self.yaw, self.pitch, self.roll, self.width, self.height
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/project/projector.rs"]
mod tests;
