//! panosplit turns one equirectangular panorama into a fixed grid of 72 rectilinear views.
//!
//! Three pitch rings (+30°, 0°, -30°) each sweep yaw through 24 steps of 15°. Every view is
//! produced by an external projector, `ffmpeg`'s `v360` filter in production, and written as
//! `<output_root>/<stem>/<index>.jpg` with indices 1..=72.
//!
//! - Build the sampling grid with [`BatchPlan::generate`]
//! - Drive any [`Projector`] over it with a [`BatchRunner`]
//! - Or do validation, planning and execution in one call with [`split_panorama`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Batch execution and reporting.
pub mod batch;
/// Prompt-driven front end.
pub mod interactive;
/// Source validation and output layout.
pub mod input;
/// View-sampling plan.
pub mod plan;
/// Projection backends.
pub mod project;
/// One-call panorama split.
pub mod split;

pub use crate::foundation::core::{IndexRange, OutputIndex, Quality};
pub use crate::foundation::error::{PanoError, PanoResult};

pub use crate::batch::progress::{BatchProgress, ConsoleProgress, NoProgress};
pub use crate::batch::report::{BatchReport, RingReport, ViewOutcome};
pub use crate::batch::runner::{BatchRunner, RunOpts};
pub use crate::input::{ALLOWED_EXTENSIONS, output_dir_for, prepare_output_dir, validate_input};
pub use crate::interactive::Interactive;
pub use crate::plan::batch::{
    BatchPlan, RING_COUNT, Ring, RingKind, TOTAL_VIEWS, VIEWS_PER_RING, YAW_STEP,
};
pub use crate::plan::view::{ViewParams, ViewSpec, canonical_yaw};
pub use crate::project::ffmpeg::{
    DEFAULT_TIMEOUT, FfmpegProjector, FfmpegProjectorOpts, locate_ffmpeg,
};
pub use crate::project::projector::{ProjectionDirective, Projector};
pub use crate::split::split_panorama;
