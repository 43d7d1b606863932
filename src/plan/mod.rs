//! View-sampling plan: which camera orientations are extracted and where they land.

/// Ring and batch plan generation.
pub mod batch;
/// Per-view parameters and yaw canonicalisation.
pub mod view;
