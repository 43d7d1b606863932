//! Projection backends.
//!
//! The runner only sees the [`Projector`](projector::Projector) trait; `ffmpeg` is the
//! production implementation.

/// `ffmpeg` `v360` projector and tool discovery.
pub mod ffmpeg;
/// Projector capability and directive encoding.
pub mod projector;
