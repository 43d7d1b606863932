use std::io::Write;

use crate::batch::report::{BatchReport, RingReport, ViewOutcome};
use crate::plan::batch::{Ring, YAW_STEP};
use crate::plan::view::ViewSpec;

/// Observer for batch progress.
///
/// Calls arrive in plan order even when views were projected in parallel.
pub trait BatchProgress {
    /// A ring is about to be reported.
    fn ring_started(&mut self, _position: usize, _total: usize, _ring: &Ring) {}
    /// A view is about to be projected.
    ///
    /// In parallel mode projection has already happened; the call is replayed right before
    /// [`BatchProgress::view_finished`].
    fn view_started(&mut self, _ring: &Ring, _view: &ViewSpec) {}
    /// One view finished.
    fn view_finished(&mut self, _ring: &Ring, _view: &ViewSpec, _outcome: &ViewOutcome) {}
    /// All views of a ring finished.
    fn ring_finished(&mut self, _report: &RingReport) {}
    /// The batch finished.
    fn batch_finished(&mut self, _report: &BatchReport) {}
}

/// Progress sink that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl BatchProgress for NoProgress {}

/// Human readable progress lines written to any [`Write`].
#[derive(Debug)]
pub struct ConsoleProgress<W: Write> {
    out: W,
}

impl ConsoleProgress<std::io::Stderr> {
    /// Progress on standard error.
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> ConsoleProgress<W> {
    /// Wrap a writer.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> BatchProgress for ConsoleProgress<W> {
    fn ring_started(&mut self, position: usize, total: usize, ring: &Ring) {
        let _ = writeln!(
            self.out,
            "\n[{}/{}] {} ring (pitch={:+}°, {} views, every {}°)",
            position + 1,
            total,
            ring.kind,
            ring.pitch(),
            ring.views().len(),
            YAW_STEP
        );
    }

    fn view_started(&mut self, ring: &Ring, view: &ViewSpec) {
        let step = view.output_index.0 - ring.index_range().first.0 + 1;
        let _ = writeln!(
            self.out,
            "   [{:2}/{}] yaw={:3}°, pitch={:+}° -> {}",
            step,
            ring.views().len(),
            view.sweep_yaw,
            view.pitch,
            view.file_name()
        );
        let _ = self.out.flush();
    }

    fn view_finished(&mut self, _ring: &Ring, view: &ViewSpec, outcome: &ViewOutcome) {
        if let Some(err) = &outcome.error {
            let _ = writeln!(self.out, "   ! {} failed: {err}", view.file_name());
        }
    }

    fn ring_finished(&mut self, report: &RingReport) {
        let _ = writeln!(self.out, "{report}");
    }

    fn batch_finished(&mut self, report: &BatchReport) {
        let rule = "=".repeat(50);
        let _ = writeln!(self.out, "\n{rule}\n{report}\n{rule}");
        let _ = self.out.flush();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/progress.rs"]
mod tests;
