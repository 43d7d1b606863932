use std::path::Path;

use rayon::prelude::*;

use crate::batch::progress::{BatchProgress, NoProgress};
use crate::batch::report::{BatchReport, RingReport, ViewOutcome};
use crate::foundation::error::{PanoError, PanoResult};
use crate::plan::batch::BatchPlan;
use crate::plan::view::ViewSpec;
use crate::project::projector::Projector;

/// Threading controls for a batch.
#[derive(Clone, Debug, Default)]
pub struct RunOpts {
    /// Project views concurrently on a dedicated thread pool.
    pub parallel: bool,
    /// Optional explicit worker thread count (parallel mode only).
    pub threads: Option<usize>,
}

impl RunOpts {
    /// Reject `threads = Some(0)`.
    pub fn validate(&self) -> PanoResult<()> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(PanoError::validation(
                "batch threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Drives a [`Projector`] over every view of a [`BatchPlan`].
///
/// A failing view never stops the batch: its error is logged, recorded in the report and the
/// next view is attempted.
#[derive(Debug)]
pub struct BatchRunner<P> {
    projector: P,
    opts: RunOpts,
}

impl<P: Projector> BatchRunner<P> {
    /// Sequential runner.
    pub fn new(projector: P) -> Self {
        Self {
            projector,
            opts: RunOpts::default(),
        }
    }

    /// Runner with explicit threading options.
    pub fn with_opts(projector: P, opts: RunOpts) -> PanoResult<Self> {
        opts.validate()?;
        Ok(Self { projector, opts })
    }

    /// The wrapped projector.
    pub fn projector(&self) -> &P {
        &self.projector
    }

    /// Threading options in use.
    pub fn opts(&self) -> &RunOpts {
        &self.opts
    }

    /// Run `plan`, writing `<out_dir>/<index>.jpg` for every view.
    pub fn run(&self, plan: &BatchPlan, source: &Path, out_dir: &Path) -> PanoResult<BatchReport> {
        self.run_with_progress(plan, source, out_dir, &mut NoProgress)
    }

    /// Like [`BatchRunner::run`], reporting to `progress` in plan order.
    ///
    /// Errors only when the worker pool cannot be built; per-view failures end up in the
    /// returned report.
    #[tracing::instrument(skip(self, plan, progress), fields(views = plan.len(), parallel = self.opts.parallel))]
    pub fn run_with_progress(
        &self,
        plan: &BatchPlan,
        source: &Path,
        out_dir: &Path,
        progress: &mut dyn BatchProgress,
    ) -> PanoResult<BatchReport> {
        let outcomes = if self.opts.parallel {
            Some(self.project_all_parallel(plan, source, out_dir)?)
        } else {
            None
        };

        let total_rings = plan.rings().len();
        let mut ring_reports = Vec::with_capacity(total_rings);
        let mut offset = 0usize;
        for (position, ring) in plan.rings().iter().enumerate() {
            progress.ring_started(position, total_rings, ring);

            let mut ring_outcomes = Vec::with_capacity(ring.views().len());
            for view in ring.views() {
                progress.view_started(ring, view);
                let outcome = match &outcomes {
                    Some(done) => done[offset].clone(),
                    None => self.project_one(source, out_dir, view),
                };
                offset += 1;
                progress.view_finished(ring, view, &outcome);
                ring_outcomes.push(outcome);
            }

            let report = RingReport::from_outcomes(ring, &ring_outcomes);
            tracing::info!(
                ring = %report.kind,
                successes = report.successes,
                expected = report.expected,
                range = %report.range,
                "ring finished"
            );
            progress.ring_finished(&report);
            ring_reports.push(report);
        }

        let report = BatchReport::new(source.to_path_buf(), out_dir.to_path_buf(), ring_reports);
        if report.is_success() {
            tracing::info!(total = report.total_successes, "batch finished");
        } else {
            tracing::warn!(
                total = report.total_successes,
                expected = report.total_expected,
                failed = ?report.failed_indices(),
                "batch finished with failures"
            );
        }
        progress.batch_finished(&report);
        Ok(report)
    }

    fn project_one(&self, source: &Path, out_dir: &Path, view: &ViewSpec) -> ViewOutcome {
        let out_path = out_dir.join(view.file_name());
        match self.projector.project(source, view, &out_path) {
            Ok(()) => ViewOutcome::success(view),
            Err(e) => {
                tracing::warn!(index = view.output_index.0, error = %e, "view failed");
                ViewOutcome::failure(view, e.to_string())
            }
        }
    }

    fn project_all_parallel(
        &self,
        plan: &BatchPlan,
        source: &Path,
        out_dir: &Path,
    ) -> PanoResult<Vec<ViewOutcome>> {
        let pool = build_thread_pool(self.opts.threads)?;
        let views: Vec<&ViewSpec> = plan.views().collect();
        // `collect` on an indexed parallel iterator keeps plan order.
        Ok(pool.install(|| {
            views
                .par_iter()
                .map(|view| self.project_one(source, out_dir, view))
                .collect()
        }))
    }
}

fn build_thread_pool(threads: Option<usize>) -> PanoResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PanoError::execution(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/batch/runner.rs"]
mod tests;
