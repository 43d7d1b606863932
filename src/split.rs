//! End-to-end split of one panorama: validate, plan, run.

use std::path::Path;

use crate::batch::progress::BatchProgress;
use crate::batch::report::BatchReport;
use crate::batch::runner::BatchRunner;
use crate::foundation::error::PanoResult;
use crate::input::{prepare_output_dir, validate_input};
use crate::plan::batch::BatchPlan;
use crate::plan::view::ViewParams;
use crate::project::projector::Projector;

/// Split `input` into the full view grid under `<output_root>/<stem>/`.
///
/// Parameter and input errors abort before any view is attempted. Once the batch starts only
/// a thread pool failure can end it early; everything else lands in the report.
pub fn split_panorama<P: Projector>(
    input: &Path,
    output_root: &Path,
    params: &ViewParams,
    runner: &BatchRunner<P>,
    progress: &mut dyn BatchProgress,
) -> PanoResult<BatchReport> {
    params.validate()?;
    let source = validate_input(input)?;
    let out_dir = prepare_output_dir(output_root, &source)?;
    tracing::info!(
        source = %source.display(),
        out_dir = %out_dir.display(),
        width = params.width,
        height = params.height,
        quality = %params.quality,
        h_fov = params.h_fov,
        v_fov = params.v_fov,
        "splitting panorama"
    );

    let plan = BatchPlan::generate(params);
    runner.run_with_progress(&plan, &source, &out_dir, progress)
}
