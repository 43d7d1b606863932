use super::*;
use crate::batch::report::RingReport;
use crate::foundation::core::OutputIndex;
use crate::plan::batch::Ring;
use crate::plan::view::ViewParams;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Writes a marker file per view and fails the listed indices.
#[derive(Debug, Default)]
struct FakeProjector {
    fail: Vec<u32>,
    calls: Mutex<Vec<u32>>,
}

impl FakeProjector {
    fn failing(fail: &[u32]) -> Self {
        Self {
            fail: fail.to_vec(),
            ..Self::default()
        }
    }
}

impl Projector for FakeProjector {
    fn project(&self, _source: &Path, view: &ViewSpec, out_path: &Path) -> PanoResult<()> {
        let idx = view.output_index.0;
        self.calls.lock().unwrap().push(idx);
        if self.fail.contains(&idx) {
            return Err(match idx % 3 {
                0 => PanoError::ProjectionTimeout(Duration::from_secs(30)),
                1 => PanoError::projection("exit status 1"),
                _ => PanoError::execution("spawn failed"),
            });
        }
        std::fs::write(out_path, format!("yaw={} pitch={}", view.yaw, view.pitch))
            .map_err(|e| PanoError::Other(e.into()))
    }
}

#[derive(Default)]
struct RecordingProgress {
    events: Vec<String>,
}

impl BatchProgress for RecordingProgress {
    fn ring_started(&mut self, position: usize, total: usize, ring: &Ring) {
        self.events
            .push(format!("start {}/{} {}", position + 1, total, ring.kind));
    }

    fn view_finished(&mut self, _ring: &Ring, view: &ViewSpec, outcome: &ViewOutcome) {
        self.events.push(format!(
            "view {} {}",
            view.output_index,
            if outcome.succeeded() { "ok" } else { "err" }
        ));
    }

    fn ring_finished(&mut self, report: &RingReport) {
        self.events
            .push(format!("ring {} {}", report.kind, report.successes));
    }

    fn batch_finished(&mut self, report: &BatchReport) {
        self.events.push(format!("done {}", report.total_successes));
    }
}

fn plan() -> BatchPlan {
    BatchPlan::generate(&ViewParams::default())
}

#[test]
fn all_views_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let runner = BatchRunner::new(FakeProjector::default());
    let report = runner
        .run(&plan(), Path::new("pano.jpg"), dir.path())
        .unwrap();

    assert_eq!(report.total_successes, 72);
    assert!(report.is_success());
    for i in 1..=72 {
        assert!(dir.path().join(format!("{i}.jpg")).is_file());
    }
}

#[test]
fn views_are_projected_in_plan_order() {
    let dir = tempfile::tempdir().unwrap();
    let runner = BatchRunner::new(FakeProjector::default());
    runner
        .run(&plan(), Path::new("pano.jpg"), dir.path())
        .unwrap();
    let calls = runner.projector().calls.lock().unwrap().clone();
    assert_eq!(calls, (1..=72).collect::<Vec<_>>());
}

#[test]
fn one_failure_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let runner = BatchRunner::new(FakeProjector::failing(&[37]));
    let report = runner
        .run(&plan(), Path::new("pano.jpg"), dir.path())
        .unwrap();

    assert_eq!(report.total_successes, 71);
    assert!(!report.is_success());
    assert_eq!(report.rings[1].successes, 23);
    assert_eq!(report.rings[1].expected, 24);
    assert_eq!(report.failed_indices(), vec![OutputIndex(37)]);
    assert_eq!(runner.projector().calls.lock().unwrap().len(), 72);

    for i in (1..=72).filter(|&i| i != 37) {
        assert!(dir.path().join(format!("{i}.jpg")).is_file(), "{i}.jpg");
    }
    assert!(!dir.path().join("37.jpg").exists());
}

#[test]
fn every_error_kind_is_isolated_to_its_view() {
    let dir = tempfile::tempdir().unwrap();
    // 3 -> timeout, 4 -> projection failure, 5 -> execution error
    let runner = BatchRunner::new(FakeProjector::failing(&[3, 4, 5, 72]));
    let report = runner
        .run(&plan(), Path::new("pano.jpg"), dir.path())
        .unwrap();

    assert_eq!(report.total_successes, 68);
    assert_eq!(report.rings[0].successes, 21);
    assert_eq!(report.rings[2].successes, 23);
    let errors: Vec<String> = report.rings[0]
        .failures
        .iter()
        .map(|f| f.error.clone().unwrap())
        .collect();
    assert!(errors[0].contains("timed out"));
    assert!(errors[1].contains("projection failed"));
    assert!(errors[2].contains("execution error"));
}

#[test]
fn progress_events_follow_plan_order() {
    let dir = tempfile::tempdir().unwrap();
    let runner = BatchRunner::new(FakeProjector::failing(&[1]));
    let mut progress = RecordingProgress::default();
    runner
        .run_with_progress(&plan(), Path::new("pano.jpg"), dir.path(), &mut progress)
        .unwrap();

    let ev = &progress.events;
    assert_eq!(ev.len(), 3 * (1 + 24 + 1) + 1);
    assert_eq!(ev[0], "start 1/3 look up");
    assert_eq!(ev[1], "view 1 err");
    assert_eq!(ev[2], "view 2 ok");
    assert_eq!(ev[25], "ring look up 23");
    assert_eq!(ev[26], "start 2/3 level");
    assert_eq!(ev[52], "start 3/3 look down");
    assert_eq!(ev.last().unwrap(), "done 71");
}

#[test]
fn parallel_run_matches_sequential_report() {
    let seq_dir = tempfile::tempdir().unwrap();
    let par_dir = tempfile::tempdir().unwrap();
    let fail = [2, 37, 60];

    let seq = BatchRunner::new(FakeProjector::failing(&fail))
        .run(&plan(), Path::new("pano.jpg"), seq_dir.path())
        .unwrap();

    let par_runner = BatchRunner::with_opts(
        FakeProjector::failing(&fail),
        RunOpts {
            parallel: true,
            threads: Some(4),
        },
    )
    .unwrap();
    let mut progress = RecordingProgress::default();
    let par = par_runner
        .run_with_progress(&plan(), Path::new("pano.jpg"), par_dir.path(), &mut progress)
        .unwrap();

    assert_eq!(par.rings, seq.rings);
    assert_eq!(par.total_successes, 69);
    assert_eq!(progress.events[1], "view 1 ok");
    assert_eq!(progress.events[2], "view 2 err");

    let mut calls = par_runner.projector().calls.lock().unwrap().clone();
    calls.sort_unstable();
    assert_eq!(calls, (1..=72).collect::<Vec<_>>());
}

#[test]
fn zero_threads_rejected() {
    let err = BatchRunner::with_opts(
        FakeProjector::default(),
        RunOpts {
            parallel: true,
            threads: Some(0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, PanoError::Validation(_)));
}

/// Projector and observer appending to one shared log.
struct LoggingProjector(Arc<Mutex<Vec<String>>>);

impl Projector for LoggingProjector {
    fn project(&self, _source: &Path, view: &ViewSpec, _out_path: &Path) -> PanoResult<()> {
        self.0
            .lock()
            .unwrap()
            .push(format!("project {}", view.output_index));
        Ok(())
    }
}

struct LoggingProgress(Arc<Mutex<Vec<String>>>);

impl BatchProgress for LoggingProgress {
    fn view_started(&mut self, _ring: &Ring, view: &ViewSpec) {
        self.0
            .lock()
            .unwrap()
            .push(format!("started {}", view.output_index));
    }

    fn view_finished(&mut self, _ring: &Ring, view: &ViewSpec, _outcome: &ViewOutcome) {
        self.0
            .lock()
            .unwrap()
            .push(format!("finished {}", view.output_index));
    }
}

#[test]
fn view_started_precedes_sequential_projection() {
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let runner = BatchRunner::new(LoggingProjector(log.clone()));
    runner
        .run_with_progress(
            &plan(),
            Path::new("pano.jpg"),
            dir.path(),
            &mut LoggingProgress(log.clone()),
        )
        .unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 3 * 72);
    assert_eq!(&log[..6], [
        "started 1",
        "project 1",
        "finished 1",
        "started 2",
        "project 2",
        "finished 2",
    ]);
    assert_eq!(log[3 * 71], "started 72");
    assert_eq!(log[3 * 71 + 1], "project 72");
}

#[test]
fn parallel_replay_pairs_started_with_finished() {
    let dir = tempfile::tempdir().unwrap();
    let log = Arc::new(Mutex::new(Vec::new()));
    let runner = BatchRunner::with_opts(
        LoggingProjector(log.clone()),
        RunOpts {
            parallel: true,
            threads: Some(2),
        },
    )
    .unwrap();
    runner
        .run_with_progress(
            &plan(),
            Path::new("pano.jpg"),
            dir.path(),
            &mut LoggingProgress(log.clone()),
        )
        .unwrap();

    let log = log.lock().unwrap();
    let replay: Vec<&String> = log.iter().filter(|e| !e.starts_with("project")).collect();
    assert_eq!(replay.len(), 2 * 72);
    for (i, pair) in replay.chunks(2).enumerate() {
        assert_eq!(*pair[0], format!("started {}", i + 1));
        assert_eq!(*pair[1], format!("finished {}", i + 1));
    }
}
