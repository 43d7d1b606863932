use std::path::PathBuf;

use crate::foundation::core::{IndexRange, OutputIndex};
use crate::plan::batch::{Ring, RingKind};
use crate::plan::view::ViewSpec;

/// Result of one projection call.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ViewOutcome {
    /// Index of the view.
    pub output_index: OutputIndex,
    /// Sweep yaw in `[0, 360)`.
    pub sweep_yaw: i32,
    /// Pitch in degrees.
    pub pitch: i32,
    /// Failure message; `None` on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ViewOutcome {
    /// Successful outcome for `view`.
    pub fn success(view: &ViewSpec) -> Self {
        Self {
            output_index: view.output_index,
            sweep_yaw: view.sweep_yaw,
            pitch: view.pitch,
            error: None,
        }
    }

    /// Failed outcome for `view`.
    pub fn failure(view: &ViewSpec, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::success(view)
        }
    }

    /// `true` when the view was produced.
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-ring tally.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RingReport {
    /// Which ring.
    pub kind: RingKind,
    /// Ring pitch in degrees.
    pub pitch: i32,
    /// Output indices owned by the ring.
    pub range: IndexRange,
    /// Views produced.
    pub successes: u32,
    /// Views attempted.
    pub expected: u32,
    /// Failed views in sweep order.
    pub failures: Vec<ViewOutcome>,
}

impl RingReport {
    /// Tally the outcomes of `ring`, which must be given in sweep order.
    pub fn from_outcomes(ring: &Ring, outcomes: &[ViewOutcome]) -> Self {
        let successes = outcomes.iter().filter(|o| o.succeeded()).count() as u32;
        Self {
            kind: ring.kind,
            pitch: ring.pitch(),
            range: ring.index_range(),
            successes,
            expected: ring.views().len() as u32,
            failures: outcomes.iter().filter(|o| !o.succeeded()).cloned().collect(),
        }
    }

    /// `true` when every view of the ring was produced.
    pub fn is_complete(&self) -> bool {
        self.successes == self.expected
    }
}

impl std::fmt::Display for RingReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ring (pitch {:+}°): {}/{} ({})",
            self.kind, self.pitch, self.successes, self.expected, self.range
        )
    }
}

/// Outcome of a full batch.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BatchReport {
    /// Resolved source image.
    pub source: PathBuf,
    /// Directory the views were written to.
    pub output_dir: PathBuf,
    /// Ring tallies in plan order.
    pub rings: Vec<RingReport>,
    /// Views produced across all rings.
    pub total_successes: u32,
    /// Views attempted across all rings.
    pub total_expected: u32,
}

impl BatchReport {
    /// Combine ring tallies.
    pub fn new(source: PathBuf, output_dir: PathBuf, rings: Vec<RingReport>) -> Self {
        let total_successes = rings.iter().map(|r| r.successes).sum();
        let total_expected = rings.iter().map(|r| r.expected).sum();
        Self {
            source,
            output_dir,
            rings,
            total_successes,
            total_expected,
        }
    }

    /// `true` only when every planned view was produced.
    pub fn is_success(&self) -> bool {
        self.total_expected > 0 && self.total_successes == self.total_expected
    }

    /// Indices of the views that failed, ascending.
    pub fn failed_indices(&self) -> Vec<OutputIndex> {
        self.rings
            .iter()
            .flat_map(|r| r.failures.iter().map(|o| o.output_index))
            .collect()
    }

    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> crate::PanoResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| crate::PanoError::Other(anyhow::Error::new(e)))
    }
}

impl std::fmt::Display for BatchReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "total: {}/{} views",
            self.total_successes, self.total_expected
        )?;
        for (n, ring) in self.rings.iter().enumerate() {
            writeln!(
                f,
                "  ring {} ({} {:+}°): {} [{}/{}]",
                n + 1,
                ring.kind,
                ring.pitch,
                ring.range,
                ring.successes,
                ring.expected
            )?;
        }
        write!(f, "output: {}", self.output_dir.display())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/report.rs"]
mod tests;
