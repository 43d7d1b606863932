use crate::foundation::core::{IndexRange, OutputIndex};
use crate::plan::view::{ViewParams, ViewSpec, canonical_yaw};

/// Yaw increment between neighbouring views of a ring, in degrees.
pub const YAW_STEP: i32 = 15;
/// Views in one full horizontal sweep.
pub const VIEWS_PER_RING: u32 = (360 / YAW_STEP) as u32;
/// Rings in a batch.
pub const RING_COUNT: u32 = 3;
/// Views in a full batch.
pub const TOTAL_VIEWS: u32 = VIEWS_PER_RING * RING_COUNT;

/// The three pitch rings, in the order they are generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RingKind {
    /// Camera tilted up by 30 degrees.
    LookUp,
    /// Camera on the horizon.
    Level,
    /// Camera tilted down by 30 degrees.
    LookDown,
}

impl RingKind {
    /// Generation order.
    pub const ALL: [RingKind; 3] = [RingKind::LookUp, RingKind::Level, RingKind::LookDown];

    /// Ring pitch in degrees.
    pub fn pitch(self) -> i32 {
        match self {
            RingKind::LookUp => 30,
            RingKind::Level => 0,
            RingKind::LookDown => -30,
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            RingKind::LookUp => "look up",
            RingKind::Level => "level",
            RingKind::LookDown => "look down",
        }
    }
}

impl std::fmt::Display for RingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One 360 degree sweep at a fixed pitch.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Ring {
    /// Which ring this is.
    pub kind: RingKind,
    /// 0-based position of the ring in the plan.
    pub position: u32,
    views: Vec<ViewSpec>,
}

impl Ring {
    /// Views in sweep order.
    pub fn views(&self) -> &[ViewSpec] {
        &self.views
    }

    /// Shared pitch of all views.
    pub fn pitch(&self) -> i32 {
        self.kind.pitch()
    }

    /// Output indices covered by this ring.
    pub fn index_range(&self) -> IndexRange {
        let first = self.position * VIEWS_PER_RING + 1;
        IndexRange {
            first: OutputIndex(first),
            last: OutputIndex(first + VIEWS_PER_RING - 1),
        }
    }
}

/// The full, ordered sampling plan for one panorama.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BatchPlan {
    params: ViewParams,
    rings: Vec<Ring>,
}

impl BatchPlan {
    /// Build the 3 x 24 view grid for `params`.
    ///
    /// Pure and deterministic: rings are ordered look up, level, look down; each sweeps yaw
    /// `0..=345` in steps of 15 and owns the contiguous index span `[24k + 1, 24k + 24]`.
    pub fn generate(params: &ViewParams) -> Self {
        let rings = RingKind::ALL
            .iter()
            .zip(0u32..)
            .map(|(&kind, position)| {
                let first = position * VIEWS_PER_RING + 1;
                let views = (0..VIEWS_PER_RING)
                    .map(|step| {
                        let sweep_yaw = step as i32 * YAW_STEP;
                        ViewSpec {
                            yaw: canonical_yaw(sweep_yaw),
                            sweep_yaw,
                            pitch: kind.pitch(),
                            h_fov: params.h_fov,
                            v_fov: params.v_fov,
                            width: params.width,
                            height: params.height,
                            output_index: OutputIndex(first + step),
                            quality: params.quality,
                        }
                    })
                    .collect();
                Ring {
                    kind,
                    position,
                    views,
                }
            })
            .collect();

        Self {
            params: *params,
            rings,
        }
    }

    /// Parameters the plan was generated from.
    pub fn params(&self) -> &ViewParams {
        &self.params
    }

    /// Rings in plan order.
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// All views in plan order.
    pub fn views(&self) -> impl Iterator<Item = &ViewSpec> {
        self.rings.iter().flat_map(|r| r.views.iter())
    }

    /// Total number of views.
    pub fn len(&self) -> usize {
        self.rings.iter().map(|r| r.views.len()).sum()
    }

    /// Return `true` when the plan holds no views.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/batch.rs"]
mod tests;
