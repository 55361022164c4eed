//! Variable shoulder raycaster
//!
//! Aims along a blend of two vectors ending at the cast anchor: one from an
//! estimated shoulder (large-scale stability) and one from the wrist
//! (fine steering, amplified). Shoulder, direction and locus are each
//! smoothed by their own One Euro filter.

use nalgebra::{Unit, Vector3};
use tracing::debug;

use super::algorithm::{RayAlgorithm, RayResult};
use crate::config::{PinchBlend, RaycasterConfig};
use crate::physics::{
    estimate_shoulder, lerp, AnatomicalConfig, FilterConfig, HeadPose, JointSample, OneEuroFilter,
};

/// A smoothed direction shorter than this has no meaningful heading
pub const MIN_DIRECTION_NORM: f32 = 1e-4;

type VectorFilter = OneEuroFilter<Vector3<f32>>;

pub struct VariableShoulderRaycaster {
    anatomy: AnatomicalConfig,
    blend: PinchBlend,
    shoulder_filter: Option<VectorFilter>,
    direction_filter: Option<VectorFilter>,
    locus_filter: Option<VectorFilter>,
}

impl VariableShoulderRaycaster {
    /// Raycaster with all three filters constructed
    pub fn new(config: &RaycasterConfig) -> Self {
        Self::with_filters(
            config.anatomy,
            config.blend,
            Some(config.filters.shoulder),
            Some(config.filters.direction),
            Some(config.filters.locus),
        )
    }

    /// Raycaster with an explicit choice of filters. A missing filter
    /// disables ray output until one is installed.
    pub fn with_filters(
        anatomy: AnatomicalConfig,
        blend: PinchBlend,
        shoulder: Option<FilterConfig>,
        direction: Option<FilterConfig>,
        locus: Option<FilterConfig>,
    ) -> Self {
        Self {
            anatomy,
            blend,
            shoulder_filter: shoulder.map(OneEuroFilter::new),
            direction_filter: direction.map(OneEuroFilter::new),
            locus_filter: locus.map(OneEuroFilter::new),
        }
    }

    pub fn set_shoulder_filter(&mut self, config: FilterConfig) {
        self.shoulder_filter = Some(OneEuroFilter::new(config));
    }

    pub fn set_direction_filter(&mut self, config: FilterConfig) {
        self.direction_filter = Some(OneEuroFilter::new(config));
    }

    pub fn set_locus_filter(&mut self, config: FilterConfig) {
        self.locus_filter = Some(OneEuroFilter::new(config));
    }

    pub fn has_filters(&self) -> bool {
        self.shoulder_filter.is_some() && self.direction_filter.is_some() && self.locus_filter.is_some()
    }

    pub fn anatomy(&self) -> &AnatomicalConfig {
        &self.anatomy
    }

    /// Fine pinch point between thumb and index
    pub fn interaction_locus(&self, thumb: &Vector3<f32>, index: &Vector3<f32>) -> Vector3<f32> {
        lerp(thumb, index, self.blend.locus)
    }

    /// Ray emission origin between thumb and middle finger
    pub fn cast_anchor(&self, thumb: &Vector3<f32>, mid: &Vector3<f32>) -> Vector3<f32> {
        lerp(thumb, mid, self.blend.cast_anchor)
    }
}

impl Default for VariableShoulderRaycaster {
    fn default() -> Self {
        Self::new(&RaycasterConfig::default())
    }
}

impl RayAlgorithm for VariableShoulderRaycaster {
    fn is_valid(&self, sample: &JointSample) -> bool {
        sample.is_complete()
    }

    fn get_ray(&mut self, sample: &JointSample, head: &HeadPose, timestamp: f64) -> Option<RayResult> {
        let joints = sample.tracked()?;
        if !joints.is_finite() {
            debug!(?joints, "Non-finite joint position, no ray this frame");
            return None;
        }

        let locus = self.interaction_locus(&joints.thumb, &joints.index);
        let cast_anchor = self.cast_anchor(&joints.thumb, &joints.mid);
        let estimated_shoulder = estimate_shoulder(&joints.index, head, &self.anatomy);
        let wrist_amplification = self.anatomy.wrist_amplification;
        if !estimated_shoulder.iter().all(|v| v.is_finite()) {
            debug!(shoulder = ?estimated_shoulder, "Non-finite shoulder estimate, no ray this frame");
            return None;
        }

        let (Some(shoulder_filter), Some(direction_filter), Some(locus_filter)) = (
            self.shoulder_filter.as_mut(),
            self.direction_filter.as_mut(),
            self.locus_filter.as_mut(),
        ) else {
            return None;
        };

        let shoulder = shoulder_filter.step(estimated_shoulder, timestamp);

        let shoulder_ray = cast_anchor - shoulder;
        let wrist_ray = cast_anchor - joints.wrist;
        let targeting_ray = shoulder_ray + wrist_ray * wrist_amplification;

        let smooth_direction = direction_filter.step(targeting_ray, timestamp);
        let smooth_locus = locus_filter.step(locus, timestamp);

        let Some(direction) = normalize_direction(&smooth_direction) else {
            debug!(direction = ?smooth_direction, "Degenerate aim direction, no ray this frame");
            return None;
        };

        Some(RayResult {
            locus: smooth_locus,
            direction,
        })
    }

    fn reset(&mut self) {
        for filter in [
            &mut self.shoulder_filter,
            &mut self.direction_filter,
            &mut self.locus_filter,
        ]
        .into_iter()
        .flatten()
        {
            filter.reset();
        }
    }
}

/// Unit direction, or None when the vector is too short (or non-finite) to normalize
pub fn normalize_direction(direction: &Vector3<f32>) -> Option<Unit<Vector3<f32>>> {
    if !direction.iter().all(|v| v.is_finite()) {
        return None;
    }
    Unit::try_new(*direction, MIN_DIRECTION_NORM)
}
