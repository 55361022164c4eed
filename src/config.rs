//! Raycaster configuration
//!
//! Supplied once at construction. Hosts may pass partial JSON; missing
//! fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{RaycastError, Result};
use crate::physics::{AnatomicalConfig, FilterConfig};

/// Where the pinch points sit between the fingers (0 = thumb, 1 = other finger)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PinchBlend {
    /// Thumb -> index weight for the interaction locus
    pub locus: f32,
    /// Thumb -> middle weight for the cast anchor
    pub cast_anchor: f32,
}

impl Default for PinchBlend {
    fn default() -> Self {
        Self {
            locus: 0.5,
            cast_anchor: 0.5,
        }
    }
}

/// One filter configuration per smoothed channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSet {
    pub shoulder: FilterConfig,
    pub direction: FilterConfig,
    pub locus: FilterConfig,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            shoulder: FilterConfig::for_shoulder(),
            direction: FilterConfig::for_direction(),
            locus: FilterConfig::for_locus(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RaycasterConfig {
    pub anatomy: AnatomicalConfig,
    pub blend: PinchBlend,
    pub filters: FilterSet,
    /// Clear filter history when the hand stops being tracked
    pub reset_on_tracking_loss: bool,
}

impl Default for RaycasterConfig {
    fn default() -> Self {
        Self {
            anatomy: AnatomicalConfig::default(),
            blend: PinchBlend::default(),
            filters: FilterSet::default(),
            reset_on_tracking_loss: true,
        }
    }
}

impl RaycasterConfig {
    /// Parse and validate
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let anatomy = &self.anatomy;
        finite("anatomy.elbowLocation.x", anatomy.elbow_location.x)?;
        finite("anatomy.elbowLocation.y", anatomy.elbow_location.y)?;
        finite("anatomy.elbowLocation.z", anatomy.elbow_location.z)?;
        positive("anatomy.elbowRadius", anatomy.elbow_radius)?;
        positive("anatomy.elbowRadiusHorizontalFactor", anatomy.elbow_radius_horizontal_factor)?;
        positive("anatomy.elbowTrackedRadius", anatomy.elbow_tracked_radius)?;
        finite("anatomy.wristAmplification", anatomy.wrist_amplification)?;
        finite("anatomy.elbowZOffsetScale", anatomy.elbow_z_offset_scale)?;

        unit_interval("blend.locus", self.blend.locus)?;
        unit_interval("blend.castAnchor", self.blend.cast_anchor)?;

        validate_filter(SHOULDER_FIELDS, &self.filters.shoulder)?;
        validate_filter(DIRECTION_FIELDS, &self.filters.direction)?;
        validate_filter(LOCUS_FIELDS, &self.filters.locus)?;
        Ok(())
    }
}

/// Field names for one filter channel: minCutoff, derivateCutoff, beta
type FilterFields = [&'static str; 3];

const SHOULDER_FIELDS: FilterFields = [
    "filters.shoulder.minCutoff",
    "filters.shoulder.derivateCutoff",
    "filters.shoulder.beta",
];
const DIRECTION_FIELDS: FilterFields = [
    "filters.direction.minCutoff",
    "filters.direction.derivateCutoff",
    "filters.direction.beta",
];
const LOCUS_FIELDS: FilterFields = [
    "filters.locus.minCutoff",
    "filters.locus.derivateCutoff",
    "filters.locus.beta",
];

fn validate_filter(fields: FilterFields, filter: &FilterConfig) -> Result<()> {
    let [min_cutoff, derivate_cutoff, beta] = fields;
    positive(min_cutoff, filter.min_cutoff)?;
    positive(derivate_cutoff, filter.derivate_cutoff)?;
    finite(beta, filter.beta)?;
    if filter.beta < 0.0 {
        return Err(RaycastError::OutOfRange {
            field: beta,
            value: filter.beta,
            min: 0.0,
            max: f32::INFINITY,
        });
    }
    Ok(())
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RaycastError::NonFinite { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(RaycastError::NonPositive { field, value })
    }
}

fn unit_interval(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(RaycastError::OutOfRange {
            field,
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}
