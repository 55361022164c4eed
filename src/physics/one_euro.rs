//! One Euro Filter - adaptive low-pass filter for jitter reduction
//!
//! Smooth when slow (reduces jitter), responsive when fast (tracks aiming sweeps).
//! One instance per channel: shoulder anchor, ray direction, interaction locus.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Smallest time step the filter will integrate over (seconds)
pub const MIN_DT: f32 = 1e-6;

/// Tuning for one filter channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    /// Minimum cutoff frequency (Hz) - lower = smoother at rest
    pub min_cutoff: f32,
    /// Speed coefficient - higher = less lag during fast motion
    pub beta: f32,
    /// Derivative cutoff frequency (Hz)
    pub derivate_cutoff: f32,
}

impl FilterConfig {
    pub fn new(min_cutoff: f32, beta: f32, derivate_cutoff: f32) -> Self {
        Self {
            min_cutoff,
            beta,
            derivate_cutoff,
        }
    }

    /// Heavy smoothing: the estimated shoulder should barely sway
    pub fn for_shoulder() -> Self {
        Self::new(0.25, 0.01, 1.0)
    }

    /// Ray direction - wrist steering needs to stay responsive
    pub fn for_direction() -> Self {
        Self::new(1.0, 0.05, 1.0)
    }

    /// Pinch locus - tracks the fingers closely
    pub fn for_locus() -> Self {
        Self::new(2.0, 0.1, 1.0)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new(1.0, 0.0, 1.0)
    }
}

/// A value the filter can smooth. Vector channels run the scalar rule per axis.
pub trait FilterValue: Copy + std::fmt::Debug {
    fn zero() -> Self;

    fn is_finite(&self) -> bool;

    /// Apply `f(raw, prev_value, prev_derivative) -> (value, derivative)` per component
    fn zip_step<F>(raw: Self, value: Self, derivative: Self, f: F) -> (Self, Self)
    where
        F: FnMut(f32, f32, f32) -> (f32, f32);
}

impl FilterValue for f32 {
    fn zero() -> Self {
        0.0
    }

    fn is_finite(&self) -> bool {
        f32::is_finite(*self)
    }

    fn zip_step<F>(raw: Self, value: Self, derivative: Self, mut f: F) -> (Self, Self)
    where
        F: FnMut(f32, f32, f32) -> (f32, f32),
    {
        f(raw, value, derivative)
    }
}

impl FilterValue for Vector3<f32> {
    fn zero() -> Self {
        Vector3::zeros()
    }

    fn is_finite(&self) -> bool {
        self.iter().all(|v| v.is_finite())
    }

    fn zip_step<F>(raw: Self, value: Self, derivative: Self, mut f: F) -> (Self, Self)
    where
        F: FnMut(f32, f32, f32) -> (f32, f32),
    {
        let mut out_value = Vector3::zeros();
        let mut out_derivative = Vector3::zeros();
        for axis in 0..3 {
            let (v, d) = f(raw[axis], value[axis], derivative[axis]);
            out_value[axis] = v;
            out_derivative[axis] = d;
        }
        (out_value, out_derivative)
    }
}

/// Filter memory between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterState<T> {
    /// Last filtered output
    pub value: T,
    /// Last filtered derivative
    pub derivative: T,
    /// Timestamp of the last accepted sample (seconds)
    pub timestamp: f64,
    pub initialized: bool,
}

impl<T: FilterValue> FilterState<T> {
    pub fn new() -> Self {
        Self {
            value: T::zero(),
            derivative: T::zero(),
            timestamp: 0.0,
            initialized: false,
        }
    }

    /// Pure transition: the state after observing `raw` at `timestamp`.
    /// The filtered output is the returned state's `value`.
    ///
    /// A non-finite sample or timestamp is dropped and the state is returned unchanged.
    pub fn advance(self, config: &FilterConfig, raw: T, timestamp: f64) -> Self {
        if !raw.is_finite() || !timestamp.is_finite() {
            return self;
        }

        if !self.initialized {
            return Self {
                value: raw,
                derivative: T::zero(),
                timestamp,
                initialized: true,
            };
        }

        // Non-monotonic or repeated timestamps integrate over MIN_DT for this step only
        let t_e = ((timestamp - self.timestamp) as f32).max(MIN_DT);
        let a_d = smoothing_factor(t_e, config.derivate_cutoff);

        let (value, derivative) = T::zip_step(raw, self.value, self.derivative, |x, x_prev, dx_prev| {
            // 1. Estimate derivative (velocity)
            let dx = (x - x_prev) / t_e;
            let dx_hat = a_d * dx + (1.0 - a_d) * dx_prev;

            // 2. Adaptive cutoff: more smoothing when slow, less when fast
            let cutoff = config.min_cutoff + config.beta * dx_hat.abs();
            let a = smoothing_factor(t_e, cutoff);

            // 3. Apply filter
            (a * x + (1.0 - a) * x_prev, dx_hat)
        });

        Self {
            value,
            derivative,
            timestamp,
            initialized: true,
        }
    }
}

impl<T: FilterValue> Default for FilterState<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Smoothing factor alpha for a cutoff (Hz) over a step of `t_e` seconds
fn smoothing_factor(t_e: f32, cutoff: f32) -> f32 {
    let r = 2.0 * PI * cutoff.max(0.0) * t_e;
    r / (r + 1.0)
}

/// Adaptive low-pass filter: smooth at rest, responsive during motion
#[derive(Debug, Clone)]
pub struct OneEuroFilter<T> {
    config: FilterConfig,
    state: FilterState<T>,
}

impl<T: FilterValue> OneEuroFilter<T> {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            state: FilterState::new(),
        }
    }

    /// Filter one sample
    ///
    /// - `raw`: raw input value
    /// - `timestamp`: seconds, expected non-decreasing
    ///
    /// Returns: filtered value (the raw value itself on the first call,
    /// the previous output when `raw` is not finite)
    pub fn step(&mut self, raw: T, timestamp: f64) -> T {
        self.state = self.state.advance(&self.config, raw, timestamp);
        self.state.value
    }

    /// Forget history; the next sample passes through unchanged
    pub fn reset(&mut self) {
        self.state = FilterState::new();
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    pub fn state(&self) -> &FilterState<T> {
        &self.state
    }
}
