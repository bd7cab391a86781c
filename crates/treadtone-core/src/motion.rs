//! Motion telemetry differentiation.
//!
//! Stores the robot's movement data for a single control tick and, given the
//! immediately preceding frame, derives the velocity/acceleration signals the
//! procedural audio state machine runs on. Keeping two frames in a double
//! buffer is enough to track every change of movement.

use crate::{CoreError, Result};
use serde::{Deserialize, Serialize};

/// Raw motion telemetry for one control tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    /// Robot timestamp in milliseconds, strictly increasing between ticks
    pub timestamp_ms: u32,
    /// Left tread speed in mm/s
    pub left_tread_speed_mmps: f32,
    /// Right tread speed in mm/s
    pub right_tread_speed_mmps: f32,
    /// Head angle in radians
    pub head_angle_rad: f32,
    /// Lift angle in radians
    pub lift_angle_rad: f32,
}

/// Per-channel normalization maximums and movement thresholds.
///
/// Defaults carry the production tuning values. Speeds divide by the maximum
/// and clamp to `[-1, 1]`; accelerations additionally re-sign to match the
/// direction of the corresponding speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionLimits {
    /// Maximum tread speed (mm/s) used for normalization
    pub max_tread_speed_mmps: f32,
    /// Maximum turn speed (mm/s) used for normalization
    pub max_turn_speed_mmps: f32,
    /// Maximum head speed (rad/ms) used for normalization
    pub max_head_speed_radpms: f32,
    /// Maximum lift speed (rad/ms) used for normalization
    pub max_lift_speed_radpms: f32,
    /// Maximum tread acceleration (mm/ms^2) used for normalization
    pub max_tread_accel_mmpms2: f32,
    /// Maximum head acceleration (rad/ms^2) used for normalization
    pub max_head_accel_radpms2: f32,
    /// Maximum lift acceleration (rad/ms^2) used for normalization
    pub max_lift_accel_radpms2: f32,
    /// Tread movement threshold (mm/s); either wheel above it counts as moving
    pub tread_movement_threshold_mmps: f32,
    /// Head movement threshold (rad/ms)
    pub head_movement_threshold_radpms: f32,
    /// Lift movement threshold (rad/ms)
    pub lift_movement_threshold_radpms: f32,
}

/// Top robot wheel speed in mm/s
pub const MAX_WHEEL_SPEED_MMPS: f32 = 220.0;

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            max_tread_speed_mmps: MAX_WHEEL_SPEED_MMPS,
            max_turn_speed_mmps: MAX_WHEEL_SPEED_MMPS,
            max_head_speed_radpms: 0.005,
            max_lift_speed_radpms: 0.0025,
            max_tread_accel_mmpms2: 5.0,
            max_head_accel_radpms2: 0.0001,
            max_lift_accel_radpms2: 0.0001,
            tread_movement_threshold_mmps: 0.0,
            head_movement_threshold_radpms: 0.0,
            lift_movement_threshold_radpms: 0.0,
        }
    }
}

/// One telemetry sample plus the values differentiated against its
/// predecessor.
///
/// Frames live in a two-slot double buffer and are overwritten every tick:
/// [`MotionFrame::update`] stores the primary values, then
/// [`MotionFrame::compute_values`] fills in the derived ones.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotionFrame {
    /// The raw sample this frame was built from
    pub sample: MotionSample,
    /// Average of both tread speeds (mm/s)
    pub avg_tread_speed_mmps: f32,
    /// Left minus right tread speed (mm/s)
    pub turn_speed_mmps: f32,
    /// Tread acceleration (mm/ms^2)
    pub tread_accel_mmpms2: f32,
    /// Head angular speed (rad/ms)
    pub head_speed_radpms: f32,
    /// Head angular acceleration (rad/ms^2)
    pub head_accel_radpms2: f32,
    /// Lift angular speed (rad/ms)
    pub lift_speed_radpms: f32,
    /// Lift angular acceleration (rad/ms^2)
    pub lift_accel_radpms2: f32,
}

impl MotionFrame {
    /// Store the primary values of a new tick; derived values are untouched
    /// until [`MotionFrame::compute_values`] runs
    pub fn update(&mut self, sample: MotionSample) {
        self.sample = sample;
    }

    /// Differentiate against the previous frame.
    ///
    /// A non-positive time delta is a logic error in the telemetry source;
    /// derived values are left unchanged in that case.
    pub fn compute_values(&mut self, previous: &MotionFrame) -> Result<()> {
        let current_ms = self.sample.timestamp_ms;
        let previous_ms = previous.sample.timestamp_ms;
        if current_ms <= previous_ms {
            return Err(CoreError::NonMonotonicTimestamp {
                previous_ms,
                current_ms,
            });
        }
        let dt_ms = (current_ms - previous_ms) as f32;

        self.avg_tread_speed_mmps =
            (self.sample.left_tread_speed_mmps + self.sample.right_tread_speed_mmps) / 2.0;
        self.turn_speed_mmps =
            self.sample.left_tread_speed_mmps - self.sample.right_tread_speed_mmps;
        self.tread_accel_mmpms2 =
            (self.avg_tread_speed_mmps - previous.avg_tread_speed_mmps) / dt_ms;

        self.head_speed_radpms =
            (self.sample.head_angle_rad - previous.sample.head_angle_rad) / dt_ms;
        self.head_accel_radpms2 = (self.head_speed_radpms - previous.head_speed_radpms) / dt_ms;

        self.lift_speed_radpms =
            (self.sample.lift_angle_rad - previous.sample.lift_angle_rad) / dt_ms;
        self.lift_accel_radpms2 = (self.lift_speed_radpms - previous.lift_speed_radpms) / dt_ms;

        Ok(())
    }

    /// Whether either tread is above the movement threshold
    pub fn is_tread_moving(&self, limits: &MotionLimits) -> bool {
        self.sample.left_tread_speed_mmps.abs() > limits.tread_movement_threshold_mmps
            || self.sample.right_tread_speed_mmps.abs() > limits.tread_movement_threshold_mmps
    }

    /// Whether the head is above the movement threshold
    pub fn is_head_moving(&self, limits: &MotionLimits) -> bool {
        self.head_speed_radpms.abs() > limits.head_movement_threshold_radpms
    }

    /// Whether the lift is above the movement threshold
    pub fn is_lift_moving(&self, limits: &MotionLimits) -> bool {
        self.lift_speed_radpms.abs() > limits.lift_movement_threshold_radpms
    }

    /// Average tread speed normalized and clamped to `[-1, 1]`
    pub fn normalized_tread_speed(&self, limits: &MotionLimits) -> f32 {
        (self.avg_tread_speed_mmps / limits.max_tread_speed_mmps).clamp(-1.0, 1.0)
    }

    /// Tread acceleration normalized to `[-1, 1]`, re-signed to the tread
    /// speed's direction so deceleration while reversing reads negative
    pub fn normalized_tread_accel(&self, limits: &MotionLimits) -> f32 {
        let norm = (self.tread_accel_mmpms2 / limits.max_tread_accel_mmpms2).clamp(-1.0, 1.0);
        if self.avg_tread_speed_mmps < 0.0 {
            -norm
        } else {
            norm
        }
    }

    /// Turn speed magnitude normalized and clamped to `[0, 1]`; turn rate
    /// carries no independent sign semantics
    pub fn normalized_turn_speed(&self, limits: &MotionLimits) -> f32 {
        (self.turn_speed_mmps.abs() / limits.max_turn_speed_mmps).min(1.0)
    }

    /// Head speed normalized and clamped to `[-1, 1]`
    pub fn normalized_head_speed(&self, limits: &MotionLimits) -> f32 {
        (self.head_speed_radpms / limits.max_head_speed_radpms).clamp(-1.0, 1.0)
    }

    /// Head acceleration normalized to `[-1, 1]`, re-signed to the head
    /// speed's direction
    pub fn normalized_head_accel(&self, limits: &MotionLimits) -> f32 {
        let norm = (self.head_accel_radpms2 / limits.max_head_accel_radpms2).clamp(-1.0, 1.0);
        if self.head_speed_radpms < 0.0 {
            -norm
        } else {
            norm
        }
    }

    /// Lift speed normalized and clamped to `[-1, 1]`
    pub fn normalized_lift_speed(&self, limits: &MotionLimits) -> f32 {
        (self.lift_speed_radpms / limits.max_lift_speed_radpms).clamp(-1.0, 1.0)
    }

    /// Lift acceleration normalized to `[-1, 1]`, re-signed to the lift
    /// speed's direction
    pub fn normalized_lift_accel(&self, limits: &MotionLimits) -> f32 {
        let norm = (self.lift_accel_radpms2 / limits.max_lift_accel_radpms2).clamp(-1.0, 1.0);
        if self.lift_speed_radpms < 0.0 {
            -norm
        } else {
            norm
        }
    }

    /// Header line matching [`MotionFrame::csv_row`]
    pub fn csv_header() -> &'static str {
        "timestamp_ms,left_tread_mmps,right_tread_mmps,avg_tread_speed_mmps,tread_accel_mmpms2,\
         turn_speed_mmps,head_angle_rad,head_speed_radpms,head_accel_radpms2,lift_angle_rad,\
         lift_speed_radpms,lift_accel_radpms2"
    }

    /// Render this frame as one CSV row for the motion log
    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{}",
            self.sample.timestamp_ms,
            self.sample.left_tread_speed_mmps,
            self.sample.right_tread_speed_mmps,
            self.avg_tread_speed_mmps,
            self.tread_accel_mmpms2,
            self.turn_speed_mmps,
            self.sample.head_angle_rad,
            self.head_speed_radpms,
            self.head_accel_radpms2,
            self.sample.lift_angle_rad,
            self.lift_speed_radpms,
            self.lift_accel_radpms2,
        )
    }
}
