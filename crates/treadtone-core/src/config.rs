//! Tuning and addressing configuration for the audio clients.
//!
//! The original tunables lived in a process-wide console variable table;
//! here they are explicit structs handed to each client at construction.
//! Fields are public so a host that keeps runtime tuning can rebuild a
//! client from an edited config.

use crate::ids::{ActorId, AudioEventId, ParameterId};
use crate::motion::MotionLimits;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default per-channel cooldown between a stop and the next start event
pub const DEFAULT_COOLDOWN_MS: u32 = 65;

/// Spin-speed value meaning "definitely not a point turn".
///
/// Slightly negative rather than zero so the engine can tell it apart from
/// a point turn at exactly zero speed.
pub const NOT_SPINNING_VALUE: f32 = -0.01;

/// Event and parameter addressing for one procedural motion channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSounds {
    /// Posted when the channel starts moving
    pub start_event: AudioEventId,
    /// Posted when the channel stops moving
    pub stop_event: AudioEventId,
    /// Continuous normalized-speed parameter
    pub speed_parameter: ParameterId,
    /// Continuous normalized-acceleration parameter
    pub accel_parameter: ParameterId,
}

/// Behavior tuning for one procedural motion channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelTuning {
    /// Disabled channels tick as pure no-ops
    pub enabled: bool,
    /// Cooldown window after a stop event, in milliseconds
    pub cooldown_ms: u32,
}

impl Default for ChannelTuning {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
        }
    }
}

/// Addressing plus tuning for one procedural motion channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelConfig {
    /// Event/parameter addressing
    pub sounds: ChannelSounds,
    /// Behavior tuning
    pub tuning: ChannelTuning,
}

/// Configuration for the procedural motion state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProceduralConfig {
    /// Actor all procedural commands are addressed to
    pub actor: ActorId,
    /// Tread channel
    pub tread: ChannelConfig,
    /// Head channel
    pub head: ChannelConfig,
    /// Lift channel
    pub lift: ChannelConfig,
    /// Tread-only spin-speed parameter (point-turn signal)
    pub spin_parameter: ParameterId,
    /// Spin value pushed while not point-turning
    pub not_spinning_value: f32,
    /// Normalization maximums and movement thresholds
    pub limits: MotionLimits,
}

impl ProceduralConfig {
    /// Build a config with production default tuning: tread enabled, head
    /// and lift disabled, all cooldowns at [`DEFAULT_COOLDOWN_MS`]
    pub fn new(
        actor: ActorId,
        tread: ChannelSounds,
        head: ChannelSounds,
        lift: ChannelSounds,
        spin_parameter: ParameterId,
    ) -> Self {
        Self {
            actor,
            tread: ChannelConfig {
                sounds: tread,
                tuning: ChannelTuning::default(),
            },
            head: ChannelConfig {
                sounds: head,
                tuning: ChannelTuning {
                    enabled: false,
                    ..Default::default()
                },
            },
            lift: ChannelConfig {
                sounds: lift,
                tuning: ChannelTuning {
                    enabled: false,
                    ..Default::default()
                },
            },
            spin_parameter,
            not_spinning_value: NOT_SPINNING_VALUE,
            limits: MotionLimits::default(),
        }
    }
}

/// Configuration for the keyframe playback dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimationSoundConfig {
    /// Actor animation-level commands (the abort event) are addressed to
    pub actor: ActorId,
    /// Fixed event posted by an animation abort
    pub abort_event: AudioEventId,
    /// Per-event volume parameter, scoped to a playing id
    pub volume_parameter: ParameterId,
}

/// Configuration for the optional motion CSV log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotionLogConfig {
    /// Whether the host should create the log at all
    pub enabled: bool,
    /// Destination file, truncated on creation
    pub path: PathBuf,
    /// Rows buffered between flushes
    pub buffer_rows: usize,
}

impl Default for MotionLogConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: PathBuf::from("/tmp/treadtone_motion_log.csv"),
            buffer_rows: 30,
        }
    }
}
