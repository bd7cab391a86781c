//! Addressing newtypes for the audio engine command surface.
//!
//! All ids are opaque handles agreed with the audio engine's sound banks.
//! They are plain integers on the wire, so everything here is `Copy` and
//! serde-friendly for animation/tuning files.

use serde::{Deserialize, Serialize};

/// Identifies a playable audio event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioEventId(pub u32);

/// Identifies a continuous audio parameter (RTPC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterId(pub u32);

/// Identifies a discrete state group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateGroupId(pub u32);

/// Identifies a state within a state group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateId(pub u32);

/// Identifies a per-actor switch group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwitchGroupId(pub u32);

/// Identifies a switch within a switch group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SwitchId(pub u32);

/// Identifies a virtual sound-emitting object the engine routes commands to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

/// Opaque handle for one in-flight posted event
///
/// Returned by [`crate::AudioEngine::post_event`] and used to correlate
/// completion notifications and per-event parameter changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayingId(pub u32);

impl PlayingId {
    /// Sentinel returned when no event was actually posted
    pub const INVALID: PlayingId = PlayingId(0);

    /// Whether this id refers to a real posted event
    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

/// Interpolation shape for a ramped parameter change
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveShape {
    /// Straight-line interpolation
    #[default]
    Linear,
    /// Slow start, slow end
    SCurve,
    /// Slow start, fast end
    Exponential,
    /// Fast start, slow end
    Logarithmic,
}
