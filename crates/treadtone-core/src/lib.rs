//! TreadTone Core - Domain Model and Motion Math
//!
//! This crate contains the data model shared by the TreadTone audio clients:
//! - Audio directive model (event groups, states, switches, parameters)
//! - Addressing newtypes for the audio engine command surface
//! - The audio engine collaborator trait and completion plumbing
//! - Motion telemetry differentiation (speeds, accelerations, movement flags)
//! - Tuning/configuration structs with production default values

#![warn(missing_docs)]

use thiserror::Error;

pub mod config;
pub mod directive;
pub mod engine;
pub mod ids;
pub mod motion;

#[cfg(any(test, feature = "mock-audio"))]
pub mod mock;

pub use config::{
    AnimationSoundConfig, ChannelConfig, ChannelSounds, ChannelTuning, MotionLogConfig,
    ProceduralConfig,
};
pub use directive::{
    AudioDirective, DirectiveList, EventDef, EventGroup, ParameterChange, StateChange,
    SwitchChange,
};
pub use engine::{AudioEngine, CompletionReceiver, CompletionSink, EventCompletion, EventOutcome};
pub use ids::{
    ActorId, AudioEventId, CurveShape, ParameterId, PlayingId, StateGroupId, StateId,
    SwitchGroupId, SwitchId,
};
pub use motion::{MotionFrame, MotionLimits, MotionSample};

/// Core error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// An event group with no entries was asked to select one
    #[error("event group has no entries")]
    EmptyEventGroup,

    /// Telemetry timestamps must be strictly increasing between frames
    #[error("non-monotonic telemetry timestamp: {current_ms}ms follows {previous_ms}ms")]
    NonMonotonicTimestamp {
        /// Timestamp of the previous frame
        previous_ms: u32,
        /// Timestamp of the offending frame
        current_ms: u32,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
