//! TreadTone Client - Animation and Procedural Audio Decision Layer
//!
//! The two clients that sit between the robot and the audio mixing engine:
//!
//! - [`animation`] - dispatches a key frame's audio directives at playback
//!   time and tracks outstanding event lifetimes across completions
//! - [`procedural`] - turns differentiated motion telemetry into start/stop
//!   events and continuous parameter updates, with per-channel cooldown
//!   hysteresis to avoid start/stop chatter
//! - [`motion_log`] - optional CSV log of every computed motion frame
//!
//! Both clients treat a missing audio engine as a safe no-op and never let
//! an audio failure interrupt animation playback or telemetry processing.

#![allow(missing_docs)]

pub mod animation;
pub mod error;
pub mod motion_log;
pub mod procedural;

pub use animation::AnimationAudioClient;
pub use error::{ClientError, Result};
pub use motion_log::MotionLog;
pub use procedural::{step_channel, ChannelStage, ChannelStep, ProceduralAudioClient};
