//! Audio engine collaborator interface.
//!
//! The mixing engine itself lives outside this workspace; the clients only
//! need the narrow command surface below plus a way to learn that a posted
//! event reached a terminal outcome.
//!
//! Completions are marshaled back to the posting thread through a channel:
//! the engine sends into the [`CompletionSink`] it was handed at post time,
//! and the owning client drains its [`CompletionReceiver`] from its own tick
//! loop. The engine never runs client code on its internal worker threads.

use crate::ids::{
    ActorId, AudioEventId, CurveShape, ParameterId, PlayingId, StateGroupId, StateId,
    SwitchGroupId, SwitchId,
};
use crossbeam_channel::{Receiver, Sender};

/// Outcome reported for a posted event.
///
/// Engines deliver exactly one terminal outcome (`Completed` or `Errored`)
/// per posted event that carried a sink. `Duration` and `Marker` are interim
/// notifications some engines emit anyway; receivers must tolerate them
/// without treating them as terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event finished playing normally
    Completed,
    /// The event failed inside the engine
    Errored,
    /// Interim duration notification, not terminal
    Duration,
    /// Interim marker notification, not terminal
    Marker,
}

impl EventOutcome {
    /// Whether this outcome ends the event's lifetime
    pub fn is_terminal(self) -> bool {
        matches!(self, EventOutcome::Completed | EventOutcome::Errored)
    }
}

/// One completion notification for a posted event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventCompletion {
    /// The event instance this notification refers to
    pub playing: PlayingId,
    /// What happened to it
    pub outcome: EventOutcome,
}

/// Receiving end drained by the client that posted the events
pub type CompletionReceiver = Receiver<EventCompletion>;

/// Cloneable handle the engine uses to report event completions.
///
/// Sending never blocks. A disconnected receiver means the posting client is
/// gone and there is nothing left to reconcile, so the notification is
/// silently dropped.
#[derive(Debug, Clone)]
pub struct CompletionSink {
    tx: Sender<EventCompletion>,
}

impl CompletionSink {
    /// Build a sink plus the receiver its notifications arrive on
    pub fn channel() -> (Self, CompletionReceiver) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }

    /// Report a completion
    pub fn send(&self, completion: EventCompletion) {
        let _ = self.tx.send(completion);
    }
}

/// Command surface of the external audio mixing engine.
///
/// Implementations must return [`PlayingId::INVALID`] from
/// [`AudioEngine::post_event`] when the event could not be posted, and must
/// deliver exactly one terminal [`EventCompletion`] into the sink (when one
/// was supplied) for every event posted with a valid id.
pub trait AudioEngine: Send + Sync {
    /// Post `event` against `actor`; `completion` receives the terminal
    /// outcome for the returned playing id
    fn post_event(
        &self,
        event: AudioEventId,
        actor: ActorId,
        completion: Option<CompletionSink>,
    ) -> PlayingId;

    /// Move a continuous parameter on an actor, optionally ramped over
    /// `ramp_ms` with the given curve. Returns false if the engine rejected
    /// the change.
    fn set_parameter(
        &self,
        parameter: ParameterId,
        value: f32,
        actor: ActorId,
        ramp_ms: u32,
        curve: CurveShape,
    ) -> bool;

    /// Move a continuous parameter scoped to a single playing event
    fn set_event_parameter(&self, parameter: ParameterId, value: f32, playing: PlayingId) -> bool;

    /// Set a discrete named state
    fn set_state(&self, group: StateGroupId, state: StateId);

    /// Set a discrete per-actor switch
    fn set_switch(&self, group: SwitchGroupId, switch: SwitchId, actor: ActorId);
}
