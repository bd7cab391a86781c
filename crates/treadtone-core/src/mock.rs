//! Recording mock of the audio engine for tests.
//!
//! Captures every command, hands out sequential playing ids, and lets a test
//! drive completion outcomes by hand. Compiled for this crate's own tests
//! and, behind the `mock-audio` feature, for downstream test suites.

use crate::engine::{AudioEngine, CompletionSink, EventCompletion, EventOutcome};
use crate::ids::{
    ActorId, AudioEventId, CurveShape, ParameterId, PlayingId, StateGroupId, StateId,
    SwitchGroupId, SwitchId,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

/// One recorded engine command
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    /// `post_event` was called
    PostEvent {
        /// Posted event
        event: AudioEventId,
        /// Target actor
        actor: ActorId,
        /// Id handed back to the caller
        playing: PlayingId,
        /// Whether a completion sink was registered
        has_sink: bool,
    },
    /// `set_parameter` was called
    SetParameter {
        /// Parameter moved
        parameter: ParameterId,
        /// Target value
        value: f32,
        /// Target actor
        actor: ActorId,
        /// Ramp duration
        ramp_ms: u32,
        /// Ramp curve
        curve: CurveShape,
    },
    /// `set_event_parameter` was called
    SetEventParameter {
        /// Parameter moved
        parameter: ParameterId,
        /// Target value
        value: f32,
        /// Scoping playing id
        playing: PlayingId,
    },
    /// `set_state` was called
    SetState {
        /// State group
        group: StateGroupId,
        /// Selected state
        state: StateId,
    },
    /// `set_switch` was called
    SetSwitch {
        /// Switch group
        group: SwitchGroupId,
        /// Selected switch
        switch: SwitchId,
        /// Target actor
        actor: ActorId,
    },
}

/// Recording engine double
#[derive(Debug, Default)]
pub struct MockEngine {
    next_playing: AtomicU32,
    fail_posts: AtomicBool,
    calls: Mutex<Vec<EngineCall>>,
    sinks: Mutex<Vec<(PlayingId, CompletionSink)>>,
}

impl MockEngine {
    /// Create a mock whose first post returns `PlayingId(1)`
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent posts fail, returning [`PlayingId::INVALID`]
    pub fn set_fail_posts(&self, fail: bool) {
        self.fail_posts.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of every recorded command, in call order
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.lock().clone()
    }

    /// Drain the recorded commands
    pub fn take_calls(&self) -> Vec<EngineCall> {
        std::mem::take(&mut self.calls.lock())
    }

    /// Playing ids posted with a sink whose outcome has not been driven yet
    pub fn pending_completions(&self) -> Vec<PlayingId> {
        self.sinks.lock().iter().map(|(id, _)| *id).collect()
    }

    /// Deliver an outcome for one posted event.
    ///
    /// Terminal outcomes consume the sink; interim ones leave it registered,
    /// matching an engine that later still reports completion. Returns false
    /// if no sink is registered for `playing`.
    pub fn complete(&self, playing: PlayingId, outcome: EventOutcome) -> bool {
        let mut sinks = self.sinks.lock();
        let Some(idx) = sinks.iter().position(|(id, _)| *id == playing) else {
            return false;
        };
        if outcome.is_terminal() {
            let (_, sink) = sinks.remove(idx);
            sink.send(EventCompletion { playing, outcome });
        } else {
            sinks[idx].1.send(EventCompletion { playing, outcome });
        }
        true
    }

    /// Deliver `outcome` for every pending event
    pub fn complete_all(&self, outcome: EventOutcome) {
        for playing in self.pending_completions() {
            self.complete(playing, outcome);
        }
    }

    fn record(&self, call: EngineCall) {
        self.calls.lock().push(call);
    }
}

impl AudioEngine for MockEngine {
    fn post_event(
        &self,
        event: AudioEventId,
        actor: ActorId,
        completion: Option<CompletionSink>,
    ) -> PlayingId {
        let playing = if self.fail_posts.load(Ordering::SeqCst) {
            PlayingId::INVALID
        } else {
            PlayingId(self.next_playing.fetch_add(1, Ordering::SeqCst) + 1)
        };
        if playing.is_valid() {
            if let Some(sink) = &completion {
                self.sinks.lock().push((playing, sink.clone()));
            }
        }
        self.record(EngineCall::PostEvent {
            event,
            actor,
            playing,
            has_sink: completion.is_some(),
        });
        playing
    }

    fn set_parameter(
        &self,
        parameter: ParameterId,
        value: f32,
        actor: ActorId,
        ramp_ms: u32,
        curve: CurveShape,
    ) -> bool {
        self.record(EngineCall::SetParameter {
            parameter,
            value,
            actor,
            ramp_ms,
            curve,
        });
        true
    }

    fn set_event_parameter(&self, parameter: ParameterId, value: f32, playing: PlayingId) -> bool {
        self.record(EngineCall::SetEventParameter {
            parameter,
            value,
            playing,
        });
        true
    }

    fn set_state(&self, group: StateGroupId, state: StateId) {
        self.record(EngineCall::SetState { group, state });
    }

    fn set_switch(&self, group: SwitchGroupId, switch: SwitchId, actor: ActorId) {
        self.record(EngineCall::SetSwitch {
            group,
            switch,
            actor,
        });
    }
}
