//! Keyframe playback dispatcher.
//!
//! When animation playback reaches a key frame, this client walks the
//! frame's directive list and issues the matching engine commands. Posted
//! events are tracked in an active set until the engine reports a terminal
//! outcome, so the host can tell whether animation audio is still sounding.
//!
//! Completions arrive on a channel and are reconciled by
//! [`AnimationAudioClient::process_completions`], called from the playback
//! thread's own loop. The active set itself still sits behind a lock because
//! [`AnimationAudioClient::has_active_events`] may be polled from another
//! thread (diagnostics, teardown checks).

use parking_lot::Mutex;
use rand::RngCore;
use std::collections::HashSet;
use std::sync::Arc;
use treadtone_core::{
    ActorId, AnimationSoundConfig, AudioDirective, AudioEngine, AudioEventId, CompletionReceiver,
    CompletionSink, DirectiveList, EventGroup, EventOutcome, PlayingId,
};

/// Dispatches key-frame audio directives and tracks in-flight events.
///
/// A `None` engine makes every operation a safe no-op returning
/// [`PlayingId::INVALID`], so the client can exist before the engine is up.
pub struct AnimationAudioClient {
    engine: Option<Arc<dyn AudioEngine>>,
    config: AnimationSoundConfig,
    active_events: Mutex<HashSet<PlayingId>>,
    completion_sink: CompletionSink,
    completions: CompletionReceiver,
}

impl AnimationAudioClient {
    /// Create a dispatcher for the given engine and addressing config
    pub fn new(engine: Option<Arc<dyn AudioEngine>>, config: AnimationSoundConfig) -> Self {
        let (completion_sink, completions) = CompletionSink::channel();
        Self {
            engine,
            config,
            active_events: Mutex::new(HashSet::new()),
            completion_sink,
            completions,
        }
    }

    /// Start a new animation: clear events left over from the previous one.
    /// Idempotent when the set is already empty.
    pub fn begin_animation(&self) {
        self.active_events.lock().clear();
    }

    /// Dispatch one key frame's directives in list order.
    ///
    /// Event groups select an entry by probability; chance choosing silence
    /// is normal and skips the group. Everything else forwards straight to
    /// the engine.
    pub fn play_directives(&self, directives: &DirectiveList, mut rng: Option<&mut dyn RngCore>) {
        for directive in directives {
            match directive {
                AudioDirective::EventGroup(group) => {
                    self.handle_event_group(group, rng.as_deref_mut());
                }
                AudioDirective::State(state) => {
                    if let Some(engine) = &self.engine {
                        engine.set_state(state.group, state.state);
                    }
                }
                AudioDirective::Switch(switch) => {
                    if let Some(engine) = &self.engine {
                        engine.set_switch(switch.group, switch.switch, switch.actor);
                    }
                }
                AudioDirective::Parameter(param) => {
                    if let Some(engine) = &self.engine {
                        engine.set_parameter(
                            param.parameter,
                            param.value,
                            param.actor,
                            param.ramp_ms,
                            param.curve,
                        );
                    }
                }
            }
        }
    }

    /// Post the fixed abort event. Best effort: already-posted events keep
    /// their completions coming and reconcile through the active set as
    /// usual, so no bookkeeping happens here.
    pub fn abort_animation(&self) {
        let Some(engine) = &self.engine else {
            return;
        };
        engine.post_event(self.config.abort_event, self.config.actor, None);
    }

    /// Whether any posted event has not yet reached a terminal outcome
    pub fn has_active_events(&self) -> bool {
        !self.active_events.lock().is_empty()
    }

    /// Drain pending completion notifications and reconcile the active set.
    ///
    /// Call from the playback thread's loop. An errored event is a
    /// diagnostic, never a playback failure; interim notifications are
    /// tolerated and ignored.
    pub fn process_completions(&self) {
        while let Ok(completion) = self.completions.try_recv() {
            match completion.outcome {
                EventOutcome::Completed => {
                    tracing::debug!(playing = completion.playing.0, "audio event completed");
                    self.remove_active_event(completion.playing);
                }
                EventOutcome::Errored => {
                    tracing::warn!(playing = completion.playing.0, "audio event errored");
                    self.remove_active_event(completion.playing);
                }
                EventOutcome::Duration | EventOutcome::Marker => {
                    tracing::warn!(
                        playing = completion.playing.0,
                        outcome = ?completion.outcome,
                        "unexpected interim audio callback"
                    );
                }
            }
        }
    }

    fn handle_event_group(&self, group: &EventGroup, rng: Option<&mut (dyn RngCore + '_)>) {
        let entry = match group.select(true, rng) {
            Ok(Some(entry)) => *entry,
            Ok(None) => return, // chance chose silence
            Err(err) => {
                tracing::warn!("skipping audio event group: {err}");
                return;
            }
        };

        let playing = self.post_tracked_event(entry.event, group.actor);
        if playing.is_valid() {
            if let Some(engine) = &self.engine {
                engine.set_event_parameter(self.config.volume_parameter, entry.volume, playing);
            }
        }
    }

    fn post_tracked_event(&self, event: AudioEventId, actor: ActorId) -> PlayingId {
        let Some(engine) = &self.engine else {
            return PlayingId::INVALID;
        };
        let playing = engine.post_event(event, actor, Some(self.completion_sink.clone()));
        if playing.is_valid() {
            self.active_events.lock().insert(playing);
        }
        playing
    }

    fn remove_active_event(&self, playing: PlayingId) {
        self.active_events.lock().remove(&playing);
    }
}
