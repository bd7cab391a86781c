//! Procedural motion state machine.
//!
//! Runs once per telemetry tick on the control thread. Each motion channel
//! (tread, head, lift) owns a small hysteresis machine that decides when to
//! post loop start/stop events and when to push the normalized motion
//! parameters, with a cooldown window after every stop so that jittery
//! motion cannot produce start/stop event storms.

use crate::motion_log::MotionLog;
use std::sync::Arc;
use treadtone_core::{
    ActorId, AudioEngine, ChannelConfig, CurveShape, MotionFrame, MotionSample, ProceduralConfig,
};

/// Hysteresis state of one motion channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChannelStage {
    /// Not sounding; a start may begin immediately or via cooldown deferral
    #[default]
    Stopped,
    /// Motion began inside the cooldown window; waiting it out.
    ///
    /// Note there is no exit for motion stopping while pending: the channel
    /// stays here until motion resumes after the cooldown. This avoids a
    /// spurious stop event for a start that never audibly began.
    PendingStart,
    /// Loop event playing, parameters pushed every tick
    Started,
}

/// Result of stepping a channel machine for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelStep {
    /// State for the next tick
    pub next: ChannelStage,
    /// Whether the state changed this tick
    pub transitioned: bool,
    /// Whether to push the channel's continuous parameters this tick
    pub push_params: bool,
}

/// Advance one channel's hysteresis machine.
///
/// Pure function of (stage, isMoving, inCooldown); the caller owns the
/// side effects (events, parameter pushes, cooldown stamping).
pub fn step_channel(stage: ChannelStage, is_moving: bool, in_cooldown: bool) -> ChannelStep {
    match stage {
        ChannelStage::Stopped => {
            if is_moving {
                if in_cooldown {
                    ChannelStep {
                        next: ChannelStage::PendingStart,
                        transitioned: true,
                        push_params: false,
                    }
                } else {
                    ChannelStep {
                        next: ChannelStage::Started,
                        transitioned: true,
                        push_params: true,
                    }
                }
            } else {
                ChannelStep {
                    next: ChannelStage::Stopped,
                    transitioned: false,
                    push_params: false,
                }
            }
        }
        ChannelStage::PendingStart => {
            if is_moving && !in_cooldown {
                ChannelStep {
                    next: ChannelStage::Started,
                    transitioned: true,
                    push_params: true,
                }
            } else {
                ChannelStep {
                    next: ChannelStage::PendingStart,
                    transitioned: false,
                    push_params: false,
                }
            }
        }
        ChannelStage::Started => {
            if is_moving {
                ChannelStep {
                    next: ChannelStage::Started,
                    transitioned: false,
                    push_params: true,
                }
            } else {
                // Parameters are still pushed on the stop tick, then reset
                ChannelStep {
                    next: ChannelStage::Stopped,
                    transitioned: true,
                    push_params: true,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ChannelState {
    stage: ChannelStage,
    cooldown_expires_ms: u32,
}

/// Converts motion telemetry into procedural audio commands.
///
/// Holds two motion frames in a double buffer; every sample overwrites the
/// older one. Processing is suppressed until the telemetry source signals
/// the motors are settled, so init jitter never reaches the engine.
pub struct ProceduralAudioClient {
    engine: Option<Arc<dyn AudioEngine>>,
    config: ProceduralConfig,
    frames: [MotionFrame; 2],
    current: usize,
    active: bool,
    tread: ChannelState,
    head: ChannelState,
    lift: ChannelState,
    motion_log: Option<MotionLog>,
}

impl ProceduralAudioClient {
    /// Create a client; inactive until [`ProceduralAudioClient::motors_settled`]
    pub fn new(engine: Option<Arc<dyn AudioEngine>>, config: ProceduralConfig) -> Self {
        Self {
            engine,
            config,
            frames: [MotionFrame::default(); 2],
            current: 0,
            active: false,
            tread: ChannelState::default(),
            head: ChannelState::default(),
            lift: ChannelState::default(),
            motion_log: None,
        }
    }

    /// Attach a motion CSV log fed with every computed frame
    pub fn attach_motion_log(&mut self, log: MotionLog) {
        self.motion_log = Some(log);
    }

    /// The robot's actuators are in a known state; start producing audio.
    /// Frames received before this only prime the differentiation buffers.
    pub fn motors_settled(&mut self) {
        self.active = true;
    }

    /// Whether channel processing is currently running
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Consume one telemetry sample: differentiate against the previous
    /// frame, then run each enabled channel's machine.
    pub fn process_sample(&mut self, sample: MotionSample) {
        let previous = self.frames[self.current];
        self.current = (self.current + 1) % self.frames.len();
        self.frames[self.current].update(sample);

        if let Err(err) = self.frames[self.current].compute_values(&previous) {
            tracing::warn!("skipping procedural audio tick: {err}");
            return;
        }
        let frame = self.frames[self.current];

        if self.active {
            if let Some(engine) = self.engine.clone() {
                self.update_head(&engine, &frame);
                self.update_lift(&engine, &frame);
                self.update_tread(&engine, &frame);
            }
        }

        if let Some(log) = &mut self.motion_log {
            log.write_frame(&frame);
        }
    }

    fn update_head(&mut self, engine: &Arc<dyn AudioEngine>, frame: &MotionFrame) {
        let limits = self.config.limits;
        Self::update_simple_channel(
            engine,
            &mut self.head,
            &self.config.head,
            self.config.actor,
            frame.sample.timestamp_ms,
            frame.is_head_moving(&limits),
            frame.normalized_head_speed(&limits),
            frame.normalized_head_accel(&limits),
        );
    }

    fn update_lift(&mut self, engine: &Arc<dyn AudioEngine>, frame: &MotionFrame) {
        let limits = self.config.limits;
        Self::update_simple_channel(
            engine,
            &mut self.lift,
            &self.config.lift,
            self.config.actor,
            frame.sample.timestamp_ms,
            frame.is_lift_moving(&limits),
            frame.normalized_lift_speed(&limits),
            frame.normalized_lift_accel(&limits),
        );
    }

    /// Head and lift channels: speed + acceleration parameters only.
    #[allow(clippy::too_many_arguments)]
    fn update_simple_channel(
        engine: &Arc<dyn AudioEngine>,
        state: &mut ChannelState,
        cfg: &ChannelConfig,
        actor: ActorId,
        now_ms: u32,
        is_moving: bool,
        speed: f32,
        accel: f32,
    ) {
        if !cfg.tuning.enabled {
            return;
        }

        let in_cooldown = now_ms < state.cooldown_expires_ms;
        let step = step_channel(state.stage, is_moving, in_cooldown);
        state.stage = step.next;

        let mut event = None;
        if step.transitioned {
            match step.next {
                ChannelStage::Started => {
                    tracing::trace!(event = cfg.sounds.start_event.0, "channel start");
                    event = Some(cfg.sounds.start_event);
                }
                ChannelStage::Stopped => {
                    tracing::trace!(event = cfg.sounds.stop_event.0, "channel stop");
                    event = Some(cfg.sounds.stop_event);
                    state.cooldown_expires_ms = now_ms.saturating_add(cfg.tuning.cooldown_ms);
                }
                ChannelStage::PendingStart => {}
            }
        }

        if step.push_params {
            engine.set_parameter(cfg.sounds.speed_parameter, speed, actor, 0, CurveShape::Linear);
            engine.set_parameter(cfg.sounds.accel_parameter, accel, actor, 0, CurveShape::Linear);
        }

        if let Some(event) = event {
            engine.post_event(event, actor, None);
            if step.next == ChannelStage::Stopped {
                // Rest values after the stop event, not merely last-pushed
                engine.set_parameter(cfg.sounds.speed_parameter, 0.0, actor, 0, CurveShape::Linear);
                engine.set_parameter(cfg.sounds.accel_parameter, 0.0, actor, 0, CurveShape::Linear);
            }
        }
    }

    /// Tread channel: speed + acceleration + the point-turn spin signal.
    fn update_tread(&mut self, engine: &Arc<dyn AudioEngine>, frame: &MotionFrame) {
        let cfg = &self.config.tread;
        if !cfg.tuning.enabled {
            return;
        }
        let limits = &self.config.limits;
        let actor = self.config.actor;
        let now_ms = frame.sample.timestamp_ms;

        let in_cooldown = now_ms < self.tread.cooldown_expires_ms;
        let step = step_channel(self.tread.stage, frame.is_tread_moving(limits), in_cooldown);
        self.tread.stage = step.next;

        let mut event = None;
        if step.transitioned {
            match step.next {
                ChannelStage::Started => {
                    tracing::trace!(event = cfg.sounds.start_event.0, "tread start");
                    event = Some(cfg.sounds.start_event);
                }
                ChannelStage::Stopped => {
                    tracing::trace!(event = cfg.sounds.stop_event.0, "tread stop");
                    event = Some(cfg.sounds.stop_event);
                    self.tread.cooldown_expires_ms = now_ms.saturating_add(cfg.tuning.cooldown_ms);
                }
                ChannelStage::PendingStart => {}
            }
        }

        if step.push_params {
            let spin = if Self::is_point_turn(frame) {
                frame.normalized_turn_speed(limits)
            } else {
                self.config.not_spinning_value
            };
            engine.set_parameter(
                cfg.sounds.speed_parameter,
                frame.normalized_tread_speed(limits),
                actor,
                0,
                CurveShape::Linear,
            );
            engine.set_parameter(
                cfg.sounds.accel_parameter,
                frame.normalized_tread_accel(limits),
                actor,
                0,
                CurveShape::Linear,
            );
            engine.set_parameter(self.config.spin_parameter, spin, actor, 0, CurveShape::Linear);
        }

        if let Some(event) = event {
            engine.post_event(event, actor, None);
            if step.next == ChannelStage::Stopped {
                engine.set_parameter(cfg.sounds.speed_parameter, 0.0, actor, 0, CurveShape::Linear);
                engine.set_parameter(cfg.sounds.accel_parameter, 0.0, actor, 0, CurveShape::Linear);
                engine.set_parameter(
                    self.config.spin_parameter,
                    self.config.not_spinning_value,
                    actor,
                    0,
                    CurveShape::Linear,
                );
            }
        }
    }

    /// A point turn drives the wheels against each other harder than either
    /// moves forward or back alone.
    fn is_point_turn(frame: &MotionFrame) -> bool {
        let turn_abs = frame.turn_speed_mmps.abs();
        let max_wheel = frame
            .sample
            .left_tread_speed_mmps
            .max(frame.sample.right_tread_speed_mmps);
        let min_wheel = frame
            .sample
            .left_tread_speed_mmps
            .min(frame.sample.right_tread_speed_mmps);
        turn_abs > max_wheel && turn_abs > min_wheel.abs()
    }
}
