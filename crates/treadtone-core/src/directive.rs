//! Audio directive model.
//!
//! A key frame in a canned animation carries an ordered list of audio
//! directives: play one event out of a weighted group, set a state or a
//! switch, or move a continuous parameter. These types are immutable once a
//! key frame has been loaded; the clients only read them at playback time.

use crate::ids::{
    ActorId, AudioEventId, CurveShape, ParameterId, StateGroupId, StateId, SwitchGroupId, SwitchId,
};
use crate::{CoreError, Result};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Probabilities below this are treated as "never plays" and skipped
/// when accumulating selection ranges.
pub const PROBABILITY_EPSILON: f32 = 1e-5;

/// One candidate event inside an [`EventGroup`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventDef {
    /// Event to post if this entry is selected
    pub event: AudioEventId,
    /// Per-event volume, applied to the returned playing id
    pub volume: f32,
    /// Selection weight in `[0, 1]`
    pub probability: f32,
}

/// A probability-weighted group of candidate events for one key frame
///
/// Probabilities are not validated to sum to 1; a sum below 1 means the
/// group may legitimately choose to play nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventGroup {
    /// Actor the selected event is posted against
    pub actor: ActorId,
    /// Candidate events, in authored order
    pub events: Vec<EventDef>,
}

impl EventGroup {
    /// Create an empty group targeting `actor`
    pub fn new(actor: ActorId) -> Self {
        Self {
            actor,
            events: Vec::new(),
        }
    }

    /// Append a candidate event
    pub fn add_event(&mut self, event: AudioEventId, volume: f32, probability: f32) {
        self.events.push(EventDef {
            event,
            volume,
            probability,
        });
    }

    /// Select an entry to play.
    ///
    /// An empty group is a logic error. Without `use_probability` or without
    /// an rng the first entry is returned deterministically (authoring and
    /// preview contexts). Otherwise a uniform draw from `[0, 1)` picks an
    /// entry by cumulative range; `Ok(None)` means chance chose silence,
    /// which is an intended outcome when probabilities sum below 1.
    pub fn select(
        &self,
        use_probability: bool,
        rng: Option<&mut (dyn RngCore + '_)>,
    ) -> Result<Option<&EventDef>> {
        if self.events.is_empty() {
            return Err(CoreError::EmptyEventGroup);
        }

        let rng = match (use_probability, rng) {
            (true, Some(rng)) => rng,
            _ => return Ok(Some(&self.events[0])),
        };

        let draw: f32 = rng.random_range(0.0..1.0);
        Ok(self.select_with_draw(draw))
    }

    /// Pure selection kernel: map a uniform draw from `[0, 1)` onto the
    /// cumulative probability ranges of the entries.
    ///
    /// Entries with ~0 probability occupy no range. Reordering entries moves
    /// the physical ranges around but leaves each entry's selection
    /// probability unchanged in expectation.
    pub fn select_with_draw(&self, draw: f32) -> Option<&EventDef> {
        let mut range_min = 0.0f32;
        for entry in &self.events {
            if entry.probability.abs() < PROBABILITY_EPSILON {
                continue;
            }
            let range_max = range_min + entry.probability;
            if draw >= range_min && draw < range_max {
                return Some(entry);
            }
            range_min = range_max;
        }
        // Probabilities summed below 1 and the draw landed past the end
        None
    }
}

/// Sets a discrete named state on the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateChange {
    /// State group to change
    pub group: StateGroupId,
    /// State to select within the group
    pub state: StateId,
}

/// Sets a discrete per-actor switch on the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwitchChange {
    /// Switch group to change
    pub group: SwitchGroupId,
    /// Switch to select within the group
    pub switch: SwitchId,
    /// Actor the switch applies to
    pub actor: ActorId,
}

/// Moves a continuous parameter toward a value over time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterChange {
    /// Parameter to move
    pub parameter: ParameterId,
    /// Target value
    pub value: f32,
    /// Actor the parameter applies to
    pub actor: ActorId,
    /// Ramp duration in milliseconds (0 = immediate)
    pub ramp_ms: u32,
    /// Ramp interpolation shape
    pub curve: CurveShape,
}

/// One audio instruction extracted from an animation key frame
///
/// A closed sum type: exactly one variant is ever active, there is no empty
/// variant, and equality compares the tag plus the active payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AudioDirective {
    /// Play one event of a weighted group
    EventGroup(EventGroup),
    /// Set a discrete state
    State(StateChange),
    /// Set a discrete per-actor switch
    Switch(SwitchChange),
    /// Move a continuous parameter
    Parameter(ParameterChange),
}

impl AudioDirective {
    /// Whether this directive posts an event (as opposed to setting
    /// state/switch/parameter values)
    pub fn is_event_group(&self) -> bool {
        matches!(self, AudioDirective::EventGroup(_))
    }
}

/// Ordered directive list for one key frame.
///
/// `push` keeps states, switches and parameters ahead of event groups so
/// that a frame's engine values are always applied before its events fire,
/// regardless of authoring order. Relative order within each class is
/// preserved. If the same state, switch or parameter appears more than once
/// on a single frame, the last one wins at the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectiveList {
    directives: Vec<AudioDirective>,
}

impl DirectiveList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directive, keeping non-events ahead of event groups
    pub fn push(&mut self, directive: AudioDirective) {
        if directive.is_event_group() {
            self.directives.push(directive);
        } else {
            let insert_at = self
                .directives
                .iter()
                .position(AudioDirective::is_event_group)
                .unwrap_or(self.directives.len());
            self.directives.insert(insert_at, directive);
        }
    }

    /// Iterate directives in dispatch order
    pub fn iter(&self) -> std::slice::Iter<'_, AudioDirective> {
        self.directives.iter()
    }

    /// Number of directives
    pub fn len(&self) -> usize {
        self.directives.len()
    }

    /// Whether the list holds no directives
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }
}

impl FromIterator<AudioDirective> for DirectiveList {
    fn from_iter<I: IntoIterator<Item = AudioDirective>>(iter: I) -> Self {
        let mut list = Self::new();
        for directive in iter {
            list.push(directive);
        }
        list
    }
}

impl<'a> IntoIterator for &'a DirectiveList {
    type Item = &'a AudioDirective;
    type IntoIter = std::slice::Iter<'a, AudioDirective>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(probabilities: &[f32]) -> EventGroup {
        let mut group = EventGroup::new(ActorId(7));
        for (idx, &p) in probabilities.iter().enumerate() {
            group.add_event(AudioEventId(100 + idx as u32), 1.0, p);
        }
        group
    }

    #[test]
    fn empty_group_selection_is_an_error() {
        let group = EventGroup::new(ActorId(1));
        assert_eq!(group.select(true, None), Err(CoreError::EmptyEventGroup));
    }

    #[test]
    fn no_probability_returns_first_entry() {
        let group = group(&[0.1, 0.9]);
        let entry = group.select(false, None).unwrap().unwrap();
        assert_eq!(entry.event, AudioEventId(100));
        // No rng supplied behaves the same even with use_probability set
        let entry = group.select(true, None).unwrap().unwrap();
        assert_eq!(entry.event, AudioEventId(100));
    }

    #[test]
    fn draw_maps_onto_cumulative_ranges() {
        let group = group(&[0.2, 0.3, 0.5]);
        assert_eq!(group.select_with_draw(0.0).unwrap().event, AudioEventId(100));
        assert_eq!(
            group.select_with_draw(0.19).unwrap().event,
            AudioEventId(100)
        );
        assert_eq!(group.select_with_draw(0.2).unwrap().event, AudioEventId(101));
        assert_eq!(
            group.select_with_draw(0.499).unwrap().event,
            AudioEventId(101)
        );
        assert_eq!(group.select_with_draw(0.5).unwrap().event, AudioEventId(102));
        assert_eq!(
            group.select_with_draw(0.999).unwrap().event,
            AudioEventId(102)
        );
    }

    #[test]
    fn zero_probability_entries_occupy_no_range() {
        let group = group(&[0.0, 1.0]);
        assert_eq!(group.select_with_draw(0.0).unwrap().event, AudioEventId(101));
        assert_eq!(
            group.select_with_draw(0.999).unwrap().event,
            AudioEventId(101)
        );
    }

    #[test]
    fn partial_sum_can_choose_silence() {
        let group = group(&[0.25, 0.25]);
        assert!(group.select_with_draw(0.49).is_some());
        assert!(group.select_with_draw(0.5).is_none());
        assert!(group.select_with_draw(0.999).is_none());
    }

    #[test]
    fn directive_equality_compares_tag_and_payload() {
        let state = AudioDirective::State(StateChange {
            group: StateGroupId(1),
            state: StateId(2),
        });
        let same = AudioDirective::State(StateChange {
            group: StateGroupId(1),
            state: StateId(2),
        });
        let other_payload = AudioDirective::State(StateChange {
            group: StateGroupId(1),
            state: StateId(3),
        });
        let other_tag = AudioDirective::Switch(SwitchChange {
            group: SwitchGroupId(1),
            switch: SwitchId(2),
            actor: ActorId(0),
        });
        assert_eq!(state, same);
        assert_ne!(state, other_payload);
        assert_ne!(state, other_tag);
    }

    #[test]
    fn push_orders_values_before_events() {
        let mut list = DirectiveList::new();
        list.push(AudioDirective::EventGroup(group(&[1.0])));
        list.push(AudioDirective::State(StateChange {
            group: StateGroupId(1),
            state: StateId(1),
        }));
        list.push(AudioDirective::Parameter(ParameterChange {
            parameter: ParameterId(9),
            value: 0.5,
            actor: ActorId(7),
            ramp_ms: 0,
            curve: CurveShape::Linear,
        }));
        list.push(AudioDirective::EventGroup(group(&[0.5])));

        let tags: Vec<bool> = list.iter().map(AudioDirective::is_event_group).collect();
        assert_eq!(tags, vec![false, false, true, true]);
        // Relative order within each class is preserved
        assert!(matches!(
            list.iter().next().unwrap(),
            AudioDirective::State(_)
        ));
    }
}
