use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use treadtone_core::directive::{EventGroup, PROBABILITY_EPSILON};
use treadtone_core::{ActorId, AudioEventId};

fn group(probabilities: &[f32]) -> EventGroup {
    let mut group = EventGroup::new(ActorId(1));
    for (idx, &p) in probabilities.iter().enumerate() {
        group.add_event(AudioEventId(idx as u32), 1.0, p);
    }
    group
}

/// Effective probability mass, accumulated in entry order exactly as the
/// selection kernel does.
fn effective_sum(probabilities: &[f32]) -> f32 {
    probabilities
        .iter()
        .filter(|p| p.abs() >= PROBABILITY_EPSILON)
        .sum()
}

proptest! {
    #[test]
    fn single_full_probability_entry_always_selected(draw in 0.0f32..1.0) {
        let group = group(&[1.0]);
        let entry = group.select_with_draw(draw).expect("entry must be selected");
        prop_assert_eq!(entry.event, AudioEventId(0));
    }

    #[test]
    fn selection_is_none_exactly_when_draw_passes_the_mass(
        probabilities in proptest::collection::vec(0.0f32..=0.5, 1..6),
        draw in 0.0f32..1.0,
    ) {
        let group = group(&probabilities);
        let sum = effective_sum(&probabilities);
        let selected = group.select_with_draw(draw);
        if draw < sum {
            prop_assert!(selected.is_some());
        } else {
            prop_assert!(selected.is_none());
        }
    }

    #[test]
    fn selected_entry_owns_the_draw_range(
        probabilities in proptest::collection::vec(0.0f32..=1.0, 1..6),
        draw in 0.0f32..1.0,
    ) {
        let group = group(&probabilities);
        if let Some(entry) = group.select_with_draw(draw) {
            // Recompute the cumulative range of the selected entry and check
            // the draw really falls inside it.
            let mut range_min = 0.0f32;
            for candidate in &group.events {
                if candidate.probability.abs() < PROBABILITY_EPSILON {
                    continue;
                }
                let range_max = range_min + candidate.probability;
                if candidate.event == entry.event {
                    prop_assert!(draw >= range_min && draw < range_max);
                    break;
                }
                range_min = range_max;
            }
        }
    }
}

#[test]
fn repeated_sampling_converges_to_configured_probabilities() {
    let probabilities = [0.2f32, 0.3, 0.5];
    let group = group(&probabilities);
    let mut rng = StdRng::seed_from_u64(42);

    const DRAWS: usize = 100_000;
    let mut counts = [0usize; 3];
    for _ in 0..DRAWS {
        let entry = group
            .select(true, Some(&mut rng as &mut dyn RngCore))
            .unwrap()
            .expect("mass sums to 1, every draw selects");
        counts[entry.event.0 as usize] += 1;
    }

    for (idx, &expected) in probabilities.iter().enumerate() {
        let observed = counts[idx] as f32 / DRAWS as f32;
        assert!(
            (observed - expected).abs() < 0.01,
            "entry {idx}: observed {observed}, expected {expected}"
        );
    }
}

#[test]
fn half_mass_group_stays_silent_half_the_time() {
    let group = group(&[0.25, 0.25]);

    // Deterministic sweep of the upper half of the draw space
    for step in 0..50 {
        let draw = 0.5 + step as f32 * 0.01;
        assert!(group.select_with_draw(draw).is_none(), "draw {draw}");
    }

    // And statistically via the rng-driven path
    let mut rng = StdRng::seed_from_u64(7);
    const DRAWS: usize = 50_000;
    let mut silent = 0usize;
    for _ in 0..DRAWS {
        if group
            .select(true, Some(&mut rng as &mut dyn RngCore))
            .unwrap()
            .is_none()
        {
            silent += 1;
        }
    }
    let observed = silent as f32 / DRAWS as f32;
    assert!((observed - 0.5).abs() < 0.02, "silent rate {observed}");
}

#[test]
fn reordering_entries_preserves_selection_mass() {
    let forward = group(&[0.2, 0.8]);
    let mut reversed = EventGroup::new(ActorId(1));
    reversed.add_event(AudioEventId(1), 1.0, 0.8);
    reversed.add_event(AudioEventId(0), 1.0, 0.2);

    const DRAWS: usize = 50_000;
    let mut rng = StdRng::seed_from_u64(11);
    let mut forward_first = 0usize;
    let mut reversed_first = 0usize;
    for _ in 0..DRAWS {
        if forward
            .select(true, Some(&mut rng as &mut dyn RngCore))
            .unwrap()
            .unwrap()
            .event
            == AudioEventId(0)
        {
            forward_first += 1;
        }
        if reversed
            .select(true, Some(&mut rng as &mut dyn RngCore))
            .unwrap()
            .unwrap()
            .event
            == AudioEventId(0)
        {
            reversed_first += 1;
        }
    }
    let forward_rate = forward_first as f32 / DRAWS as f32;
    let reversed_rate = reversed_first as f32 / DRAWS as f32;
    assert!((forward_rate - 0.2).abs() < 0.02);
    assert!((reversed_rate - 0.2).abs() < 0.02);
}
