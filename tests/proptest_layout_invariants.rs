//! Property-based invariant tests for layout, reconciliation and randomization.
//!
//! 1. Wrapping preserves words and respects the width budget
//! 2. Task height never drops below the minimum and grows with longer text
//! 3. Layout is deterministic and strictly descending in flow order
//! 4. Reconciliation never shrinks, grows by exactly the applied deltas and is
//!    idempotent
//! 5. Every randomizer block of four is balanced

use process_flow_renderer::config::LayoutConfig;
use process_flow_renderer::ir::{EstimationBlock, ExpansionState, HiddenAction, Phase, ProcessDescription, Step};
use process_flow_renderer::layout::{
    TextMeasure, compute_layout, estimate_width, reconcile, size_task, wrap, zone_extent, zones_for,
};
use process_flow_renderer::randomizer::{Assignment, BLOCK_SIZE, BlockRandomizer};
use process_flow_renderer::theme::Theme;
use proptest::prelude::*;

// ── Strategies ──────────────────────────────────────────────────────────

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{0,120}"
}

fn step_strategy(index: usize) -> impl Strategy<Value = Step> {
    (
        "[a-zA-Z ]{1,80}",
        any::<bool>(),
        prop::collection::vec("[a-zA-Z ]{1,40}", 0..4),
    )
        .prop_map(move |(name, decision, hidden)| {
            let id = format!("s{index}");
            let mut step = if decision {
                Step::decision(&id, &name)
            } else {
                Step::task(&id, &name)
            };
            if !decision {
                step.hidden_actions = hidden
                    .into_iter()
                    .map(|description| HiddenAction {
                        description,
                        kind: "do".to_string(),
                    })
                    .collect();
            }
            step
        })
}

/// One or two phases with up to six steps; the first half of the steps form
/// an estimation block.
fn description_strategy() -> impl Strategy<Value = ProcessDescription> {
    (1usize..7, 0usize..7)
        .prop_flat_map(|(first, second)| {
            let steps: Vec<_> = (0..first + second).map(step_strategy).collect();
            (Just(first), steps)
        })
        .prop_map(|(first, steps)| {
            let mut head = Phase::new("p1", "First", "#4C78A8");
            let mut tail = Phase::new("p2", "Second", "#F58518");
            for (index, step) in steps.into_iter().enumerate() {
                if index < first {
                    head.steps.push(step);
                } else {
                    tail.steps.push(step);
                }
            }
            let block_len = head.steps.len().div_ceil(2);
            head.estimation_blocks.push(EstimationBlock {
                id: "b1".to_string(),
                label: "Block".to_string(),
                prompt: String::new(),
                step_ids: head.steps[..block_len].iter().map(|s| s.id.clone()).collect(),
            });
            ProcessDescription {
                title: None,
                phases: vec![head, tail],
            }
        })
}

/// Same shape, plus a second block over every other step of the whole flow.
/// It overlaps the first block and splits into several zones.
fn overlapping_blocks_strategy() -> impl Strategy<Value = ProcessDescription> {
    description_strategy().prop_map(|mut description| {
        let alternate: Vec<String> = description.steps().step_by(2).map(|s| s.id.clone()).collect();
        description.phases[1].estimation_blocks.push(EstimationBlock {
            id: "b2".to_string(),
            label: "Alternate".to_string(),
            prompt: String::new(),
            step_ids: alternate,
        });
        description
    })
}

fn layout_of(description: &ProcessDescription, expansion: &ExpansionState) -> process_flow_renderer::Layout {
    compute_layout(description, expansion, &Theme::modern(), &LayoutConfig::default())
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Wrapping
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn wrap_preserves_words(text in text_strategy(), max_width in 20.0f32..400.0) {
        let lines = wrap(&text, max_width, 13.0);
        let original: Vec<&str> = text.split_whitespace().collect();
        let rejoined = lines.join(" ");
        let wrapped: Vec<&str> = rejoined.split_whitespace().collect();
        prop_assert_eq!(original, wrapped);
    }

    #[test]
    fn wrapped_lines_fit_or_hold_one_word(text in text_strategy(), max_width in 20.0f32..400.0) {
        for line in wrap(&text, max_width, 13.0) {
            prop_assert!(
                estimate_width(&line, 13.0) <= max_width || !line.contains(' '),
                "line `{}` overflows {}", line, max_width
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2. Sizing
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn task_height_has_floor_and_grows(name in "[a-zA-Z ]{1,80}", suffix in "[a-zA-Z]{1,40}") {
        let config = LayoutConfig::default();
        let measure = TextMeasure::estimate();
        let short = size_task(&Step::task("s", &name), config.content_width, &config, &measure);
        let longer_name = format!("{name} {suffix}");
        let long = size_task(&Step::task("s", &longer_name), config.content_width, &config, &measure);
        prop_assert!(short.height >= config.task_min_height);
        prop_assert!(long.height >= short.height);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 3. Layout
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn layout_is_deterministic_and_ordered(description in description_strategy(), expand_mask in any::<u8>()) {
        let expansion: ExpansionState = description
            .steps()
            .enumerate()
            .filter(|(index, _)| expand_mask & (1 << (index % 8)) != 0)
            .map(|(_, step)| step.id.as_str())
            .collect();
        let first = layout_of(&description, &expansion);
        let second = layout_of(&description, &expansion);
        prop_assert_eq!(&first, &second);

        let flow: Vec<_> = first.flow().collect();
        for pair in flow.windows(2) {
            prop_assert!(pair[0].bottom() <= pair[1].top());
        }
    }

    #[test]
    fn reconcile_never_shrinks_and_is_idempotent(
        description in description_strategy(),
        extra in 0.0f32..400.0,
    ) {
        let layout = layout_of(&description, &ExpansionState::new());
        let zones = zones_for(&description);
        let span = zone_extent(&layout, &zones[0]).map_or(0.0, |e| e.span());
        let heights = [span + extra];
        let once = reconcile(&layout, &zones, &heights);
        prop_assert!(once.height >= layout.height);
        let new_span = zone_extent(&once, &zones[0]).map_or(0.0, |e| e.span());
        prop_assert!(new_span + 0.01 >= span + extra);
        let twice = reconcile(&once, &zones, &heights);
        prop_assert_eq!(once, twice);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn reconcile_height_grows_by_sum_of_deltas(
        description in overlapping_blocks_strategy(),
        extras in prop::collection::vec(-40.0f32..300.0, 8),
        expand_all in any::<bool>(),
    ) {
        let expansion: ExpansionState = if expand_all {
            description.steps().map(|step| step.id.as_str()).collect()
        } else {
            ExpansionState::new()
        };
        let layout = layout_of(&description, &expansion);
        let zones = zones_for(&description);
        prop_assume!(zones.len() >= 2);
        let heights: Vec<f32> = zones
            .iter()
            .zip(extras.iter().cycle())
            .map(|(zone, extra)| zone_extent(&layout, zone).map_or(0.0, |e| e.span()) + extra)
            .collect();

        // Each delta is measured on the layout already shifted by earlier zones.
        let mut expected = layout.height;
        let mut progressive = layout.clone();
        for (zone, required) in zones.iter().zip(&heights) {
            let span = zone_extent(&progressive, zone).map_or(0.0, |e| e.span());
            if span + 0.01 < *required {
                expected += required - span;
            }
            progressive = reconcile(&progressive, std::slice::from_ref(zone), std::slice::from_ref(required));
        }

        let once = reconcile(&layout, &zones, &heights);
        prop_assert!((once.height - expected).abs() < 0.01, "height {} expected {}", once.height, expected);
        for (zone, required) in zones.iter().zip(&heights) {
            let span = zone_extent(&once, zone).map_or(0.0, |e| e.span());
            prop_assert!(span + 0.02 >= *required, "zone {} spans {} < {}", zone.block_id, span, required);
        }
        prop_assert_eq!(&reconcile(&once, &zones, &heights), &once);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Randomizer
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn blocks_are_balanced(seed in any::<u64>(), blocks in 1usize..40) {
        let mut randomizer = BlockRandomizer::seeded(["A".to_string(), "B".to_string()], seed);
        let mut log = Vec::new();
        for _ in 0..blocks * BLOCK_SIZE {
            let label = randomizer.assign(&log);
            log.push(Assignment::new(label));
        }
        for block in log.chunks(BLOCK_SIZE) {
            prop_assert_eq!(block.iter().filter(|r| r.label == "A").count(), BLOCK_SIZE / 2);
        }
    }

    #[test]
    fn restarts_keep_totals_close(seed in any::<u64>(), restarts in prop::collection::vec(0usize..100, 0..6)) {
        let mut randomizer = BlockRandomizer::seeded(["A".to_string(), "B".to_string()], seed);
        let mut log = Vec::new();
        for step in 0..100 {
            if restarts.contains(&step) {
                randomizer.forget_block();
            }
            let label = randomizer.assign(&log);
            log.push(Assignment::new(label));
        }
        let a = log.iter().filter(|r| r.label == "A").count() as i64;
        let b = log.len() as i64 - a;
        prop_assert!((a - b).abs() <= 2, "A={} B={}", a, b);
    }
}
