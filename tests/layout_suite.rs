use std::path::Path;

use process_flow_renderer::layout::{LayoutElement, zone_extent};
use process_flow_renderer::{
    ExpansionState, LayoutConfig, ProcessDescription, RenderSession, Theme, compute_layout,
    parse_process_description, reconcile, render_svg, zones_for,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
}

fn load_fixture(rel: &str) -> ProcessDescription {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_process_description(&input).expect("parse failed")
}

fn all_step_ids(description: &ProcessDescription) -> ExpansionState {
    description.steps().map(|step| step.id.as_str()).collect()
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = ["building_permit.json", "onboarding.json5", "single_step.json"];
    let theme = Theme::modern();
    let config = LayoutConfig::default();

    for rel in candidates {
        let description = load_fixture(rel);
        let zones = zones_for(&description);
        for expansion in [ExpansionState::new(), all_step_ids(&description)] {
            let layout = compute_layout(&description, &expansion, &theme, &config);
            let svg = render_svg(&layout, &zones, &theme, &config);
            assert_valid_svg(&svg, rel);
        }
    }
}

#[test]
fn every_step_is_placed_once_in_flow_order() {
    let description = load_fixture("building_permit.json");
    let layout = compute_layout(
        &description,
        &ExpansionState::new(),
        &Theme::modern(),
        &LayoutConfig::default(),
    );
    let placed: Vec<&str> = layout.elements.iter().filter_map(LayoutElement::step_id).collect();
    let expected: Vec<&str> = description.steps().map(|step| step.id.as_str()).collect();
    assert_eq!(placed, expected);

    let flow: Vec<&str> = layout.connectors.iter().map(|c| c.from.as_str()).collect();
    assert_eq!(flow.first(), Some(&"__start"));
    assert_eq!(layout.connectors.last().map(|c| c.to.as_str()), Some("__end"));
    assert_eq!(layout.connectors.len(), expected.len() + 1);
}

#[test]
fn steps_stay_inside_their_phase_band() {
    let description = load_fixture("building_permit.json");
    let expansion = all_step_ids(&description);
    let layout = compute_layout(&description, &expansion, &Theme::modern(), &LayoutConfig::default());
    for phase in &description.phases {
        let band = layout
            .bands()
            .find(|band| band.phase_id == phase.id)
            .expect("band for phase");
        for step in &phase.steps {
            let element = layout.element(&step.id).expect("step placed");
            assert!(element.top() >= band.y, "{} above band {}", step.id, phase.id);
            assert!(
                element.bottom() <= band.y + band.height,
                "{} below band {}",
                step.id,
                phase.id
            );
        }
    }
}

#[test]
fn json5_fixture_breaks_lines_and_keeps_empty_phase() {
    let description = load_fixture("onboarding.json5");
    let layout = compute_layout(
        &description,
        &ExpansionState::new(),
        &Theme::modern(),
        &LayoutConfig::default(),
    );
    let Some(LayoutElement::Task(task)) = layout.element("o1") else {
        panic!("o1 is not a task");
    };
    assert_eq!(task.label.lines.first().map(String::as_str), Some("Sign the contract"));
    assert_eq!(layout.bands().count(), 2);
}

#[test]
fn session_aligns_cards_after_expanding() {
    let description = load_fixture("building_permit.json");
    let mut session = RenderSession::new(description, Theme::modern(), LayoutConfig::default());
    session.set_card_height("research", 420.0);
    session.set_card_height("submission", 260.0);

    for step in ["s1", "s2", "s3"] {
        session.toggle(step);
        let layout = session.layout();
        for zone in session.zones().to_vec() {
            let span = zone_extent(&layout, &zone).expect("extent").span();
            let required = if zone.block_id == "research" { 420.0 } else { 260.0 };
            assert!(span + 0.01 >= required, "{} spans {span}", zone.block_id);
        }
    }
}

#[test]
fn reconciled_layout_is_a_fixed_point() {
    let description = load_fixture("building_permit.json");
    let layout = compute_layout(
        &description,
        &all_step_ids(&description),
        &Theme::modern(),
        &LayoutConfig::default(),
    );
    let zones = zones_for(&description);
    let heights = [900.0, 500.0];
    let once = reconcile(&layout, &zones, &heights);
    assert_eq!(reconcile(&once, &zones, &heights), once);
    assert!(once.height >= layout.height);
}
