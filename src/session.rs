use std::collections::BTreeMap;

use crate::config::LayoutConfig;
use crate::ir::{ExpansionState, ProcessDescription};
use crate::layout::{Layout, Zone, reconcile, zone_extent, zones_for};
use crate::render::Renderer;
use crate::theme::Theme;

/// One interactive view of a process description.
///
/// Owns the expansion state and the card heights measured by the overlay, and
/// re-derives the reconciled layout whenever either changes.
#[derive(Debug)]
pub struct RenderSession {
    description: ProcessDescription,
    zones: Vec<Zone>,
    expansion: ExpansionState,
    card_heights: BTreeMap<String, f32>,
    renderer: Renderer,
    theme: Theme,
    config: LayoutConfig,
}

impl RenderSession {
    pub fn new(description: ProcessDescription, theme: Theme, config: LayoutConfig) -> Self {
        let zones = zones_for(&description);
        Self {
            description,
            zones,
            expansion: ExpansionState::new(),
            card_heights: BTreeMap::new(),
            renderer: Renderer::default(),
            theme,
            config,
        }
    }

    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.renderer = Renderer::new(namespace);
        self
    }

    pub fn description(&self) -> &ProcessDescription {
        &self.description
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn expansion(&self) -> &ExpansionState {
        &self.expansion
    }

    /// Flips one step's expansion. Returns whether it is now expanded.
    pub fn toggle(&mut self, step_id: &str) -> bool {
        let expanded = self.expansion.toggle(step_id);
        if self.description.step(step_id).is_none() {
            tracing::debug!(step = step_id, "toggled unknown step; layout unaffected");
        }
        expanded
    }

    pub fn set_expansion(&mut self, expansion: ExpansionState) {
        self.expansion = expansion;
    }

    /// Records the rendered height of an estimation card keyed by block id.
    pub fn set_card_height(&mut self, block_id: &str, height: f32) {
        self.card_heights.insert(block_id.to_string(), height);
    }

    pub fn set_card_heights(&mut self, heights: BTreeMap<String, f32>) {
        self.card_heights = heights;
    }

    pub fn clear_card_heights(&mut self) {
        self.card_heights.clear();
    }

    /// Layout for the current expansion state, before card alignment.
    pub fn natural_layout(&mut self) -> Layout {
        self.renderer
            .layout(&self.description, &self.expansion, &self.theme, &self.config)
            .clone()
    }

    /// Layout with every zone grown to fit its card. A block split across
    /// several runs asks each run for the full card height.
    pub fn layout(&mut self) -> Layout {
        let natural = self.natural_layout();
        let (zones, heights): (Vec<Zone>, Vec<f32>) = self
            .zones
            .iter()
            .filter_map(|zone| {
                self.card_heights
                    .get(&zone.block_id)
                    .map(|height| (zone.clone(), *height))
            })
            .unzip();
        if zones.is_empty() {
            return natural;
        }
        reconcile(&natural, &zones, &heights)
    }

    /// Pixel offsets for positioning each card beside its zone.
    pub fn card_offsets(&mut self) -> Vec<(String, f32)> {
        let layout = self.layout();
        self.zones
            .iter()
            .filter_map(|zone| zone_extent(&layout, zone).map(|extent| (zone.block_id.clone(), extent.top)))
            .collect()
    }

    pub fn svg(&mut self) -> String {
        let layout = self.layout();
        self.renderer
            .render_svg(&layout, &self.zones, &self.theme, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{EstimationBlock, HiddenAction, Phase, Step};

    fn session() -> RenderSession {
        let mut phase = Phase::new("p1", "Prepare", "#4C78A8");
        let mut gather = Step::task("s1", "Gather documents");
        gather.hidden_actions = (0..3)
            .map(|i| HiddenAction {
                description: format!("Locate document {i}"),
                kind: "search".to_string(),
            })
            .collect();
        phase.steps = vec![gather, Step::task("s2", "Scan documents"), Step::task("s3", "Upload")];
        phase.estimation_blocks.push(EstimationBlock {
            id: "prep".to_string(),
            label: "Preparation".to_string(),
            prompt: "How long would preparation take?".to_string(),
            step_ids: vec!["s1".to_string(), "s2".to_string()],
        });
        let description = ProcessDescription {
            title: None,
            phases: vec![phase],
        };
        RenderSession::new(description, Theme::modern(), LayoutConfig::default())
    }

    #[test]
    fn toggle_relayouts_and_collapse_restores() {
        let mut session = session();
        let before = session.layout();
        assert!(session.toggle("s1"));
        let expanded = session.layout();
        assert!(expanded.height > before.height);
        assert!(!session.toggle("s1"));
        assert_eq!(session.layout(), before);
    }

    #[test]
    fn card_heights_grow_zone() {
        let mut session = session();
        let natural = session.layout();
        let zone = session.zones()[0].clone();
        let span = zone_extent(&natural, &zone).expect("extent").span();
        session.set_card_height("prep", span + 60.0);
        let grown = session.layout();
        let new_span = zone_extent(&grown, &zone).expect("extent").span();
        assert!((new_span - span - 60.0).abs() < 0.01);
        assert!((grown.height - natural.height - 60.0).abs() < 0.01);
    }

    #[test]
    fn expanded_zone_may_already_fit_card() {
        let mut session = session();
        let natural = session.layout();
        let zone = session.zones()[0].clone();
        let span = zone_extent(&natural, &zone).expect("extent").span();
        session.set_card_height("prep", span + 20.0);
        session.toggle("s1");
        let expanded = session.natural_layout();
        let reconciled = session.layout();
        // The hidden-action panel alone is taller than the extra 20px.
        assert_eq!(expanded, reconciled);
    }

    #[test]
    fn card_offsets_track_zone_tops() {
        let mut session = session();
        let offsets = session.card_offsets();
        let layout = session.layout();
        assert_eq!(offsets.len(), 1);
        assert_eq!(offsets[0].1, layout.element("s1").expect("s1").top());
    }

    #[test]
    fn svg_contains_zone_bracket() {
        let mut session = session().with_namespace("survey");
        let svg = session.svg();
        assert!(svg.contains("id=\"survey-1\""));
        assert!(svg.contains("data-block=\"prep\""));
    }
}
