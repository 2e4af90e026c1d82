mod sizing;
pub mod text;
pub(crate) mod types;
mod zones;

pub use sizing::{
    DecisionSize, TaskSize, expansion_panel, size_decision, size_expansion, size_task,
    task_text_budget,
};
pub use text::{TextMeasure, estimate_width, wrap};
pub use types::*;
pub use zones::{Zone, ZoneExtent, reconcile, zone_extent, zones_for};

use crate::config::LayoutConfig;
use crate::ir::{ExpansionState, Phase, ProcessDescription, Step};
use crate::theme::Theme;
use sizing::text_block;

/// Places every element of `description` top to bottom.
///
/// Pure in its inputs: the same description, expansion state and config always
/// produce identical coordinates.
pub fn compute_layout(
    description: &ProcessDescription,
    expansion: &ExpansionState,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    let measure = TextMeasure::new(config.text_metrics, theme.font_family.as_str());
    let center_x = config.center_x();
    let step_x = config.margin + config.band_inset_x;
    let mut elements = Vec::with_capacity(
        description.phases.iter().map(|p| p.steps.len() + 1).sum::<usize>() + 2,
    );

    let mut cursor = config.margin;
    elements.push(LayoutElement::Marker(MarkerLayout {
        kind: MarkerKind::Start,
        x: center_x - config.marker_radius,
        y: cursor,
        radius: config.marker_radius,
    }));
    cursor += config.marker_radius * 2.0 + config.marker_gap;

    for phase in &description.phases {
        let band_top = cursor;
        let band_index = elements.len();
        elements.push(LayoutElement::Band(open_band(phase, band_top, config)));
        cursor += config.band_header_height + config.band_padding;

        for step in &phase.steps {
            let element = if step.decision {
                place_decision(step, center_x, cursor, config, &measure)
            } else {
                place_task(step, step_x, cursor, expansion, config, &measure)
            };
            cursor += element.height() + config.step_gap;
            elements.push(element);
        }

        let band_height = cursor - band_top + config.band_bottom_padding;
        if let LayoutElement::Band(band) = &mut elements[band_index] {
            band.height = band_height;
        }
        cursor = band_top + band_height + config.phase_gap;
    }

    elements.push(LayoutElement::Marker(MarkerLayout {
        kind: MarkerKind::End,
        x: center_x - config.marker_radius,
        y: cursor,
        radius: config.marker_radius,
    }));
    cursor += config.marker_radius * 2.0;

    let gutter = if description.estimation_blocks().next().is_some() {
        config.zone_gutter
    } else {
        0.0
    };
    let connectors = build_connectors(&elements);
    Layout {
        elements,
        connectors,
        width: config.margin * 2.0 + config.band_width() + gutter,
        height: cursor + config.margin,
    }
}

fn open_band(phase: &Phase, top: f32, config: &LayoutConfig) -> BandLayout {
    BandLayout {
        phase_id: phase.id.clone(),
        name: phase.name.clone(),
        color: phase.color.clone(),
        x: config.margin,
        y: top,
        width: config.band_width(),
        height: 0.0,
    }
}

fn place_task(
    step: &Step,
    x: f32,
    y: f32,
    expansion: &ExpansionState,
    config: &LayoutConfig,
    measure: &TextMeasure<'_>,
) -> LayoutElement {
    let size = size_task(step, config.content_width, config, measure);
    let panel = if expansion.is_expanded(&step.id) && step.has_detail() {
        Some(expansion_panel(step, config.content_width, config, measure))
    } else {
        None
    };
    LayoutElement::Task(TaskLayout {
        step_id: step.id.clone(),
        x,
        y,
        width: config.content_width,
        height: size.height,
        label: text_block(size.lines, config.font_size, config.line_height, measure),
        action_types: step.action_types.clone(),
        expandable: step.has_detail(),
        error_loop: step.error_loop.as_ref().map(|error| error.condition.clone()),
        expansion: panel,
    })
}

fn place_decision(
    step: &Step,
    center_x: f32,
    y: f32,
    config: &LayoutConfig,
    measure: &TextMeasure<'_>,
) -> LayoutElement {
    let size = size_decision(step, config, measure);
    let resolution = step.resolution.as_ref().map(|_| size.resolution_lines);
    LayoutElement::Decision(DecisionLayout {
        step_id: step.id.clone(),
        x: center_x - config.decision_size / 2.0,
        y,
        size: config.decision_size,
        label: text_block(size.lines, config.font_size, config.line_height, measure),
        label_height: size.label_height,
        resolution,
    })
}

/// Straight vertical connectors between consecutive non-band elements.
pub fn build_connectors(elements: &[LayoutElement]) -> Vec<ConnectorLayout> {
    let flow: Vec<&LayoutElement> = elements.iter().filter(|e| !e.is_band()).collect();
    flow.windows(2)
        .map(|pair| {
            let (from, to) = (pair[0], pair[1]);
            ConnectorLayout {
                from: from.id().to_string(),
                to: to.id().to_string(),
                points: vec![
                    (from.center_x(), from.connector_bottom()),
                    (to.center_x(), to.top()),
                ],
            }
        })
        .collect()
}
