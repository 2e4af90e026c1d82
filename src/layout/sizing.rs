use crate::config::LayoutConfig;
use crate::ir::Step;

use super::text::TextMeasure;
use super::{ExpansionLayout, HiddenActionLayout, TextBlock};

#[derive(Debug, Clone, PartialEq)]
pub struct TaskSize {
    pub lines: Vec<String>,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionSize {
    pub lines: Vec<String>,
    pub resolution_lines: Vec<String>,
    pub label_height: f32,
}

/// Width left for the step name once the id badge, the expand indicator and
/// horizontal padding are reserved.
pub fn task_text_budget(step: &Step, content_width: f32, config: &LayoutConfig) -> f32 {
    let indicator = if step.has_detail() {
        config.indicator_width
    } else {
        0.0
    };
    (content_width - config.task_padding_x * 2.0 - config.id_badge_width - indicator).max(1.0)
}

pub fn size_task(
    step: &Step,
    content_width: f32,
    config: &LayoutConfig,
    measure: &TextMeasure<'_>,
) -> TaskSize {
    let budget = task_text_budget(step, content_width, config);
    let lines = measure.wrap(&step.name, budget, config.font_size);
    let height = config.task_padding_top
        + lines.len() as f32 * config.line_height
        + config.task_text_gap
        + config.badge_row_height
        + config.task_padding_bottom;
    TaskSize {
        lines,
        height: height.max(config.task_min_height),
    }
}

pub fn size_decision(step: &Step, config: &LayoutConfig, measure: &TextMeasure<'_>) -> DecisionSize {
    let lines = measure.wrap(&step.name, config.decision_label_width, config.font_size);
    let resolution_lines = step
        .resolution
        .as_ref()
        .map(|resolution| {
            measure.wrap(
                &format!("\u{2192} {}", resolution.answer),
                config.decision_label_width,
                config.font_size,
            )
        })
        .unwrap_or_default();
    let line_count = lines.len() + resolution_lines.len();
    DecisionSize {
        lines,
        resolution_lines,
        label_height: line_count as f32 * config.line_height + config.decision_label_padding,
    }
}

/// Panel shown under an expanded task. Zero height when the step has neither
/// hidden actions nor an error loop.
pub fn expansion_panel(
    step: &Step,
    content_width: f32,
    config: &LayoutConfig,
    measure: &TextMeasure<'_>,
) -> ExpansionLayout {
    if !step.has_detail() {
        return ExpansionLayout {
            height: 0.0,
            actions: Vec::new(),
            error_lines: Vec::new(),
        };
    }

    let action_budget =
        (content_width - config.expansion_padding * 2.0 - config.hidden_action_inset).max(1.0);
    let mut height = config.expansion_padding;
    let mut actions = Vec::with_capacity(step.hidden_actions.len());
    if !step.hidden_actions.is_empty() {
        height += config.expansion_label_height + config.expansion_label_gap;
        for action in &step.hidden_actions {
            let lines = measure.wrap(
                &action.description,
                action_budget,
                config.hidden_action_font_size,
            );
            let action_height =
                lines.len() as f32 * config.hidden_action_line_height + config.hidden_action_padding;
            height += action_height + config.hidden_action_gap;
            actions.push(HiddenActionLayout {
                kind: action.kind.clone(),
                lines,
                height: action_height,
            });
        }
    }

    let mut error_lines = Vec::new();
    if let Some(error_loop) = &step.error_loop {
        height += config.error_row_height;
        // The error row has a fixed height; only its first line is drawn.
        error_lines = measure.wrap(
            &error_loop.condition,
            action_budget,
            config.hidden_action_font_size,
        );
    }
    height += config.expansion_padding;

    ExpansionLayout {
        height,
        actions,
        error_lines,
    }
}

pub fn size_expansion(
    step: &Step,
    content_width: f32,
    config: &LayoutConfig,
    measure: &TextMeasure<'_>,
) -> f32 {
    expansion_panel(step, content_width, config, measure).height
}

pub(super) fn text_block(
    lines: Vec<String>,
    font_size: f32,
    line_height: f32,
    measure: &TextMeasure<'_>,
) -> TextBlock {
    let width = lines
        .iter()
        .map(|line| measure.width(line, font_size))
        .fold(0.0, f32::max);
    let height = lines.len() as f32 * line_height;
    TextBlock {
        lines,
        width,
        height,
    }
}
