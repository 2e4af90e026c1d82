use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextMetricsMode {
    /// Per-character advance table; deterministic on every machine.
    #[default]
    Estimate,
    /// Real glyph advances from an installed font, falling back to the table.
    System,
}

/// Geometry for task boxes, decision diamonds, bands and markers.
///
/// Every pixel constant used by sizing and layout lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub text_metrics: TextMetricsMode,
    pub margin: f32,
    pub content_width: f32,
    pub font_size: f32,
    pub line_height: f32,

    pub task_padding_x: f32,
    pub task_padding_top: f32,
    pub task_padding_bottom: f32,
    pub task_text_gap: f32,
    pub task_min_height: f32,
    pub id_badge_width: f32,
    pub indicator_width: f32,
    pub badge_row_height: f32,
    pub badge_font_size: f32,
    pub badge_gap: f32,

    pub decision_size: f32,
    pub decision_label_width: f32,
    pub decision_label_padding: f32,

    pub expansion_padding: f32,
    pub expansion_label_height: f32,
    pub expansion_label_gap: f32,
    pub hidden_action_font_size: f32,
    pub hidden_action_line_height: f32,
    pub hidden_action_padding: f32,
    pub hidden_action_gap: f32,
    pub hidden_action_inset: f32,
    pub error_row_height: f32,

    pub marker_radius: f32,
    pub marker_gap: f32,
    pub step_gap: f32,
    pub band_inset_x: f32,
    pub band_header_height: f32,
    pub band_padding: f32,
    pub band_bottom_padding: f32,
    pub phase_gap: f32,
    pub zone_gutter: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            text_metrics: TextMetricsMode::Estimate,
            margin: 20.0,
            content_width: 320.0,
            font_size: 13.0,
            line_height: 18.0,

            task_padding_x: 10.0,
            task_padding_top: 10.0,
            task_padding_bottom: 10.0,
            task_text_gap: 6.0,
            task_min_height: 72.0,
            id_badge_width: 36.0,
            indicator_width: 22.0,
            badge_row_height: 18.0,
            badge_font_size: 10.0,
            badge_gap: 4.0,

            decision_size: 56.0,
            decision_label_width: 200.0,
            decision_label_padding: 8.0,

            expansion_padding: 10.0,
            expansion_label_height: 16.0,
            expansion_label_gap: 6.0,
            hidden_action_font_size: 12.0,
            hidden_action_line_height: 16.0,
            hidden_action_padding: 8.0,
            hidden_action_gap: 4.0,
            hidden_action_inset: 20.0,
            error_row_height: 28.0,

            marker_radius: 14.0,
            marker_gap: 24.0,
            step_gap: 20.0,
            band_inset_x: 24.0,
            band_header_height: 28.0,
            band_padding: 12.0,
            band_bottom_padding: 12.0,
            phase_gap: 20.0,
            zone_gutter: 180.0,
        }
    }
}

impl LayoutConfig {
    pub fn band_width(&self) -> f32 {
        self.content_width + self.band_inset_x * 2.0
    }

    pub fn center_x(&self) -> f32 {
        self.margin + self.band_width() / 2.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub width: f32,
    pub height: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 1200.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RandomizerConfig {
    pub arms: [String; 2],
}

impl Default for RandomizerConfig {
    fn default() -> Self {
        Self {
            arms: ["A".to_string(), "B".to_string()],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
    pub randomizer: RandomizerConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::modern();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
            randomizer: RandomizerConfig::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    text_color: Option<String>,
    muted_text_color: Option<String>,
    task_fill: Option<String>,
    task_border: Option<String>,
    decision_fill: Option<String>,
    decision_border: Option<String>,
    resolved_fill: Option<String>,
    line_color: Option<String>,
    badge_fill: Option<String>,
    badge_text_color: Option<String>,
    expansion_fill: Option<String>,
    error_color: Option<String>,
    start_color: Option<String>,
    end_color: Option<String>,
    zone_bracket_color: Option<String>,
    band_opacity: Option<NumberOrString>,
    background: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f32),
    String(String),
}

impl NumberOrString {
    fn as_f32(&self) -> Option<f32> {
        match self {
            NumberOrString::Number(val) => Some(*val),
            NumberOrString::String(val) => val.trim().trim_end_matches("px").parse::<f32>().ok(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfig>,
    render: Option<RenderConfig>,
    randomizer: Option<RandomizerConfig>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match theme_name {
            "modern" => config.theme = Theme::modern(),
            "classic" | "default" | "base" => config.theme = Theme::classic(),
            other => tracing::warn!(theme = other, "unknown theme name, keeping default"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.muted_text_color {
            config.theme.muted_text_color = v;
        }
        if let Some(v) = vars.task_fill {
            config.theme.task_fill = v;
        }
        if let Some(v) = vars.task_border {
            config.theme.task_border = v;
        }
        if let Some(v) = vars.decision_fill {
            config.theme.decision_fill = v;
        }
        if let Some(v) = vars.decision_border {
            config.theme.decision_border = v;
        }
        if let Some(v) = vars.resolved_fill {
            config.theme.resolved_fill = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.badge_fill {
            config.theme.badge_fill = v;
        }
        if let Some(v) = vars.badge_text_color {
            config.theme.badge_text_color = v;
        }
        if let Some(v) = vars.expansion_fill {
            config.theme.expansion_fill = v;
        }
        if let Some(v) = vars.error_color {
            config.theme.error_color = v;
        }
        if let Some(v) = vars.start_color {
            config.theme.start_color = v;
        }
        if let Some(v) = vars.end_color {
            config.theme.end_color = v;
        }
        if let Some(v) = vars.zone_bracket_color {
            config.theme.zone_bracket_color = v;
        }
        if let Some(v) = vars.band_opacity.as_ref().and_then(NumberOrString::as_f32) {
            config.theme.band_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    match parsed.layout {
        Some(layout) => config.layout = layout,
        // Without a layout block the wrap font follows the theme.
        None => config.layout.font_size = config.theme.font_size,
    }

    config.render.background = config.theme.background.clone();
    if let Some(render) = parsed.render {
        config.render = render;
    }
    if let Some(randomizer) = parsed.randomizer {
        config.randomizer = randomizer;
    }

    Ok(config)
}
