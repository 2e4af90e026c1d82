use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub text_color: String,
    pub muted_text_color: String,
    pub task_fill: String,
    pub task_border: String,
    pub decision_fill: String,
    pub decision_border: String,
    pub resolved_fill: String,
    pub line_color: String,
    pub badge_fill: String,
    pub badge_text_color: String,
    pub expansion_fill: String,
    pub error_color: String,
    pub start_color: String,
    pub end_color: String,
    pub zone_bracket_color: String,
    pub band_opacity: f32,
    pub background: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "\"trebuchet ms\", verdana, arial, sans-serif".to_string(),
            font_size: 14.0,
            text_color: "#333333".to_string(),
            muted_text_color: "#666666".to_string(),
            task_fill: "#ECECFF".to_string(),
            task_border: "#9370DB".to_string(),
            decision_fill: "#FFFFDE".to_string(),
            decision_border: "#AAAA33".to_string(),
            resolved_fill: "#E3F7E0".to_string(),
            line_color: "#333333".to_string(),
            badge_fill: "#E8E8E8".to_string(),
            badge_text_color: "#333333".to_string(),
            expansion_fill: "#F6F6FB".to_string(),
            error_color: "#C0392B".to_string(),
            start_color: "#2E8B57".to_string(),
            end_color: "#8B2E2E".to_string(),
            zone_bracket_color: "#9370DB".to_string(),
            band_opacity: 0.12,
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            text_color: "#1C2430".to_string(),
            muted_text_color: "#5B6678".to_string(),
            task_fill: "#F8FAFF".to_string(),
            task_border: "#C7D2E5".to_string(),
            decision_fill: "#FFF8E6".to_string(),
            decision_border: "#E0B85C".to_string(),
            resolved_fill: "#EAF7EE".to_string(),
            line_color: "#7A8AA6".to_string(),
            badge_fill: "#EEF2F8".to_string(),
            badge_text_color: "#3A4658".to_string(),
            expansion_fill: "#FBFCFE".to_string(),
            error_color: "#D14343".to_string(),
            start_color: "#3BA55C".to_string(),
            end_color: "#7A8AA6".to_string(),
            zone_bracket_color: "#7A8AA6".to_string(),
            band_opacity: 0.10,
            background: "#FFFFFF".to_string(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::modern()
    }
}
