#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod parser;
pub mod randomizer;
pub mod render;
pub mod session;
pub mod text_metrics;
pub mod theme;

use std::collections::BTreeMap;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, TextMetricsMode, load_config};
pub use error::DescriptionError;
pub use ir::{ExpansionState, ProcessDescription};
pub use layout::{Layout, Zone, compute_layout, reconcile, zones_for};
pub use parser::parse_process_description;
pub use randomizer::{Assignment, BlockRandomizer};
pub use render::{Renderer, render_svg};
pub use session::RenderSession;
pub use theme::Theme;

/// Everything a one-shot render needs besides the description itself.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub expanded: ExpansionState,
    /// Minimum zone heights keyed by estimation block id.
    pub zone_heights: BTreeMap<String, f32>,
}

impl RenderOptions {
    pub fn modern() -> Self {
        Self::with_theme(Theme::modern())
    }

    pub fn classic() -> Self {
        Self::with_theme(Theme::classic())
    }

    fn with_theme(theme: Theme) -> Self {
        let layout = LayoutConfig {
            font_size: theme.font_size,
            ..LayoutConfig::default()
        };
        Self {
            theme,
            layout,
            ..Self::default()
        }
    }
}

/// Parses `input` and renders it to an SVG string.
pub fn render_with_options(input: &str, options: RenderOptions) -> anyhow::Result<String> {
    let description = parse_process_description(input)?;
    let mut session = RenderSession::new(description, options.theme, options.layout);
    session.set_expansion(options.expanded);
    session.set_card_heights(options.zone_heights);
    Ok(session.svg())
}
