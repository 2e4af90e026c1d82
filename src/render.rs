use crate::config::{LayoutConfig, RenderConfig};
use crate::ir::{ExpansionState, ProcessDescription};
use crate::layout::{
    BandLayout, ConnectorLayout, DecisionLayout, Layout, LayoutElement, MarkerKind, MarkerLayout,
    TaskLayout, TextMeasure, Zone, compute_layout, zone_extent,
};
use crate::theme::Theme;
use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

/// Draws layouts as SVG.
///
/// Each instance owns an id namespace and a render counter, so several
/// renderers (or several renders from one instance) can be inlined in the
/// same document without marker id collisions. The last computed layout is
/// cached per expansion state.
#[derive(Debug)]
pub struct Renderer {
    namespace: String,
    renders: u64,
    cache: Option<CachedLayout>,
}

#[derive(Debug)]
struct CachedLayout {
    expansion: ExpansionState,
    layout: Layout,
}

impl Renderer {
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace: String = namespace
            .into()
            .chars()
            .map(|ch| if ch.is_ascii_alphanumeric() || ch == '-' { ch } else { '-' })
            .collect();
        Self {
            namespace,
            renders: 0,
            cache: None,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn render_count(&self) -> u64 {
        self.renders
    }

    /// Returns the cached layout when `expansion` matches the last call,
    /// otherwise lays the description out again. The description is assumed
    /// unchanged for the lifetime of the renderer; call [`Self::invalidate`]
    /// otherwise.
    pub fn layout(
        &mut self,
        description: &ProcessDescription,
        expansion: &ExpansionState,
        theme: &Theme,
        config: &LayoutConfig,
    ) -> &Layout {
        if self
            .cache
            .as_ref()
            .is_some_and(|cached| cached.expansion != *expansion)
        {
            self.cache = None;
        }
        let namespace = &self.namespace;
        let cached = self.cache.get_or_insert_with(|| {
            tracing::debug!(%namespace, expanded = expansion.len(), "computing layout");
            CachedLayout {
                expansion: expansion.clone(),
                layout: compute_layout(description, expansion, theme, config),
            }
        });
        &cached.layout
    }

    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn render_svg(
        &mut self,
        layout: &Layout,
        zones: &[Zone],
        theme: &Theme,
        config: &LayoutConfig,
    ) -> String {
        self.renders += 1;
        let prefix = format!("{}-{}", self.namespace, self.renders);
        let measure = TextMeasure::new(config.text_metrics, theme.font_family.as_str());
        let width = layout.width.max(1.0);
        let height = layout.height.max(1.0);

        let mut svg = String::new();
        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" id=\"{prefix}\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
        );
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            theme.background
        );
        let _ = write!(
            svg,
            "<defs><marker id=\"{prefix}-arrow\" viewBox=\"0 0 10 10\" refX=\"10\" refY=\"5\" markerWidth=\"6\" markerHeight=\"6\" orient=\"auto-start-reverse\"><path d=\"M 0 0 L 10 5 L 0 10 z\" fill=\"{}\"/></marker></defs>",
            theme.line_color
        );

        for band in layout.bands() {
            band_svg(&mut svg, band, theme);
        }
        for connector in &layout.connectors {
            connector_svg(&mut svg, connector, &prefix, theme);
        }
        for element in layout.flow() {
            match element {
                LayoutElement::Marker(marker) => marker_svg(&mut svg, marker, theme),
                LayoutElement::Task(task) => task_svg(&mut svg, task, &prefix, theme, config, &measure),
                LayoutElement::Decision(decision) => decision_svg(&mut svg, decision, theme, config),
                LayoutElement::Band(_) => {}
            }
        }
        zones_svg(&mut svg, layout, zones, theme, config);

        svg.push_str("</svg>");
        svg
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new("pflow")
    }
}

/// One-shot render with a throwaway [`Renderer`].
pub fn render_svg(layout: &Layout, zones: &[Zone], theme: &Theme, config: &LayoutConfig) -> String {
    Renderer::default().render_svg(layout, zones, theme, config)
}

fn band_svg(svg: &mut String, band: &BandLayout, theme: &Theme) {
    let _ = write!(
        svg,
        "<g class=\"band\" data-phase=\"{}\"><rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"8\" ry=\"8\" fill=\"{}\" fill-opacity=\"{:.2}\" stroke=\"{}\" stroke-width=\"1\"/>",
        escape_xml(&band.phase_id),
        band.x,
        band.y,
        band.width,
        band.height,
        escape_xml(&band.color),
        theme.band_opacity,
        escape_xml(&band.color),
    );
    let _ = write!(
        svg,
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"600\" fill=\"{}\">{}</text></g>",
        band.x + 12.0,
        band.y + 19.0,
        escape_xml(&theme.font_family),
        theme.font_size,
        escape_xml(&band.color),
        escape_xml(&band.name)
    );
}

fn connector_svg(svg: &mut String, connector: &ConnectorLayout, prefix: &str, theme: &Theme) {
    let _ = write!(
        svg,
        "<path class=\"connector\" data-from=\"{}\" data-to=\"{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.4\" marker-end=\"url(#{prefix}-arrow)\"/>",
        escape_xml(&connector.from),
        escape_xml(&connector.to),
        points_to_path(&connector.points),
        theme.line_color,
    );
}

fn marker_svg(svg: &mut String, marker: &MarkerLayout, theme: &Theme) {
    let (fill, label) = match marker.kind {
        MarkerKind::Start => (&theme.start_color, "Start"),
        MarkerKind::End => (&theme.end_color, "End"),
    };
    let cx = marker.x + marker.radius;
    let cy = marker.y + marker.radius;
    let _ = write!(
        svg,
        "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{:.2}\" fill=\"{fill}\"/>",
        marker.radius
    );
    let _ = write!(
        svg,
        "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{label}</text>",
        cx + marker.radius + 8.0,
        cy + theme.font_size * 0.35,
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.muted_text_color,
    );
}

fn task_svg(
    svg: &mut String,
    task: &TaskLayout,
    prefix: &str,
    theme: &Theme,
    config: &LayoutConfig,
    measure: &TextMeasure<'_>,
) {
    let _ = write!(
        svg,
        "<g class=\"task\" id=\"{prefix}-step-{}\" data-step=\"{}\" data-expandable=\"{}\">",
        escape_xml(&task.step_id),
        escape_xml(&task.step_id),
        task.expandable
    );
    let _ = write!(
        svg,
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" ry=\"6\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1.2\"/>",
        task.x, task.y, task.width, task.height, theme.task_fill, theme.task_border
    );

    // Identifier badge, left of the text.
    let badge_x = task.x + config.task_padding_x;
    let badge_y = task.y + config.task_padding_top;
    let _ = write!(
        svg,
        "<rect x=\"{badge_x:.2}\" y=\"{badge_y:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" ry=\"4\" fill=\"{}\"/>",
        config.id_badge_width - 6.0,
        config.line_height,
        theme.badge_fill
    );
    let _ = write!(
        svg,
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        badge_x + (config.id_badge_width - 6.0) / 2.0,
        badge_y + config.line_height * 0.7,
        escape_xml(&theme.font_family),
        config.badge_font_size,
        theme.badge_text_color,
        escape_xml(&task.step_id)
    );

    let text_x = badge_x + config.id_badge_width;
    lines_svg(
        svg,
        text_x,
        badge_y,
        &task.label.lines,
        config.font_size,
        config.line_height,
        &theme.text_color,
        theme,
    );

    // Action-type badges sit on their own row under the text.
    let row_y = badge_y + task.label.lines.len() as f32 * config.line_height + config.task_text_gap;
    let mut chip_x = text_x;
    for action_type in &task.action_types {
        let chip_w = measure.width(action_type, config.badge_font_size) + 10.0;
        let _ = write!(
            svg,
            "<rect x=\"{chip_x:.2}\" y=\"{row_y:.2}\" width=\"{chip_w:.2}\" height=\"{:.2}\" rx=\"8\" ry=\"8\" fill=\"{}\"/><text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
            config.badge_row_height - 2.0,
            theme.badge_fill,
            chip_x + 5.0,
            row_y + config.badge_row_height * 0.65,
            escape_xml(&theme.font_family),
            config.badge_font_size,
            theme.badge_text_color,
            escape_xml(action_type)
        );
        chip_x += chip_w + config.badge_gap;
    }

    if task.expandable {
        let glyph = if task.expansion.is_some() { "\u{25BE}" } else { "\u{25B8}" };
        let color = if task.error_loop.is_some() && task.expansion.is_none() {
            &theme.error_color
        } else {
            &theme.muted_text_color
        };
        let _ = write!(
            svg,
            "<text class=\"toggle\" x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{color}\">{glyph}</text>",
            task.x + task.width - config.task_padding_x - config.indicator_width / 2.0,
            badge_y + config.line_height * 0.75,
            escape_xml(&theme.font_family),
            config.font_size,
        );
    }

    if let Some(panel) = &task.expansion {
        let panel_y = task.y + task.height;
        let _ = write!(
            svg,
            "<rect class=\"expansion\" x=\"{:.2}\" y=\"{panel_y:.2}\" width=\"{:.2}\" height=\"{:.2}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\" stroke-dasharray=\"4 3\"/>",
            task.x, task.width, panel.height, theme.expansion_fill, theme.task_border
        );
        let inner_x = task.x + config.expansion_padding;
        let mut y = panel_y + config.expansion_padding;
        if !panel.actions.is_empty() {
            let _ = write!(
                svg,
                "<text x=\"{inner_x:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" font-style=\"italic\" fill=\"{}\">Hidden actions</text>",
                y + config.expansion_label_height * 0.8,
                escape_xml(&theme.font_family),
                config.hidden_action_font_size,
                theme.muted_text_color
            );
            y += config.expansion_label_height + config.expansion_label_gap;
            for action in &panel.actions {
                let _ = write!(
                    svg,
                    "<text x=\"{inner_x:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">\u{2022}</text>",
                    y + config.hidden_action_line_height * 0.8,
                    escape_xml(&theme.font_family),
                    config.hidden_action_font_size,
                    theme.muted_text_color
                );
                lines_svg(
                    svg,
                    inner_x + config.hidden_action_inset,
                    y,
                    &action.lines,
                    config.hidden_action_font_size,
                    config.hidden_action_line_height,
                    &theme.text_color,
                    theme,
                );
                y += action.height + config.hidden_action_gap;
            }
        }
        if let Some(first_line) = panel.error_lines.first() {
            let ellipsis = if panel.error_lines.len() > 1 { "\u{2026}" } else { "" };
            let _ = write!(
                svg,
                "<text class=\"error-loop\" x=\"{inner_x:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">\u{21BA} {}{ellipsis}</text>",
                y + config.error_row_height * 0.6,
                escape_xml(&theme.font_family),
                config.hidden_action_font_size,
                theme.error_color,
                escape_xml(first_line)
            );
        }
    }
    svg.push_str("</g>");
}

fn decision_svg(svg: &mut String, decision: &DecisionLayout, theme: &Theme, config: &LayoutConfig) {
    let half = decision.size / 2.0;
    let cx = decision.x + half;
    let top = decision.y;
    let fill = if decision.resolution.is_some() {
        &theme.resolved_fill
    } else {
        &theme.decision_fill
    };
    let _ = write!(
        svg,
        "<g class=\"decision\" data-step=\"{}\" data-resolved=\"{}\"><polygon points=\"{cx:.2},{top:.2} {:.2},{:.2} {cx:.2},{:.2} {:.2},{:.2}\" fill=\"{fill}\" stroke=\"{}\" stroke-width=\"1.2\"/>",
        escape_xml(&decision.step_id),
        decision.resolution.is_some(),
        cx + half,
        top + half,
        top + decision.size,
        cx - half,
        top + half,
        theme.decision_border
    );
    // The label hangs below the diamond, offset so it clears the connector.
    let label_x = cx + 8.0;
    let label_y = top + decision.size + config.decision_label_padding / 2.0;
    lines_svg(
        svg,
        label_x,
        label_y,
        &decision.label.lines,
        config.font_size,
        config.line_height,
        &theme.text_color,
        theme,
    );
    if let Some(answer) = &decision.resolution {
        lines_svg(
            svg,
            label_x,
            label_y + decision.label.lines.len() as f32 * config.line_height,
            answer,
            config.font_size,
            config.line_height,
            &theme.start_color,
            theme,
        );
    }
    svg.push_str("</g>");
}

fn zones_svg(svg: &mut String, layout: &Layout, zones: &[Zone], theme: &Theme, config: &LayoutConfig) {
    let x = config.margin + config.band_width() + 12.0;
    for zone in zones {
        let Some(extent) = zone_extent(layout, zone) else {
            continue;
        };
        let _ = write!(
            svg,
            "<g class=\"zone\" data-block=\"{}\"><path d=\"M {x:.2} {:.2} L {:.2} {:.2} L {:.2} {:.2} L {x:.2} {:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1.5\"/>",
            escape_xml(&zone.block_id),
            extent.top,
            x + 8.0,
            extent.top,
            x + 8.0,
            extent.bottom,
            extent.bottom,
            theme.zone_bracket_color
        );
        let _ = write!(
            svg,
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text></g>",
            x + 14.0,
            extent.top + config.line_height,
            escape_xml(&theme.font_family),
            config.badge_font_size + 1.0,
            theme.muted_text_color,
            escape_xml(&zone.label)
        );
    }
}

#[allow(clippy::too_many_arguments)]
fn lines_svg(
    svg: &mut String,
    x: f32,
    top: f32,
    lines: &[String],
    font_size: f32,
    line_height: f32,
    fill: &str,
    theme: &Theme,
) {
    if lines.is_empty() {
        return;
    }
    let baseline = top + line_height * 0.75;
    let _ = write!(
        svg,
        "<text x=\"{x:.2}\" y=\"{baseline:.2}\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{fill}\">",
        escape_xml(&theme.font_family)
    );
    for (idx, line) in lines.iter().enumerate() {
        let dy = if idx == 0 { 0.0 } else { line_height };
        let _ = write!(
            svg,
            "<tspan x=\"{x:.2}\" dy=\"{dy:.2}\">{}</tspan>",
            escape_xml(line)
        );
    }
    svg.push_str("</text>");
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    let mut d = String::new();
    for (idx, (x, y)) in points.iter().enumerate() {
        let cmd = if idx == 0 { "M" } else { " L" };
        let _ = write!(d, "{cmd} {x:.2} {y:.2}");
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig, theme: &Theme) -> Result<()> {
    let mut opt = usvg::Options::default();
    if let Some(primary) = theme.font_family.split(',').next() {
        opt.font_family = primary.trim().trim_matches('"').to_string();
    }
    if let Some(size) = usvg::Size::from_wh(render_cfg.width, render_cfg.height) {
        opt.default_size = size;
    }

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    match parse_hex_color(&render_cfg.background) {
        Some((r, g, b)) => pixmap.fill(resvg::tiny_skia::Color::from_rgba8(r, g, b, 255)),
        None => tracing::warn!(background = %render_cfg.background, "unsupported PNG background; leaving transparent"),
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig, _theme: &Theme) -> Result<()> {
    Err(anyhow::anyhow!("PNG output requires the `png` feature"))
}

/// `#RGB` or `#RRGGBB`.
#[cfg_attr(not(feature = "png"), allow(dead_code))]
fn parse_hex_color(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.trim().strip_prefix('#')?;
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        3 => {
            let mut chars = hex.chars().map(|ch| ch.to_digit(16).map(|d| (d * 17) as u8));
            Some((chars.next()??, chars.next()??, chars.next()??))
        }
        6 => Some((channel(hex.get(0..2)?)?, channel(hex.get(2..4)?)?, channel(hex.get(4..6)?)?)),
        _ => None,
    }
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{DecisionResolution, HiddenAction, Phase, Step};
    use crate::layout::zones_for;

    fn description() -> ProcessDescription {
        let mut phase = Phase::new("p1", "Apply & pay", "#4C78A8");
        let mut step = Step::task("s1", "Fill in <form> A-12");
        step.action_types = vec!["write".to_string(), "read".to_string()];
        step.hidden_actions.push(HiddenAction {
            description: "Look up parcel number".to_string(),
            kind: "search".to_string(),
        });
        phase.steps.push(step);
        let mut decision = Step::decision("d1", "Fee waived?");
        decision.resolution = Some(DecisionResolution {
            answer: "No".to_string(),
        });
        phase.steps.push(decision);
        ProcessDescription {
            title: None,
            phases: vec![phase],
        }
    }

    #[test]
    fn render_svg_basic() {
        let description = description();
        let layout = compute_layout(
            &description,
            &ExpansionState::new(),
            &Theme::modern(),
            &LayoutConfig::default(),
        );
        let svg = render_svg(&layout, &[], &Theme::modern(), &LayoutConfig::default());
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("Apply &amp; pay"));
        assert!(svg.contains("&lt;form&gt;"));
        assert!(svg.contains("data-resolved=\"true\""));
        assert_eq!(svg.matches("class=\"connector\"").count(), 3);
        assert!(!svg.contains("Hidden actions"));
    }

    #[test]
    fn expanded_task_draws_panel() {
        let description = description();
        let expansion: ExpansionState = ["s1"].into_iter().collect();
        let layout = compute_layout(&description, &expansion, &Theme::modern(), &LayoutConfig::default());
        let svg = render_svg(&layout, &[], &Theme::modern(), &LayoutConfig::default());
        assert!(svg.contains("Hidden actions"));
        assert!(svg.contains("Look up parcel number"));
    }

    #[test]
    fn renders_use_distinct_ids() {
        let description = description();
        let theme = Theme::modern();
        let config = LayoutConfig::default();
        let mut first = Renderer::new("left");
        let mut second = Renderer::new("right");
        let layout = compute_layout(&description, &ExpansionState::new(), &theme, &config);
        let a = first.render_svg(&layout, &[], &theme, &config);
        let b = first.render_svg(&layout, &[], &theme, &config);
        let c = second.render_svg(&layout, &[], &theme, &config);
        assert!(a.contains("id=\"left-1-arrow\""));
        assert!(b.contains("id=\"left-2-arrow\""));
        assert!(c.contains("id=\"right-1-arrow\""));
        assert_eq!(first.render_count(), 2);
    }

    #[test]
    fn namespace_is_sanitized() {
        assert_eq!(Renderer::new("#diagram root").namespace(), "-diagram-root");
    }

    #[test]
    fn layout_cache_tracks_expansion_state() {
        let description = description();
        let theme = Theme::modern();
        let config = LayoutConfig::default();
        let mut renderer = Renderer::new("cache");
        let collapsed = renderer
            .layout(&description, &ExpansionState::new(), &theme, &config)
            .clone();
        let expanded = renderer
            .layout(&description, &["s1"].into_iter().collect(), &theme, &config)
            .clone();
        assert!(expanded.height > collapsed.height);
        let again = renderer.layout(&description, &ExpansionState::new(), &theme, &config);
        assert_eq!(*again, collapsed);
    }

    fn classic_svg() -> String {
        let theme = Theme::classic();
        let config = LayoutConfig::default();
        let description = description();
        let expansion: ExpansionState = ["s1"].into_iter().collect();
        let layout = compute_layout(&description, &expansion, &theme, &config);
        render_svg(&layout, &zones_for(&description), &theme, &config)
    }

    #[test]
    fn classic_font_family_is_escaped() {
        let svg = classic_svg();
        assert!(svg.contains("font-family=\"&quot;trebuchet ms&quot;, verdana, arial, sans-serif\""));
        for tag in svg.split('<').skip(1) {
            let tag = tag.split('>').next().unwrap_or_default();
            assert_eq!(tag.matches('"').count() % 2, 0, "unbalanced quotes in <{tag}>");
            assert!(!tag.contains("=\"\""), "empty attribute in <{tag}>");
        }
    }

    #[cfg(feature = "png")]
    #[test]
    fn classic_svg_is_well_formed() {
        let svg = classic_svg();
        usvg::Tree::from_str(&svg, &usvg::Options::default()).expect("classic svg should parse");
    }

    #[test]
    fn parses_png_background_colors() {
        assert_eq!(parse_hex_color("#FFFFFF"), Some((255, 255, 255)));
        assert_eq!(parse_hex_color(" #1c2430 "), Some((0x1C, 0x24, 0x30)));
        assert_eq!(parse_hex_color("#0f8"), Some((0, 255, 136)));
        assert_eq!(parse_hex_color("white"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn zone_brackets_are_drawn() {
        let mut description = description();
        description.phases[0].estimation_blocks.push(crate::ir::EstimationBlock {
            id: "fees".to_string(),
            label: "Fees".to_string(),
            prompt: String::new(),
            step_ids: vec!["s1".to_string(), "d1".to_string()],
        });
        let layout = compute_layout(
            &description,
            &ExpansionState::new(),
            &Theme::modern(),
            &LayoutConfig::default(),
        );
        let svg = render_svg(&layout, &zones_for(&description), &Theme::modern(), &LayoutConfig::default());
        assert!(svg.contains("data-block=\"fees\""));
    }
}
