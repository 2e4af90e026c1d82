use crate::layout::{Layout, LayoutElement, Zone, zone_extent};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub elements: Vec<ElementDump>,
    pub connectors: Vec<ConnectorDump>,
    pub zones: Vec<ZoneDump>,
}

#[derive(Debug, Serialize)]
pub struct ElementDump {
    pub kind: &'static str,
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label_lines: Vec<String>,
    pub expanded: bool,
}

#[derive(Debug, Serialize)]
pub struct ConnectorDump {
    pub from: String,
    pub to: String,
    pub points: Vec<[f32; 2]>,
}

#[derive(Debug, Serialize)]
pub struct ZoneDump {
    pub block_id: String,
    pub steps: Vec<String>,
    pub top: f32,
    pub bottom: f32,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout, zones: &[Zone]) -> Self {
        let elements = layout
            .elements
            .iter()
            .map(|element| {
                let (label_lines, expanded) = match element {
                    LayoutElement::Task(task) => (task.label.lines.clone(), task.expansion.is_some()),
                    LayoutElement::Decision(decision) => (decision.label.lines.clone(), false),
                    LayoutElement::Band(band) => (vec![band.name.clone()], false),
                    LayoutElement::Marker(_) => (Vec::new(), false),
                };
                ElementDump {
                    kind: element.kind_name(),
                    id: element.id().to_string(),
                    x: element.x(),
                    y: element.top(),
                    width: element.width(),
                    height: element.height(),
                    label_lines,
                    expanded,
                }
            })
            .collect();

        let connectors = layout
            .connectors
            .iter()
            .map(|connector| ConnectorDump {
                from: connector.from.clone(),
                to: connector.to.clone(),
                points: connector.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        let zones = zones
            .iter()
            .filter_map(|zone| {
                let extent = zone_extent(layout, zone)?;
                Some(ZoneDump {
                    block_id: zone.block_id.clone(),
                    steps: zone.step_ids.clone(),
                    top: extent.top,
                    bottom: extent.bottom,
                })
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            elements,
            connectors,
            zones,
        }
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout, zones: &[Zone]) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout, zones);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{ExpansionState, Phase, ProcessDescription, Step};
    use crate::layout::compute_layout;
    use crate::theme::Theme;

    #[test]
    fn dump_lists_every_element_in_order() {
        let mut phase = Phase::new("p", "Phase", "#4C78A8");
        phase.steps = vec![Step::task("a", "First"), Step::decision("b", "Second?")];
        let description = ProcessDescription {
            title: None,
            phases: vec![phase],
        };
        let layout = compute_layout(
            &description,
            &ExpansionState::new(),
            &Theme::modern(),
            &LayoutConfig::default(),
        );
        let dump = LayoutDump::from_layout(&layout, &[]);
        let kinds: Vec<&str> = dump.elements.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec!["start", "band", "task", "decision", "end"]);
        assert_eq!(dump.connectors.len(), 3);
        let json = serde_json::to_value(&dump).expect("serialize");
        assert_eq!(json["elements"][2]["id"], "a");
    }
}
