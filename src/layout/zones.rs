use std::collections::HashSet;

use crate::ir::ProcessDescription;

use super::{Layout, LayoutElement, build_connectors};

/// Spans shorter than the requirement by less than this are left alone, so
/// a second pass over an already reconciled layout is a no-op.
const SPAN_TOLERANCE: f32 = 0.01;

/// A contiguous run of steps claimed by one estimation block.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub block_id: String,
    pub label: String,
    pub step_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneExtent {
    pub top: f32,
    pub bottom: f32,
}

impl ZoneExtent {
    pub fn span(&self) -> f32 {
        self.bottom - self.top
    }
}

/// Derives zones from the estimation blocks. A block whose steps are not
/// adjacent in flow order yields one zone per contiguous run.
pub fn zones_for(description: &ProcessDescription) -> Vec<Zone> {
    let flow: Vec<&str> = description.steps().map(|step| step.id.as_str()).collect();
    let mut zones = Vec::new();
    for block in description.estimation_blocks() {
        let members: HashSet<&str> = block.step_ids.iter().map(String::as_str).collect();
        let mut run: Vec<String> = Vec::new();
        for step_id in &flow {
            if members.contains(step_id) {
                run.push(step_id.to_string());
            } else if !run.is_empty() {
                zones.push(Zone {
                    block_id: block.id.clone(),
                    label: block.label.clone(),
                    step_ids: std::mem::take(&mut run),
                });
            }
        }
        if !run.is_empty() {
            zones.push(Zone {
                block_id: block.id.clone(),
                label: block.label.clone(),
                step_ids: run,
            });
        }
    }
    zones
}

pub fn zone_extent(layout: &Layout, zone: &Zone) -> Option<ZoneExtent> {
    let members = zone_members(layout, zone);
    let first = members.first()?;
    let last = members.last()?;
    Some(ZoneExtent {
        top: layout.elements[*first].top(),
        bottom: layout.elements[*last].bottom(),
    })
}

/// Grows spacing so that each zone spans at least its paired minimum height.
///
/// Zones are applied in order, each against the layout already shifted by the
/// ones before it. A zone with no matching element is skipped; extra zones or
/// heights beyond the shorter of the two slices are ignored.
pub fn reconcile(layout: &Layout, zones: &[Zone], min_heights: &[f32]) -> Layout {
    let mut current = layout.clone();
    for (zone, &required) in zones.iter().zip(min_heights) {
        if let Some(next) = reconcile_zone(&current, zone, required) {
            current = next;
        }
    }
    current
}

#[derive(Debug, Clone, Copy)]
struct Boundary {
    y: f32,
    shift: f32,
}

fn reconcile_zone(layout: &Layout, zone: &Zone, required: f32) -> Option<Layout> {
    let members = zone_members(layout, zone);
    if members.is_empty() {
        tracing::debug!(zone = %zone.block_id, "zone matches no layout element; skipped");
        return None;
    }
    let first = &layout.elements[members[0]];
    let last = &layout.elements[members[members.len() - 1]];
    let span = last.bottom() - first.top();
    if span + SPAN_TOLERANCE >= required {
        return None;
    }
    let delta = required - span;
    tracing::debug!(zone = %zone.block_id, span, required, delta, "growing zone");

    let gaps = members.len() - 1;
    let mut boundaries: Vec<Boundary> = members
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, &index)| Boundary {
            y: layout.elements[index].top(),
            shift: delta * (i as f32 / gaps as f32),
        })
        .collect();
    boundaries.push(Boundary {
        y: last.bottom(),
        shift: delta,
    });

    let mut elements = Vec::with_capacity(layout.elements.len());
    for (index, element) in layout.elements.iter().enumerate() {
        let mut shifted = element.clone();
        if let LayoutElement::Band(band) = &mut shifted {
            let top = band.y + shift_at(&boundaries, band.y);
            let bottom_edge = band.y + band.height;
            let bottom = bottom_edge + shift_at(&boundaries, bottom_edge);
            band.y = top;
            band.height = bottom - top;
        } else {
            shifted.shift_y(shift_at(&boundaries, element.top()));
        }
        // A lone member has no internal gap to widen, so it grows instead.
        if gaps == 0 && index == members[0] {
            shifted.grow(delta);
        }
        elements.push(shifted);
    }

    let connectors = build_connectors(&elements);
    Some(Layout {
        elements,
        connectors,
        width: layout.width,
        height: layout.height + delta,
    })
}

/// Largest shift among the boundaries at or above `y`.
fn shift_at(boundaries: &[Boundary], y: f32) -> f32 {
    boundaries
        .iter()
        .filter(|boundary| y >= boundary.y)
        .map(|boundary| boundary.shift)
        .fold(0.0, f32::max)
}

/// Indices of the zone's elements, sorted by vertical position.
fn zone_members(layout: &Layout, zone: &Zone) -> Vec<usize> {
    let ids: HashSet<&str> = zone.step_ids.iter().map(String::as_str).collect();
    let mut members: Vec<usize> = layout
        .elements
        .iter()
        .enumerate()
        .filter(|(_, element)| element.step_id().is_some_and(|id| ids.contains(id)))
        .map(|(index, _)| index)
        .collect();
    members.sort_by(|a, b| {
        layout.elements[*a]
            .top()
            .total_cmp(&layout.elements[*b].top())
    });
    members
}
