#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Start,
    End,
}

impl MarkerKind {
    pub fn element_id(self) -> &'static str {
        match self {
            MarkerKind::Start => "__start",
            MarkerKind::End => "__end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerLayout {
    pub kind: MarkerKind,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TaskLayout {
    pub step_id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub label: TextBlock,
    pub action_types: Vec<String>,
    /// Step has hidden actions or an error loop, so an expand toggle is drawn.
    pub expandable: bool,
    pub error_loop: Option<String>,
    pub expansion: Option<ExpansionLayout>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpansionLayout {
    pub height: f32,
    pub actions: Vec<HiddenActionLayout>,
    pub error_lines: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HiddenActionLayout {
    pub kind: String,
    pub lines: Vec<String>,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionLayout {
    pub step_id: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub label: TextBlock,
    pub label_height: f32,
    pub resolution: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BandLayout {
    pub phase_id: String,
    pub name: String,
    pub color: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutElement {
    Marker(MarkerLayout),
    Task(TaskLayout),
    Decision(DecisionLayout),
    Band(BandLayout),
}

impl LayoutElement {
    pub fn id(&self) -> &str {
        match self {
            LayoutElement::Marker(marker) => marker.kind.element_id(),
            LayoutElement::Task(task) => &task.step_id,
            LayoutElement::Decision(decision) => &decision.step_id,
            LayoutElement::Band(band) => &band.phase_id,
        }
    }

    /// Underlying step id, for tasks and decisions only.
    pub fn step_id(&self) -> Option<&str> {
        match self {
            LayoutElement::Task(task) => Some(&task.step_id),
            LayoutElement::Decision(decision) => Some(&decision.step_id),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            LayoutElement::Marker(marker) => match marker.kind {
                MarkerKind::Start => "start",
                MarkerKind::End => "end",
            },
            LayoutElement::Task(_) => "task",
            LayoutElement::Decision(_) => "decision",
            LayoutElement::Band(_) => "band",
        }
    }

    pub fn is_band(&self) -> bool {
        matches!(self, LayoutElement::Band(_))
    }

    pub fn x(&self) -> f32 {
        match self {
            LayoutElement::Marker(marker) => marker.x,
            LayoutElement::Task(task) => task.x,
            LayoutElement::Decision(decision) => decision.x,
            LayoutElement::Band(band) => band.x,
        }
    }

    pub fn top(&self) -> f32 {
        match self {
            LayoutElement::Marker(marker) => marker.y,
            LayoutElement::Task(task) => task.y,
            LayoutElement::Decision(decision) => decision.y,
            LayoutElement::Band(band) => band.y,
        }
    }

    pub fn width(&self) -> f32 {
        match self {
            LayoutElement::Marker(marker) => marker.radius * 2.0,
            LayoutElement::Task(task) => task.width,
            LayoutElement::Decision(decision) => decision.size,
            LayoutElement::Band(band) => band.width,
        }
    }

    /// Full vertical extent: a task's expansion panel and a decision's label
    /// both count.
    pub fn height(&self) -> f32 {
        match self {
            LayoutElement::Marker(marker) => marker.radius * 2.0,
            LayoutElement::Task(task) => {
                task.height + task.expansion.as_ref().map_or(0.0, |panel| panel.height)
            }
            LayoutElement::Decision(decision) => decision.size + decision.label_height,
            LayoutElement::Band(band) => band.height,
        }
    }

    pub fn bottom(&self) -> f32 {
        self.top() + self.height()
    }

    pub fn center_x(&self) -> f32 {
        self.x() + self.width() / 2.0
    }

    /// Where an outgoing connector starts. For a decision this is the lower
    /// vertex of the diamond, not the end of its label.
    pub fn connector_bottom(&self) -> f32 {
        match self {
            LayoutElement::Decision(decision) => decision.y + decision.size,
            _ => self.bottom(),
        }
    }

    pub(crate) fn shift_y(&mut self, dy: f32) {
        match self {
            LayoutElement::Marker(marker) => marker.y += dy,
            LayoutElement::Task(task) => task.y += dy,
            LayoutElement::Decision(decision) => decision.y += dy,
            LayoutElement::Band(band) => band.y += dy,
        }
    }

    pub(crate) fn grow(&mut self, dh: f32) {
        match self {
            LayoutElement::Task(task) => task.height += dh,
            LayoutElement::Decision(decision) => decision.label_height += dh,
            LayoutElement::Band(band) => band.height += dh,
            LayoutElement::Marker(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorLayout {
    pub from: String,
    pub to: String,
    pub points: Vec<(f32, f32)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// Flow order: start, then each band followed by its steps, then end.
    pub elements: Vec<LayoutElement>,
    pub connectors: Vec<ConnectorLayout>,
    pub width: f32,
    pub height: f32,
}

impl Layout {
    /// The task or decision placed for `step_id`. Bands and markers are never
    /// returned, even when a phase id equals a step id.
    pub fn element(&self, step_id: &str) -> Option<&LayoutElement> {
        self.elements
            .iter()
            .find(|element| element.step_id() == Some(step_id))
    }

    /// A connector endpoint: a step or one of the `__start`/`__end` markers.
    pub fn flow_element(&self, id: &str) -> Option<&LayoutElement> {
        self.flow().find(|element| element.id() == id)
    }

    pub fn band(&self, phase_id: &str) -> Option<&BandLayout> {
        self.bands().find(|band| band.phase_id == phase_id)
    }

    pub fn bands(&self) -> impl Iterator<Item = &BandLayout> {
        self.elements.iter().filter_map(|element| match element {
            LayoutElement::Band(band) => Some(band),
            _ => None,
        })
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskLayout> {
        self.elements.iter().filter_map(|element| match element {
            LayoutElement::Task(task) => Some(task),
            _ => None,
        })
    }

    pub fn decisions(&self) -> impl Iterator<Item = &DecisionLayout> {
        self.elements.iter().filter_map(|element| match element {
            LayoutElement::Decision(decision) => Some(decision),
            _ => None,
        })
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerLayout> {
        self.elements.iter().filter_map(|element| match element {
            LayoutElement::Marker(marker) => Some(marker),
            _ => None,
        })
    }

    /// Non-band elements in flow order.
    pub fn flow(&self) -> impl Iterator<Item = &LayoutElement> {
        self.elements.iter().filter(|element| !element.is_band())
    }
}
