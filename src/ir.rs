use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessDescription {
    #[serde(default)]
    pub title: Option<String>,
    pub phases: Vec<Phase>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phase {
    pub id: String,
    pub name: String,
    #[serde(default = "default_phase_color")]
    pub color: String,
    #[serde(default)]
    pub steps: Vec<Step>,
    #[serde(default, rename = "estimationBlocks", alias = "estimation_blocks")]
    pub estimation_blocks: Vec<EstimationBlock>,
}

fn default_phase_color() -> String {
    "#4C78A8".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimationBlock {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(rename = "stepIds", alias = "step_ids", alias = "steps")]
    pub step_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub name: String,
    #[serde(default, rename = "actionTypes", alias = "action_types", alias = "types")]
    pub action_types: Vec<String>,
    #[serde(default, alias = "isDecision")]
    pub decision: bool,
    #[serde(default)]
    pub resolution: Option<DecisionResolution>,
    #[serde(default, rename = "errorLoop", alias = "error_loop")]
    pub error_loop: Option<ErrorLoop>,
    #[serde(default, rename = "hiddenActions", alias = "hidden_actions")]
    pub hidden_actions: Vec<HiddenAction>,
}

/// Selected outcome shown inside a resolved decision diamond.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResolution {
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorLoop {
    pub condition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiddenAction {
    pub description: String,
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: String,
}

impl Step {
    pub fn task(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            action_types: Vec::new(),
            decision: false,
            resolution: None,
            error_loop: None,
            hidden_actions: Vec::new(),
        }
    }

    pub fn decision(id: &str, name: &str) -> Self {
        Self {
            decision: true,
            ..Self::task(id, name)
        }
    }

    pub fn has_detail(&self) -> bool {
        !self.hidden_actions.is_empty() || self.error_loop.is_some()
    }
}

impl Phase {
    pub fn new(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
            steps: Vec::new(),
            estimation_blocks: Vec::new(),
        }
    }
}

impl ProcessDescription {
    pub fn steps(&self) -> impl Iterator<Item = &Step> {
        self.phases.iter().flat_map(|phase| phase.steps.iter())
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps().find(|step| step.id == id)
    }

    pub fn estimation_blocks(&self) -> impl Iterator<Item = &EstimationBlock> {
        self.phases
            .iter()
            .flat_map(|phase| phase.estimation_blocks.iter())
    }
}

/// Step ids whose hidden actions are currently revealed.
///
/// Owned by a rendering session; ids with no matching step are kept but have
/// no effect on layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExpansionState {
    expanded: BTreeSet<String>,
}

impl ExpansionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, step_id: &str) -> bool {
        self.expanded.contains(step_id)
    }

    /// Flips membership and returns the new state of `step_id`.
    pub fn toggle(&mut self, step_id: &str) -> bool {
        if self.expanded.remove(step_id) {
            false
        } else {
            self.expanded.insert(step_id.to_string());
            true
        }
    }

    pub fn expand(&mut self, step_id: &str) {
        self.expanded.insert(step_id.to_string());
    }

    pub fn collapse(&mut self, step_id: &str) {
        self.expanded.remove(step_id);
    }

    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.expanded.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExpansionState {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            expanded: iter.into_iter().map(|id| id.as_ref().to_string()).collect(),
        }
    }
}
