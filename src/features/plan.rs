//! AI study plans.
//!
//! The backend returns a loosely shaped JSON plan. [`PlanView`] reads the
//! parts the client displays and tolerates everything else.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::StudyPlan;

/// Whether a plan came from the real model or the backend's fallback generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AiMode {
    Real,
    Mock,
}

impl std::fmt::Display for AiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Real => write!(f, "real"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

/// Kind of a study block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Study,
    Break,
    #[serde(other)]
    Other,
}

/// One entry of the plan's schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyBlock {
    #[serde(default)]
    pub activity: String,
    #[serde(default)]
    pub duration: u32,
    #[serde(rename = "type", default = "default_block_kind")]
    pub kind: BlockKind,
    #[serde(default)]
    pub description: String,
}

const fn default_block_kind() -> BlockKind {
    BlockKind::Study
}

/// The displayable parts of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanView {
    pub study_blocks: Vec<StudyBlock>,
    pub focus_techniques: Vec<String>,
    pub resource_recommendations: Vec<String>,
    pub distraction_management: Vec<String>,
    ai_mode: Option<String>,
    mock_mode: Option<bool>,
}

impl PlanView {
    /// Read a plan. Fields of the wrong shape are treated as missing.
    #[must_use]
    pub fn from_plan(plan: &StudyPlan) -> Self {
        serde_json::from_value(plan.raw.clone()).unwrap_or_else(|_| Self::lenient(&plan.raw))
    }

    fn lenient(raw: &Value) -> Self {
        let field = |name: &str| raw.get(name).cloned().unwrap_or(Value::Null);
        Self {
            study_blocks: field("study_blocks")
                .as_array()
                .map(|blocks| {
                    blocks
                        .iter()
                        .filter_map(|b| serde_json::from_value(b.clone()).ok())
                        .collect()
                })
                .unwrap_or_default(),
            focus_techniques: string_list(&field("focus_techniques")),
            resource_recommendations: string_list(&field("resource_recommendations")),
            distraction_management: string_list(&field("distraction_management")),
            ai_mode: field("ai_mode").as_str().map(ToString::to_string),
            mock_mode: field("mock_mode").as_bool(),
        }
    }

    /// Only an explicit `"ai_mode": "real"` counts as the real model.
    #[must_use]
    pub fn ai_mode(&self) -> AiMode {
        match (self.ai_mode.as_deref(), self.mock_mode) {
            (Some("real"), _) => AiMode::Real,
            _ => AiMode::Mock,
        }
    }

    /// Minutes of study (not break) time in the schedule.
    #[must_use]
    pub fn study_minutes(&self) -> u32 {
        self.study_blocks
            .iter()
            .filter(|b| b.kind == BlockKind::Study)
            .map(|b| b.duration)
            .sum()
    }

    #[must_use]
    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            ai_mode: self.ai_mode(),
            study_blocks: self.study_blocks.len(),
            focus_techniques: self.focus_techniques.len(),
        }
    }
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Counts reported after generating a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlanSummary {
    pub ai_mode: AiMode,
    pub study_blocks: usize,
    pub focus_techniques: usize,
}
