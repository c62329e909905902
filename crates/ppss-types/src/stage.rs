//! Workflow stage and stage summary types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::message::MessageRole;

/// A named phase of the participation workflow.
///
/// Each stage has its own per-session conversation namespace and its own
/// summary log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    ProblemDefinition,
    DataAnalysis,
    DesignGeneration,
}

impl Stage {
    pub const ALL: [Stage; 3] = [
        Stage::ProblemDefinition,
        Stage::DataAnalysis,
        Stage::DesignGeneration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::ProblemDefinition => "problem-definition",
            Stage::DataAnalysis => "data-analysis",
            Stage::DesignGeneration => "design-generation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| format!("unknown stage: '{s}'"))
    }
}

/// A generated cross-user summary for a stage.
///
/// Append-only: the current summary for a stage is the most recent record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub stage: Stage,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

/// One line of the flattened cross-session transcript of a stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTranscriptEntry {
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
}

impl fmt::Display for StageTranscriptEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.session_id, self.role, self.content)
    }
}
