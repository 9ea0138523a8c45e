use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{EntityModel, Result};

/// The lifecycle state of a study.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyState {
    Enabled,
    Disabled,
    Retired,
}

/// An annotation type attached to the participants of a study.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationType {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value_count: Option<u32>,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub required: bool,
}

impl AnnotationType {
    /// An annotation type without an ID has not been added to the server yet.
    pub fn is_new(&self) -> bool {
        self.id.is_none()
    }
}

/// A collection of participants and specimens gathered for one research study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub id: String,
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_added: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_modified: Option<String>,
    pub slug: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The annotation types associated with the participants of this study.
    #[serde(default)]
    pub annotation_types: Vec<AnnotationType>,
    pub state: StudyState,
}

impl Study {
    pub fn is_enabled(&self) -> bool {
        self.state == StudyState::Enabled
    }

    pub fn is_disabled(&self) -> bool {
        self.state == StudyState::Disabled
    }

    pub fn is_retired(&self) -> bool {
        self.state == StudyState::Retired
    }
}

impl EntityModel for Study {
    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Counts of studies indexed by state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyCounts {
    pub total: u64,
    pub enabled_count: u64,
    pub disabled_count: u64,
    pub retired_count: u64,
}

/// The fields required to add a new study.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyToAdd {
    pub name: String,
    pub description: Option<String>,
}

/// Parses a study from the server's JSON representation.
pub fn parse_study(raw: Value) -> Result<Study> {
    Ok(serde_json::from_value(raw)?)
}

/// Parses study counts from the server's JSON representation.
pub fn parse_study_counts(raw: Value) -> Result<StudyCounts> {
    Ok(serde_json::from_value(raw)?)
}
