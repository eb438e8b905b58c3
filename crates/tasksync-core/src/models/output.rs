use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::NodeId;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultItemType {
    Output,
    Temp,
    Input,
}

/// A file produced (or consumed) by a node, addressed the way the view
/// endpoint expects it.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct ResultItem {
    pub filename: String,
    #[serde(default)]
    pub subfolder: String,
    #[serde(rename = "type")]
    pub kind: ResultItemType,
}

/// The job table's single lightweight artifact has the same shape as a full
/// output item.
pub type PreviewOutput = ResultItem;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeOutput {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ResultItem>,
    /// Media kinds other than images (audio, video, text) are passed through untouched.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl NodeOutput {
    pub fn images(images: Vec<ResultItem>) -> Self {
        Self {
            images,
            other: Map::new(),
        }
    }
}

pub type TaskOutput = BTreeMap<NodeId, NodeOutput>;
