use super::time::TimeValue;
use serde::{Deserialize, Serialize};

/// One lineage observation from a single posterior tree.
///
/// Times are raw tree units (time before the reference date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineageRecord {
    pub tree_id: String,
    pub evaluation_time: TimeValue,
    pub ancestral_time: TimeValue,
    pub persistence_time: TimeValue,
    pub independence_time: TimeValue,
    /// Location at evaluation time, already ASCII-normalized
    pub state_at_evaluation_time: String,
}

impl LineageRecord {
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            tree_id: self.tree_id.clone(),
            evaluation_time: self.evaluation_time,
            ancestral_time: self.ancestral_time,
            state_at_evaluation_time: self.state_at_evaluation_time.clone(),
        }
    }

    /// `ancestralTime - evaluationTime`
    pub fn anc_eval_diff(&self) -> f64 {
        self.ancestral_time.get() - self.evaluation_time.get()
    }
}

/// Key shared by all records classified together.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupKey {
    pub tree_id: String,
    pub evaluation_time: TimeValue,
    pub ancestral_time: TimeValue,
    pub state_at_evaluation_time: String,
}
