use crate::{Error, Result};
use persist_types::{GroupKey, GroupSummary, LineageRecord};
use std::collections::BTreeMap;

/// Group records by (treeId, evaluationTime, ancestralTime, stateAtEvaluationTime).
pub fn group_records<'a, I>(records: I) -> BTreeMap<GroupKey, Vec<&'a LineageRecord>>
where
    I: IntoIterator<Item = &'a LineageRecord>,
{
    let mut groups: BTreeMap<GroupKey, Vec<&'a LineageRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.group_key()).or_default().push(record);
    }
    groups
}

/// Count persistent and introduced lineages in one group.
///
/// The threshold `ancEvalDiff` is read from the first row and trusted for
/// the whole group; see [`validate_group`] for the strict check.
pub fn classify_group(rows: &[&LineageRecord]) -> Result<GroupSummary> {
    let first = rows
        .first()
        .ok_or_else(|| Error::DataIntegrity("cannot classify an empty group".to_string()))?;
    let anc_eval_diff = first.anc_eval_diff();

    let mut persistent_at_eval = 0u64;
    let mut introduced_at_eval = 0u64;
    let mut persistent_unique = 0u64;
    let mut introduced_unique = 0u64;

    for row in rows {
        let persistent = row.persistence_time.get() > anc_eval_diff;
        let unique = row.independence_time.get() > anc_eval_diff;

        if persistent {
            persistent_at_eval += 1;
        } else {
            introduced_at_eval += 1;
        }

        match (unique, persistent) {
            (true, true) => persistent_unique += 1,
            (true, false) => introduced_unique += 1,
            (false, _) => {}
        }
    }

    let total_unique = persistent_unique + introduced_unique;
    let prop_persistent_from_unique = if total_unique > 0 {
        persistent_unique as f64 / total_unique as f64
    } else {
        0.0
    };

    Ok(GroupSummary {
        key: first.group_key(),
        anc_eval_diff,
        persistent_at_eval,
        introduced_at_eval,
        persistent_unique,
        introduced_unique,
        prop_persistent_from_unique,
        total_unique,
    })
}

/// Check that every row shares the first row's key and `ancEvalDiff`.
pub fn validate_group(rows: &[&LineageRecord]) -> Result<()> {
    let Some(first) = rows.first() else {
        return Err(Error::DataIntegrity(
            "cannot validate an empty group".to_string(),
        ));
    };
    let key = first.group_key();
    let diff = first.anc_eval_diff();

    for (i, row) in rows.iter().enumerate().skip(1) {
        if row.group_key() != key {
            return Err(Error::DataIntegrity(format!(
                "row {} of group {:?} has key {:?}",
                i,
                key,
                row.group_key()
            )));
        }
        if row.anc_eval_diff() != diff {
            return Err(Error::DataIntegrity(format!(
                "row {} of tree {} has ancEvalDiff {} but the group uses {}",
                i,
                key.tree_id,
                row.anc_eval_diff(),
                diff
            )));
        }
    }
    Ok(())
}

/// Group and classify all records, optionally validating each group first.
pub fn classify_records(records: &[LineageRecord], strict: bool) -> Result<Vec<GroupSummary>> {
    group_records(records)
        .into_values()
        .map(|rows| {
            if strict {
                validate_group(&rows)?;
            }
            classify_group(&rows)
        })
        .collect()
}
