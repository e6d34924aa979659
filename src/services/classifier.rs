use crate::error::{Error, Result};
use crate::services::inventory::InventoryTable;
use std::collections::{BTreeSet, HashSet};
use tracing::info;

/// Default cutoff for "low" inventory; a count of 0 or less is "zero".
pub const DEFAULT_LOW_THRESHOLD: i64 = 2;

/// Classification results accumulated over one application run, plus the
/// activity counters the shutdown log reports. Constructed fresh per session
/// and passed explicitly to each classification call.
#[derive(Debug, Default)]
pub struct SessionState {
    zeros: BTreeSet<String>,
    lows: BTreeSet<String>,
    dno_changes: usize,
    mutated: bool,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zeros(&self) -> &BTreeSet<String> {
        &self.zeros
    }

    pub fn lows(&self) -> &BTreeSet<String> {
        &self.lows
    }

    /// Snapshot of the zero set as a replay queue.
    pub fn zero_queue(&self) -> Vec<String> {
        self.zeros.iter().cloned().collect()
    }

    /// Snapshot of the low set as a replay queue.
    pub fn low_queue(&self) -> Vec<String> {
        self.lows.iter().cloned().collect()
    }

    pub fn dno_changes(&self) -> usize {
        self.dno_changes
    }

    /// Count DNO store mutations (imports, adds, removes) toward the session
    /// log. Zero-count calls do not mark activity.
    pub fn record_dno_changes(&mut self, count: usize) {
        if count > 0 {
            self.dno_changes += count;
            self.mutated = true;
        }
    }

    pub fn mark_activity(&mut self) {
        self.mutated = true;
    }

    /// Whether any mutating action happened this session (drives whether the
    /// shutdown log line is written at all).
    pub fn has_activity(&self) -> bool {
        self.mutated
    }
}

/// The configured low cutoff: `LOW_STOCK_THRESHOLD` from the environment (a
/// `.env` file is honored), falling back to the default.
pub fn low_threshold() -> i64 {
    let _ = dotenvy::dotenv();
    std::env::var("LOW_STOCK_THRESHOLD")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(DEFAULT_LOW_THRESHOLD)
}

/// Union every article with non-positive inventory into the session zero set,
/// excluding DNO members as of this call. The set accumulates across calls
/// and never shrinks. Returns the updated set size.
pub fn find_zeros(
    table: &InventoryTable,
    dno: &HashSet<String>,
    session: &mut SessionState,
) -> Result<usize> {
    if table.is_empty() {
        return Err(Error::EmptyInventory);
    }
    for record in table.rows() {
        if record.inventory_count <= 0 && !dno.contains(&record.article) {
            session.zeros.insert(record.article.clone());
        }
    }
    session.mutated = true;
    info!(zeros = session.zeros.len(), "zero-stock classification complete");
    Ok(session.zeros.len())
}

/// Union every article with positive inventory at or below the threshold into
/// the session low set. Lows are deliberately NOT filtered by DNO membership.
/// Returns the updated set size.
pub fn find_lows(
    table: &InventoryTable,
    threshold: i64,
    session: &mut SessionState,
) -> Result<usize> {
    if table.is_empty() {
        return Err(Error::EmptyInventory);
    }
    for record in table.rows() {
        if record.inventory_count > 0 && record.inventory_count <= threshold {
            session.lows.insert(record.article.clone());
        }
    }
    session.mutated = true;
    info!(lows = session.lows.len(), "low-stock classification complete");
    Ok(session.lows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InventoryRecord;

    fn table_with(rows: &[(&str, i64)]) -> InventoryTable {
        let mut table = InventoryTable::new();
        table.ingest(
            rows.iter()
                .map(|(article, count)| InventoryRecord {
                    department: "Grocery".to_string(),
                    merchandise_category: "Produce".to_string(),
                    description: format!("item {}", article),
                    article: article.to_string(),
                    inventory_count: *count,
                })
                .collect(),
        );
        table
    }

    #[test]
    fn classify_before_any_upload_is_rejected() {
        let table = InventoryTable::new();
        let mut session = SessionState::new();
        assert!(matches!(
            find_zeros(&table, &HashSet::new(), &mut session),
            Err(Error::EmptyInventory)
        ));
        assert!(matches!(
            find_lows(&table, DEFAULT_LOW_THRESHOLD, &mut session),
            Err(Error::EmptyInventory)
        ));
    }

    #[test]
    fn zeros_exclude_dno_members_at_call_time() {
        let table = table_with(&[("1001", 0), ("1002", -1)]);
        let dno = HashSet::from(["1001".to_string()]);
        let mut session = SessionState::new();

        let count = find_zeros(&table, &dno, &mut session).unwrap();
        assert_eq!(count, 1);
        assert!(session.zeros().contains("1002"));
        assert!(!session.zeros().contains("1001"));
    }

    #[test]
    fn lows_are_not_filtered_by_dno_membership() {
        let table = table_with(&[("1001", 1)]);
        let mut session = SessionState::new();

        // 1001 is in the DNO store, but lows ignore that.
        let count = find_lows(&table, DEFAULT_LOW_THRESHOLD, &mut session).unwrap();
        assert_eq!(count, 1);
        assert!(session.lows().contains("1001"));
    }

    #[test]
    fn sets_accumulate_across_calls_and_never_shrink() {
        let mut session = SessionState::new();
        let dno = HashSet::new();

        let first = table_with(&[("1001", 0)]);
        find_zeros(&first, &dno, &mut session).unwrap();

        // A later upload without 1001 does not evict it from the zero set.
        let second = table_with(&[("1002", 0)]);
        find_zeros(&second, &dno, &mut session).unwrap();
        assert_eq!(session.zeros().len(), 2);
    }

    #[test]
    fn produce_scenario_splits_zeros_and_lows() {
        let mut table = InventoryTable::new();
        table.ingest(
            [("Apple", "1001", 0), ("Pear", "1002", 2), ("Plum", "1003", 5)]
                .iter()
                .map(|(desc, article, count)| InventoryRecord {
                    department: "Grocery".to_string(),
                    merchandise_category: "Produce".to_string(),
                    description: desc.to_string(),
                    article: article.to_string(),
                    inventory_count: *count,
                })
                .collect(),
        );
        let dno = HashSet::from(["1001".to_string()]);
        let mut session = SessionState::new();

        let zeros = find_zeros(&table, &dno, &mut session).unwrap();
        let lows = find_lows(&table, 2, &mut session).unwrap();

        assert_eq!(zeros, 0);
        assert!(session.zeros().is_empty());
        assert_eq!(lows, 1);
        assert!(session.lows().contains("1002"));
    }

    #[test]
    fn dno_change_bookkeeping_marks_activity() {
        let mut session = SessionState::new();
        assert!(!session.has_activity());
        session.record_dno_changes(0);
        assert!(!session.has_activity());
        session.record_dno_changes(3);
        session.record_dno_changes(1);
        assert_eq!(session.dno_changes(), 4);
        assert!(session.has_activity());
    }
}
