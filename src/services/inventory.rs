use crate::models::departments::{group_for_department, is_banned_category, DEPARTMENT_GROUPS};
use crate::types::InventoryRecord;
use std::collections::HashMap;
use tracing::info;

/// In-memory inventory accumulated across uploads. One record per article
/// (last upload wins); rows in banned merchandise categories are dropped at
/// ingestion and never re-evaluated.
pub struct InventoryTable {
    rows: HashMap<String, InventoryRecord>,
    lights: HashMap<String, bool>,
}

impl InventoryTable {
    pub fn new() -> Self {
        let lights = DEPARTMENT_GROUPS
            .iter()
            .map(|(group, _)| (group.to_string(), false))
            .collect();
        InventoryTable {
            rows: HashMap::new(),
            lights,
        }
    }

    /// Merge parsed rows into the table. Department lights are marked from
    /// every row, including ones the ban filter then drops. Returns the
    /// logical groups newly observed in this call.
    pub fn ingest(&mut self, rows: Vec<InventoryRecord>) -> Vec<String> {
        let mut newly_lit = Vec::new();
        let mut banned = 0usize;
        let mut kept = 0usize;
        for record in rows {
            if let Some(group) = group_for_department(&record.department) {
                if let Some(lit) = self.lights.get_mut(group) {
                    if !*lit {
                        *lit = true;
                        newly_lit.push(group.to_string());
                    }
                }
            }
            if is_banned_category(&record.merchandise_category) {
                banned += 1;
                continue;
            }
            kept += 1;
            self.rows.insert(record.article.clone(), record);
        }
        info!(kept, banned, total = self.rows.len(), "ingested inventory upload");
        newly_lit
    }

    /// True until the first upload that leaves at least one row behind.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Accumulated rows; iteration order carries no meaning.
    pub fn rows(&self) -> impl Iterator<Item = &InventoryRecord> {
        self.rows.values()
    }

    pub fn lights(&self) -> &HashMap<String, bool> {
        &self.lights
    }
}

impl Default for InventoryTable {
    fn default() -> Self {
        Self::new()
    }
}
