use serde::{Deserialize, Serialize};

/// One accumulated inventory row (after the ban filter, deduplicated by
/// article; last upload wins).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub department: String,
    pub merchandise_category: String,
    pub description: String,
    pub article: String,
    pub inventory_count: i64,
}
