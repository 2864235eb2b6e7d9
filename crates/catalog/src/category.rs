use serde::{Deserialize, Serialize};

use globaltrade_core::CategoryId;

/// Product category lookup row. Read-only reference data, listed ordered by
/// name for the filter dropdowns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}
