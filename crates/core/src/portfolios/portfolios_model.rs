use serde::{Deserialize, Serialize};

/// Investment portfolio as seen by the valuation engine.
///
/// Portfolio lifecycle (create, rename, disable) is owned elsewhere; the engine
/// only needs ownership and the enabled flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub is_enabled: bool,
}
