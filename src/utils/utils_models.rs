use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// Query for the date-scoped daily entry routes
#[derive(Debug, Serialize, Deserialize, IntoParams)]
pub struct VisitDateQuery {
    /// Visit date, YYYY-MM-DD
    pub date: String,
}

// Custom message to return in routes when needed
#[derive(serde::Serialize, utoipa::ToSchema)]
pub struct CustomMessage {
    pub message: String,
    pub code: u16,
}

// Response for /projects/{id}/equipment-counts
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviousEquipmentCount {
    pub equipment_id: String,
    pub count: i32,
}
