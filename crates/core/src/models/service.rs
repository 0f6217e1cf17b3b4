use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookable repair service. The engine only cares about
/// `duration_minutes` and `is_active`; naming and pricing are rendered
/// by the chat layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub duration_minutes: i64,
    pub price: Option<f64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
