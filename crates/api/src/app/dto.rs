use chrono::NaiveDate;
use serde::Serialize;

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub version: &'static str,
    /// Pinned evaluation date, if any; otherwise discounts use today (UTC).
    pub reference_date: Option<NaiveDate>,
    pub endpoints: Vec<EndpointInfo>,
}

pub const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("GET", "/health", "liveness check"),
    ("GET", "/api/discounts", "ranked discount strategy for the current inventory"),
    ("GET", "/api/forecast", "7-day replenishment forecast per product"),
    ("POST", "/api/products", "register a product in the inventory"),
];

impl ServiceInfo {
    pub fn new(reference_date: Option<NaiveDate>) -> Self {
        Self {
            service: "shelfwise",
            version: env!("CARGO_PKG_VERSION"),
            reference_date,
            endpoints: ENDPOINTS
                .iter()
                .map(|&(method, path, description)| EndpointInfo {
                    method,
                    path,
                    description,
                })
                .collect(),
        }
    }
}
