use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use globaltrade_core::TariffRateId;

/// Published tariff rate for an HS code on a trade lane. Read-only reference
/// data; the overview shows the most recently updated rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffRate {
    pub id: TariffRateId,
    pub hs_code: String,
    pub description: Option<String>,
    pub origin_country: String,
    pub destination_country: String,
    /// Base tariff rate, percent.
    pub base_rate: f64,
    /// Additional duties, percent.
    pub additional_duties: f64,
    pub last_updated: DateTime<Utc>,
}
