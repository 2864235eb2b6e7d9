//! Tariffs domain module (import duty estimation, tariff reference data).
//!
//! The calculator is a pure function over form inputs; the reference rates are
//! read-only rows backing the tariffs overview.

pub mod duty;
pub mod rate;

pub use duty::{DutyBreakdown, DutyInput, round2};
pub use rate::TariffRate;
