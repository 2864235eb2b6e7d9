//! Inquiries domain module (buyer-to-seller messages tied to a product).
//!
//! Deterministic domain logic only; persistence and joins live in
//! `globaltrade-store`.

pub mod inquiry;

pub use inquiry::{
    CounterpartySummary, Inquiry, InquiryDirection, InquiryStatus, InquiryView, NewInquiry,
    ProductSummary,
};
