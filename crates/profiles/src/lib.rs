//! Profiles domain module (buyer and seller accounts).
//!
//! This crate contains business rules for marketplace profiles, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod profile;

pub use profile::{NewProfile, Profile, UserType};
