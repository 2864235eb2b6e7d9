use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};

use globaltrade_core::{DomainError, UserId};

/// Account kind: buyer or seller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Buyer,
    Seller,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Buyer => "buyer",
            UserType::Seller => "seller",
        }
    }
}

impl core::fmt::Display for UserType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buyer" => Ok(UserType::Buyer),
            "seller" => Ok(UserType::Seller),
            other => Err(DomainError::validation(format!(
                "user_type must be 'buyer' or 'seller', got '{other}'"
            ))),
        }
    }
}

/// A registered marketplace account.
///
/// Keyed by the authenticated user's id; exactly one profile per user, created
/// at signup and read-only afterwards. The `verified` flag is set by an
/// out-of-band review process, never by the account holder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: UserId,
    pub user_type: UserType,
    pub company_name: Option<String>,
    pub full_name: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub description: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

impl Profile {
    pub fn is_seller(&self) -> bool {
        self.user_type == UserType::Seller
    }

    /// Name shown in greetings and inquiry threads: the personal name when
    /// present, otherwise the company name.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.company_name.as_deref())
            .unwrap_or("")
    }
}

/// Signup payload for a new profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    pub user_id: UserId,
    pub user_type: UserType,
    pub full_name: Option<String>,
    pub company_name: Option<String>,
    pub country: Option<String>,
}

impl NewProfile {
    /// Validate the signup payload. A profile needs at least one display name;
    /// everything else is optional at signup.
    pub fn validate(&self) -> Result<(), DomainError> {
        let has_name = self
            .full_name
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());
        let has_company = self
            .company_name
            .as_deref()
            .is_some_and(|s| !s.trim().is_empty());

        if !has_name && !has_company {
            return Err(DomainError::validation(
                "full_name or company_name is required",
            ));
        }
        Ok(())
    }

    /// Materialize the stored row. New profiles always start unverified.
    pub fn into_profile(self, created_at: DateTime<Utc>) -> Profile {
        Profile {
            id: self.user_id,
            user_type: self.user_type,
            company_name: self.company_name,
            full_name: self.full_name,
            country: self.country,
            city: None,
            phone: None,
            website: None,
            description: None,
            verified: false,
            created_at,
        }
    }
}
