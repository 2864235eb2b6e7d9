use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use globaltrade_core::{DomainError, InquiryId, ProductId, UserId};
use globaltrade_profiles::{Profile, UserType};

/// Inquiry thread status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Pending,
    Responded,
    Negotiating,
    Closed,
}

impl InquiryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InquiryStatus::Pending => "pending",
            InquiryStatus::Responded => "responded",
            InquiryStatus::Negotiating => "negotiating",
            InquiryStatus::Closed => "closed",
        }
    }
}

impl core::fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for InquiryStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InquiryStatus::Pending),
            "responded" => Ok(InquiryStatus::Responded),
            "negotiating" => Ok(InquiryStatus::Negotiating),
            "closed" => Ok(InquiryStatus::Closed),
            other => Err(DomainError::validation(format!(
                "status must be one of: pending, responded, negotiating, closed; got '{other}'"
            ))),
        }
    }
}

/// A buyer-to-seller message record tied to a specific product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inquiry {
    pub id: InquiryId,
    pub product_id: ProductId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub message: String,
    pub quantity: Option<i32>,
    pub target_price: Option<f64>,
    pub currency: String,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
}

/// Inquiry submission payload. The seller id comes from the product row, not
/// from the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInquiry {
    pub product_id: ProductId,
    pub buyer_id: UserId,
    pub seller_id: UserId,
    pub message: String,
    pub quantity: Option<i32>,
    pub target_price: Option<f64>,
    pub currency: String,
}

impl NewInquiry {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.message.trim().is_empty() {
            return Err(DomainError::validation("message cannot be empty"));
        }
        Ok(())
    }

    /// Materialize the stored row. New inquiries always start pending.
    pub fn into_inquiry(self, id: InquiryId, created_at: DateTime<Utc>) -> Inquiry {
        Inquiry {
            id,
            product_id: self.product_id,
            buyer_id: self.buyer_id,
            seller_id: self.seller_id,
            message: self.message,
            quantity: self.quantity,
            target_price: self.target_price,
            currency: self.currency,
            status: InquiryStatus::Pending,
            created_at,
        }
    }
}

/// Which side of an inquiry a listing request looks at: buyers see what they
/// sent, sellers see what they received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InquiryDirection {
    SentBy(UserId),
    ReceivedBy(UserId),
}

impl InquiryDirection {
    /// Direction for the dashboard of the given profile.
    pub fn for_profile(profile: &Profile) -> Self {
        match profile.user_type {
            UserType::Buyer => InquiryDirection::SentBy(profile.id),
            UserType::Seller => InquiryDirection::ReceivedBy(profile.id),
        }
    }

    /// Does this inquiry belong to the direction's result set?
    pub fn includes(&self, inquiry: &Inquiry) -> bool {
        match self {
            InquiryDirection::SentBy(buyer) => inquiry.buyer_id == *buyer,
            InquiryDirection::ReceivedBy(seller) => inquiry.seller_id == *seller,
        }
    }

    /// The counterparty whose profile gets joined onto the view.
    pub fn counterparty_of(&self, inquiry: &Inquiry) -> UserId {
        match self {
            InquiryDirection::SentBy(_) => inquiry.seller_id,
            InquiryDirection::ReceivedBy(_) => inquiry.buyer_id,
        }
    }
}

/// Product fields joined onto an inquiry for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub title: String,
    pub price: Option<f64>,
    pub currency: String,
}

/// Counterparty profile fields joined onto an inquiry for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartySummary {
    pub company_name: Option<String>,
    pub full_name: Option<String>,
    pub verified: bool,
}

/// An inquiry row joined with its product and counterparty profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquiryView {
    pub inquiry: Inquiry,
    pub product: Option<ProductSummary>,
    pub counterparty: Option<CounterpartySummary>,
}
