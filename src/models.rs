// ABOUTME: Coupon data model and wire representations
// ABOUTME: Defines the stored record, the code variants, and the update change set
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Coupon data model
//!
//! A coupon is the sole managed record: a redeemable code with a validity
//! date, a redemption flag, and a server-assigned `updatedAt` timestamp that
//! doubles as the optimistic-concurrency token.

use chrono::{SecondsFormat, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Inclusive range for client-supplied numeric coupon codes
pub const CODE_MIN: i64 = 10_000;
/// Inclusive upper bound for client-supplied numeric coupon codes
pub const CODE_MAX: i64 = 9_999_999;

/// A coupon code, either client-supplied or server-generated
///
/// Deployments run one policy or the other (see
/// [`CodePolicy`](crate::config::environment::CodePolicy)); a single record
/// never carries both shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CouponCode {
    /// Client-supplied numeric code in `[CODE_MIN, CODE_MAX]`, unique across coupons
    Numeric(i64),
    /// Server-generated unique token (time-ordered UUID)
    Token(String),
}

impl CouponCode {
    /// Generate a fresh server-side token code
    #[must_use]
    pub fn generate() -> Self {
        Self::Token(uuid::Uuid::now_v7().to_string())
    }
}

impl std::fmt::Display for CouponCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Token(t) => write!(f, "{t}"),
        }
    }
}

/// The stored coupon record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Store-assigned identifier, immutable once created
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Coupon code; `None` only transiently before the server assigns one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CouponCode>,
    /// Validity date in `DD/MM/YYYY` form (pattern-checked, not calendar-checked)
    pub date: String,
    /// Redemption flag; transitions only false -> true
    pub is_redeem: bool,
    /// Server-assigned RFC 3339 timestamp; the optimistic-concurrency token
    pub updated_at: String,
}

/// Fields a partial update may change
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CouponChanges {
    pub code: Option<CouponCode>,
    pub date: Option<String>,
    pub is_redeem: Option<bool>,
}

impl CouponChanges {
    /// Whether this change set attempts to clear the redemption flag
    #[must_use]
    pub fn clears_redemption(&self) -> bool {
        self.is_redeem == Some(false)
    }
}

/// Produce a fresh concurrency token
///
/// Microsecond precision keeps consecutive mutations of the same record from
/// colliding on the same token value.
#[must_use]
pub fn new_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
