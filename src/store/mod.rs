// ABOUTME: Document store abstraction layer for coupon persistence
// ABOUTME: Trait-based backend selection with MongoDB and in-memory implementations
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Document store abstraction
//!
//! All coupon state lives behind [`CouponStore`]. The trait exposes point
//! queries and single-document writes only; every mutation that depends on
//! current state (token-checked update, redemption) is a single conditional
//! write so there is no read-modify-write window in the backend.
//!
//! Backend selection follows the connection URL: `mongodb://` /
//! `mongodb+srv://` URLs get the MongoDB backend, `memory://` the in-memory
//! backend used by tests and local experiments.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::info;

use crate::config::environment::DatabaseConfig;
use crate::models::{Coupon, CouponChanges, CouponCode};

pub mod memory;
pub mod mongo;

pub use memory::MemoryCouponStore;
pub use mongo::MongoCouponStore;

/// Result of inserting a new coupon
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// The record was written; carries the stored coupon with its assigned id
    Inserted(Coupon),
    /// A coupon with the same code already exists; nothing was written
    DuplicateCode,
}

/// Result of a token-checked partial update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// The record was rewritten; carries the updated coupon
    Updated(Coupon),
    /// No record matched the identifier-and-token condition
    NoMatch,
    /// The change set would assign a code another coupon already holds;
    /// nothing was written
    DuplicateCode,
}

/// Core document store abstraction
///
/// Implementations must make each mutating method atomic with respect to
/// concurrent calls: the condition check and the write happen as one step.
#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Look up a coupon by its code
    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>>;

    /// Return all coupons in the store's natural order
    async fn find_all(&self) -> Result<Vec<Coupon>>;

    /// Insert a new coupon, enforcing code uniqueness
    async fn insert(&self, coupon: Coupon) -> Result<InsertOutcome>;

    /// Look up a coupon by its identifier
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Coupon>>;

    /// Conditionally apply a partial update
    ///
    /// The write happens only if the stored `updatedAt` equals
    /// `expected_token`, and, when the change set clears the redemption
    /// flag, only if the record is not redeemed. Code uniqueness holds on
    /// this path too: a change set assigning another coupon's code is
    /// reported as [`UpdateOutcome::DuplicateCode`] and nothing is written.
    async fn update_if_current(
        &self,
        id: ObjectId,
        expected_token: &str,
        changes: &CouponChanges,
        new_token: &str,
    ) -> Result<UpdateOutcome>;

    /// Conditionally set the redemption flag
    ///
    /// The write happens only if the record exists and `isRedeem` is still
    /// false. Returns the updated record, or `None` if no document matched.
    async fn redeem_if_active(&self, id: ObjectId, new_token: &str) -> Result<Option<Coupon>>;

    /// Atomically find and remove a coupon, returning the removed record
    async fn remove(&self, id: ObjectId) -> Result<Option<Coupon>>;

    /// Check that the store is reachable
    async fn ping(&self) -> Result<()>;
}

/// Connect to the document store selected by the configuration
///
/// This is the startup readiness gate: it resolves only once the backend is
/// reachable and its indexes exist, so no request is served before the store
/// connection succeeds.
///
/// # Errors
///
/// Returns an error if the URL scheme is unsupported or the backend cannot
/// be reached.
pub async fn connect(config: &DatabaseConfig) -> Result<Arc<dyn CouponStore>> {
    if config.url.starts_with("mongodb://") || config.url.starts_with("mongodb+srv://") {
        info!("Initializing MongoDB document store");
        let store = MongoCouponStore::connect(&config.url, &config.database).await?;
        info!("MongoDB document store ready");
        return Ok(Arc::new(store));
    }

    if config.url.starts_with("memory://") {
        info!("Initializing in-memory document store");
        return Ok(Arc::new(MemoryCouponStore::new()));
    }

    Err(anyhow!(
        "unsupported document store URL: {} (expected mongodb://, mongodb+srv://, or memory://)",
        config.url
    ))
}
