// ABOUTME: In-memory backend for the coupon document store
// ABOUTME: Mirrors the MongoDB backend's conditional-write semantics for tests
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! In-memory document store backend
//!
//! Every mutation runs under one write lock, which gives the same
//! atomic-conditional-write guarantees the MongoDB backend gets from
//! `findOneAndUpdate` and the unique index.

use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{CouponStore, InsertOutcome, UpdateOutcome};
use crate::models::{Coupon, CouponChanges, CouponCode};

/// In-memory coupon store for tests and local development
#[derive(Default)]
pub struct MemoryCouponStore {
    coupons: RwLock<Vec<Coupon>>,
}

impl MemoryCouponStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CouponStore for MemoryCouponStore {
    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>> {
        let coupons = self.coupons.read().await;
        Ok(coupons
            .iter()
            .find(|c| c.code.as_ref() == Some(code))
            .cloned())
    }

    async fn find_all(&self) -> Result<Vec<Coupon>> {
        Ok(self.coupons.read().await.clone())
    }

    async fn insert(&self, mut coupon: Coupon) -> Result<InsertOutcome> {
        let mut coupons = self.coupons.write().await;

        // Same rule the MongoDB unique sparse index enforces.
        if let Some(code) = &coupon.code {
            if coupons.iter().any(|c| c.code.as_ref() == Some(code)) {
                return Ok(InsertOutcome::DuplicateCode);
            }
        }

        coupon.id = Some(ObjectId::new());
        coupons.push(coupon.clone());
        Ok(InsertOutcome::Inserted(coupon))
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Coupon>> {
        let coupons = self.coupons.read().await;
        Ok(coupons.iter().find(|c| c.id == Some(id)).cloned())
    }

    async fn update_if_current(
        &self,
        id: ObjectId,
        expected_token: &str,
        changes: &CouponChanges,
        new_token: &str,
    ) -> Result<UpdateOutcome> {
        let mut coupons = self.coupons.write().await;

        // Match first, uniqueness second: the MongoDB backend only hits the
        // unique index once its filter has selected a document.
        let matches = |c: &Coupon| {
            c.id == Some(id)
                && c.updated_at == expected_token
                && !(changes.clears_redemption() && c.is_redeem)
        };
        if !coupons.iter().any(|c| matches(c)) {
            return Ok(UpdateOutcome::NoMatch);
        }

        // Same rule the MongoDB unique sparse index enforces on update.
        if let Some(code) = &changes.code {
            if coupons
                .iter()
                .any(|c| c.id != Some(id) && c.code.as_ref() == Some(code))
            {
                return Ok(UpdateOutcome::DuplicateCode);
            }
        }

        let Some(coupon) = coupons.iter_mut().find(|c| matches(c)) else {
            return Ok(UpdateOutcome::NoMatch);
        };

        if let Some(code) = &changes.code {
            coupon.code = Some(code.clone());
        }
        if let Some(date) = &changes.date {
            coupon.date = date.clone();
        }
        if let Some(flag) = changes.is_redeem {
            coupon.is_redeem = flag;
        }
        coupon.updated_at = new_token.to_owned();

        Ok(UpdateOutcome::Updated(coupon.clone()))
    }

    async fn redeem_if_active(&self, id: ObjectId, new_token: &str) -> Result<Option<Coupon>> {
        let mut coupons = self.coupons.write().await;

        let Some(coupon) = coupons
            .iter_mut()
            .find(|c| c.id == Some(id) && !c.is_redeem)
        else {
            return Ok(None);
        };

        coupon.is_redeem = true;
        coupon.updated_at = new_token.to_owned();
        Ok(Some(coupon.clone()))
    }

    async fn remove(&self, id: ObjectId) -> Result<Option<Coupon>> {
        let mut coupons = self.coupons.write().await;
        let position = coupons.iter().position(|c| c.id == Some(id));
        Ok(position.map(|index| coupons.remove(index)))
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
