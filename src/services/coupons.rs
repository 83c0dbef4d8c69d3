// ABOUTME: Store-agnostic coupon domain operations with typed error results
// ABOUTME: Implements create, list, get, update, delete, and redeem semantics
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Coupon domain operations
//!
//! All six operations live here, independent of the HTTP layer. Handlers
//! pass raw JSON payloads in; validation, code policy, uniqueness, and the
//! optimistic-concurrency rules are applied here, and every outcome is a
//! typed [`AppError`] mapped to a transport status only at the boundary.

use mongodb::bson::oid::ObjectId;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::environment::CodePolicy;
use crate::errors::{AppError, AppResult};
use crate::models::{new_timestamp, Coupon, CouponChanges, CouponCode};
use crate::store::{CouponStore, InsertOutcome, UpdateOutcome};
use crate::validation::{create_rules, update_rules, validate};

/// Validated create payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateCouponPayload {
    code: Option<i64>,
    date: String,
    is_redeem: bool,
    // A client-sent updatedAt passes validation but is ignored here; the
    // server always assigns the initial token itself.
}

/// Validated update payload
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCouponPayload {
    code: Option<i64>,
    date: Option<String>,
    is_redeem: Option<bool>,
    updated_at: String,
}

/// Coupon domain operations over an injected document store
#[derive(Clone)]
pub struct CouponOperations {
    store: Arc<dyn CouponStore>,
    code_policy: CodePolicy,
}

impl CouponOperations {
    /// Create the operations service with its store dependency
    #[must_use]
    pub fn new(store: Arc<dyn CouponStore>, code_policy: CodePolicy) -> Self {
        Self { store, code_policy }
    }

    /// The configured code assignment policy
    #[must_use]
    pub const fn code_policy(&self) -> CodePolicy {
        self.code_policy
    }

    /// Create a new coupon from a raw JSON payload
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` with the full violation list for schema problems
    /// - `DuplicateCode` when a client-supplied code already exists
    /// - `DatabaseError` for store failures
    pub async fn create(&self, payload: &serde_json::Value) -> AppResult<Coupon> {
        let rules = create_rules(self.code_policy);
        validate(payload, &rules).map_err(AppError::validation)?;

        let request: CreateCouponPayload = serde_json::from_value(payload.clone())
            .map_err(|e| AppError::internal("payload deserialization failed").with_source(e))?;

        let code = match self.code_policy {
            CodePolicy::ClientSupplied => {
                // Validation guarantees presence under this policy.
                let numeric = request
                    .code
                    .ok_or_else(|| AppError::internal("validated payload missing code"))?;
                let code = CouponCode::Numeric(numeric);
                if self
                    .store
                    .find_by_code(&code)
                    .await
                    .map_err(AppError::from)?
                    .is_some()
                {
                    return Err(AppError::duplicate_code(numeric));
                }
                code
            }
            CodePolicy::ServerGenerated => CouponCode::generate(),
        };

        let coupon = Coupon {
            id: None,
            code: Some(code),
            date: request.date,
            is_redeem: request.is_redeem,
            updated_at: new_timestamp(),
        };

        match self.store.insert(coupon).await.map_err(AppError::from)? {
            InsertOutcome::Inserted(stored) => {
                info!(code = %display_code(&stored), "coupon created");
                Ok(stored)
            }
            // A racing create beat us between the pre-read and the insert;
            // the store's uniqueness rule caught it.
            InsertOutcome::DuplicateCode => match request.code {
                Some(numeric) => Err(AppError::duplicate_code(numeric)),
                None => Err(AppError::internal("generated coupon token collided")),
            },
        }
    }

    /// List all coupons
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` for store failures.
    pub async fn list(&self) -> AppResult<Vec<Coupon>> {
        self.store.find_all().await.map_err(AppError::from)
    }

    /// Fetch a coupon by its identifier
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a malformed identifier
    /// - `ResourceNotFound` when no record matches
    pub async fn get(&self, id: &str) -> AppResult<Coupon> {
        let id = parse_id(id)?;
        self.store
            .find_by_id(id)
            .await
            .map_err(AppError::from)?
            .ok_or_else(|| AppError::not_found("coupon"))
    }

    /// Apply a partial update guarded by the optimistic-concurrency token
    ///
    /// The write is one conditional store call matching both the identifier
    /// and the submitted `updatedAt`; a failed match is disambiguated with a
    /// follow-up read.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` for schema problems; under the server-generated
    ///   code policy a client-sent `code` is rejected here, same as on create
    /// - `ResourceNotFound` when no record matches the identifier
    /// - `StaleToken` when the submitted token is not the current one
    /// - `AlreadyRedeemed` when the update would clear the redemption flag
    /// - `DuplicateCode` when the change set assigns another coupon's code
    pub async fn update(&self, id: &str, payload: &serde_json::Value) -> AppResult<Coupon> {
        let id = parse_id(id)?;
        let rules = update_rules(self.code_policy);
        validate(payload, &rules).map_err(AppError::validation)?;

        let request: UpdateCouponPayload = serde_json::from_value(payload.clone())
            .map_err(|e| AppError::internal("payload deserialization failed").with_source(e))?;

        let changes = CouponChanges {
            code: request.code.map(CouponCode::Numeric),
            date: request.date,
            is_redeem: request.is_redeem,
        };

        let outcome = self
            .store
            .update_if_current(id, &request.updated_at, &changes, &new_timestamp())
            .await
            .map_err(AppError::from)?;

        match outcome {
            UpdateOutcome::Updated(coupon) => {
                debug!(%id, "coupon updated");
                Ok(coupon)
            }
            UpdateOutcome::DuplicateCode => match request.code {
                Some(numeric) => Err(AppError::duplicate_code(numeric)),
                None => Err(AppError::internal("duplicate code without a code change")),
            },
            // The conditional write matched nothing; a second read tells us
            // why.
            UpdateOutcome::NoMatch => {
                match self.store.find_by_id(id).await.map_err(AppError::from)? {
                    None => Err(AppError::not_found("coupon")),
                    Some(current) if current.updated_at != request.updated_at => {
                        Err(AppError::stale_token())
                    }
                    Some(_) => Err(AppError::already_redeemed(
                        "redemption cannot be reverted by update",
                    )),
                }
            }
        }
    }

    /// Delete a coupon by its identifier
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a malformed identifier
    /// - `ResourceNotFound` when no record matches
    pub async fn delete(&self, id: &str) -> AppResult<ObjectId> {
        let id = parse_id(id)?;
        let removed = self.store.remove(id).await.map_err(AppError::from)?;
        match removed {
            Some(_) => {
                info!(%id, "coupon deleted");
                Ok(id)
            }
            None => Err(AppError::not_found("coupon")),
        }
    }

    /// Redeem a coupon, flipping `isRedeem` false -> true exactly once
    ///
    /// Redemption is deliberately not idempotent: a second attempt is an
    /// error, not a no-op. The transition is one conditional write matching
    /// `isRedeem: false`, so concurrent redeemers cannot both succeed.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` for a malformed identifier
    /// - `ResourceNotFound` when no record matches
    /// - `AlreadyRedeemed` when the coupon was redeemed before
    pub async fn redeem(&self, id: &str) -> AppResult<Coupon> {
        let id = parse_id(id)?;

        let redeemed = self
            .store
            .redeem_if_active(id, &new_timestamp())
            .await
            .map_err(AppError::from)?;

        if let Some(coupon) = redeemed {
            info!(%id, "coupon redeemed");
            return Ok(coupon);
        }

        match self.store.find_by_id(id).await.map_err(AppError::from)? {
            None => Err(AppError::not_found("coupon")),
            Some(_) => Err(AppError::already_redeemed("coupon is already redeemed")),
        }
    }
}

fn parse_id(id: &str) -> AppResult<ObjectId> {
    ObjectId::parse_str(id)
        .map_err(|e| AppError::invalid_input(format!("malformed coupon id: {id}")).with_source(e))
}

fn display_code(coupon: &Coupon) -> String {
    coupon
        .code
        .as_ref()
        .map_or_else(|| "<none>".into(), ToString::to_string)
}
