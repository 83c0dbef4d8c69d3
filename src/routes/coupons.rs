// ABOUTME: Coupon route handlers for CRUD and redemption endpoints
// ABOUTME: Thin axum shell mapping domain results to HTTP statuses and JSON bodies
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Coupon HTTP routes
//!
//! | Method | Path                | Purpose        |
//! |--------|---------------------|----------------|
//! | PUT    | /coupon             | create         |
//! | GET    | /coupon             | list           |
//! | GET    | /coupon/:id         | fetch          |
//! | POST   | /coupon/:id         | partial update |
//! | DELETE | /coupon/:id         | delete         |
//! | POST   | /coupon/:id/redeem  | redeem         |
//!
//! Handlers stay thin: parse, delegate to
//! [`CouponOperations`](crate::services::CouponOperations), convert the
//! result. Error-to-status mapping lives on
//! [`AppError`](crate::errors::AppError).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::errors::AppError;
use crate::models::{Coupon, CouponCode};
use crate::resources::ServerResources;

/// Coupon record as exposed over HTTP
///
/// Identical to the stored record except the identifier is a plain hex
/// string instead of the store's native id representation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    /// Record identifier in hex form
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<CouponCode>,
    pub date: String,
    pub is_redeem: bool,
    pub updated_at: String,
}

impl From<Coupon> for CouponResponse {
    fn from(coupon: Coupon) -> Self {
        Self {
            id: coupon.id.map(|id| id.to_hex()).unwrap_or_default(),
            code: coupon.code,
            date: coupon.date,
            is_redeem: coupon.is_redeem,
            updated_at: coupon.updated_at,
        }
    }
}

/// Acknowledgement body for deletions
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
}

/// Coupon routes implementation
pub struct CouponRoutes;

impl CouponRoutes {
    /// Create all coupon routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/coupon", put(Self::handle_create).get(Self::handle_list))
            .route(
                "/coupon/:id",
                get(Self::handle_get)
                    .post(Self::handle_update)
                    .delete(Self::handle_delete),
            )
            .route("/coupon/:id/redeem", post(Self::handle_redeem))
            .with_state(resources)
    }

    /// Handle coupon creation
    async fn handle_create(
        State(resources): State<Arc<ServerResources>>,
        Json(payload): Json<serde_json::Value>,
    ) -> Result<Response, AppError> {
        let coupon = resources.coupons.create(&payload).await?;
        Ok((StatusCode::CREATED, Json(CouponResponse::from(coupon))).into_response())
    }

    /// Handle listing all coupons
    async fn handle_list(
        State(resources): State<Arc<ServerResources>>,
    ) -> Result<Response, AppError> {
        let coupons = resources.coupons.list().await?;
        let body: Vec<CouponResponse> = coupons.into_iter().map(CouponResponse::from).collect();
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle fetching a coupon by id
    async fn handle_get(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let coupon = resources.coupons.get(&id).await?;
        Ok((StatusCode::OK, Json(CouponResponse::from(coupon))).into_response())
    }

    /// Handle a token-guarded partial update
    async fn handle_update(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
        Json(payload): Json<serde_json::Value>,
    ) -> Result<Response, AppError> {
        let coupon = resources.coupons.update(&id, &payload).await?;
        Ok((StatusCode::OK, Json(CouponResponse::from(coupon))).into_response())
    }

    /// Handle coupon deletion
    async fn handle_delete(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let id = resources.coupons.delete(&id).await?;
        let body = DeleteResponse {
            message: format!("coupon {} deleted", id.to_hex()),
        };
        Ok((StatusCode::OK, Json(body)).into_response())
    }

    /// Handle coupon redemption
    async fn handle_redeem(
        State(resources): State<Arc<ServerResources>>,
        Path(id): Path<String>,
    ) -> Result<Response, AppError> {
        let coupon = resources.coupons.redeem(&id).await?;
        Ok((StatusCode::OK, Json(CouponResponse::from(coupon))).into_response())
    }
}
