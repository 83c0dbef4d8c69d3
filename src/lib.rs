// ABOUTME: Main library entry point for the coupon service
// ABOUTME: Exposes configuration, validation, store, service, and HTTP route modules
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![deny(unsafe_code)]

//! # Coupon Service
//!
//! A small HTTP service managing coupon records in a document store.
//!
//! ## Features
//!
//! - **CRUD operations**: Create, list, fetch, partial update, and delete coupons
//! - **Redemption**: One-way `isRedeem` transition with double-redeem rejection
//! - **Optimistic concurrency**: Updates must echo the record's current
//!   `updatedAt` token; stale writers get a conflict instead of clobbering
//! - **Pluggable store**: MongoDB for deployment, in-memory for tests
//!
//! ## Architecture
//!
//! - **Validation**: One canonical field-constraint table, with create and
//!   update rule sets derived from it
//! - **Store**: `CouponStore` trait with conditional single-write mutations
//! - **Services**: Store-agnostic domain operations returning typed errors
//! - **Routes**: Axum handlers mapping domain errors to HTTP statuses at the
//!   boundary only

/// Environment-based configuration management
pub mod config;

/// Unified error handling with HTTP response mapping
pub mod errors;

/// Production logging configuration
pub mod logging;

/// CORS middleware configuration
pub mod middleware;

/// Coupon data model and wire representations
pub mod models;

/// Shared resource container for dependency injection
pub mod resources;

/// HTTP route handlers
pub mod routes;

/// Domain operations on coupons
pub mod services;

/// Document store abstraction and backends
pub mod store;

/// Payload validation rules
pub mod validation;
