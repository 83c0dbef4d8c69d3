// ABOUTME: HTTP route module root for the coupon service
// ABOUTME: Exposes coupon CRUD routes and health check routes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

/// Coupon CRUD and redemption routes
pub mod coupons;

/// Health and readiness routes
pub mod health;

pub use coupons::CouponRoutes;
pub use health::HealthRoutes;
