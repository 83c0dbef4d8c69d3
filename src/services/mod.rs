// ABOUTME: Domain services module root
// ABOUTME: Re-exports the coupon operations service
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

/// Coupon domain operations
pub mod coupons;

pub use coupons::CouponOperations;
