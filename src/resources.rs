// ABOUTME: Centralized resource container for dependency injection
// ABOUTME: Holds the shared store handle, domain service, and configuration
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! Shared server resources
//!
//! The store handle is acquired once at startup (after the readiness gate in
//! [`crate::store::connect`]) and injected into handlers through this
//! container, instead of living in process-wide mutable state.

use std::sync::Arc;

use crate::config::environment::ServerConfig;
use crate::services::CouponOperations;
use crate::store::CouponStore;

/// Centralized resource container for dependency injection
#[derive(Clone)]
pub struct ServerResources {
    pub store: Arc<dyn CouponStore>,
    pub coupons: CouponOperations,
    pub config: Arc<ServerConfig>,
}

impl ServerResources {
    /// Create new server resources with proper Arc sharing
    #[must_use]
    pub fn new(store: Arc<dyn CouponStore>, config: Arc<ServerConfig>) -> Self {
        let coupons = CouponOperations::new(store.clone(), config.code_policy);
        Self {
            store,
            coupons,
            config,
        }
    }
}
