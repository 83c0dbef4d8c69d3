// ABOUTME: Shared helpers for integration tests
// ABOUTME: Builds routers over an in-memory store and exposes the HTTP harness
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![allow(dead_code)] // Not every test file uses every helper

pub mod axum_test;

use std::sync::Arc;

use coupon_service::config::environment::{
    CodePolicy, CorsConfig, DatabaseConfig, ServerConfig,
};
use coupon_service::resources::ServerResources;
use coupon_service::routes::{CouponRoutes, HealthRoutes};
use coupon_service::store::{CouponStore, MemoryCouponStore};

/// Test configuration backed by the in-memory store
pub fn test_config(code_policy: CodePolicy) -> ServerConfig {
    ServerConfig {
        http_port: 0,
        database: DatabaseConfig {
            url: "memory://".into(),
            database: "test".into(),
        },
        cors: CorsConfig {
            allowed_origins: "*".into(),
        },
        code_policy,
    }
}

/// Build the full application router over a fresh in-memory store
pub fn test_app(code_policy: CodePolicy) -> (axum::Router, Arc<dyn CouponStore>) {
    let store: Arc<dyn CouponStore> = Arc::new(MemoryCouponStore::new());
    let config = Arc::new(test_config(code_policy));
    let resources = Arc::new(ServerResources::new(store.clone(), config));

    let app = axum::Router::new()
        .merge(CouponRoutes::routes(resources.clone()))
        .merge(HealthRoutes::routes(resources));

    (app, store)
}
