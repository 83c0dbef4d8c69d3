// ABOUTME: Service-level tests for coupon domain operations
// ABOUTME: Exercises validation gating, code policies, and concurrency semantics directly
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

//! Tests for `CouponOperations` against the in-memory store

use std::sync::Arc;

use coupon_service::config::environment::CodePolicy;
use coupon_service::errors::ErrorCode;
use coupon_service::models::CouponCode;
use coupon_service::services::CouponOperations;
use coupon_service::store::{CouponStore, MemoryCouponStore};
use serde_json::json;

fn operations(policy: CodePolicy) -> (CouponOperations, Arc<dyn CouponStore>) {
    let store: Arc<dyn CouponStore> = Arc::new(MemoryCouponStore::new());
    (CouponOperations::new(store.clone(), policy), store)
}

#[tokio::test]
async fn test_invalid_create_performs_zero_writes() {
    let (ops, store) = operations(CodePolicy::ClientSupplied);

    let payloads = [
        json!({"code": 999, "date": "01/01/2030", "isRedeem": false}),
        json!({"code": 54321, "date": "2030-01-01", "isRedeem": false}),
        json!({"code": 54321, "date": "01/01/2030", "isRedeem": false, "x": 1}),
        json!({"date": "01/01/2030", "isRedeem": false}),
        json!("not an object"),
    ];

    for payload in &payloads {
        let error = ops.create(payload).await.unwrap_err();
        assert_eq!(error.code, ErrorCode::ValidationFailed);
    }

    assert!(store.find_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_update_performs_zero_writes() {
    let (ops, store) = operations(CodePolicy::ClientSupplied);

    let created = ops
        .create(&json!({"code": 54321, "date": "01/01/2030", "isRedeem": false}))
        .await
        .unwrap();
    let id = created.id.unwrap().to_hex();

    let error = ops
        .update(&id, &json!({"updatedAt": created.updated_at, "code": 12.5}))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ValidationFailed);

    let stored = store.find_by_id(created.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored, created);
}

#[tokio::test]
async fn test_duplicate_create_leaves_single_record() {
    let (ops, store) = operations(CodePolicy::ClientSupplied);

    let payload = json!({"code": 54321, "date": "01/01/2030", "isRedeem": false});
    ops.create(&payload).await.unwrap();

    let error = ops.create(&payload).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::DuplicateCode);

    assert_eq!(store.find_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_rotates_token() {
    let (ops, _store) = operations(CodePolicy::ClientSupplied);

    let created = ops
        .create(&json!({"code": 54321, "date": "01/01/2030", "isRedeem": false}))
        .await
        .unwrap();
    let id = created.id.unwrap().to_hex();

    let updated = ops
        .update(
            &id,
            &json!({"updatedAt": created.updated_at, "date": "31/12/2031"}),
        )
        .await
        .unwrap();

    assert_eq!(updated.date, "31/12/2031");
    assert_ne!(updated.updated_at, created.updated_at);

    // The old token is now stale
    let error = ops
        .update(
            &id,
            &json!({"updatedAt": created.updated_at, "date": "01/01/2032"}),
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::StaleToken);
}

#[tokio::test]
async fn test_server_generated_codes_are_unique_tokens() {
    let (ops, _store) = operations(CodePolicy::ServerGenerated);

    let payload = json!({"date": "01/01/2030", "isRedeem": false});
    let first = ops.create(&payload).await.unwrap();
    let second = ops.create(&payload).await.unwrap();

    let (Some(CouponCode::Token(a)), Some(CouponCode::Token(b))) = (first.code, second.code)
    else {
        panic!("server policy must assign token codes");
    };
    assert_ne!(a, b);
}

#[tokio::test]
async fn test_server_policy_update_cannot_overwrite_token_code() {
    let (ops, store) = operations(CodePolicy::ServerGenerated);

    let created = ops
        .create(&json!({"date": "01/01/2030", "isRedeem": false}))
        .await
        .unwrap();
    let id = created.id.unwrap().to_hex();

    let error = ops
        .update(
            &id,
            &json!({"updatedAt": created.updated_at, "code": 54321}),
        )
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::ValidationFailed);

    // The server-assigned token code is untouched.
    let stored = store.find_by_id(created.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.code, created.code);
    assert!(matches!(stored.code, Some(CouponCode::Token(_))));
}

#[tokio::test]
async fn test_update_to_existing_code_is_a_conflict() {
    let (ops, store) = operations(CodePolicy::ClientSupplied);

    ops.create(&json!({"code": 54321, "date": "01/01/2030", "isRedeem": false}))
        .await
        .unwrap();
    let second = ops
        .create(&json!({"code": 99999, "date": "01/01/2030", "isRedeem": false}))
        .await
        .unwrap();
    let id = second.id.unwrap().to_hex();

    let error = ops
        .update(&id, &json!({"updatedAt": second.updated_at, "code": 54321}))
        .await
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::DuplicateCode);

    let stored = store.find_by_id(second.id.unwrap()).await.unwrap().unwrap();
    assert_eq!(stored.code, Some(CouponCode::Numeric(99999)));
}

#[tokio::test]
async fn test_redeem_then_update_with_fresh_token_still_works() {
    let (ops, _store) = operations(CodePolicy::ClientSupplied);

    let created = ops
        .create(&json!({"code": 54321, "date": "01/01/2030", "isRedeem": false}))
        .await
        .unwrap();
    let id = created.id.unwrap().to_hex();

    let redeemed = ops.redeem(&id).await.unwrap();
    assert!(redeemed.is_redeem);

    // A redeemed record stays updatable, except for the redemption flag
    let updated = ops
        .update(
            &id,
            &json!({"updatedAt": redeemed.updated_at, "date": "31/12/2031"}),
        )
        .await
        .unwrap();
    assert_eq!(updated.date, "31/12/2031");
    assert!(updated.is_redeem);
}

#[tokio::test]
async fn test_double_redeem_is_rejected() {
    let (ops, _store) = operations(CodePolicy::ClientSupplied);

    let created = ops
        .create(&json!({"code": 54321, "date": "01/01/2030", "isRedeem": false}))
        .await
        .unwrap();
    let id = created.id.unwrap().to_hex();

    ops.redeem(&id).await.unwrap();
    let error = ops.redeem(&id).await.unwrap_err();
    assert_eq!(error.code, ErrorCode::AlreadyRedeemed);
}

#[tokio::test]
async fn test_malformed_id_is_invalid_input_everywhere() {
    let (ops, _store) = operations(CodePolicy::ClientSupplied);

    for result in [
        ops.get("zzz").await.map(drop),
        ops.update("zzz", &json!({"updatedAt": "t"})).await.map(drop),
        ops.delete("zzz").await.map(drop),
        ops.redeem("zzz").await.map(drop),
    ] {
        assert_eq!(result.unwrap_err().code, ErrorCode::InvalidInput);
    }
}
