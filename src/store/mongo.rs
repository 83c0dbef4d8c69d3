// ABOUTME: MongoDB backend for the coupon document store
// ABOUTME: Point queries and conditional single-document writes over one collection
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.

//! MongoDB document store backend
//!
//! One collection, point operations only. Code uniqueness is enforced by a
//! unique sparse index rather than a read-then-write sequence, and the
//! token-checked update and redemption are single `findOneAndUpdate` calls,
//! so concurrent writers cannot slip between a read and a write.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, Document},
    error::{ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
    Client, Collection, IndexModel,
};

use super::{CouponStore, InsertOutcome, UpdateOutcome};
use crate::models::{Coupon, CouponChanges, CouponCode};

/// Collection holding all coupon records
const COLLECTION_NAME: &str = "coupons";

/// MongoDB duplicate-key write error code
const DUPLICATE_KEY_CODE: i32 = 11000;

/// Whether a driver error is the unique index reporting a duplicate key
///
/// `insertOne` surfaces it as a write error; `findAndModify` surfaces it as
/// a command error, so both shapes are checked.
fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    match &*error.kind {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}

/// MongoDB-backed coupon store
#[derive(Clone)]
pub struct MongoCouponStore {
    collection: Collection<Coupon>,
    database: mongodb::Database,
}

impl MongoCouponStore {
    /// Connect to MongoDB and prepare the coupon collection
    ///
    /// Pings the deployment and creates the unique sparse index on `code`
    /// before returning, so a successfully constructed store is ready to
    /// serve requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the deployment is unreachable or index creation
    /// fails.
    pub async fn connect(url: &str, database_name: &str) -> Result<Self> {
        let client = Client::with_uri_str(url)
            .await
            .context("failed to parse MongoDB connection URL")?;
        let database = client.database(database_name);
        let collection = database.collection::<Coupon>(COLLECTION_NAME);

        let store = Self {
            collection,
            database,
        };
        store.ping().await.context("MongoDB ping failed")?;
        store
            .ensure_indexes()
            .await
            .context("failed to create coupon indexes")?;

        Ok(store)
    }

    /// Create the unique sparse index backing code uniqueness
    ///
    /// Sparse so that server-generated deployments without a `code` field on
    /// every record (and legacy records) do not collide on missing values.
    async fn ensure_indexes(&self) -> Result<()> {
        let index = IndexModel::builder()
            .keys(doc! { "code": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .sparse(true)
                    .build(),
            )
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    fn changes_to_set_document(changes: &CouponChanges, new_token: &str) -> Result<Document> {
        let mut set = doc! { "updatedAt": new_token };
        if let Some(code) = &changes.code {
            set.insert("code", to_bson(code)?);
        }
        if let Some(date) = &changes.date {
            set.insert("date", date.clone());
        }
        if let Some(flag) = changes.is_redeem {
            set.insert("isRedeem", flag);
        }
        Ok(set)
    }
}

#[async_trait]
impl CouponStore for MongoCouponStore {
    async fn find_by_code(&self, code: &CouponCode) -> Result<Option<Coupon>> {
        let coupon = self
            .collection
            .find_one(doc! { "code": to_bson(code)? })
            .await?;
        Ok(coupon)
    }

    async fn find_all(&self) -> Result<Vec<Coupon>> {
        let cursor = self.collection.find(doc! {}).await?;
        let coupons = cursor.try_collect().await?;
        Ok(coupons)
    }

    async fn insert(&self, mut coupon: Coupon) -> Result<InsertOutcome> {
        match self.collection.insert_one(&coupon).await {
            Ok(result) => {
                coupon.id = result.inserted_id.as_object_id();
                Ok(InsertOutcome::Inserted(coupon))
            }
            Err(error) => {
                // The unique index catches racing creates that the service's
                // pre-read missed.
                if is_duplicate_key(&error) {
                    return Ok(InsertOutcome::DuplicateCode);
                }
                Err(error.into())
            }
        }
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Coupon>> {
        let coupon = self.collection.find_one(doc! { "_id": id }).await?;
        Ok(coupon)
    }

    async fn update_if_current(
        &self,
        id: ObjectId,
        expected_token: &str,
        changes: &CouponChanges,
        new_token: &str,
    ) -> Result<UpdateOutcome> {
        let mut filter = doc! { "_id": id, "updatedAt": expected_token };
        if changes.clears_redemption() {
            // Redemption is one-way; a redeemed record never matches a
            // write that would clear the flag.
            filter.insert("isRedeem", false);
        }

        let result = self
            .collection
            .find_one_and_update(
                filter,
                doc! { "$set": Self::changes_to_set_document(changes, new_token)? },
            )
            .return_document(ReturnDocument::After)
            .await;

        match result {
            Ok(Some(coupon)) => Ok(UpdateOutcome::Updated(coupon)),
            Ok(None) => Ok(UpdateOutcome::NoMatch),
            Err(error) => {
                // The unique index also guards code reassignment on update.
                if is_duplicate_key(&error) {
                    return Ok(UpdateOutcome::DuplicateCode);
                }
                Err(error.into())
            }
        }
    }

    async fn redeem_if_active(&self, id: ObjectId, new_token: &str) -> Result<Option<Coupon>> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id, "isRedeem": false },
                doc! { "$set": { "isRedeem": true, "updatedAt": new_token } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    async fn remove(&self, id: ObjectId) -> Result<Option<Coupon>> {
        let removed = self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?;
        Ok(removed)
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
