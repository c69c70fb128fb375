use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};

use crate::db::models::{DeleteAck, InsertAck, ServiceFilter, UpdateAck};
use crate::error::AppError;

/// How many services `top_rated` returns at most.
const TOP_RATED_LIMIT: i32 = 6;

/// Repository trait for the `services` collection.
///
/// This trait allows mocking the database layer in tests.
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    /// List services matching the filter, sorted ascending by price.
    async fn list(&self, filter: &ServiceFilter) -> Result<Vec<Document>, AppError>;

    /// List services owned by the given email, sorted ascending by price.
    async fn list_by_owner(&self, email: &str) -> Result<Vec<Document>, AppError>;

    /// The services with the most reviews, capped at six, emitted in
    /// ascending price order among that subset.
    async fn top_rated(&self) -> Result<Vec<Document>, AppError>;

    /// Fetch a single service by id.
    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, AppError>;

    /// Insert a new service document verbatim.
    async fn insert(&self, service: Document) -> Result<InsertAck, AppError>;

    /// Overwrite the given top-level fields, leaving the rest untouched.
    /// Nested objects are replaced wholesale, not deep-merged.
    async fn merge_patch(&self, id: ObjectId, fields: Document) -> Result<UpdateAck, AppError>;

    /// Append a review to the service's `reviews` array.
    async fn push_review(&self, id: ObjectId, review: Document) -> Result<UpdateAck, AppError>;

    /// Delete a service by id. Deleting an absent id is a zero-count success.
    async fn delete(&self, id: ObjectId) -> Result<DeleteAck, AppError>;
}

/// MongoDB implementation of the ServiceRepository.
pub struct MongoServiceRepository {
    collection: mongodb::Collection<Document>,
}

impl MongoServiceRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("services"),
        }
    }

    async fn find_sorted_by_price(&self, filter: Document) -> Result<Vec<Document>, AppError> {
        use mongodb::options::FindOptions;

        let options = FindOptions::builder().sort(doc! { "price": 1 }).build();

        let mut cursor = self
            .collection
            .find(filter)
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut services = Vec::new();
        use futures::TryStreamExt;
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            services.push(doc);
        }

        Ok(services)
    }
}

#[async_trait]
impl ServiceRepository for MongoServiceRepository {
    async fn list(&self, filter: &ServiceFilter) -> Result<Vec<Document>, AppError> {
        self.find_sorted_by_price(filter.to_document()).await
    }

    async fn list_by_owner(&self, email: &str) -> Result<Vec<Document>, AppError> {
        self.find_sorted_by_price(doc! { "email": email }).await
    }

    async fn top_rated(&self) -> Result<Vec<Document>, AppError> {
        // Two-stage sort: the limit applies to the review-count ordering,
        // the emitted order is by price. Documents without a `reviews`
        // array fail the $size stage; the schema keeps it always present.
        let pipeline = vec![
            doc! { "$addFields": { "reviewCount": { "$size": "$reviews" } } },
            doc! { "$sort": { "reviewCount": -1 } },
            doc! { "$limit": TOP_RATED_LIMIT },
            doc! { "$sort": { "price": 1 } },
        ];

        let mut cursor = self
            .collection
            .aggregate(pipeline)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut services = Vec::new();
        use futures::TryStreamExt;
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            services.push(doc);
        }

        Ok(services)
    }

    async fn find_by_id(&self, id: ObjectId) -> Result<Option<Document>, AppError> {
        self.collection
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn insert(&self, service: Document) -> Result<InsertAck, AppError> {
        self.collection
            .insert_one(service)
            .await
            .map(InsertAck::from)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn merge_patch(&self, id: ObjectId, fields: Document) -> Result<UpdateAck, AppError> {
        self.collection
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await
            .map(UpdateAck::from)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn push_review(&self, id: ObjectId, review: Document) -> Result<UpdateAck, AppError> {
        self.collection
            .update_one(doc! { "_id": id }, doc! { "$push": { "reviews": review } })
            .await
            .map(UpdateAck::from)
            .map_err(|e| AppError::Database(e.to_string()))
    }

    async fn delete(&self, id: ObjectId) -> Result<DeleteAck, AppError> {
        self.collection
            .delete_one(doc! { "_id": id })
            .await
            .map(DeleteAck::from)
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
