use async_trait::async_trait;
use bson::oid::ObjectId;
use bson::{doc, Document};

use crate::db::models::{DeleteAck, InsertAck};
use crate::error::AppError;

/// Repository trait for the `bookings` collection.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// List bookings, optionally filtered by requester email. No sort is
    /// applied; documents come back in store order.
    async fn list(&self, email: Option<&str>) -> Result<Vec<Document>, AppError>;

    /// List bookings whose `serviceId` field equals the given string.
    ///
    /// This is a raw string comparison, not an ObjectId lookup. Bookings
    /// that stored `serviceId` as a typed id will never match.
    async fn list_by_service(&self, service_id: &str) -> Result<Vec<Document>, AppError>;

    /// Insert a new booking document verbatim.
    async fn insert(&self, booking: Document) -> Result<InsertAck, AppError>;

    /// Delete a booking by id. Deleting an absent id is a zero-count success.
    async fn delete(&self, id: ObjectId) -> Result<DeleteAck, AppError>;
}

/// MongoDB implementation of the BookingRepository.
pub struct MongoBookingRepository {
    collection: mongodb::Collection<Document>,
}

impl MongoBookingRepository {
    pub fn new(db: &mongodb::Database) -> Self {
        Self {
            collection: db.collection("bookings"),
        }
    }

    async fn find_all(&self, filter: Document) -> Result<Vec<Document>, AppError> {
        let mut cursor = self
            .collection
            .find(filter)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut bookings = Vec::new();
        use futures::TryStreamExt;
        while let Some(doc) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            bookings.push(doc);
        }

        Ok(bookings)
    }
}

#[async_trait]
impl BookingRepository for MongoBookingRepository {
    async fn list(&self, email: Option<&str>) -> Result<Vec<Document>, AppError> {
        let filter = match email {
            Some(email) => doc! { "email": email },
            None => Document::new(),
        };
        self.find_all(filter).await
    }

    async fn list_by_service(&self, service_id: &str) -> Result<Vec<Document>, AppError> {
        self.find_all(doc! { "serviceId": service_id }).await
    }

    async fn insert(&self, booking: Document) -> Result<InsertAck, AppError> {
        self.collection
            .insert_one(booking)
            .await
            .map(InsertAck::from)
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
