use axum::extract::{Path, Query, State};
use axum::Json;
use bson::oid::ObjectId;
use bson::Document;
use serde::Deserialize;

use crate::db::models::{DeleteAck, InsertAck, ServiceFilter, UpdateAck};
use crate::error::AppError;
use crate::state::AppState;

/// Parse a route `:id` into an ObjectId, failing the request if malformed.
pub(crate) fn parse_object_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::BadRequest(format!("Malformed id '{}'", id)))
}

/// `GET /services` — optional category and price-range filters, sorted
/// ascending by price.
pub async fn list_services(
    State(state): State<AppState>,
    Query(filter): Query<ServiceFilter>,
) -> Result<Json<Vec<Document>>, AppError> {
    let services = state.services.list(&filter).await?;
    Ok(Json(services))
}

/// `GET /top-rated-services` — the six most-reviewed services, in ascending
/// price order among that subset.
pub async fn top_rated_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let services = state.services.top_rated().await?;
    Ok(Json(services))
}

#[derive(Debug, Deserialize)]
pub struct MyServicesQuery {
    pub email: String,
}

/// `GET /my-services` — services owned by the `email` query parameter.
///
/// The filter trusts the query parameter, not the authenticated principal
/// sitting in the request extensions. Known authorization gap, kept as-is.
pub async fn my_services(
    State(state): State<AppState>,
    Query(query): Query<MyServicesQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let services = state.services.list_by_owner(&query.email).await?;
    Ok(Json(services))
}

/// `GET /services/:id` — single lookup; an absent id yields a JSON `null`
/// body with a 200, never a 404.
pub async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Document>>, AppError> {
    let id = parse_object_id(&id)?;
    let service = state.services.find_by_id(id).await?;
    Ok(Json(service))
}

/// `POST /services` — insert the body verbatim, no field whitelist.
pub async fn create_service(
    State(state): State<AppState>,
    Json(service): Json<Document>,
) -> Result<Json<InsertAck>, AppError> {
    let ack = state.services.insert(service).await?;
    Ok(Json(ack))
}

/// `POST /services/:id/reviews` — stamp the review with the current server
/// time and append it to the service's `reviews` array.
pub async fn add_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut review): Json<Document>,
) -> Result<Json<UpdateAck>, AppError> {
    let id = parse_object_id(&id)?;
    review.insert("date", bson::DateTime::from_chrono(chrono::Utc::now()));
    let ack = state.services.push_review(id, review).await?;
    Ok(Json(ack))
}

/// `PATCH /services/:id` — shallow merge-patch of the body's top-level
/// fields.
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(fields): Json<Document>,
) -> Result<Json<UpdateAck>, AppError> {
    let id = parse_object_id(&id)?;
    let ack = state.services.merge_patch(id, fields).await?;
    Ok(Json(ack))
}

/// `DELETE /services/:id` — deleting an absent id is a zero-count success.
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    let id = parse_object_id(&id)?;
    let ack = state.services.delete(id).await?;
    Ok(Json(ack))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    use crate::auth::models::AuthenticatedUser;
    use crate::auth::verifier::TokenVerifier;
    use crate::db::booking_repository::BookingRepository;
    use crate::db::service_repository::ServiceRepository;

    // -- Mock implementations --

    #[derive(Default)]
    struct MockServices {
        inserted: Mutex<Vec<Document>>,
        reviews: Mutex<Vec<(ObjectId, Document)>>,
    }

    #[async_trait]
    impl ServiceRepository for MockServices {
        async fn list(&self, filter: &ServiceFilter) -> Result<Vec<Document>, AppError> {
            let _ = filter;
            Ok(vec![])
        }

        async fn list_by_owner(&self, _email: &str) -> Result<Vec<Document>, AppError> {
            Ok(vec![])
        }

        async fn top_rated(&self) -> Result<Vec<Document>, AppError> {
            Ok(vec![])
        }

        async fn find_by_id(&self, _id: ObjectId) -> Result<Option<Document>, AppError> {
            Ok(None)
        }

        async fn insert(&self, service: Document) -> Result<InsertAck, AppError> {
            self.inserted.lock().unwrap().push(service);
            Ok(InsertAck {
                acknowledged: true,
                inserted_id: ObjectId::new().to_hex(),
            })
        }

        async fn merge_patch(
            &self,
            _id: ObjectId,
            _fields: Document,
        ) -> Result<UpdateAck, AppError> {
            Ok(UpdateAck {
                matched_count: 1,
                modified_count: 1,
            })
        }

        async fn push_review(&self, id: ObjectId, review: Document) -> Result<UpdateAck, AppError> {
            self.reviews.lock().unwrap().push((id, review));
            Ok(UpdateAck {
                matched_count: 1,
                modified_count: 1,
            })
        }

        async fn delete(&self, _id: ObjectId) -> Result<DeleteAck, AppError> {
            Ok(DeleteAck { deleted_count: 0 })
        }
    }

    struct MockBookings;

    #[async_trait]
    impl BookingRepository for MockBookings {
        async fn list(&self, _email: Option<&str>) -> Result<Vec<Document>, AppError> {
            Ok(vec![])
        }

        async fn list_by_service(&self, _service_id: &str) -> Result<Vec<Document>, AppError> {
            Ok(vec![])
        }

        async fn insert(&self, _booking: Document) -> Result<InsertAck, AppError> {
            Ok(InsertAck {
                acknowledged: true,
                inserted_id: ObjectId::new().to_hex(),
            })
        }

        async fn delete(&self, _id: ObjectId) -> Result<DeleteAck, AppError> {
            Ok(DeleteAck { deleted_count: 0 })
        }
    }

    struct MockVerifier;

    #[async_trait]
    impl TokenVerifier for MockVerifier {
        async fn verify_id_token(&self, _token: &str) -> Result<AuthenticatedUser, AppError> {
            Ok(AuthenticatedUser {
                user_id: "uid-1".to_string(),
                email: "tester@example.com".to_string(),
            })
        }
    }

    fn state_with(services: Arc<MockServices>) -> AppState {
        AppState {
            services,
            bookings: Arc::new(MockBookings),
            verifier: Arc::new(MockVerifier),
        }
    }

    #[test]
    fn test_parse_object_id_rejects_garbage() {
        assert!(parse_object_id("not-a-hex-id").is_err());
        let oid = ObjectId::new();
        assert_eq!(parse_object_id(&oid.to_hex()).unwrap(), oid);
    }

    #[tokio::test]
    async fn test_create_service_inserts_body_verbatim() {
        let services = Arc::new(MockServices::default());
        let state = state_with(services.clone());

        let body = bson::doc! { "category": "cleaning", "price": 25, "unknownField": true };
        let response = create_service(State(state), Json(body.clone())).await.unwrap();

        assert!(response.0.acknowledged);
        let inserted = services.inserted.lock().unwrap();
        assert_eq!(inserted.as_slice(), &[body]);
    }

    #[tokio::test]
    async fn test_add_review_stamps_server_date() {
        let services = Arc::new(MockServices::default());
        let state = state_with(services.clone());
        let id = ObjectId::new();

        add_review(
            State(state),
            Path(id.to_hex()),
            Json(bson::doc! { "rating": 5 }),
        )
        .await
        .unwrap();

        let reviews = services.reviews.lock().unwrap();
        let (target, review) = &reviews[0];
        assert_eq!(*target, id);
        assert_eq!(review.get_i32("rating").unwrap(), 5);
        assert!(review.get_datetime("date").is_ok());
    }

    #[tokio::test]
    async fn test_get_service_malformed_id_is_bad_request() {
        let state = state_with(Arc::new(MockServices::default()));

        let result = get_service(State(state), Path("zzz".to_string())).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_service_absent_is_null() {
        let state = state_with(Arc::new(MockServices::default()));
        let id = ObjectId::new().to_hex();

        let response = get_service(State(state), Path(id)).await.unwrap();
        assert!(response.0.is_none());
    }
}
