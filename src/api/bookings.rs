use axum::extract::{Path, Query, State};
use axum::Json;
use bson::Document;
use serde::Deserialize;

use crate::api::services::parse_object_id;
use crate::db::models::{DeleteAck, InsertAck};
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct BookingsQuery {
    pub email: Option<String>,
}

/// `GET /bookings` — optionally filtered by requester email, unsorted.
pub async fn list_bookings(
    State(state): State<AppState>,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let bookings = state.bookings.list(query.email.as_deref()).await?;
    Ok(Json(bookings))
}

/// `GET /bookings/:serviceId` — bookings whose `serviceId` field equals the
/// raw route string. No id parsing happens here; see the repository notes.
pub async fn bookings_by_service(
    State(state): State<AppState>,
    Path(service_id): Path<String>,
) -> Result<Json<Vec<Document>>, AppError> {
    let bookings = state.bookings.list_by_service(&service_id).await?;
    Ok(Json(bookings))
}

/// `POST /bookings` — stamp the body with the current server time as
/// `bookingDate` and insert it verbatim.
pub async fn create_booking(
    State(state): State<AppState>,
    Json(mut booking): Json<Document>,
) -> Result<Json<InsertAck>, AppError> {
    booking.insert("bookingDate", bson::DateTime::from_chrono(chrono::Utc::now()));
    let ack = state.bookings.insert(booking).await?;
    Ok(Json(ack))
}

/// `DELETE /bookings/:id` — deleting an absent id is a zero-count success.
pub async fn delete_booking(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>, AppError> {
    let id = parse_object_id(&id)?;
    let ack = state.bookings.delete(id).await?;
    Ok(Json(ack))
}
