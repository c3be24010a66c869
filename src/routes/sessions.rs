use crate::models::{
    ErrorResponse, HealthResponse, RatingValue, SubmitRatingRequest, SubmitRatingResponse,
};
use crate::services::{EventStoreClient, SessionCoordinator, SessionError};
use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use validator::Validate;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<SessionCoordinator>,
    pub store: Arc<EventStoreClient>,
}

/// Configure all session and rating routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/sessions/{event_id}/start", web::post().to(start_session))
        .route("/sessions/{event_id}/rotate", web::post().to(rotate_partners))
        .route("/sessions/{event_id}/end", web::post().to(end_session))
        .route("/sessions/{event_id}/pairing", web::get().to(get_pairing))
        .route("/sessions/{event_id}/progress", web::get().to(get_progress))
        .route("/ratings", web::post().to(submit_rating))
        .route("/events/{event_id}/matches", web::get().to(get_matches))
        .route("/events/{event_id}/ratings", web::get().to(get_event_ratings));
}

/// Map a session error onto the HTTP taxonomy: conflict for state
/// machine violations, unprocessable for bad participants, bad gateway
/// when the store is unreachable.
fn error_response(err: &SessionError) -> HttpResponse {
    let (status_code, error) = match err {
        SessionError::InvalidState(_) => (409, "invalid_state"),
        SessionError::InvalidParticipant(_) => (422, "invalid_participant"),
        SessionError::CollaboratorUnavailable(_) => (502, "collaborator_unavailable"),
    };

    let body = ErrorResponse {
        error: error.to_string(),
        message: err.to_string(),
        status_code,
    };

    match status_code {
        409 => HttpResponse::Conflict().json(body),
        422 => HttpResponse::UnprocessableEntity().json(body),
        _ => HttpResponse::BadGateway().json(body),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = state.store.health_check().await;
    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Start a matching session for an active event
///
/// POST /api/v1/sessions/{event_id}/start
async fn start_session(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let event_id = path.into_inner();
    tracing::info!("Start session requested for event {}", event_id);

    match state.coordinator.start_session(&event_id).await {
        Ok(round) => HttpResponse::Ok().json(round),
        Err(e) => {
            tracing::warn!("Failed to start session for {}: {}", event_id, e);
            error_response(&e)
        }
    }
}

/// Rotate partners into the next round
///
/// POST /api/v1/sessions/{event_id}/rotate
async fn rotate_partners(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let event_id = path.into_inner();

    match state.coordinator.rotate_partners(&event_id).await {
        Ok(round) => {
            tracing::info!(
                "Rotated event {} to round {} ({} pairs)",
                event_id,
                round.round_number,
                round.pairs.len()
            );
            HttpResponse::Ok().json(round)
        }
        Err(e) => {
            tracing::warn!("Failed to rotate event {}: {}", event_id, e);
            error_response(&e)
        }
    }
}

/// End the matching session
///
/// POST /api/v1/sessions/{event_id}/end
async fn end_session(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let event_id = path.into_inner();

    match state.coordinator.end_session(&event_id).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => {
            tracing::warn!("Failed to end session for {}: {}", event_id, e);
            error_response(&e)
        }
    }
}

/// Current pairing for the round
///
/// GET /api/v1/sessions/{event_id}/pairing
///
/// Returns the full assignment, or one participant's view when a
/// `participantId` query parameter is given.
async fn get_pairing(
    state: web::Data<AppState>,
    path: web::Path<String>,
    query: web::Query<std::collections::HashMap<String, String>>,
) -> impl Responder {
    let event_id = path.into_inner();

    if let Some(participant_id) = query.get("participantId") {
        return match state
            .coordinator
            .current_pairing_for(&event_id, participant_id)
            .await
        {
            Ok(view) => HttpResponse::Ok().json(view),
            Err(e) => error_response(&e),
        };
    }

    match state.coordinator.current_round(&event_id).await {
        Ok(round) => HttpResponse::Ok().json(round),
        Err(e) => error_response(&e),
    }
}

/// Operator progress summary for the session
///
/// GET /api/v1/sessions/{event_id}/progress
async fn get_progress(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let event_id = path.into_inner();

    match state.coordinator.progress_summary(&event_id).await {
        Ok(summary) => HttpResponse::Ok().json(summary),
        Err(e) => error_response(&e),
    }
}

/// Submit a rating for a partner
///
/// POST /api/v1/ratings
///
/// Request body:
/// ```json
/// {
///   "eventId": "string",
///   "raterId": "string",
///   "rateeId": "string",
///   "rating": "not-interested|maybe|interested",
///   "notes": "string"
/// }
/// ```
async fn submit_rating(
    state: web::Data<AppState>,
    req: web::Json<SubmitRatingRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for submit_rating request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let rating = match req.rating.to_lowercase().as_str() {
        "not-interested" => RatingValue::NotInterested,
        "maybe" => RatingValue::Maybe,
        "interested" => RatingValue::Interested,
        _ => {
            return HttpResponse::BadRequest().json(ErrorResponse {
                error: "Invalid rating".to_string(),
                message: "Rating must be one of: not-interested, maybe, interested".to_string(),
                status_code: 400,
            });
        }
    };

    match state
        .coordinator
        .submit_rating(
            &req.event_id,
            &req.rater_id,
            &req.ratee_id,
            rating,
            req.notes.clone(),
        )
        .await
    {
        Ok(()) => HttpResponse::Ok().json(SubmitRatingResponse {
            success: true,
            rating_id: uuid::Uuid::new_v4().to_string(),
        }),
        Err(e) => {
            tracing::warn!(
                "Failed to record rating {} -> {}: {}",
                req.rater_id,
                req.ratee_id,
                e
            );
            error_response(&e)
        }
    }
}

/// Mutual matches for an event
///
/// GET /api/v1/events/{event_id}/matches
async fn get_matches(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let event_id = path.into_inner();
    let matches = state.coordinator.matches_for_event(&event_id).await;
    HttpResponse::Ok().json(matches)
}

/// All recorded ratings for an event (operator progress board)
///
/// GET /api/v1/events/{event_id}/ratings
async fn get_event_ratings(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let event_id = path.into_inner();
    let ratings = state.coordinator.ratings_for_event(&event_id).await;
    HttpResponse::Ok().json(ratings)
}
