use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;

use crate::presentation::http::handlers::CaseStudyHandler;

pub fn case_study_routes(case_study_handler: Arc<CaseStudyHandler>) -> Router {
    Router::new()
        .route(
            "/case-studies",
            post(CaseStudyHandler::create).get(CaseStudyHandler::list),
        )
        .route(
            "/case-studies/{id}",
            get(CaseStudyHandler::get)
                .patch(CaseStudyHandler::update)
                .delete(CaseStudyHandler::delete),
        )
        .route(
            "/case-studies/{id}/status/stream",
            get(CaseStudyHandler::status_stream),
        )
        .route(
            "/case-studies/{id}/summaries",
            post(CaseStudyHandler::summarize),
        )
        .route(
            "/case-studies/{id}/summaries/{summary_id}",
            patch(CaseStudyHandler::update_summary),
        )
        .route("/case-studies/{id}/export", get(CaseStudyHandler::export))
        .with_state(case_study_handler)
}
