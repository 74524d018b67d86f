//! HTTP route handlers for the preview server.
//!
//! Handlers are kept thin: validate the topic, run the pipeline, render.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Form,
};
use tracing::info;

use super::models::TopicForm;
use super::templates;
use super::AppState;
use crate::document::{document_filename, render_document, validate_topic, DOCUMENT_CONTENT_TYPE};

// =============================================================================
// Page Handlers
// =============================================================================

/// GET `/` - Topic form.
pub async fn home() -> Html<String> {
    Html(templates::render_home(None, ""))
}

/// POST `/report` - Build a report for the submitted topic.
pub async fn report_from_form(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TopicForm>,
) -> Response {
    render_report(&state, &form.topic).await
}

/// GET `/report/{topic}` - Build a report for the topic in the path.
pub async fn report_page(
    State(state): State<Arc<AppState>>,
    Path(topic): Path<String>,
) -> Response {
    render_report(&state, &topic).await
}

async fn render_report(state: &AppState, raw_topic: &str) -> Response {
    let topic = match validate_topic(raw_topic) {
        Ok(topic) => topic,
        Err(e) => {
            let page = templates::render_home(Some(&e.to_string()), raw_topic);
            return (StatusCode::UNPROCESSABLE_ENTITY, Html(page)).into_response();
        }
    };

    info!(%topic, "Building report preview");
    let report = state.builder.build(&topic).await;
    Html(templates::render_report(&report)).into_response()
}

// =============================================================================
// Download Handler
// =============================================================================

/// GET `/download/{topic}` - Build the report and return it as a document.
pub async fn download(State(state): State<Arc<AppState>>, Path(topic): Path<String>) -> Response {
    let topic = match validate_topic(&topic) {
        Ok(topic) => topic,
        Err(e) => return (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()).into_response(),
    };

    info!(%topic, "Building report document");
    let report = state.builder.build(&topic).await;
    let filename = document_filename(&report).replace('"', "_");

    (
        [
            (header::CONTENT_TYPE, DOCUMENT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        render_document(&report),
    )
        .into_response()
}
