// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! REST frontend for the todo service.
//!
//! JSON over HTTP/1.1 using Axum. Every error response carries a body of
//! the form `{"error": "<message>"}`.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::trace::TraceLayer;

use wirebench_core::{filler_payload, PayloadKb, TodoError, TodoService};

/// Build the REST router over a shared service.
pub fn router(service: TodoService) -> Router {
    Router::new()
        .route("/health", get(health).fallback(method_not_allowed))
        .route(
            "/todos",
            get(list_todos)
                .post(create_todo)
                .fallback(method_not_allowed),
        )
        .route("/todos/{id}", get(get_todo).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Error response with a JSON body.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    fn bad_request(message: &'static str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }
}

impl From<TodoError> for ApiError {
    fn from(err: TodoError) -> Self {
        match err {
            TodoError::InvalidInput => Self::bad_request("invalid input"),
            TodoError::NotFound => Self {
                status: StatusCode::NOT_FOUND,
                message: "not found",
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct CreateTodoRequest {
    #[serde(default)]
    title: String,
    #[serde(default)]
    done: bool,
}

/// Query values are kept as strings so bad integers get our own message.
#[derive(Debug, Default, Deserialize)]
struct ListQuery {
    limit: Option<String>,
    offset: Option<String>,
    payload_kb: Option<String>,
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn list_todos(
    State(service): State<TodoService>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = parse_query_int(query.limit.as_deref())
        .ok_or(ApiError::bad_request("invalid limit"))?;
    let offset = parse_query_int(query.offset.as_deref())
        .ok_or(ApiError::bad_request("invalid offset"))?;
    let payload = parse_query_int(query.payload_kb.as_deref())
        .and_then(|kb| PayloadKb::new(kb).ok())
        .and_then(filler_payload)
        .ok_or(ApiError::bad_request("invalid payload_kb"))?;

    let mut items = service.list(limit, offset)?;

    if !payload.is_empty() {
        for item in &mut items {
            item.payload = payload.clone();
        }
    }

    Ok(Json(items))
}

async fn create_todo(
    State(service): State<TodoService>,
    body: Result<Json<CreateTodoRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body.map_err(|_| ApiError::bad_request("invalid json body"))?;
    let item = service.create(&req.title, req.done)?;
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_todo(
    State(service): State<TodoService>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::bad_request("invalid id"))?;
    let item = service.get(id)?;
    Ok(Json(item))
}

async fn method_not_allowed() -> ApiError {
    ApiError {
        status: StatusCode::METHOD_NOT_ALLOWED,
        message: "method not allowed",
    }
}

async fn not_found() -> ApiError {
    ApiError {
        status: StatusCode::NOT_FOUND,
        message: "not found",
    }
}

/// Missing or empty values read as 0; anything unparsable is `None`.
fn parse_query_int(raw: Option<&str>) -> Option<i64> {
    match raw {
        None | Some("") => Some(0),
        Some(value) => value.parse().ok(),
    }
}
