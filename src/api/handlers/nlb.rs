//! NLB API handlers
//!
//! Thin HTTP layer over the lifecycle controller: binds request bodies,
//! parses query flags, and translates controller errors into status codes.
//! All lifecycle semantics live in [`crate::services::NlbService`].

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::instrument;

use crate::{
    api::{error::ApiError, routes::ApiState},
    domain::{BulkDeleteOutcome, CreateNlbRequest, CreateOption, NlbRecord},
};

use super::types::{
    CreateQuery, DeleteAllQuery, DeleteQuery, IdListResponse, ListQuery, MessageResponse,
    NlbListResponse,
};

/// Create an NLB, or register an existing provider-side one
#[utoipa::path(
    post,
    path = "/ns/{namespace}/nlb",
    request_body = CreateNlbRequest,
    params(
        ("namespace" = String, Path, description = "Namespace ID"),
        CreateQuery
    ),
    responses(
        (status = 201, description = "NLB created", body = NlbRecord),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Provider resource to register not found"),
        (status = 409, description = "NLB with this ID already exists")
    ),
    tag = "NLB management"
)]
#[instrument(skip(state, payload), fields(namespace = %namespace, nlb_id = %payload.name))]
pub async fn create_nlb_handler(
    State(state): State<ApiState>,
    Path(namespace): Path<String>,
    Query(query): Query<CreateQuery>,
    Json(payload): Json<CreateNlbRequest>,
) -> Result<(StatusCode, Json<NlbRecord>), ApiError> {
    let option = CreateOption::parse(&query.option)?;
    let record = state.service.create(&namespace, payload, option).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Get one NLB
#[utoipa::path(
    get,
    path = "/ns/{namespace}/nlb/{id}",
    params(
        ("namespace" = String, Path, description = "Namespace ID"),
        ("id" = String, Path, description = "NLB ID")
    ),
    responses(
        (status = 200, description = "The NLB record", body = NlbRecord),
        (status = 404, description = "NLB not found")
    ),
    tag = "NLB management"
)]
#[instrument(skip(state), fields(namespace = %namespace, nlb_id = %id))]
pub async fn get_nlb_handler(
    State(state): State<ApiState>,
    Path((namespace, id)): Path<(String, String)>,
) -> Result<Json<NlbRecord>, ApiError> {
    let record = state.service.get(&namespace, &id).await?;
    Ok(Json(record))
}

/// List NLBs, or their identifiers with `option=id`
#[utoipa::path(
    get,
    path = "/ns/{namespace}/nlb",
    params(
        ("namespace" = String, Path, description = "Namespace ID"),
        ListQuery
    ),
    responses(
        (status = 200, description = "Record list, or identifier list with option=id", body = NlbListResponse),
        (status = 500, description = "Storage unavailable")
    ),
    tag = "NLB management"
)]
#[instrument(skip(state, query), fields(namespace = %namespace, option = %query.option))]
pub async fn list_nlbs_handler(
    State(state): State<ApiState>,
    Path(namespace): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, ApiError> {
    if query.option == "id" {
        // Identifier mode is unconditional: filters do not apply
        let id_list = state.service.list_ids(&namespace).await?;
        return Ok(Json(IdListResponse { id_list }).into_response());
    }

    let nlb = state.service.list(&namespace, &query.filter_key, &query.filter_val).await?;
    Ok(Json(NlbListResponse { nlb }).into_response())
}

/// Delete one NLB
#[utoipa::path(
    delete,
    path = "/ns/{namespace}/nlb/{id}",
    params(
        ("namespace" = String, Path, description = "Namespace ID"),
        ("id" = String, Path, description = "NLB ID"),
        DeleteQuery
    ),
    responses(
        (status = 200, description = "NLB deleted", body = MessageResponse),
        (status = 404, description = "NLB not found"),
        (status = 409, description = "Provider teardown failed and force was not set")
    ),
    tag = "NLB management"
)]
#[instrument(skip(state), fields(namespace = %namespace, nlb_id = %id, force = query.force))]
pub async fn delete_nlb_handler(
    State(state): State<ApiState>,
    Path((namespace, id)): Path<(String, String)>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.service.delete(&namespace, &id, query.force).await?;
    Ok(Json(MessageResponse { message: format!("The NLB {} has been deleted", id) }))
}

/// Delete all NLBs whose identifier contains the `match` substring
#[utoipa::path(
    delete,
    path = "/ns/{namespace}/nlb",
    params(
        ("namespace" = String, Path, description = "Namespace ID"),
        DeleteAllQuery
    ),
    responses(
        (status = 200, description = "Per-resource outcome of the bulk delete", body = BulkDeleteOutcome),
        (status = 500, description = "Storage unavailable")
    ),
    tag = "NLB management"
)]
#[instrument(skip(state, query), fields(namespace = %namespace, force = query.force))]
pub async fn delete_all_nlbs_handler(
    State(state): State<ApiState>,
    Path(namespace): Path<String>,
    Query(query): Query<DeleteAllQuery>,
) -> Result<Json<BulkDeleteOutcome>, ApiError> {
    let outcome = state
        .service
        .delete_all(&namespace, &query.match_substring, query.force)
        .await?;
    Ok(Json(outcome))
}
