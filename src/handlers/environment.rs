use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};
use crate::handlers::{double_option, validate_required, JsonBody};
use crate::models::{CreateEnvironment, Environment, EnvironmentStatus, UpdateEnvironment};
use crate::repositories::{EnvironmentRepository, Repository};
use crate::state::AppState;

// ============ Request/Response DTOs ============

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateEnvironmentRequest {
    pub name: Option<String>,
    /// IP address or URL
    pub url: Option<String>,
    pub version: Option<String>,
    #[schema(example = "working")]
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// Any subset of fields. `null` or `""` clears an optional field.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEnvironmentRequest {
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub version: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, example = "down")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub notes: Option<Option<String>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentResponse {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[schema(value_type = String, example = "working")]
    pub status: EnvironmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String)]
    pub last_updated: time::OffsetDateTime,
}

impl From<Environment> for EnvironmentResponse {
    fn from(e: Environment) -> Self {
        Self {
            id: e.id,
            name: e.name,
            url: e.url,
            version: e.version,
            status: e.status,
            notes: e.notes,
            last_updated: e.last_updated,
        }
    }
}

impl TryFrom<CreateEnvironmentRequest> for CreateEnvironment {
    type Error = AppError;

    fn try_from(payload: CreateEnvironmentRequest) -> AppResult<Self> {
        let (url, status) = match (
            validate_required(&payload.url),
            validate_required(&payload.status),
        ) {
            (Some(url), Some(status)) => (url.to_string(), status),
            _ => {
                return Err(AppError::Validation(
                    "URL and status are required".to_string(),
                ))
            }
        };

        Ok(Self {
            status: parse_status(status)?,
            url,
            name: payload.name,
            version: payload.version,
            notes: payload.notes,
        })
    }
}

impl TryFrom<UpdateEnvironmentRequest> for UpdateEnvironment {
    type Error = AppError;

    fn try_from(payload: UpdateEnvironmentRequest) -> AppResult<Self> {
        let status = match payload.status {
            None => None,
            Some(Some(status)) => Some(parse_status(&status)?),
            Some(None) => return Err(invalid_status()),
        };

        let url = match payload.url {
            None => None,
            Some(url) => match validate_required(&url) {
                Some(url) => Some(url.to_string()),
                None => return Err(AppError::Validation("URL cannot be empty".to_string())),
            },
        };

        Ok(Self {
            name: payload.name,
            url,
            version: payload.version,
            status,
            notes: payload.notes,
        })
    }
}

fn parse_status(value: &str) -> AppResult<EnvironmentStatus> {
    value.parse().map_err(|_| invalid_status())
}

fn invalid_status() -> AppError {
    AppError::Validation("Invalid status value".to_string())
}

// ============ Handlers ============

/// List all environments, most recently updated first
#[utoipa::path(
    get,
    path = "/api/environments",
    responses(
        (status = 200, description = "List of environments", body = [EnvironmentResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Environments"
)]
pub async fn list_environments(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EnvironmentResponse>>> {
    let environments = EnvironmentRepository::list(&state.db).await?;
    Ok(Json(environments.into_iter().map(|e| e.into()).collect()))
}

/// Get an environment by ID
#[utoipa::path(
    get,
    path = "/api/environments/{id}",
    params(
        ("id" = String, Path, description = "Environment ID")
    ),
    responses(
        (status = 200, description = "Environment details", body = EnvironmentResponse),
        (status = 404, description = "Environment not found")
    ),
    tag = "Environments"
)]
pub async fn get_environment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<EnvironmentResponse>> {
    let environment = EnvironmentRepository::find_by_id(&state.db, &id).await?;
    Ok(Json(environment.into()))
}

/// Create a new environment
#[utoipa::path(
    post,
    path = "/api/environments",
    request_body = CreateEnvironmentRequest,
    responses(
        (status = 201, description = "Environment created successfully", body = EnvironmentResponse),
        (status = 400, description = "Validation error")
    ),
    tag = "Environments"
)]
pub async fn create_environment(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateEnvironmentRequest>,
) -> AppResult<(StatusCode, Json<EnvironmentResponse>)> {
    let create_env = CreateEnvironment::try_from(payload)?;

    let environment = EnvironmentRepository::create(&state.db, &create_env).await?;
    tracing::info!(id = %environment.id, status = %environment.status, "Environment created");
    Ok((StatusCode::CREATED, Json(environment.into())))
}

/// Update an environment
#[utoipa::path(
    put,
    path = "/api/environments/{id}",
    params(
        ("id" = String, Path, description = "Environment ID")
    ),
    request_body = UpdateEnvironmentRequest,
    responses(
        (status = 200, description = "Environment updated successfully", body = EnvironmentResponse),
        (status = 400, description = "Validation error"),
        (status = 404, description = "Environment not found")
    ),
    tag = "Environments"
)]
pub async fn update_environment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(payload): JsonBody<UpdateEnvironmentRequest>,
) -> AppResult<Json<EnvironmentResponse>> {
    let update_env = UpdateEnvironment::try_from(payload)?;

    let environment = EnvironmentRepository::update(&state.db, &id, &update_env).await?;
    tracing::info!(id = %environment.id, status = %environment.status, "Environment updated");
    Ok(Json(environment.into()))
}

/// Delete an environment
#[utoipa::path(
    delete,
    path = "/api/environments/{id}",
    params(
        ("id" = String, Path, description = "Environment ID")
    ),
    responses(
        (status = 204, description = "Environment deleted successfully"),
        (status = 404, description = "Environment not found")
    ),
    tag = "Environments"
)]
pub async fn delete_environment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    if !EnvironmentRepository::delete(&state.db, &id).await? {
        return Err(AppError::NotFound("Environment".to_string()));
    }

    tracing::info!(id = %id, "Environment deleted");
    Ok(StatusCode::NO_CONTENT)
}
