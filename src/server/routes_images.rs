//! Image record API routes.
//!
//! Five POST endpoints under `/app3`, one per [`RecordStore`] operation.
//! Request fields are taken as raw JSON values so that a field of the wrong
//! type is reported as a validation failure instead of a body rejection.
//!
//! [`RecordStore`]: crate::store::RecordStore

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use picvault_common::{validate, Error};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::AppError;
use super::AppContext;

/// Create image-related routes.
pub fn image_routes() -> Router<AppContext> {
    Router::new()
        .route("/init-database", post(init_database))
        .route("/create", post(create_image))
        .route("/read", post(read_images))
        .route("/update", post(update_image))
        .route("/delete", post(delete_image))
}

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InitDatabaseRequest {
    pub password: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateImageRequest {
    pub uid: Option<Value>,
    pub image_name: Option<Value>,
    #[serde(rename = "base64Image")]
    pub base64_image: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ReadImagesRequest {
    pub uid: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateImageRequest {
    pub id: Option<Value>,
    pub uid: Option<Value>,
    pub image_name: Option<Value>,
    #[serde(rename = "base64Image")]
    pub base64_image: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteImageRequest {
    pub id: Option<Value>,
    pub uid: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

fn as_str(value: &Option<Value>) -> Option<&str> {
    value.as_ref().and_then(Value::as_str)
}

/// A JSON number with no fractional part, so `5` and `5.0` both name row 5.
fn as_int(value: &Option<Value>) -> Option<i64> {
    let value = value.as_ref()?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(f))
            .map(|f| f as i64)
    })
}

fn rejected(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");
    Error::validation(validate::INVALID_INPUT).into()
}

/// Unwrap a JSON body, turning a malformed one into a 400.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload.map(|Json(body)| body).map_err(rejected)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /app3/init-database
async fn init_database(
    State(ctx): State<AppContext>,
    payload: Result<Json<InitDatabaseRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    // A body that cannot be read carries no password.
    let request = payload.map(|Json(body)| body).unwrap_or_default();

    ctx.store.initialize(as_str(&request.password))?;

    Ok(Json(MessageResponse {
        message: "Database initialized successfully.",
    }))
}

/// POST /app3/create
async fn create_image(
    State(ctx): State<AppContext>,
    payload: Result<Json<CreateImageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = json_body(payload)?;

    let record = ctx.store.create(
        as_str(&request.uid),
        as_str(&request.image_name),
        as_str(&request.base64_image),
    )?;

    Ok((StatusCode::CREATED, Json(record)))
}

/// POST /app3/read
async fn read_images(
    State(ctx): State<AppContext>,
    payload: Result<Json<ReadImagesRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let request = match payload {
        Ok(Json(body)) => body,
        Err(JsonRejection::MissingJsonContentType(_)) => ReadImagesRequest::default(),
        Err(rejection) => return Err(rejected(rejection)),
    };

    let listing = ctx.store.read(as_str(&request.uid))?;

    Ok(Json(listing))
}

/// POST /app3/update
async fn update_image(
    State(ctx): State<AppContext>,
    payload: Result<Json<UpdateImageRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let request = json_body(payload)?;

    ctx.store.update(
        as_int(&request.id),
        as_str(&request.uid),
        as_str(&request.image_name),
        as_str(&request.base64_image),
    )?;

    Ok(Json(MessageResponse {
        message: "Record updated successfully.",
    }))
}

/// POST /app3/delete
async fn delete_image(
    State(ctx): State<AppContext>,
    payload: Result<Json<DeleteImageRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let request = json_body(payload)?;

    ctx.store.delete(as_int(&request.id), as_str(&request.uid))?;

    Ok(Json(MessageResponse {
        message: "Record deleted successfully.",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn typed_fields_extract() {
        let req: UpdateImageRequest = serde_json::from_value(json!({
            "id": 5,
            "uid": "alice",
            "image_name": "cat",
            "base64Image": "AAAA",
        }))
        .unwrap();

        assert_eq!(as_int(&req.id), Some(5));
        assert_eq!(as_str(&req.uid), Some("alice"));
        assert_eq!(as_str(&req.image_name), Some("cat"));
        assert_eq!(as_str(&req.base64_image), Some("AAAA"));
    }

    #[test]
    fn wrong_types_extract_as_none() {
        let req: UpdateImageRequest = serde_json::from_value(json!({
            "id": "5",
            "uid": 42,
            "image_name": null,
        }))
        .unwrap();

        assert_eq!(as_int(&req.id), None);
        assert_eq!(as_str(&req.uid), None);
        assert_eq!(as_str(&req.image_name), None);
        assert_eq!(as_str(&req.base64_image), None);
    }

    #[test]
    fn integral_float_id_is_an_integer() {
        let req: DeleteImageRequest =
            serde_json::from_value(json!({"id": 5.0, "uid": "alice"})).unwrap();
        assert_eq!(as_int(&req.id), Some(5));

        let req: DeleteImageRequest = serde_json::from_value(json!({"id": -0.0})).unwrap();
        assert_eq!(as_int(&req.id), Some(0));

        let req: DeleteImageRequest = serde_json::from_value(json!({"id": 1e300})).unwrap();
        assert_eq!(as_int(&req.id), None);
    }

    #[test]
    fn fractional_id_is_not_an_integer() {
        let req: DeleteImageRequest =
            serde_json::from_value(json!({"id": 1.5, "uid": "alice"})).unwrap();
        assert_eq!(as_int(&req.id), None);
    }

    #[test]
    fn empty_object_is_all_missing() {
        let req: CreateImageRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.uid.is_none());
        assert!(req.image_name.is_none());
        assert!(req.base64_image.is_none());
    }
}
