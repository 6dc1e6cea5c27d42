//! Custom Axum extractors

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::error::ApiError;
use crate::models::IdInput;

/// JSON body whose rejections are reported as `400` [`ApiError`]s.
///
/// Plain `Json` answers 415/422, which the mobile client treats as
/// unexpected; everything malformed here is a bad request.
pub struct ApiJson<T>(pub T);

impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection: JsonRejection| {
                body_error(rejection.status(), rejection.body_text())
            })?;
        Ok(Self(value))
    }
}

/// Keep 413 for oversized bodies; everything else is a 400.
fn body_error(status: StatusCode, message: String) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { message }
    } else {
        ApiError::BadRequest { message }
    }
}

/// Picture as received: base64 text or raw bytes from a file part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PictureInput {
    Base64(String),
    Bytes(Vec<u8>),
}

/// Bubble upload, from either a JSON body or `multipart/form-data`.
///
/// Fields stay optional so handlers can report exactly which one is missing.
#[derive(Debug, Default)]
pub struct BubbleForm {
    pub id: Option<IdInput>,
    pub description: Option<String>,
    pub picture: Option<PictureInput>,
}

#[derive(Deserialize)]
struct BubbleJson {
    id: Option<IdInput>,
    description: Option<String>,
    picture: Option<String>,
}

impl<S> FromRequest<S> for BubbleForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let ApiJson(body) = ApiJson::<BubbleJson>::from_request(req, state).await?;
            return Ok(Self {
                id: body.id,
                description: body.description,
                picture: body.picture.map(PictureInput::Base64),
            });
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|rejection| body_error(rejection.status(), rejection.body_text()))?;

        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_owned();
            let is_file = field.file_name().is_some();

            match name.as_str() {
                "id" => {
                    form.id = Some(IdInput::Text(field.text().await.map_err(multipart_error)?));
                }
                "description" => {
                    form.description = Some(field.text().await.map_err(multipart_error)?);
                }
                "picture" if is_file => {
                    let bytes = field.bytes().await.map_err(multipart_error)?;
                    form.picture = Some(PictureInput::Bytes(bytes.to_vec()));
                }
                "picture" => {
                    form.picture = Some(PictureInput::Base64(
                        field.text().await.map_err(multipart_error)?,
                    ));
                }
                other => {
                    tracing::debug!(field = other, "ignoring unknown multipart field");
                }
            }
        }

        Ok(form)
    }
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> ApiError {
    body_error(err.status(), err.body_text())
}
