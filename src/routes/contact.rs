use axum::{
    extract::{FromRequest, Multipart, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    api_error::ApiError,
    form::ContactFields,
    models::{NewSubmission, Submission},
    password::hash_password_blocking,
    state::AppState,
    upload::{StagedImage, UploadError},
};

pub const SUBMITTED_MESSAGE: &str = "Form submitted successfully!";

#[derive(Serialize)]
pub struct MessageBody {
    pub message: &'static str,
}

enum BodyKind {
    Multipart,
    Json,
    UrlEncoded,
    Other,
}

/// `POST /api/contact`
#[tracing::instrument(skip_all)]
pub async fn submit_contact_form(
    State(state): State<AppState>,
    request: Request,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    let (fields, image) = read_request(&state, request).await?;
    let image_path = image.as_ref().map(StagedImage::stored_path);

    match store_submission(&state, fields, image_path).await {
        Ok(submission) => {
            info!("Stored submission {:?}", submission.id);
            Ok((
                StatusCode::CREATED,
                Json(MessageBody {
                    message: SUBMITTED_MESSAGE,
                }),
            ))
        }

        Err(err) => {
            if let Some(image) = &image {
                state.upload_handler.discard(image).await;
            }
            Err(err)
        }
    }
}

async fn read_request(
    state: &AppState,
    request: Request,
) -> Result<(ContactFields, Option<StagedImage>), ApiError> {
    match body_kind(&request) {
        BodyKind::Multipart => {
            let multipart = Multipart::from_request(request, state)
                .await
                .map_err(UploadError::from)?;
            let form = state.upload_handler.accept(multipart).await?;

            Ok((ContactFields::from_map(form.fields), form.image))
        }

        BodyKind::Json => {
            let Json(fields) = Json::<ContactFields>::from_request(request, state)
                .await
                .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;

            Ok((fields, None))
        }

        BodyKind::UrlEncoded => {
            let Form(fields) = Form::<ContactFields>::from_request(request, state)
                .await
                .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))?;

            Ok((fields, None))
        }

        BodyKind::Other => {
            debug!("Request body has no form content type");
            Ok((ContactFields::default(), None))
        }
    }
}

fn body_kind(request: &Request) -> BodyKind {
    let Some(content_type) = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    else {
        return BodyKind::Other;
    };

    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.as_str() {
        "multipart/form-data" => BodyKind::Multipart,
        "application/json" => BodyKind::Json,
        "application/x-www-form-urlencoded" => BodyKind::UrlEncoded,
        _ => BodyKind::Other,
    }
}

async fn store_submission(
    state: &AppState,
    fields: ContactFields,
    image_path: Option<String>,
) -> Result<Submission, ApiError> {
    let form = fields.validate().ok_or(ApiError::MissingFields)?;

    let password_hash = hash_password_blocking(form.password).await?;

    let submission = NewSubmission {
        first_name: form.first_name,
        last_name: form.last_name,
        email: form.email,
        mobile: form.mobile,
        password_hash,
        image_path,
        address: form.address,
    };

    Ok(state
        .submission_repository
        .add_submission(&submission)
        .await?)
}
