use axum::{routing::post, Json, Router};
use axum::extract::State;
use axum_helpers::{
    errors::responses::{BadRequestValidationResponse, InternalServerErrorResponse},
    ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::ContactResult;
use crate::mailer::ContactMailer;
use crate::models::{ContactForm, MessageResponse};
use crate::service::ContactService;

pub const TAG: &str = "Contact";

/// OpenAPI documentation for the contact API
#[derive(OpenApi)]
#[openapi(
    paths(submit_form),
    components(
        schemas(ContactForm, MessageResponse),
        responses(BadRequestValidationResponse, InternalServerErrorResponse)
    ),
    tags(
        (name = TAG, description = "Contact form endpoints")
    )
)]
pub struct ApiDoc;

/// Create the contact router
pub fn router<M: ContactMailer + 'static>(service: ContactService<M>) -> Router {
    let shared_service = Arc::new(service);

    Router::new()
        .route("/formContact", post(submit_form))
        .with_state(shared_service)
}

/// Submit the contact form, triggering one outbound email
#[utoipa::path(
    post,
    path = "/formContact",
    tag = TAG,
    request_body = ContactForm,
    responses(
        (status = 200, description = "Form delivered", body = MessageResponse),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn submit_form<M: ContactMailer>(
    State(service): State<Arc<ContactService<M>>>,
    ValidatedJson(form): ValidatedJson<ContactForm>,
) -> ContactResult<Json<MessageResponse>> {
    service.submit_form(form).await?;
    Ok(Json(MessageResponse::new("Formulario enviado exitosamente")))
}
