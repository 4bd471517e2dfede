use super::page::{self, Notice, PageView, RETRY_HINT};
use super::AppState;
use crate::error::ColorGenError;
use crate::i18n::Language;
use crate::models::{GenerationRequest, DOWNLOAD_FILE_NAME};
use crate::session::SessionId;
use actix_web::{
    cookie::{Cookie, SameSite},
    http::header,
    web, HttpRequest, HttpResponse, Responder,
};
use serde::Deserialize;
use serde_json::json;

pub const SESSION_COOKIE: &str = "colorgen_session";

#[derive(Debug, Deserialize)]
pub struct LanguageQuery {
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(default)]
    pub description: String,
    pub lang: Option<String>,
}

fn session_from_cookie(req: &HttpRequest) -> Option<SessionId> {
    req.cookie(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse().ok())
}

fn session_cookie(id: SessionId) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, id.to_string())
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn html_page(id: Option<SessionId>, view: &PageView<'_>) -> HttpResponse {
    let mut response = HttpResponse::Ok();
    if let Some(id) = id {
        response.cookie(session_cookie(id));
    }
    response
        .content_type("text/html; charset=utf-8")
        .body(page::render(view))
}

pub async fn index(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<LanguageQuery>,
) -> impl Responder {
    let existing = session_from_cookie(&req).filter(|id| state.sessions.contains(*id));
    let chosen = query.lang.as_deref().and_then(Language::from_code);

    // A plain first visit has nothing to remember, so no session is created.
    let id = match (existing, chosen) {
        (Some(id), _) => Some(id),
        (None, Some(_)) => Some(state.sessions.create()),
        (None, None) => None,
    };
    if let (Some(id), Some(language)) = (id, chosen) {
        state.sessions.set_language(id, language);
    }

    let session = id
        .and_then(|id| state.sessions.get(id))
        .unwrap_or_default();
    html_page(
        id,
        &PageView {
            language: session.language,
            description: &session.last_description,
            notice: None,
            image_png: None,
        },
    )
}

pub async fn generate(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: web::Form<GenerateForm>,
) -> impl Responder {
    let id = state.sessions.resume_or_create(session_from_cookie(&req));
    let form = form.into_inner();

    let language = form
        .lang
        .as_deref()
        .and_then(Language::from_code)
        .or_else(|| state.sessions.get(id).map(|session| session.language))
        .unwrap_or_default();
    state.sessions.set_language(id, language);
    state.sessions.update_description(id, &form.description);

    let request = match GenerationRequest::new(form.description.as_str(), language) {
        Ok(request) => request,
        Err(e) => {
            log::warn!("Rejected submission: {}", e);
            return html_page(
                Some(id),
                &PageView {
                    language,
                    description: &form.description,
                    notice: Some(Notice::Warning(e.user_message())),
                    image_png: None,
                },
            );
        }
    };

    let png = state
        .generator
        .generate_request(&request)
        .await
        .and_then(|image| image.to_png());

    match png {
        Ok(png) => {
            state.sessions.store_image(id, png.clone());
            html_page(
                Some(id),
                &PageView {
                    language,
                    description: request.description(),
                    notice: None,
                    image_png: Some(&png),
                },
            )
        }
        Err(e) => {
            log::error!("Image generation failed for session {}: {}", id, e);
            state.sessions.clear_image(id);
            html_page(
                Some(id),
                &PageView {
                    language,
                    description: request.description(),
                    notice: Some(Notice::Error(failure_message(&e))),
                    image_png: None,
                },
            )
        }
    }
}

fn failure_message(e: &ColorGenError) -> String {
    format!("{} {}", e.user_message(), RETRY_HINT)
}

pub async fn download(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let image = session_from_cookie(&req).and_then(|id| state.sessions.last_image(id));

    match image {
        Some(png) => HttpResponse::Ok()
            .content_type("image/png")
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
            ))
            .body(png.as_ref().clone()),
        None => HttpResponse::NotFound()
            .content_type("text/plain; charset=utf-8")
            .body("No image generated yet."),
    }
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
