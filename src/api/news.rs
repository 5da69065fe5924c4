//! News API.
//!
//! Reads are public and only see published articles. Create, update and
//! delete require a bearer token.

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde::Deserialize;
use tracing::info;

use super::error::{ApiError, ResultExt, WriteResultExt, optional_text, require_text};
use super::{ItemResponse, ListQuery, SuccessResponse};
use crate::auth::{AdminAuth, MaybeAdmin, UNAUTHORIZED_MESSAGE};
use crate::db::{Database, NewsInput};
use crate::impl_has_auth_settings;
use crate::settings::AuthSettings;

const MAX_TITLE_LENGTH: usize = 200;
const MAX_SLUG_LENGTH: usize = 100;

/// State for news endpoints.
#[derive(Clone)]
pub struct NewsState {
    pub db: Database,
    pub auth: AuthSettings,
}

impl_has_auth_settings!(NewsState);

pub fn router(state: NewsState) -> Router {
    Router::new()
        .route("/", get(list_news).post(create_news))
        .route("/slug/{slug}", get(get_news_by_slug))
        .route(
            "/{id}",
            get(get_news).put(update_news).delete(delete_news),
        )
        .with_state(state)
}

// --- Request types ---

#[derive(Deserialize)]
struct NewsRequest {
    title: String,
    slug: Option<String>,
    excerpt: Option<String>,
    #[serde(default)]
    content: String,
    image_url: Option<String>,
    #[serde(default)]
    published: bool,
}

// --- Helpers ---

/// Lowercase ASCII letters and digits joined by single hyphens.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }
    slug
}

/// Shorten a generated slug to `max_len`, cutting at a word boundary when one exists.
fn truncate_slug(slug: &str, max_len: usize) -> &str {
    if slug.len() <= max_len {
        return slug;
    }
    // Slugs are ASCII, so any byte index is a char boundary
    let head = &slug[..max_len];
    if slug.as_bytes()[max_len] == b'-' {
        return head;
    }
    match head.rfind('-') {
        Some(pos) if pos > 0 => &head[..pos],
        _ => head,
    }
}

fn validate(payload: NewsRequest) -> Result<NewsInput, ApiError> {
    require_text(&payload.title, "Title", MAX_TITLE_LENGTH)?;

    let slug = match optional_text(payload.slug) {
        Some(slug) => {
            if slug != slugify(&slug) {
                return Err(ApiError::bad_request(
                    "Slug may only contain lowercase letters, digits and single hyphens",
                ));
            }
            slug
        }
        None => {
            let generated = slugify(&payload.title);
            truncate_slug(&generated, MAX_SLUG_LENGTH).to_string()
        }
    };
    if slug.is_empty() {
        return Err(ApiError::bad_request("Slug is required"));
    }
    if slug.len() > MAX_SLUG_LENGTH {
        return Err(ApiError::bad_request("Slug is too long"));
    }

    Ok(NewsInput {
        title: payload.title.trim().to_string(),
        slug,
        excerpt: optional_text(payload.excerpt),
        content: payload.content,
        image_url: optional_text(payload.image_url),
        published: payload.published,
    })
}

// --- Handlers ---

async fn list_news(
    State(state): State<NewsState>,
    MaybeAdmin(admin): MaybeAdmin,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if query.include_hidden && admin.is_none() {
        return Err(ApiError::unauthorized(UNAUTHORIZED_MESSAGE));
    }

    let articles = state
        .db
        .news()
        .list(query.include_hidden)
        .await
        .db_err("Failed to list news")?;

    Ok(Json(articles))
}

async fn get_news(
    State(state): State<NewsState>,
    MaybeAdmin(admin): MaybeAdmin,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state
        .db
        .news()
        .get(id)
        .await
        .db_err("Failed to get news")?
        .filter(|a| a.published || admin.is_some())
        .ok_or_else(|| ApiError::not_found("News article not found"))?;

    Ok(Json(article))
}

async fn get_news_by_slug(
    State(state): State<NewsState>,
    MaybeAdmin(admin): MaybeAdmin,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let article = state
        .db
        .news()
        .get_by_slug(&slug)
        .await
        .db_err("Failed to get news")?
        .filter(|a| a.published || admin.is_some())
        .ok_or_else(|| ApiError::not_found("News article not found"))?;

    Ok(Json(article))
}

async fn create_news(
    State(state): State<NewsState>,
    AdminAuth(claims): AdminAuth,
    payload: Result<Json<NewsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let input = validate(payload)?;

    let id = state
        .db
        .news()
        .create(&input)
        .await
        .write_err("Failed to create news", "Slug is already in use")?;

    let article = state
        .db
        .news()
        .get(id)
        .await
        .db_err("Failed to get created news")?
        .ok_or_else(|| ApiError::internal("Created news not found"))?;

    info!(id, slug = %article.slug, admin = %claims.sub, "News created");

    Ok((
        StatusCode::CREATED,
        Json(ItemResponse::ok(article)),
    ))
}

async fn update_news(
    State(state): State<NewsState>,
    AdminAuth(claims): AdminAuth,
    Path(id): Path<i64>,
    payload: Result<Json<NewsRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(payload) = payload?;
    let input = validate(payload)?;

    let updated = state
        .db
        .news()
        .update(id, &input)
        .await
        .write_err("Failed to update news", "Slug is already in use")?;

    if !updated {
        return Err(ApiError::not_found("News article not found"));
    }

    let article = state
        .db
        .news()
        .get(id)
        .await
        .db_err("Failed to get updated news")?
        .ok_or_else(|| ApiError::not_found("News article not found"))?;

    info!(id, admin = %claims.sub, "News updated");

    Ok(Json(ItemResponse::ok(article)))
}

async fn delete_news(
    State(state): State<NewsState>,
    AdminAuth(claims): AdminAuth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .db
        .news()
        .delete(id)
        .await
        .db_err("Failed to delete news")?;

    if !deleted {
        return Err(ApiError::not_found("News article not found"));
    }

    info!(id, admin = %claims.sub, "News deleted");
    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("New Patient Specials!"), "new-patient-specials");
        assert_eq!(slugify("  Free   whitening -- July "), "free-whitening-july");
        assert_eq!(slugify("Dr. Smith's 2024 update"), "dr-smith-s-2024-update");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_validate_generates_slug() {
        let input = validate(NewsRequest {
            title: " Holiday Hours ".to_string(),
            slug: None,
            excerpt: Some("".to_string()),
            content: String::new(),
            image_url: None,
            published: true,
        })
        .unwrap();

        assert_eq!(input.title, "Holiday Hours");
        assert_eq!(input.slug, "holiday-hours");
        assert_eq!(input.excerpt, None);
    }

    #[test]
    fn test_truncate_slug() {
        assert_eq!(truncate_slug("short-slug", 20), "short-slug");
        assert_eq!(truncate_slug("holiday-hours-update", 15), "holiday-hours");
        assert_eq!(truncate_slug("holiday-hours-update", 13), "holiday-hours");
        assert_eq!(truncate_slug("holiday-hours-update", 14), "holiday-hours");
        assert_eq!(truncate_slug("supercalifragilistic", 5), "super");
    }

    #[test]
    fn test_validate_shortens_generated_slug() {
        let input = validate(NewsRequest {
            title: "Summer smile ".repeat(12),
            slug: None,
            excerpt: None,
            content: String::new(),
            image_url: None,
            published: false,
        })
        .unwrap();

        assert!(input.slug.len() <= MAX_SLUG_LENGTH);
        assert!(!input.slug.ends_with('-'));
        assert!(input.slug.starts_with("summer-smile-summer"));
    }

    #[test]
    fn test_validate_rejects_long_explicit_slug() {
        let result = validate(NewsRequest {
            title: "Holiday Hours".to_string(),
            slug: Some("a".repeat(MAX_SLUG_LENGTH + 1)),
            excerpt: None,
            content: String::new(),
            image_url: None,
            published: false,
        });
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_validate_rejects_bad_slug() {
        let result = validate(NewsRequest {
            title: "Holiday Hours".to_string(),
            slug: Some("Holiday Hours".to_string()),
            excerpt: None,
            content: String::new(),
            image_url: None,
            published: false,
        });
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }
}
