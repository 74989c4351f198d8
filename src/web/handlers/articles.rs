//! Article handlers for Web API.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::article::ArticleService;
use crate::web::dto::{
    ArticleDetail, ArticleListResponse, ArticleSummary, ListQuery, ReadStatusUpdate,
    SubmitRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::ApiKey;

/// POST /submit - Save the article at a URL.
///
/// Answers 201 for a new article and 200 when identical content was
/// already saved.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    _key: ApiKey,
    ValidatedJson(req): ValidatedJson<SubmitRequest>,
) -> Result<(StatusCode, Json<ArticleSummary>), ApiError> {
    let service = ArticleService::new(&state.db, &state.processor);
    let (article, created) = service.submit(&req.url).await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(ArticleSummary::from(&article))))
}

/// GET /articles - List saved articles, newest first.
pub async fn list_articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ArticleListResponse>, ApiError> {
    let query = params.to_query();
    let service = ArticleService::new(&state.db, &state.processor);
    let page = service.list(&query).await?;

    Ok(Json(ArticleListResponse {
        articles: page.articles.iter().map(ArticleSummary::from).collect(),
        skip: query.skip,
        limit: query.limit,
        total: page.total,
    }))
}

/// GET /articles/:id - Get a full article.
pub async fn get_article(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ArticleDetail>, ApiError> {
    let service = ArticleService::new(&state.db, &state.processor);
    let article = service.get(id).await?;
    Ok(Json(ArticleDetail::from(article)))
}

/// PATCH /articles/:id - Mark an article read or unread.
pub async fn update_article(
    State(state): State<Arc<AppState>>,
    _key: ApiKey,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ReadStatusUpdate>,
) -> Result<Json<ArticleSummary>, ApiError> {
    let service = ArticleService::new(&state.db, &state.processor);
    let article = service.set_read_status(id, req.read_status).await?;
    Ok(Json(ArticleSummary::from(&article)))
}
