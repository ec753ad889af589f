//! Route dispatch.
//!
//! - `/assets/{name}[/{tail}]` bundled assets
//! - `/github-site/{owner}/{repo}[/{path}]` any repository, links kept under that prefix
//! - `/{path}` the configured site repository

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use serde::Deserialize;

use ghsite::{LinkBase, Page, RepoSource};

use crate::AppState;
use crate::error::AppError;
use crate::response;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/healthz", web::get().to(health))
        .route("/assets/{name}", web::get().to(asset))
        .route("/assets/{name}/{tail:.*}", web::get().to(asset))
        .route("/github-site/{owner}/{repo}", web::get().to(proxied_page))
        .route("/github-site/{owner}/{repo}/{path:.*}", web::get().to(proxied_page))
        .route("/{path:.*}", web::get().to(site_page));
}

#[derive(Debug, Deserialize)]
struct AssetPath {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SitePath {
    #[serde(default)]
    path: String,
}

#[derive(Debug, Deserialize)]
struct ProxiedPath {
    owner: String,
    repo: String,
    #[serde(default)]
    path: String,
}

async fn health() -> HttpResponse {
    response::text(StatusCode::OK, "ok")
}

/// GET /assets/{name}/{tail}
///
/// The tail is a cache-busting version and is ignored.
async fn asset(
    state: web::Data<AppState>,
    path: web::Path<AssetPath>,
) -> Result<HttpResponse, AppError> {
    let name = path.into_inner().name;
    let asset = state
        .assets
        .lookup(&name)
        .ok_or(AppError::AssetNotFound(name))?;

    Ok(response::stylesheet(asset.content_type, asset.source))
}

/// GET /{path}
async fn site_page(
    state: web::Data<AppState>,
    path: web::Path<SitePath>,
) -> Result<HttpResponse, AppError> {
    let path = path.into_inner().path;
    render(&state, &state.site, &LinkBase::root(), &path).await
}

/// GET /github-site/{owner}/{repo}/{path}
async fn proxied_page(
    state: web::Data<AppState>,
    path: web::Path<ProxiedPath>,
) -> Result<HttpResponse, AppError> {
    let ProxiedPath { owner, repo, path } = path.into_inner();
    let link_base = LinkBase::proxied(&owner, &repo);
    render(&state, &RepoSource::new(owner, repo), &link_base, &path).await
}

async fn render(
    state: &AppState,
    repo: &RepoSource,
    link_base: &LinkBase,
    path: &str,
) -> Result<HttpResponse, AppError> {
    let page =
        ghsite::render_page(state.source.as_ref(), repo, link_base, path, &state.options).await?;

    Ok(match page {
        Page::Html(page) => response::html(page.to_html(), state.page_max_age),
        Page::Asset(raw) => response::raw(raw, path, state.page_max_age),
    })
}
