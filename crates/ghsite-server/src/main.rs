mod assets;
mod config;
mod error;
mod response;
mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{App, HttpServer, middleware, web};
use anyhow::{Context, Result};
use clap::Parser;
use ghsite::{ContentSource, ListingOptions, RepoSource, SiteOptions};
use ghsite_github::{GitHubSource, GitHubSourceConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::assets::{Assets, BASE_STYLESHEET};
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "ghsite")]
#[command(about = "Serve a website straight from the Markdown in a GitHub repository")]
struct Cli {
    /// Path to the TOML config file
    #[arg(long, default_value = "ghsite.toml")]
    config: PathBuf,
    /// Address to bind (overrides config and GHSITE_HOST)
    #[arg(long)]
    host: Option<String>,
    /// Port to bind (overrides config and GHSITE_PORT)
    #[arg(long)]
    port: Option<u16>,
}

/// Shared across workers.
pub struct AppState {
    pub source: Arc<dyn ContentSource>,
    /// Repository served at `/`.
    pub site: RepoSource,
    pub options: SiteOptions,
    pub assets: Assets,
    pub page_max_age: u64,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("ghsite=info,ghsite_github=info,ghsite_server=info,actix_web=info")
        }))
        .with(fmt::layer())
        .init();
}

fn build_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = config::load_config(&cli.config);
    config.apply_env(|key| std::env::var(key).ok())?;

    if let Some(host) = &cli.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    config.validate()?;
    Ok(config)
}

fn build_state(config: &AppConfig) -> AppState {
    let source = GitHubSource::new(GitHubSourceConfig {
        token: config.github.token.clone(),
        api_base_url: config.github.api_base_url.clone(),
        raw_base_url: config.github.raw_base_url.clone(),
        git_base_url: config.github.git_base_url.clone(),
    });

    AppState {
        source: Arc::new(source),
        site: RepoSource::new(&config.site.owner, &config.site.repo),
        options: SiteOptions {
            stylesheet_href: Assets::href(BASE_STYLESHEET),
            listing: ListingOptions {
                excerpts: config.listing.excerpts,
            },
        },
        assets: Assets::load(),
        page_max_age: config.server.page_max_age,
    }
}

#[actix_web::main]
async fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    let state = web::Data::new(build_state(&config));

    let bind = (config.server.host.clone(), config.server.port);
    tracing::info!(
        "serving {} on http://{}:{}",
        state.site,
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::Logger::default())
            .configure(routes::configure_routes)
    })
    .bind(bind)
    .with_context(|| {
        format!(
            "failed to bind {}:{}",
            config.server.host, config.server.port
        )
    })?
    .run()
    .await?;

    Ok(())
}
