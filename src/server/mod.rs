// src/server/mod.rs
use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};
use url::Url;
use warp::{reject::Rejection, reply::Reply, Filter};

use crate::scrape::{self, author, history, list};

const DEFAULT_UPSTREAM: &str = "http://javid.ddns.net/tModLoader/";
const DEFAULT_PORT: u16 = 3000;

// Identifier hygiene before anything is spliced into an upstream URL.
// A steamid64 is decimal digits; internal mod names are word characters.
static STEAMID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+$").expect("steamid pattern should be valid"));
static MOD_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+$").expect("mod name pattern should be valid"));

/// Runtime settings, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upstream: Url,
    pub static_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .unwrap_or(DEFAULT_PORT);
        let mut upstream = env::var("UPSTREAM_BASE").unwrap_or_else(|_| DEFAULT_UPSTREAM.to_string());
        // Url::join treats a base without a trailing slash as a file.
        if !upstream.ends_with('/') {
            upstream.push('/');
        }
        let upstream = Url::parse(&upstream).context("UPSTREAM_BASE is not a valid URL")?;
        let static_dir = env::var("STATIC_DIR")
            .unwrap_or_else(|_| "static".to_string())
            .into();
        Ok(Self {
            port,
            upstream,
            static_dir,
        })
    }
}

/// Shared handler state. Cloning is cheap; the reqwest client keeps its
/// connection pool behind an Arc, and nothing here is mutable.
#[derive(Clone)]
pub struct AppContext {
    pub client: Client,
    pub upstream: Url,
}

impl AppContext {
    pub fn new(upstream: Url) -> Self {
        Self {
            client: Client::new(),
            upstream,
        }
    }
}

/// The front-end posts identifiers as `{"str": "<value>"}`.
#[derive(Debug, Deserialize)]
struct IdRequest {
    #[serde(rename = "str")]
    value: String,
}

async fn author_api(req: IdRequest, ctx: AppContext) -> Result<impl Reply, Rejection> {
    info!("author stats request for {}", req.value);
    if !STEAMID.is_match(&req.value) {
        warn!("rejecting author stats request, {:?} is not a steamid64", req.value);
        return Ok(warp::reply::json(&Vec::<author::AuthorModRecord>::new()));
    }
    let mods = scrape::or_empty(
        author::collect(&ctx.client, &ctx.upstream, &req.value).await,
        "author stats",
    );
    Ok(warp::reply::json(&mods))
}

async fn list_api(ctx: AppContext) -> Result<impl Reply, Rejection> {
    info!("mod list request");
    let mods = scrape::or_empty(list::collect(&ctx.client, &ctx.upstream).await, "mod list");
    Ok(warp::reply::json(&mods))
}

async fn history_api(req: IdRequest, ctx: AppContext) -> Result<impl Reply, Rejection> {
    info!("download history request for {}", req.value);
    if !MOD_NAME.is_match(&req.value) {
        warn!("rejecting history request, {:?} is not a mod name", req.value);
        return Ok(warp::reply::json(&Vec::<history::ModVersionRecord>::new()));
    }
    let versions = scrape::or_empty(
        history::collect(&ctx.client, &ctx.upstream, &req.value).await,
        "download history",
    );
    Ok(warp::reply::json(&versions))
}

async fn health_check() -> Result<impl Reply, Rejection> {
    Ok(warp::reply::json(&serde_json::json!({
        "status": "healthy",
        "service": "tmlstats",
    })))
}

/// Build the full route table.
///
/// Binding a listener is the caller's job, which keeps the handlers
/// drivable through `warp::test` without ever opening a port. Every
/// scrape endpoint answers 200 with a JSON array; a failed scrape is
/// indistinguishable from an empty one at this boundary.
pub fn routes(
    ctx: AppContext,
    static_dir: PathBuf,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let ctx = warp::any().map(move || ctx.clone());

    let index = warp::path::end()
        .and(warp::get())
        .and(warp::fs::file(static_dir.join("index.html")));
    let assets = warp::path("static").and(warp::fs::dir(static_dir));

    let author = warp::path("author_api")
        .and(warp::post())
        .and(warp::body::json())
        .and(ctx.clone())
        .and_then(author_api);

    let list = warp::path("list_api")
        .and(warp::post())
        .and(ctx.clone())
        .and_then(list_api);

    let history = warp::path("history_api")
        .and(warp::post())
        .and(warp::body::json())
        .and(ctx)
        .and_then(history_api);

    let health = warp::path("health").and(warp::get()).and_then(health_check);

    index.or(assets).or(author).or(list).or(history).or(health)
}

/// Bind and serve until the process is stopped.
pub async fn run(config: Config) -> Result<()> {
    let ctx = AppContext::new(config.upstream.clone());
    let routes = routes(ctx, config.static_dir.clone());
    info!("server starting on port {}", config.port);
    warp::serve(routes).run(([0, 0, 0, 0], config.port)).await;
    Ok(())
}
