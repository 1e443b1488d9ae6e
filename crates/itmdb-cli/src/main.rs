//! itmdb - TMDb movie metadata CLI.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use itmdb_api::tmdb::{LocalTmdbApi, SearchMovieParams, TmdbClient};
use itmdb_api::{FetchOptions, ImageDimension, Movie, search_movies};

/// Environment variable holding the TMDb API read access token.
const TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Fetch one movie by TMDb ID or title.
    Movie(MovieArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// Print poster and backdrop URLs resolved to a target size.
    Images(ImagesArgs),
    /// Print the TMDb image configuration.
    Configuration,
    /// Write settings to config.toml.
    Config(ConfigArgs),
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
#[command(group(ArgGroup::new("target").required(true).args(["id", "title"])))]
struct MovieArgs {
    /// TMDb movie ID (e.g. 27205).
    #[arg(long)]
    id: Option<u64>,
    /// Movie title to look up when the ID is unknown.
    #[arg(long)]
    title: Option<String>,
    /// Release year hint for `--title`.
    #[arg(long, requires = "title")]
    year: Option<i32>,
    /// Sections to fetch: basic, casts, keywords, images, all.
    #[arg(long, default_value = "basic")]
    options: FetchOptions,
    /// Response language (default: config or "en-US").
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "Inception").
    #[arg(long, required = true)]
    query: String,
    /// Release year hint.
    #[arg(long)]
    year: Option<i32>,
    /// Only movies whose primary release falls in this year.
    #[arg(long)]
    primary_release_year: Option<i32>,
    /// Response language (default: config or "en-US").
    #[arg(long)]
    language: Option<String>,
}

/// Arguments for the `images` subcommand.
#[derive(clap::Args)]
struct ImagesArgs {
    /// TMDb movie ID.
    #[arg(long, required = true)]
    id: u64,
    /// Target width in pixels.
    #[arg(long, conflicts_with = "height")]
    width: Option<u32>,
    /// Target height in pixels.
    #[arg(long)]
    height: Option<u32>,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
#[command(group(ArgGroup::new("setting").required(true).multiple(true).args(["api_token", "language"])))]
struct ConfigArgs {
    /// TMDb API read access token to store.
    #[arg(long)]
    api_token: Option<String>,
    /// Default response language to store.
    #[arg(long)]
    language: Option<String>,
}

/// Default target width for `images` when neither axis is given.
const DEFAULT_IMAGE_WIDTH: u32 = 500;

/// Builds a TMDb client from `TMDB_API_TOKEN` or the config file token.
///
/// # Errors
///
/// Returns an error if no token is configured or the client fails to build.
#[instrument(skip_all)]
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let api_token = config
        .api_token(std::env::var(TOKEN_ENV).ok())
        .with_context(|| {
            format!("{TOKEN_ENV} environment variable or [tmdb] api_token in config.toml is required")
        })?;

    TmdbClient::builder()
        .api_token(api_token)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .context("failed to build TMDB client")
}

/// Loads the config file selected by `--dir`.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Logs the fields of a populated movie.
fn log_movie(movie: &Movie) {
    tracing::info!(
        "{}\t{} ({})",
        movie.id().map_or_else(|| String::from("-"), |id| id.to_string()),
        movie.title(),
        movie
            .year()
            .map_or_else(|| String::from("-"), |y| y.to_string()),
    );
    if let Some(tagline) = movie.tagline() {
        tracing::info!("Tagline: {tagline}");
    }
    if let Some(overview) = movie.overview() {
        tracing::info!("Overview: {overview}");
    }
    if let Some(runtime) = movie.runtime() {
        tracing::info!("Runtime: {runtime} min");
    }
    tracing::info!("Votes: {}", movie.votes());
    tracing::info!("Genres: {}", movie.categories().join(", "));
    tracing::info!("Countries: {}", movie.countries().join(", "));
    tracing::info!("Languages: {}", movie.languages_spoken().join(", "));
    if let Some(imdb_id) = movie.imdb_id() {
        tracing::info!("IMDb: {imdb_id}");
    }
    if let Some(homepage) = movie.homepage() {
        tracing::info!("Homepage: {homepage}");
    }
    if let Some(url) = movie.url() {
        tracing::info!("TMDb: {url}");
    }
    if movie.options().contains(FetchOptions::KEYWORDS) {
        tracing::info!("Keywords: {}", movie.keywords().join(", "));
    }
    if movie.options().contains(FetchOptions::IMAGES) {
        tracing::info!(
            "Images: {} posters, {} backdrops",
            movie.posters().len(),
            movie.backdrops().len()
        );
    }
    for person in movie.cast() {
        let role = person.character().or_else(|| person.job()).unwrap_or("-");
        tracing::info!("  {}\t{}", person.name(), role);
    }
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the movie cannot be
/// fetched.
#[instrument(skip_all)]
async fn run_movie(args: &MovieArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let mut movie = match (args.id, args.title.as_deref(), args.year) {
        (Some(id), _, _) => Movie::with_id(id),
        (None, Some(title), Some(year)) => Movie::with_title_and_year(title, year),
        (None, Some(title), None) => Movie::with_title(title),
        (None, None, _) => anyhow::bail!("either --id or --title must be specified"),
    };

    movie
        .load(&client, args.options, language)
        .await
        .context("TMDB movie request failed")?;

    log_movie(&movie);
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let language = args.language.as_deref().unwrap_or(&config.tmdb.language);

    let mut params = SearchMovieParams::new(&args.query).language(language);
    if let Some(year) = args.year {
        params = params.year(year);
    }
    if let Some(year) = args.primary_release_year {
        params = params.primary_release_year(year);
    }

    let movies = search_movies(&client, &params)
        .await
        .context("TMDB search/movie request failed")?;

    tracing::info!("Total results: {}", movies.len());
    tracing::info!("ID\tTitle\t\t\tOrigLang\tReleaseDate");
    for movie in &movies {
        tracing::info!(
            "{}\t{}\t{}\t\t{}",
            movie.id().unwrap_or_default(),
            movie.title(),
            movie.original_language().unwrap_or("-"),
            movie
                .released()
                .map_or_else(|| String::from("-"), |d| d.to_string()),
        );
    }

    Ok(())
}

/// Runs the `images` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or an API request fails.
#[instrument(skip_all)]
async fn run_images(args: &ImagesArgs, config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let (target, dimension) = match (args.width, args.height) {
        (_, Some(height)) => (height, ImageDimension::Height),
        (Some(width), None) => (width, ImageDimension::Width),
        (None, None) => (DEFAULT_IMAGE_WIDTH, ImageDimension::Width),
    };

    let tmdb_config = client
        .configuration()
        .await
        .context("TMDB configuration request failed")?;

    let mut movie = Movie::with_id(args.id);
    movie
        .load(&client, FetchOptions::IMAGES, &config.tmdb.language)
        .await
        .context("TMDB movie request failed")?;

    for image in movie.posters().iter().chain(movie.backdrops()) {
        let (width, height) = image.original_size();
        let url = image
            .url_for_target(target, dimension, &tmdb_config)
            .map_or_else(|| String::from("-"), |u| u.to_string());
        tracing::info!(
            "{}\t{}x{}\t{}\t{}",
            image.image_type(),
            width,
            height,
            image.iso_639_1().unwrap_or("-"),
            url,
        );
    }

    Ok(())
}

/// Runs the `configuration` subcommand.
///
/// # Errors
///
/// Returns an error if the TMDB client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_configuration(config: &AppConfig) -> Result<()> {
    let client = build_tmdb_client(config)?;
    let tmdb_config = client
        .configuration()
        .await
        .context("TMDB configuration request failed")?;

    let images = &tmdb_config.images;
    tracing::info!("Base URL: {}", images.base_url);
    tracing::info!("Secure base URL: {}", images.secure_base_url);
    tracing::info!("Poster sizes: {}", images.poster_sizes.join(", "));
    tracing::info!("Backdrop sizes: {}", images.backdrop_sizes.join(", "));
    tracing::info!("Profile sizes: {}", images.profile_sizes.join(", "));

    Ok(())
}

/// Runs the `config` subcommand.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written.
fn run_config(args: &ConfigArgs, dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let mut config = AppConfig::load(&path)?;

    if let Some(token) = &args.api_token {
        config.tmdb.api_token = Some(token.clone());
    }
    if let Some(language) = &args.language {
        config.tmdb.language.clone_from(language);
    }

    config.save(&path)?;
    tracing::info!("Saved {}", path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match &cli.command {
        Commands::Movie(args) => run_movie(args, &load_config(dir)?).await,
        Commands::Search(args) => run_search(args, &load_config(dir)?).await,
        Commands::Images(args) => run_images(args, &load_config(dir)?).await,
        Commands::Configuration => run_configuration(&load_config(dir)?).await,
        Commands::Config(args) => run_config(args, dir),
    }
}
