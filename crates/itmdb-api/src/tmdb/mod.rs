//! TMDb API client module.
//!
//! Handles HTTP requests to the TMDb API v3 endpoints and returns decoded
//! JSON trees for the model layer to populate from.

mod api;
mod client;
mod params;
mod rate_limiter;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalTmdbApi, TmdbApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{TmdbClient, TmdbClientBuilder};
pub use params::SearchMovieParams;
