//! `TmdbApi` trait definition.
#![allow(clippy::future_not_send)]

use serde_json::Value;

use super::params::SearchMovieParams;
use crate::configuration::TmdbConfiguration;
use crate::error::FetchError;
use crate::options::FetchOptions;

/// TMDb transport collaborator.
///
/// Returns decoded JSON trees; turning them into entities is left to
/// [`crate::Movie`]. Uses `trait_variant::make` to generate a `Send`-bound
/// async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(TmdbApi: Send)]
pub trait LocalTmdbApi {
    /// Fetches `movie/{movie_id}` with the sections selected by `options`
    /// appended.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] for an unknown ID, otherwise a
    /// transport or decode error.
    async fn movie_details(
        &self,
        movie_id: u64,
        options: FetchOptions,
        language: &str,
    ) -> Result<Value, FetchError>;

    /// Searches for movies by title.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn search_movie(&self, params: &SearchMovieParams) -> Result<Value, FetchError>;

    /// Fetches the image configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON decoding fails.
    async fn configuration(&self) -> Result<TmdbConfiguration, FetchError>;
}
