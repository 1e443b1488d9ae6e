//! Movie entity and response population.
#![allow(clippy::future_not_send)]

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::instrument;
use url::Url;

use crate::error::FetchError;
use crate::image::{Image, ImageType};
use crate::options::FetchOptions;
use crate::person::{CreditKind, Person};
use crate::tmdb::{LocalTmdbApi, SearchMovieParams};
use crate::value::{
    extract_names, get_array, get_bool, get_f64, get_str, get_string, get_u32, get_u64,
    parse_date, year_from_date,
};

/// Public movie page on the TMDb website.
const WEBSITE_MOVIE_URL: &str = "https://www.themoviedb.org/movie/";

/// A snapshot of one movie's TMDb metadata.
///
/// Fields are read-only to consumers and change only through
/// [`Movie::populate`]. Each populate replaces the whole snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Movie {
    id: Option<u64>,
    /// Title and year hint used by [`Movie::load`] when `id` is unknown.
    lookup: Option<(String, Option<i32>)>,
    options: FetchOptions,

    title: String,
    original_title: Option<String>,
    overview: Option<String>,
    tagline: Option<String>,
    released: Option<NaiveDate>,
    runtime: Option<u32>,
    adult: bool,
    votes: u32,
    vote_average: Option<f64>,
    popularity: Option<f64>,
    original_language: Option<String>,
    imdb_id: Option<String>,
    homepage: Option<Url>,

    categories: Vec<String>,
    keywords: Vec<String>,
    languages_spoken: Vec<String>,
    countries: Vec<String>,

    posters: Vec<Image>,
    backdrops: Vec<Image>,
    cast: Vec<Person>,

    raw: Option<Value>,
}

impl Movie {
    /// Creates an empty movie for the given TMDb ID, ready to be loaded.
    #[must_use]
    pub fn with_id(id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    /// Creates an empty movie to be looked up by title.
    pub fn with_title(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            lookup: Some((title.clone(), None)),
            title,
            ..Self::default()
        }
    }

    /// Creates an empty movie to be looked up by title, with the release
    /// year as a hint (not a requirement) for the search.
    pub fn with_title_and_year(title: impl Into<String>, year: i32) -> Self {
        let title = title.into();
        Self {
            lookup: Some((title.clone(), Some(year))),
            title,
            ..Self::default()
        }
    }

    /// Builds a fully populated movie from an already decoded response, such
    /// as an entry embedded in search results or another entity.
    #[must_use]
    pub fn from_raw(raw: Value, options: FetchOptions) -> Self {
        let mut movie = Self::default();
        movie.populate(raw, options);
        movie
    }

    /// Replaces every field with the contents of `raw`.
    ///
    /// Never fails: missing or mistyped fields become empty or `None`.
    /// Casts, keywords, and images are read only when their flag is set in
    /// `options`. The raw tree is kept as-is and exposed via [`Movie::raw`].
    ///
    /// A payload whose `id` differs from an already known ID describes
    /// another movie; it is logged and the snapshot is left unchanged.
    pub fn populate(&mut self, raw: Value, options: FetchOptions) {
        let empty = Map::new();
        let map = raw.as_object().unwrap_or(&empty);

        if let Some(id) = get_u64(map, "id") {
            match self.id {
                None => self.id = Some(id),
                Some(current) if current != id => {
                    tracing::warn!(
                        current,
                        received = id,
                        "ignoring payload for another movie"
                    );
                    return;
                }
                Some(_) => {}
            }
        }

        self.options = options;
        self.title = get_string(map, "title").unwrap_or_default();
        self.original_title = get_string(map, "original_title");
        self.overview = get_string(map, "overview");
        self.tagline = get_string(map, "tagline");
        self.released = release_date(map);
        self.runtime = get_u32(map, "runtime");
        self.adult = get_bool(map, "adult").unwrap_or_default();
        self.votes = get_u32(map, "vote_count").unwrap_or_default();
        self.vote_average = get_f64(map, "vote_average");
        self.popularity = get_f64(map, "popularity");
        self.original_language = get_string(map, "original_language");
        self.imdb_id = get_string(map, "imdb_id");
        self.homepage = get_str(map, "homepage").and_then(|s| Url::parse(s).ok());

        self.categories = extract_names(get_array(map, "genres"), "name");
        self.countries = extract_names(get_array(map, "production_countries"), "iso_3166_1");
        self.languages_spoken = extract_names(get_array(map, "spoken_languages"), "iso_639_1");

        self.keywords = if options.contains(FetchOptions::KEYWORDS) {
            extract_names(keyword_items(map), "name")
        } else {
            Vec::new()
        };

        let (posters, backdrops) = if options.contains(FetchOptions::IMAGES) {
            let images = map.get("images").and_then(Value::as_object).unwrap_or(&empty);
            (
                Image::list_from_raw(get_array(images, "posters"), ImageType::Poster),
                Image::list_from_raw(get_array(images, "backdrops"), ImageType::Backdrop),
            )
        } else {
            (Vec::new(), Vec::new())
        };
        self.posters = posters;
        self.backdrops = backdrops;

        self.cast = if options.contains(FetchOptions::CASTS) {
            let casts = map.get("casts").and_then(Value::as_object).unwrap_or(&empty);
            let mut people = Person::list_from_raw(get_array(casts, "cast"), CreditKind::Cast);
            people.extend(Person::list_from_raw(
                get_array(casts, "crew"),
                CreditKind::Crew,
            ));
            people
        } else {
            Vec::new()
        };

        self.raw = Some(raw);
    }

    /// Fetches this movie through `api` and populates it.
    ///
    /// A movie created by title is first resolved to an ID with a search
    /// (the year, if any, is passed as a hint) and the first hit is used.
    /// The entity is only modified once a response has been received;
    /// errors and dropped futures leave it untouched.
    ///
    /// # Errors
    ///
    /// - [`FetchError::NotFound`] if the ID is unknown or the title search
    ///   has no results.
    /// - [`FetchError::MalformedResponse`] if the details describe a
    ///   different movie ID.
    /// - Transport and decode errors from `api`, unchanged.
    #[instrument(skip(self, api), fields(id = ?self.id))]
    pub async fn load(
        &mut self,
        api: &(impl LocalTmdbApi + Sync),
        options: FetchOptions,
        language: &str,
    ) -> Result<(), FetchError> {
        let id = match self.id {
            Some(id) => id,
            None => self.resolve_id(api, language).await?,
        };

        let raw = api.movie_details(id, options, language).await?;
        if let Some(received) = raw
            .get("id")
            .and_then(Value::as_u64)
            .filter(|received| *received != id)
        {
            return Err(FetchError::MalformedResponse(format!(
                "requested movie {id}, received {received}"
            )));
        }
        self.populate(raw, options);
        if self.id.is_none() {
            self.id = Some(id);
        }
        tracing::debug!(id, title = %self.title, "movie loaded");
        Ok(())
    }

    /// Looks up the TMDb ID for a title-only movie.
    async fn resolve_id(
        &self,
        api: &(impl LocalTmdbApi + Sync),
        language: &str,
    ) -> Result<u64, FetchError> {
        let (title, year) = self
            .lookup
            .as_ref()
            .ok_or_else(|| FetchError::NotFound(String::from("movie has neither id nor title")))?;

        let mut params = SearchMovieParams::new(title.as_str()).language(language);
        if let Some(year) = *year {
            params = params.year(year);
        }

        let raw = api.search_movie(&params).await?;
        let first = raw
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| FetchError::MalformedResponse(String::from("search without results")))?
            .first()
            .ok_or_else(|| FetchError::NotFound(format!("no movie matches {title:?}")))?;

        first
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| FetchError::MalformedResponse(String::from("search result without id")))
    }

    /// TMDb ID, if known.
    #[must_use]
    pub const fn id(&self) -> Option<u64> {
        self.id
    }

    /// Sections requested by the last populate.
    #[must_use]
    pub const fn options(&self) -> FetchOptions {
        self.options
    }

    /// Returns `true` once a response has been applied.
    #[must_use]
    pub const fn is_populated(&self) -> bool {
        self.raw.is_some()
    }

    /// Localized title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Title in the original language.
    #[must_use]
    pub fn original_title(&self) -> Option<&str> {
        self.original_title.as_deref()
    }

    /// Plot summary.
    #[must_use]
    pub fn overview(&self) -> Option<&str> {
        self.overview.as_deref()
    }

    /// Tagline.
    #[must_use]
    pub fn tagline(&self) -> Option<&str> {
        self.tagline.as_deref()
    }

    /// Release date.
    #[must_use]
    pub const fn released(&self) -> Option<NaiveDate> {
        self.released
    }

    /// Release year, derived from [`Movie::released`].
    #[must_use]
    pub fn year(&self) -> Option<i32> {
        year_from_date(self.released)
    }

    /// Runtime in minutes.
    #[must_use]
    pub const fn runtime(&self) -> Option<u32> {
        self.runtime
    }

    /// Adult content flag.
    #[must_use]
    pub const fn is_adult(&self) -> bool {
        self.adult
    }

    /// Number of user votes on TMDb.
    #[must_use]
    pub const fn votes(&self) -> u32 {
        self.votes
    }

    /// Average user vote on TMDb.
    #[must_use]
    pub const fn vote_average(&self) -> Option<f64> {
        self.vote_average
    }

    /// TMDb popularity score.
    #[must_use]
    pub const fn popularity(&self) -> Option<f64> {
        self.popularity
    }

    /// Original language (ISO 639-1).
    #[must_use]
    pub fn original_language(&self) -> Option<&str> {
        self.original_language.as_deref()
    }

    /// IMDb ID including the `tt` prefix.
    #[must_use]
    pub fn imdb_id(&self) -> Option<&str> {
        self.imdb_id.as_deref()
    }

    /// Official website.
    #[must_use]
    pub const fn homepage(&self) -> Option<&Url> {
        self.homepage.as_ref()
    }

    /// The movie's page on the TMDb website.
    #[must_use]
    pub fn url(&self) -> Option<Url> {
        let id = self.id?;
        Url::parse(&format!("{WEBSITE_MOVIE_URL}{id}")).ok()
    }

    /// Genre names.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Keywords (populated with [`FetchOptions::KEYWORDS`]).
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Spoken languages (ISO 639-1).
    #[must_use]
    pub fn languages_spoken(&self) -> &[String] {
        &self.languages_spoken
    }

    /// Production countries (ISO 3166-1).
    #[must_use]
    pub fn countries(&self) -> &[String] {
        &self.countries
    }

    /// Posters (populated with [`FetchOptions::IMAGES`]).
    #[must_use]
    pub fn posters(&self) -> &[Image] {
        &self.posters
    }

    /// Backdrops (populated with [`FetchOptions::IMAGES`]).
    #[must_use]
    pub fn backdrops(&self) -> &[Image] {
        &self.backdrops
    }

    /// Cast followed by crew (populated with [`FetchOptions::CASTS`]).
    #[must_use]
    pub fn cast(&self) -> &[Person] {
        &self.cast
    }

    /// The response this snapshot was populated from, unmodified.
    #[must_use]
    pub const fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }
}

/// Parses `release_date`, warning when a non-empty value is unusable.
fn release_date(map: &Map<String, Value>) -> Option<NaiveDate> {
    let s = get_str(map, "release_date")?;
    if s.trim().is_empty() {
        return None;
    }
    let date = parse_date(s);
    if date.is_none() {
        tracing::warn!(release_date = s, "ignoring malformed release date");
    }
    date
}

/// Keyword objects from either `{"keywords": [...]}` or a bare array.
fn keyword_items(map: &Map<String, Value>) -> &[Value] {
    match map.get("keywords") {
        Some(Value::Object(inner)) => get_array(inner, "keywords"),
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[],
    }
}

/// Searches for movies and builds each result with basic information.
///
/// # Errors
///
/// Returns transport and decode errors from `api` unchanged.
#[instrument(skip_all)]
pub async fn search_movies(
    api: &(impl LocalTmdbApi + Sync),
    params: &SearchMovieParams,
) -> Result<Vec<Movie>, FetchError> {
    let raw = api.search_movie(params).await?;
    let results = match raw {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };
    tracing::debug!(count = results.len(), "search results");
    Ok(results
        .into_iter()
        .map(|item| Movie::from_raw(item, FetchOptions::BASIC))
        .collect())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]
    #![allow(clippy::float_cmp)]

    use std::sync::Mutex;

    use chrono::Datelike;
    use serde_json::json;
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;
    use crate::configuration::TmdbConfiguration;
    use crate::image::ImageDimension;

    const MOVIE_JSON: &str = include_str!("../../../fixtures/tmdb/movie_27205_all.json");
    const SEARCH_JSON: &str = include_str!("../../../fixtures/tmdb/search_movie_inception.json");
    const CONFIG_JSON: &str = include_str!("../../../fixtures/tmdb/configuration.json");

    fn movie_raw() -> Value {
        serde_json::from_str(MOVIE_JSON).unwrap()
    }

    /// In-memory API returning canned responses and recording calls.
    struct FakeApi {
        details: Result<Value, FetchError>,
        search: Result<Value, FetchError>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeApi {
        fn new(details: Result<Value, FetchError>, search: Result<Value, FetchError>) -> Self {
            Self {
                details,
                search,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl LocalTmdbApi for FakeApi {
        async fn movie_details(
            &self,
            movie_id: u64,
            options: FetchOptions,
            _language: &str,
        ) -> Result<Value, FetchError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("details {movie_id} {options}"));
            self.details.clone()
        }

        async fn search_movie(&self, params: &SearchMovieParams) -> Result<Value, FetchError> {
            self.calls.lock().unwrap().push(format!(
                "search {} {:?} {}",
                params.query, params.year, params.language
            ));
            self.search.clone()
        }

        async fn configuration(&self) -> Result<TmdbConfiguration, FetchError> {
            Ok(serde_json::from_str(CONFIG_JSON).unwrap())
        }
    }

    #[test]
    fn test_populate_basic_fields() {
        // Arrange & Act
        let movie = Movie::from_raw(movie_raw(), FetchOptions::BASIC);

        // Assert
        assert_eq!(movie.id(), Some(27_205));
        assert_eq!(movie.title(), "Inception");
        assert_eq!(movie.original_title(), Some("Inception"));
        assert_eq!(
            movie.tagline(),
            Some("Your mind is the scene of the crime.")
        );
        assert!(movie.overview().unwrap().starts_with("Cobb"));
        assert_eq!(movie.runtime(), Some(148));
        assert!(!movie.is_adult());
        assert_eq!(movie.votes(), 35_126);
        assert_eq!(movie.vote_average(), Some(8.369));
        assert_eq!(movie.original_language(), Some("en"));
        assert_eq!(movie.imdb_id(), Some("tt1375666"));
        assert_eq!(
            movie.homepage().unwrap().as_str(),
            "https://www.warnerbros.com/movies/inception"
        );
        assert_eq!(
            movie.url().unwrap().as_str(),
            "https://www.themoviedb.org/movie/27205"
        );
        assert_eq!(movie.options(), FetchOptions::BASIC);
        assert!(movie.is_populated());
    }

    #[test]
    fn test_populate_release_date_and_year() {
        // Arrange & Act
        let movie = Movie::from_raw(movie_raw(), FetchOptions::BASIC);

        // Assert
        let released = movie.released().unwrap();
        assert_eq!(
            (released.year(), released.month(), released.day()),
            (2010, 7, 15)
        );
        assert_eq!(movie.year(), Some(2010));
    }

    #[test]
    fn test_populate_name_lists() {
        // Arrange & Act
        let movie = Movie::from_raw(movie_raw(), FetchOptions::BASIC);

        // Assert
        assert_eq!(
            movie.categories(),
            ["Action", "Science Fiction", "Adventure"]
        );
        assert_eq!(movie.countries(), ["GB", "US"]);
        assert_eq!(movie.languages_spoken(), ["en", "fr", "ja", "sw"]);
    }

    #[test]
    fn test_populate_all_sections() {
        // Arrange & Act
        let movie = Movie::from_raw(movie_raw(), FetchOptions::ALL);

        // Assert
        assert_eq!(
            movie.keywords(),
            ["loss of loved one", "subconscious", "heist", "dream"]
        );
        assert_eq!(movie.posters().len(), 3);
        assert_eq!(movie.backdrops().len(), 2);
        assert_eq!(movie.posters()[2].iso_639_1(), Some("fr"));
        assert_eq!(movie.backdrops()[1].original_size(), (3840, 2160));
        assert_eq!(movie.cast().len(), 5);
        assert_eq!(movie.cast()[0].name(), "Leonardo DiCaprio");
        assert_eq!(movie.cast()[3].kind(), CreditKind::Crew);
        assert_eq!(movie.cast()[3].job(), Some("Director"));
    }

    #[test]
    fn test_unrequested_sections_stay_empty() {
        // Arrange & Act
        let movie = Movie::from_raw(movie_raw(), FetchOptions::BASIC | FetchOptions::CASTS);

        // Assert
        assert!(movie.posters().is_empty());
        assert!(movie.backdrops().is_empty());
        assert!(movie.keywords().is_empty());
        assert_eq!(movie.cast().len(), 5);
    }

    #[test]
    fn test_images_only() {
        // Arrange & Act
        let movie = Movie::from_raw(movie_raw(), FetchOptions::IMAGES);

        // Assert
        assert_eq!(movie.posters().len(), 3);
        assert!(movie.cast().is_empty());
        assert!(movie.keywords().is_empty());
    }

    #[test]
    fn test_keywords_as_bare_array() {
        // Arrange
        let raw = json!({"id": 1, "keywords": [{"name": "Action"}, {"name": "Drama"}]});

        // Act
        let movie = Movie::from_raw(raw, FetchOptions::KEYWORDS);

        // Assert
        assert_eq!(movie.keywords(), ["Action", "Drama"]);
    }

    #[test]
    fn test_missing_sections_are_empty() {
        // Arrange
        let raw = json!({"id": 7, "title": "Sparse"});

        // Act
        let movie = Movie::from_raw(raw, FetchOptions::ALL);

        // Assert
        assert_eq!(movie.title(), "Sparse");
        assert!(movie.released().is_none());
        assert!(movie.year().is_none());
        assert!(movie.categories().is_empty());
        assert!(movie.keywords().is_empty());
        assert!(movie.posters().is_empty());
        assert!(movie.cast().is_empty());
        assert!(movie.homepage().is_none());
        assert_eq!(movie.runtime(), None);
    }

    #[test]
    fn test_malformed_release_date_is_absent() {
        // Arrange
        for bad in ["", "2010", "2010-7-15", "15/07/2010", "soon"] {
            let mut raw = movie_raw();
            raw["release_date"] = json!(bad);

            // Act
            let movie = Movie::from_raw(raw, FetchOptions::BASIC);

            // Assert
            assert!(movie.released().is_none(), "accepted {bad:?}");
            assert!(movie.year().is_none());
            assert_eq!(movie.title(), "Inception");
            assert_eq!(movie.runtime(), Some(148));
            assert_eq!(movie.categories().len(), 3);
        }
    }

    #[test]
    fn test_malformed_release_date_logs_warning() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::WARN))
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            let _movie =
                Movie::from_raw(json!({"release_date": "2010-99-99"}), FetchOptions::BASIC);
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_mistyped_fields_are_absent() {
        // Arrange
        let raw = json!({
            "id": "27205",
            "title": ["Inception"],
            "runtime": -5,
            "adult": 1,
            "vote_count": "many",
            "release_date": 20_100_715,
            "homepage": "not a url",
            "genres": "Action"
        });

        // Act
        let movie = Movie::from_raw(raw, FetchOptions::ALL);

        // Assert
        assert_eq!(movie.id(), None);
        assert_eq!(movie.title(), "");
        assert_eq!(movie.runtime(), None);
        assert!(!movie.is_adult());
        assert_eq!(movie.votes(), 0);
        assert!(movie.released().is_none());
        assert!(movie.homepage().is_none());
        assert!(movie.categories().is_empty());
    }

    #[test]
    fn test_non_object_root() {
        // Arrange & Act
        let movie = Movie::from_raw(json!([1, 2, 3]), FetchOptions::ALL);

        // Assert
        assert_eq!(movie.id(), None);
        assert!(movie.is_populated());
        assert_eq!(movie.raw(), Some(&json!([1, 2, 3])));
    }

    #[test]
    fn test_raw_is_retained_verbatim() {
        // Arrange
        let raw = movie_raw();

        // Act
        let movie = Movie::from_raw(raw.clone(), FetchOptions::BASIC);
        let reserialized = serde_json::to_string(movie.raw().unwrap()).unwrap();

        // Assert
        assert_eq!(movie.raw(), Some(&raw));
        assert_eq!(
            serde_json::from_str::<Value>(&reserialized).unwrap(),
            raw
        );
        assert_eq!(movie.raw().unwrap()["budget"], 160_000_000);
    }

    #[test]
    fn test_repopulate_replaces_snapshot() {
        // Arrange
        let mut movie = Movie::from_raw(movie_raw(), FetchOptions::ALL);
        let second = json!({"id": 27205, "title": "Inception (Re-release)", "runtime": 150});

        // Act
        movie.populate(second.clone(), FetchOptions::BASIC);

        // Assert
        assert_eq!(movie.title(), "Inception (Re-release)");
        assert_eq!(movie.runtime(), Some(150));
        assert!(movie.tagline().is_none());
        assert!(movie.posters().is_empty());
        assert!(movie.cast().is_empty());
        assert_eq!(movie.options(), FetchOptions::BASIC);
        assert_eq!(movie.raw(), Some(&second));
    }

    #[test]
    fn test_payload_for_another_movie_is_ignored() {
        // Arrange
        let mut movie = Movie::from_raw(movie_raw(), FetchOptions::ALL);
        let before = movie.clone();

        // Act
        movie.populate(json!({"id": 155, "title": "The Dark Knight"}), FetchOptions::BASIC);

        // Assert
        assert_eq!(movie, before);
        assert_eq!(movie.id(), Some(27_205));
        assert_eq!(movie.title(), "Inception");
        assert_eq!(
            movie.url().unwrap().as_str(),
            "https://www.themoviedb.org/movie/27205"
        );
    }

    #[test]
    fn test_payload_for_another_movie_logs_warning() {
        // Arrange
        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::WARN))
            .only()
            .run_with_handle();
        let mut movie = Movie::with_id(27_205);

        // Act
        with_default(subscriber, || {
            movie.populate(json!({"id": 155}), FetchOptions::BASIC);
        });

        // Assert
        handle.assert_finished();
        assert!(!movie.is_populated());
    }

    #[test]
    fn test_payload_without_id_keeps_known_id() {
        // Arrange
        let mut movie = Movie::with_id(27_205);

        // Act
        movie.populate(json!({"title": "Inception"}), FetchOptions::BASIC);

        // Assert
        assert_eq!(movie.id(), Some(27_205));
        assert_eq!(movie.title(), "Inception");
    }

    #[test]
    fn test_empty_constructors() {
        // Arrange & Act
        let by_id = Movie::with_id(27_205);
        let by_title = Movie::with_title_and_year("Inception", 2010);

        // Assert
        assert_eq!(by_id.id(), Some(27_205));
        assert_eq!(by_id.title(), "");
        assert!(!by_id.is_populated());
        assert_eq!(by_title.id(), None);
        assert_eq!(by_title.title(), "Inception");
        assert!(by_title.url().is_none());
        assert!(by_title.raw().is_none());
    }

    #[test]
    fn test_poster_url_from_populated_movie() {
        // Arrange
        let config: TmdbConfiguration = serde_json::from_str(CONFIG_JSON).unwrap();
        let movie = Movie::from_raw(movie_raw(), FetchOptions::IMAGES);

        // Act
        let url = movie.posters()[0]
            .url_for_target(200, ImageDimension::Width, &config)
            .unwrap();

        // Assert
        assert_eq!(
            url.as_str(),
            "https://image.tmdb.org/t/p/w342/oYuLEt3zVCKq57qu2F8dT7NIa6f.jpg"
        );
    }

    #[tokio::test]
    async fn test_load_by_id() {
        // Arrange
        let api = FakeApi::new(
            Ok(movie_raw()),
            Err(FetchError::Transport(String::from("unused"))),
        );
        let mut movie = Movie::with_id(27_205);

        // Act
        movie.load(&api, FetchOptions::ALL, "en-US").await.unwrap();

        // Assert
        assert_eq!(movie.title(), "Inception");
        assert_eq!(movie.posters().len(), 3);
        assert_eq!(api.calls(), ["details 27205 basic,casts,keywords,images"]);
    }

    #[tokio::test]
    async fn test_load_by_title_searches_first() {
        // Arrange
        let api = FakeApi::new(
            Ok(movie_raw()),
            Ok(serde_json::from_str(SEARCH_JSON).unwrap()),
        );
        let mut movie = Movie::with_title_and_year("Inception", 2010);

        // Act
        movie.load(&api, FetchOptions::BASIC, "ja-JP").await.unwrap();

        // Assert
        assert_eq!(movie.id(), Some(27_205));
        assert_eq!(movie.year(), Some(2010));
        assert_eq!(
            api.calls(),
            ["search Inception Some(2010) ja-JP", "details 27205 basic"]
        );
    }

    #[tokio::test]
    async fn test_load_by_title_without_results() {
        // Arrange
        let api = FakeApi::new(
            Ok(movie_raw()),
            Ok(json!({"page": 1, "results": [], "total_results": 0})),
        );
        let mut movie = Movie::with_title("No Such Movie");

        // Act
        let err = movie
            .load(&api, FetchOptions::BASIC, "en-US")
            .await
            .unwrap_err();

        // Assert
        assert!(err.is_not_found());
        assert_eq!(api.calls().len(), 1);
        assert!(!movie.is_populated());
        assert_eq!(movie.title(), "No Such Movie");
    }

    #[tokio::test]
    async fn test_failed_load_leaves_movie_untouched() {
        // Arrange
        let api = FakeApi::new(
            Err(FetchError::Transport(String::from("connection reset"))),
            Err(FetchError::Transport(String::from("unused"))),
        );
        let mut movie = Movie::from_raw(movie_raw(), FetchOptions::ALL);
        let before = movie.clone();

        // Act
        let err = movie
            .load(&api, FetchOptions::BASIC, "en-US")
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err, FetchError::Transport(String::from("connection reset")));
        assert_eq!(movie, before);
    }

    #[tokio::test]
    async fn test_load_rejects_details_for_another_movie() {
        // Arrange
        let api = FakeApi::new(
            Ok(json!({"id": 155, "title": "The Dark Knight"})),
            Err(FetchError::Transport(String::from("unused"))),
        );
        let mut movie = Movie::with_id(27_205);

        // Act
        let err = movie
            .load(&api, FetchOptions::BASIC, "en-US")
            .await
            .unwrap_err();

        // Assert
        assert!(matches!(err, FetchError::MalformedResponse(_)));
        assert!(!movie.is_populated());
        assert_eq!(movie.id(), Some(27_205));
    }

    #[tokio::test]
    async fn test_load_passes_not_found_through() {
        // Arrange
        let api = FakeApi::new(
            Err(FetchError::NotFound(String::from("movie/1"))),
            Err(FetchError::Transport(String::from("unused"))),
        );
        let mut movie = Movie::with_id(1);

        // Act
        let err = movie
            .load(&api, FetchOptions::BASIC, "en-US")
            .await
            .unwrap_err();

        // Assert
        assert_eq!(err, FetchError::NotFound(String::from("movie/1")));
        assert!(!movie.is_populated());
    }

    #[tokio::test]
    async fn test_search_movies_builds_entities() {
        // Arrange
        let api = FakeApi::new(
            Err(FetchError::Transport(String::from("unused"))),
            Ok(serde_json::from_str(SEARCH_JSON).unwrap()),
        );

        // Act
        let movies = search_movies(&api, &SearchMovieParams::new("Inception"))
            .await
            .unwrap();

        // Assert
        assert_eq!(movies.len(), 3);
        assert_eq!(movies[0].id(), Some(27_205));
        assert_eq!(movies[1].year(), Some(2010));
        assert!(movies[2].released().is_none());
        assert_eq!(movies[2].overview(), None);
        assert_eq!(movies[0].options(), FetchOptions::BASIC);
    }
}
