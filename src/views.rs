//! Page view models. Each page asks the catalog for what it needs and reshapes
//! the records into the props a front-end renders. Fetch failures never bubble
//! up: lists degrade to empty, single-movie pages degrade to not-found.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::app::AppState;
use crate::catalog::{parse_movie_id, CatalogApi, Category};
use crate::error::{CatalogError, CatalogResult};
use crate::format;
use crate::genres;
use crate::models::{Movie, MovieDetails, MovieResponse, User, Video};
use crate::pagination::{clamp_page, Pagination};

const BANNER_SLIDES: usize = 5;
const BANNER_OVERVIEW_CHARS: usize = 200;
const TOP_CAST: usize = 6;
const SIMILAR_LIMIT: usize = 12;
const FALLBACK_VIDEO_KEY: &str = "dQw4w9WgXcQ";

/// Rendering settings shared by every page.
#[derive(Debug, Clone)]
pub struct ViewContext {
    pub image_base: String,
    pub site_origin: Option<String>,
}

impl ViewContext {
    fn image(&self, path: Option<&str>, size: &str) -> Option<String> {
        format::image_url(&self.image_base, path, size)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieCard {
    pub id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    pub year: Option<String>,
    pub rating: String,
    pub watch_href: String,
    pub download_href: String,
    pub details_href: String,
}

impl MovieCard {
    fn from_movie(ctx: &ViewContext, movie: &Movie) -> Self {
        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster_url: ctx.image(movie.poster_path.as_deref(), "w500"),
            year: format::year_from_date(movie.release_date.as_deref()),
            rating: format::rating(movie.vote_average),
            watch_href: format!("/watch/{}", movie.id),
            download_href: format!("/download/{}", movie.id),
            details_href: format!("/movie/{}", movie.id),
        }
    }
}

fn cards(ctx: &ViewContext, movies: Vec<Movie>) -> Vec<MovieCard> {
    format::filter_adult(movies, false)
        .iter()
        .map(|m| MovieCard::from_movie(ctx, m))
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BannerSlide {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub backdrop_url: Option<String>,
    pub watch_href: String,
    pub details_href: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieRow {
    pub title: String,
    pub view_more_href: String,
    pub movies: Vec<MovieCard>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HomeView {
    pub banner: Vec<BannerSlide>,
    pub rows: Vec<MovieRow>,
}

fn results_or_empty(label: &str, result: CatalogResult<MovieResponse>) -> Vec<Movie> {
    match result {
        Ok(page) => page.results,
        Err(e) => {
            warn!("Error fetching {} movies: {}", label, e);
            Vec::new()
        }
    }
}

pub async fn home(catalog: &dyn CatalogApi, ctx: &ViewContext) -> HomeView {
    let (now_playing, popular, top_rated) = tokio::join!(
        catalog.now_playing(1),
        catalog.popular(1),
        catalog.top_rated(1),
    );
    let now_playing = results_or_empty("now playing", now_playing);
    let popular = results_or_empty("popular", popular);
    let top_rated = results_or_empty("top rated", top_rated);

    let banner = now_playing
        .iter()
        .take(BANNER_SLIDES)
        .map(|m| BannerSlide {
            id: m.id,
            title: m.title.clone(),
            overview: format::truncate(&m.overview, BANNER_OVERVIEW_CHARS),
            backdrop_url: ctx.image(m.backdrop_path.as_deref(), "original"),
            watch_href: format!("/watch/{}", m.id),
            details_href: format!("/movie/{}", m.id),
        })
        .collect();

    let row = |category: Category, movies: Vec<Movie>| MovieRow {
        title: category.title().to_string(),
        view_more_href: format!("/browse?category={}", category.selector()),
        movies: cards(ctx, movies),
    };

    HomeView {
        banner,
        rows: vec![
            row(Category::Popular, popular),
            row(Category::TopRated, top_rated),
            row(Category::NowPlaying, now_playing),
        ],
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FilterLink {
    pub label: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BrowseView {
    pub title: String,
    pub category: String,
    pub genre: Option<String>,
    pub categories: Vec<FilterLink>,
    pub genres: Vec<FilterLink>,
    pub movies: Vec<MovieCard>,
    pub pagination: Option<Pagination>,
    pub empty_message: &'static str,
}

pub async fn browse(
    catalog: &dyn CatalogApi,
    ctx: &ViewContext,
    category: Option<&str>,
    genre: Option<&str>,
    page: u32,
) -> BrowseView {
    let page = clamp_page(page);
    let category = category
        .and_then(|c| c.parse::<Category>().ok())
        .unwrap_or(Category::Popular);
    let genre = genre.map(str::trim).filter(|g| !g.is_empty());

    let (title, result) = match genre {
        Some(g) => (
            format!("{} Movies", genres::label(g)),
            catalog.discover_by_genre(g, page).await,
        ),
        None => (
            category.title().to_string(),
            catalog.category(category, page).await,
        ),
    };

    let (movies, total_pages) = match result {
        Ok(data) => (data.results, data.total_pages),
        Err(e) => {
            warn!("Error fetching movies: {}", e);
            (Vec::new(), 0)
        }
    };

    let categories = Category::ALL
        .iter()
        .map(|c| FilterLink {
            label: c.title().to_string(),
            href: format!("/browse?category={}", c.selector()),
            active: *c == category && genre.is_none(),
        })
        .collect();
    let genre_links = genres::all()
        .iter()
        .map(|(id, name)| FilterLink {
            label: name.to_string(),
            href: format!("/browse?genre={id}"),
            active: genre == Some(id.to_string().as_str()),
        })
        .collect();

    BrowseView {
        title,
        category: category.selector().to_string(),
        genre: genre.map(str::to_string),
        categories,
        genres: genre_links,
        movies: cards(ctx, movies),
        pagination: Pagination::new(page, total_pages),
        empty_message: "No movies found for this category or genre",
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchView {
    pub query: String,
    pub title: String,
    pub total_results: u64,
    pub movies: Vec<MovieCard>,
    pub pagination: Option<Pagination>,
    pub empty_message: Option<String>,
    pub prompt: Option<&'static str>,
}

pub async fn search(
    catalog: &dyn CatalogApi,
    ctx: &ViewContext,
    query: &str,
    page: u32,
) -> SearchView {
    let query = query.trim();
    if query.is_empty() {
        return SearchView {
            query: String::new(),
            title: "Search Movies".to_string(),
            total_results: 0,
            movies: Vec::new(),
            pagination: None,
            empty_message: None,
            prompt: Some("Enter a search term"),
        };
    }

    let page = clamp_page(page);
    let (movies, total_pages, total_results) = match catalog.search(query, page).await {
        Ok(data) => (data.results, data.total_pages, data.total_results),
        Err(e) => {
            warn!("Error searching movies: {}", e);
            (Vec::new(), 0, 0)
        }
    };

    SearchView {
        query: query.to_string(),
        title: format!("Search Results for \"{query}\""),
        total_results,
        movies: cards(ctx, movies),
        pagination: Pagination::new(page, total_pages),
        empty_message: Some(format!("No movies found matching \"{query}\"")),
        prompt: None,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CastCard {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompanyCard {
    pub id: u64,
    pub name: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DetailView {
    pub id: u64,
    pub title: String,
    pub tagline: Option<String>,
    pub overview: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub year: Option<String>,
    pub release_date: Option<String>,
    pub rating: String,
    pub vote_count: String,
    pub runtime: Option<String>,
    pub status: String,
    pub genres: Vec<FilterLink>,
    pub director: Option<String>,
    pub cast: Vec<CastCard>,
    pub trailer_key: Option<String>,
    pub budget: Option<String>,
    pub revenue: Option<String>,
    pub homepage: Option<String>,
    pub companies: Vec<CompanyCard>,
    pub similar: Vec<MovieCard>,
}

fn youtube_trailer(videos: &[Video]) -> Option<&Video> {
    videos
        .iter()
        .find(|v| v.video_type == "Trailer" && v.is_youtube())
}

fn detail_view(ctx: &ViewContext, details: MovieDetails) -> DetailView {
    let MovieDetails {
        movie,
        genres,
        runtime,
        status,
        tagline,
        budget,
        revenue,
        homepage,
        production_companies,
        videos,
        similar,
        credits,
    } = details;

    let trailer_key = youtube_trailer(&videos.results).map(|v| v.key.clone());
    let director = credits
        .crew
        .iter()
        .find(|c| c.job == "Director")
        .map(|c| c.name.clone());
    let cast = credits
        .cast
        .into_iter()
        .take(TOP_CAST)
        .map(|c| CastCard {
            profile_url: ctx.image(c.profile_path.as_deref(), "w185"),
            id: c.id,
            name: c.name,
            character: c.character,
        })
        .collect();
    let companies = production_companies
        .into_iter()
        .map(|c| CompanyCard {
            logo_url: ctx.image(c.logo_path.as_deref(), "w200"),
            id: c.id,
            name: c.name,
        })
        .collect();
    let genre_links = genres
        .into_iter()
        .map(|g| FilterLink {
            href: format!("/browse?genre={}", g.id),
            label: g.name,
            active: false,
        })
        .collect();
    let similar = cards(ctx, similar.results.into_iter().take(SIMILAR_LIMIT).collect());

    DetailView {
        id: movie.id,
        poster_url: ctx.image(movie.poster_path.as_deref(), "w500"),
        backdrop_url: ctx.image(movie.backdrop_path.as_deref(), "original"),
        year: format::year_from_date(movie.release_date.as_deref()),
        release_date: movie.release_date.as_deref().map(format::long_date),
        rating: format::rating(movie.vote_average),
        vote_count: format::number(movie.vote_count),
        runtime: runtime.filter(|r| *r > 0).map(format::runtime),
        status,
        tagline: tagline.filter(|t| !t.is_empty()),
        genres: genre_links,
        director,
        cast,
        trailer_key,
        budget: (budget > 0).then(|| format::currency(budget)),
        revenue: (revenue > 0).then(|| format::currency(revenue)),
        homepage: homepage.filter(|h| !h.is_empty()),
        companies,
        similar,
        title: movie.title,
        overview: movie.overview,
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VideoLink {
    pub key: String,
    pub name: String,
    pub kind: String,
    pub embed_url: Option<String>,
}

/// Simulated player: an embed URL plus the video list, no playback state.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchView {
    pub id: u64,
    pub title: String,
    pub video_key: String,
    pub embed_url: String,
    pub videos: Vec<VideoLink>,
    pub details_href: String,
    pub download_href: String,
}

/// YouTube trailer first, then the first video if it is on YouTube, then a fixed clip.
pub fn pick_video_key(videos: &[Video]) -> String {
    youtube_trailer(videos)
        .or_else(|| videos.first().filter(|v| v.is_youtube()))
        .map(|v| v.key.clone())
        .unwrap_or_else(|| FALLBACK_VIDEO_KEY.to_string())
}

fn watch_view(ctx: &ViewContext, details: MovieDetails) -> WatchView {
    let origin = ctx.site_origin.as_deref();
    let video_key = pick_video_key(&details.videos.results);
    let videos = details
        .videos
        .results
        .iter()
        .map(|v| VideoLink {
            key: v.key.clone(),
            name: v.name.clone(),
            kind: v.video_type.clone(),
            embed_url: v
                .is_youtube()
                .then(|| format::youtube_embed_url(&v.key, origin)),
        })
        .collect();
    let id = details.movie.id;
    WatchView {
        id,
        title: details.movie.title,
        embed_url: format::youtube_embed_url(&video_key, origin),
        video_key,
        videos,
        details_href: format!("/movie/{id}"),
        download_href: format!("/download/{id}"),
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DownloadOption {
    pub quality: &'static str,
    pub size: &'static str,
    pub format: &'static str,
}

const DOWNLOAD_OPTIONS: [DownloadOption; 5] = [
    DownloadOption {
        quality: "4K Ultra HD",
        size: "8.1 GB",
        format: "MKV",
    },
    DownloadOption {
        quality: "1080p Full HD",
        size: "2.4 GB",
        format: "MP4",
    },
    DownloadOption {
        quality: "720p HD",
        size: "1.2 GB",
        format: "MP4",
    },
    DownloadOption {
        quality: "480p SD",
        size: "700 MB",
        format: "MP4",
    },
    DownloadOption {
        quality: "360p Low",
        size: "450 MB",
        format: "MP4",
    },
];

/// Simulated download page; the options are static and nothing is served.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DownloadView {
    pub id: u64,
    pub title: String,
    pub year: Option<String>,
    pub runtime: Option<String>,
    pub rating: String,
    pub overview: String,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
    pub options: Vec<DownloadOption>,
}

fn download_view(ctx: &ViewContext, details: MovieDetails) -> DownloadView {
    let movie = details.movie;
    DownloadView {
        id: movie.id,
        year: format::year_from_date(movie.release_date.as_deref()),
        runtime: details.runtime.filter(|r| *r > 0).map(format::runtime),
        rating: format::rating(movie.vote_average),
        poster_url: ctx.image(movie.poster_path.as_deref(), "w500"),
        backdrop_url: ctx.image(movie.backdrop_path.as_deref(), "original"),
        options: DOWNLOAD_OPTIONS.to_vec(),
        title: movie.title,
        overview: movie.overview,
    }
}

/// A single-movie page could not be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotFound;

impl IntoResponse for NotFound {
    fn into_response(self) -> Response {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Movie not found" })),
        )
            .into_response()
    }
}

async fn load_details(catalog: &dyn CatalogApi, raw_id: &str) -> Result<MovieDetails, NotFound> {
    let Some(id) = parse_movie_id(raw_id) else {
        warn!("Rejecting non-numeric movie id {:?}", raw_id);
        return Err(NotFound);
    };
    catalog.movie_details(id).await.map_err(|e| {
        warn!("Error fetching movie details for {}: {}", id, e);
        NotFound
    })
}

pub async fn movie(
    catalog: &dyn CatalogApi,
    ctx: &ViewContext,
    raw_id: &str,
) -> Result<DetailView, NotFound> {
    Ok(detail_view(ctx, load_details(catalog, raw_id).await?))
}

pub async fn watch(
    catalog: &dyn CatalogApi,
    ctx: &ViewContext,
    raw_id: &str,
) -> Result<WatchView, NotFound> {
    Ok(watch_view(ctx, load_details(catalog, raw_id).await?))
}

pub async fn download(
    catalog: &dyn CatalogApi,
    ctx: &ViewContext,
    raw_id: &str,
) -> Result<DownloadView, NotFound> {
    Ok(download_view(ctx, load_details(catalog, raw_id).await?))
}

// Handlers

#[derive(Debug, Default, Deserialize)]
pub struct BrowseParams {
    pub category: Option<String>,
    pub genre: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AccountParams {
    pub session_id: Option<String>,
}

/// Lenient page parsing for pages: anything unusable means page 1.
fn page_or_first(raw: Option<&str>) -> u32 {
    raw.and_then(|p| p.trim().parse::<u32>().ok())
        .map(clamp_page)
        .unwrap_or(1)
}

pub async fn home_page(State(state): State<AppState>) -> Json<HomeView> {
    Json(home(state.catalog.as_ref(), &state.views).await)
}

pub async fn browse_page(
    State(state): State<AppState>,
    Query(params): Query<BrowseParams>,
) -> Json<BrowseView> {
    Json(
        browse(
            state.catalog.as_ref(),
            &state.views,
            params.category.as_deref(),
            params.genre.as_deref(),
            page_or_first(params.page.as_deref()),
        )
        .await,
    )
}

pub async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Json<SearchView> {
    Json(
        search(
            state.catalog.as_ref(),
            &state.views,
            params.q.as_deref().unwrap_or_default(),
            page_or_first(params.page.as_deref()),
        )
        .await,
    )
}

pub async fn movie_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DetailView>, NotFound> {
    movie(state.catalog.as_ref(), &state.views, &id).await.map(Json)
}

pub async fn watch_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<WatchView>, NotFound> {
    watch(state.catalog.as_ref(), &state.views, &id).await.map(Json)
}

pub async fn download_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DownloadView>, NotFound> {
    download(state.catalog.as_ref(), &state.views, &id).await.map(Json)
}

pub async fn account(
    State(state): State<AppState>,
    Query(params): Query<AccountParams>,
) -> Result<Json<User>, CatalogError> {
    let session_id = params.session_id.unwrap_or_default();
    let user = state.catalog.account(&session_id).await?;
    info!("Loaded account {}", user.username);
    Ok(Json(user))
}
