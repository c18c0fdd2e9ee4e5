use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRequestParts, State},
};
use serde::Deserialize;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Analytics, ErrorBody, Link, MovieDetail, MovieSummary, Rating, Status, Tag},
    queries::{self, MovieFilter, Page, RatingFilter, TagFilter},
};

/// `Query` whose rejections surface as 422 validation errors.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// `Path` whose rejections surface as 422 validation errors.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug, Default, Deserialize)]
pub struct MovieListParams {
    skip: Option<i64>,
    limit: Option<i64>,
    title: Option<String>,
    genres: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RatingListParams {
    skip: Option<i64>,
    limit: Option<i64>,
    #[serde(alias = "movie_id")]
    movies_id: Option<i32>,
    user_id: Option<i32>,
    min_rating: Option<f64>,
    max_rating: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TagListParams {
    skip: Option<i64>,
    limit: Option<i64>,
    movie_id: Option<i32>,
    user_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LinkListParams {
    skip: Option<i64>,
    limit: Option<i64>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

fn rating_bound(name: &str, value: Option<f64>) -> AppResult<Option<f64>> {
    match value {
        Some(v) if !(0.0..=5.0).contains(&v) => {
            Err(AppError::Validation(format!("{name} must be between 0.0 and 5.0, got {v}")))
        },
        other => Ok(other),
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "monitoring",
    responses((status = 200, description = "API is up", body = Status))
)]
pub async fn root() -> Json<Status> {
    Json(Status { message: "MovieLens API is operational!".to_string() })
}

#[utoipa::path(
    get,
    path = "/movies/{movie_id}",
    tag = "movies",
    params(("movie_id" = i32, Path, description = "Movie identifier")),
    responses(
        (status = 200, description = "Movie with ratings, tags and link", body = MovieDetail),
        (status = 404, description = "No such movie", body = ErrorBody),
        (status = 422, description = "Invalid parameter", body = ErrorBody),
    )
)]
pub async fn read_movie(
    State(state): State<Arc<AppState>>,
    ApiPath(movie_id): ApiPath<i32>,
) -> AppResult<Json<MovieDetail>> {
    let record = queries::get_movie(&state.db, movie_id).await?.ok_or_else(|| {
        tracing::debug!(movie_id, "movie not found");
        AppError::NotFound(format!("movie {movie_id} not found"))
    })?;
    Ok(Json(record.into()))
}

#[utoipa::path(
    get,
    path = "/movies",
    tag = "movies",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip, >= 0"),
        ("limit" = Option<i64>, Query, description = "Maximum rows, 1..=1000"),
        ("title" = Option<String>, Query, description = "Case-sensitive title substring"),
        ("genres" = Option<String>, Query, description = "Case-sensitive genres substring"),
    ),
    responses(
        (status = 200, description = "Matching movies", body = [MovieSummary]),
        (status = 422, description = "Invalid parameter", body = ErrorBody),
    )
)]
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<MovieListParams>,
) -> AppResult<Json<Vec<MovieSummary>>> {
    let page = Page::new(params.skip, params.limit)?;
    let filter = MovieFilter { title: non_empty(params.title), genres: non_empty(params.genres) };

    let movies = queries::list_movies(&state.db, &filter, page).await?;
    Ok(Json(movies.into_iter().map(MovieSummary::from).collect()))
}

#[utoipa::path(
    get,
    path = "/ratings/{user_id}/{movie_id}",
    tag = "ratings",
    params(
        ("user_id" = i32, Path, description = "User identifier"),
        ("movie_id" = i32, Path, description = "Movie identifier"),
    ),
    responses(
        (status = 200, description = "The rating", body = Rating),
        (status = 404, description = "No such rating", body = ErrorBody),
        (status = 422, description = "Invalid parameter", body = ErrorBody),
    )
)]
pub async fn read_rating(
    State(state): State<Arc<AppState>>,
    ApiPath((user_id, movie_id)): ApiPath<(i32, i32)>,
) -> AppResult<Json<Rating>> {
    let rating = queries::get_rating(&state.db, user_id, movie_id).await?.ok_or_else(|| {
        tracing::debug!(user_id, movie_id, "rating not found");
        AppError::NotFound(format!("no rating found for user {user_id} and movie {movie_id}"))
    })?;
    Ok(Json(rating.into()))
}

#[utoipa::path(
    get,
    path = "/ratings",
    tag = "ratings",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip, >= 0"),
        ("limit" = Option<i64>, Query, description = "Maximum rows, 1..=1000"),
        ("movies_id" = Option<i32>, Query, description = "Exact movie identifier"),
        ("user_id" = Option<i32>, Query, description = "Exact user identifier"),
        ("min_rating" = Option<f64>, Query, description = "Inclusive lower bound, 0.0..=5.0"),
        ("max_rating" = Option<f64>, Query, description = "Inclusive upper bound, 0.0..=5.0"),
    ),
    responses(
        (status = 200, description = "Matching ratings", body = [Rating]),
        (status = 422, description = "Invalid parameter", body = ErrorBody),
    )
)]
pub async fn list_ratings(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<RatingListParams>,
) -> AppResult<Json<Vec<Rating>>> {
    let page = Page::new(params.skip, params.limit)?;
    let filter = RatingFilter {
        movie_id: params.movies_id,
        user_id: params.user_id,
        min_rating: rating_bound("min_rating", params.min_rating)?,
        max_rating: rating_bound("max_rating", params.max_rating)?,
    };

    let ratings = queries::list_ratings(&state.db, &filter, page).await?;
    Ok(Json(ratings.into_iter().map(Rating::from).collect()))
}

#[utoipa::path(
    get,
    path = "/tags/{user_id}/{movie_id}/{tag_text}",
    tag = "tags",
    params(
        ("user_id" = i32, Path, description = "User identifier"),
        ("movie_id" = i32, Path, description = "Movie identifier"),
        ("tag_text" = String, Path, description = "Exact tag text"),
    ),
    responses(
        (status = 200, description = "The tag", body = Tag),
        (status = 404, description = "No such tag", body = ErrorBody),
        (status = 422, description = "Invalid parameter", body = ErrorBody),
    )
)]
pub async fn read_tag(
    State(state): State<Arc<AppState>>,
    ApiPath((user_id, movie_id, tag_text)): ApiPath<(i32, i32, String)>,
) -> AppResult<Json<Tag>> {
    let tag = queries::get_tag(&state.db, user_id, movie_id, &tag_text).await?.ok_or_else(|| {
        tracing::debug!(user_id, movie_id, tag = %tag_text, "tag not found");
        AppError::NotFound(format!(
            "no tag found for user {user_id}, movie {movie_id} and tag '{tag_text}'"
        ))
    })?;
    Ok(Json(tag.into()))
}

#[utoipa::path(
    get,
    path = "/tags",
    tag = "tags",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip, >= 0"),
        ("limit" = Option<i64>, Query, description = "Maximum rows, 1..=1000"),
        ("movie_id" = Option<i32>, Query, description = "Exact movie identifier"),
        ("user_id" = Option<i32>, Query, description = "Exact user identifier"),
    ),
    responses(
        (status = 200, description = "Matching tags", body = [Tag]),
        (status = 422, description = "Invalid parameter", body = ErrorBody),
    )
)]
pub async fn list_tags(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<TagListParams>,
) -> AppResult<Json<Vec<Tag>>> {
    let page = Page::new(params.skip, params.limit)?;
    let filter = TagFilter { movie_id: params.movie_id, user_id: params.user_id };

    let tags = queries::list_tags(&state.db, &filter, page).await?;
    Ok(Json(tags.into_iter().map(Tag::from).collect()))
}

#[utoipa::path(
    get,
    path = "/links/{movie_id}",
    tag = "links",
    params(("movie_id" = i32, Path, description = "Movie identifier")),
    responses(
        (status = 200, description = "IMDB and TMDB identifiers", body = Link),
        (status = 404, description = "No link for this movie", body = ErrorBody),
        (status = 422, description = "Invalid parameter", body = ErrorBody),
    )
)]
pub async fn read_link(
    State(state): State<Arc<AppState>>,
    ApiPath(movie_id): ApiPath<i32>,
) -> AppResult<Json<Link>> {
    let link = queries::get_link(&state.db, movie_id).await?.ok_or_else(|| {
        tracing::debug!(movie_id, "link not found");
        AppError::NotFound(format!("no link found for movie {movie_id}"))
    })?;
    Ok(Json(link.into()))
}

#[utoipa::path(
    get,
    path = "/links",
    tag = "links",
    params(
        ("skip" = Option<i64>, Query, description = "Rows to skip, >= 0"),
        ("limit" = Option<i64>, Query, description = "Maximum rows, 1..=1000"),
    ),
    responses(
        (status = 200, description = "Links page", body = [Link]),
        (status = 422, description = "Invalid parameter", body = ErrorBody),
    )
)]
pub async fn list_links(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<LinkListParams>,
) -> AppResult<Json<Vec<Link>>> {
    let page = Page::new(params.skip, params.limit)?;
    let links = queries::list_links(&state.db, page).await?;
    Ok(Json(links.into_iter().map(Link::from).collect()))
}

#[utoipa::path(
    get,
    path = "/analytics",
    tag = "analytics",
    responses((status = 200, description = "Row counts per table", body = Analytics))
)]
pub async fn analytics(State(state): State<Arc<AppState>>) -> AppResult<Json<Analytics>> {
    Ok(Json(queries::analytics(&state.db).await?))
}
