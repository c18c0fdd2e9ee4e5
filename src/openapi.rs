use axum::Json;
use utoipa::OpenApi;

use crate::{
    models::{Analytics, ErrorBody, Link, LinkIds, MovieDetail, MovieSummary, Rating, Status, Tag},
    routes,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "MovieLens API",
        version = "0.1.0",
        description = "Read-only access to the MovieLens movies, ratings, tags and links tables."
    ),
    paths(
        routes::root,
        routes::read_movie,
        routes::list_movies,
        routes::read_rating,
        routes::list_ratings,
        routes::read_tag,
        routes::list_tags,
        routes::read_link,
        routes::list_links,
        routes::analytics,
    ),
    components(schemas(
        Status,
        ErrorBody,
        MovieSummary,
        MovieDetail,
        Rating,
        Tag,
        Link,
        LinkIds,
        Analytics
    )),
    tags(
        (name = "monitoring", description = "Liveness"),
        (name = "movies", description = "Movies and their joined details"),
        (name = "ratings", description = "User ratings"),
        (name = "tags", description = "User tags"),
        (name = "links", description = "IMDB and TMDB identifiers"),
        (name = "analytics", description = "Row counts"),
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
