//! Wire schemas shared by the HTTP surface and the client SDK.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    entities::{link, movie, rating, tag},
    queries::MovieRecord,
};

/// Liveness acknowledgment returned by `GET /`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Status {
    #[serde(rename = "Message")]
    pub message: String,
}

/// Body of every non-2xx response.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

/// Movie as it appears in listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub movie_id: i32,
    pub title: String,
    pub genres: Option<String>,
}

/// Movie with its ratings, tags and external identifiers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetail {
    pub movie_id: i32,
    pub title: String,
    pub genres: Option<String>,
    #[serde(default)]
    pub ratings: Vec<Rating>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub link: Option<LinkIds>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    pub user_id: i32,
    pub movie_id: i32,
    pub rating: f64,
    pub timestamp: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub user_id: i32,
    pub movie_id: i32,
    pub tag: String,
    pub timestamp: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub movie_id: i32,
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i32>,
}

/// IMDB/TMDB identifiers nested inside [`MovieDetail`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LinkIds {
    pub imdb_id: Option<String>,
    pub tmdb_id: Option<i32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Analytics {
    pub movie_count: u64,
    pub rating_count: u64,
    pub tag_count: u64,
    pub link_count: u64,
}

impl From<movie::Model> for MovieSummary {
    fn from(m: movie::Model) -> Self {
        Self { movie_id: m.movie_id, title: m.title, genres: m.genres }
    }
}

impl From<MovieRecord> for MovieDetail {
    fn from(record: MovieRecord) -> Self {
        let MovieRecord { movie, ratings, tags, link } = record;
        Self {
            movie_id: movie.movie_id,
            title: movie.title,
            genres: movie.genres,
            ratings: ratings.into_iter().map(Rating::from).collect(),
            tags: tags.into_iter().map(Tag::from).collect(),
            link: link.map(|l| LinkIds { imdb_id: l.imdb_id, tmdb_id: l.tmdb_id }),
        }
    }
}

impl From<rating::Model> for Rating {
    fn from(r: rating::Model) -> Self {
        Self { user_id: r.user_id, movie_id: r.movie_id, rating: r.rating, timestamp: r.timestamp }
    }
}

impl From<tag::Model> for Tag {
    fn from(t: tag::Model) -> Self {
        Self { user_id: t.user_id, movie_id: t.movie_id, tag: t.tag, timestamp: t.timestamp }
    }
}

impl From<link::Model> for Link {
    fn from(l: link::Model) -> Self {
        Self { movie_id: l.movie_id, imdb_id: l.imdb_id, tmdb_id: l.tmdb_id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_detail_uses_dataset_field_names() {
        let detail = MovieDetail::from(MovieRecord {
            movie: movie::Model {
                movie_id: 1,
                title: "Toy Story (1995)".to_string(),
                genres: Some("Adventure|Animation".to_string()),
            },
            ratings: vec![rating::Model { user_id: 7, movie_id: 1, rating: 4.0, timestamp: 10 }],
            tags: vec![],
            link: Some(link::Model {
                movie_id: 1,
                imdb_id: Some("0114709".to_string()),
                tmdb_id: Some(862),
            }),
        });

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["movieId"], 1);
        assert_eq!(json["ratings"][0]["userId"], 7);
        assert_eq!(json["link"]["imdbId"], "0114709");
        assert_eq!(json["link"]["tmdbId"], 862);
        assert!(json["tags"].as_array().unwrap().is_empty());
    }

    #[test]
    fn status_serializes_capitalized_key() {
        let json = serde_json::to_value(Status { message: "ok".to_string() }).unwrap();
        assert_eq!(json, serde_json::json!({ "Message": "ok" }));
    }
}
