#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use movielens::{
    AppState, db,
    entities::{link, movie, rating, tag},
};
use sea_orm::{DatabaseConnection, EntityTrait, Set};

pub const MOVIE_COUNT: u64 = 5;
pub const RATING_COUNT: u64 = 7;
pub const TAG_COUNT: u64 = 4;
pub const LINK_COUNT: u64 = 3;

fn movie(movie_id: i32, title: &str, genres: Option<&str>) -> movie::ActiveModel {
    movie::ActiveModel {
        movie_id: Set(movie_id),
        title: Set(title.to_string()),
        genres: Set(genres.map(str::to_string)),
    }
}

fn rating(user_id: i32, movie_id: i32, value: f64, timestamp: i64) -> rating::ActiveModel {
    rating::ActiveModel {
        user_id: Set(user_id),
        movie_id: Set(movie_id),
        rating: Set(value),
        timestamp: Set(timestamp),
    }
}

fn tag(user_id: i32, movie_id: i32, text: &str, timestamp: i64) -> tag::ActiveModel {
    tag::ActiveModel {
        user_id: Set(user_id),
        movie_id: Set(movie_id),
        tag: Set(text.to_string()),
        timestamp: Set(timestamp),
    }
}

fn link(movie_id: i32, imdb_id: &str, tmdb_id: i32) -> link::ActiveModel {
    link::ActiveModel {
        movie_id: Set(movie_id),
        imdb_id: Set(Some(imdb_id.to_string())),
        tmdb_id: Set(Some(tmdb_id)),
    }
}

pub async fn seeded_db() -> DatabaseConnection {
    let db = db::connect("sqlite::memory:", 1, true).await.expect("connect");

    movie::Entity::insert_many([
        movie(1, "Toy Story (1995)", Some("Adventure|Animation|Children|Comedy|Fantasy")),
        movie(2, "Jumanji (1995)", Some("Adventure|Children|Fantasy")),
        movie(3, "Grumpier Old Men (1995)", Some("Comedy|Romance")),
        movie(4, "toy soldiers", Some("Action|Drama")),
        movie(5, "100% Love", None),
    ])
    .exec_without_returning(&db)
    .await
    .expect("seed movies");

    rating::Entity::insert_many([
        rating(1, 1, 4.0, 964_982_703),
        rating(1, 3, 4.0, 964_981_247),
        rating(2, 1, 5.0, 964_982_224),
        rating(2, 2, 3.5, 964_983_815),
        rating(3, 1, 2.5, 964_982_931),
        rating(3, 4, 4.5, 964_980_868),
        rating(4, 2, 1.0, 964_982_400),
    ])
    .exec_without_returning(&db)
    .await
    .expect("seed ratings");

    tag::Entity::insert_many([
        tag(2, 1, "pixar", 1_445_714_994),
        tag(2, 1, "fun", 1_445_714_996),
        tag(3, 2, "fantasy", 1_445_715_051),
        tag(4, 1, "funny movie", 1_445_715_100),
    ])
    .exec_without_returning(&db)
    .await
    .expect("seed tags");

    link::Entity::insert_many([
        link(1, "0114709", 862),
        link(2, "0113497", 8844),
        link(3, "0113228", 15602),
    ])
    .exec_without_returning(&db)
    .await
    .expect("seed links");

    db
}

pub async fn app() -> Router {
    movielens::router(Arc::new(AppState { db: seeded_db().await }))
}

/// Serves a seeded app on an ephemeral port and returns its base url.
pub async fn spawn_server() -> String {
    let app = app().await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}")
}
