//! Read-only lookups over the MovieLens tables.
//!
//! Every listing takes an explicit filter value and a [`Page`]; the filter turns
//! into a single `Condition::all()` so optional fields compose with AND and an
//! unset field adds no predicate.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
    sea_query::{Alias, Expr, Func, SimpleExpr},
};
use tracing::debug;

use crate::{
    entities::{link, movie, rating, tag},
    error::{AppError, AppResult},
    models::Analytics,
};

pub const DEFAULT_LIMIT: u64 = 100;
pub const MAX_LIMIT: u64 = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub skip: u64,
    pub limit: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self { skip: 0, limit: DEFAULT_LIMIT }
    }
}

impl Page {
    /// Validates raw query values; absent values fall back to `skip=0`, `limit=100`.
    pub fn new(skip: Option<i64>, limit: Option<i64>) -> AppResult<Self> {
        let skip = match skip {
            None => 0,
            Some(s) if s >= 0 => s as u64,
            Some(s) => return Err(AppError::Validation(format!("skip must be >= 0, got {s}"))),
        };
        let limit = match limit {
            None => DEFAULT_LIMIT,
            Some(l) if (1..=MAX_LIMIT as i64).contains(&l) => l as u64,
            Some(l) => {
                return Err(AppError::Validation(format!(
                    "limit must be between 1 and {MAX_LIMIT}, got {l}"
                )));
            },
        };
        Ok(Self { skip, limit })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MovieFilter {
    pub title: Option<String>,
    pub genres: Option<String>,
}

impl MovieFilter {
    pub fn condition(&self) -> Condition {
        Condition::all()
            .add_option(self.title.as_deref().map(|t| contains(movie::Column::Title, t)))
            .add_option(self.genres.as_deref().map(|g| contains(movie::Column::Genres, g)))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RatingFilter {
    pub movie_id: Option<i32>,
    pub user_id: Option<i32>,
    pub min_rating: Option<f64>,
    pub max_rating: Option<f64>,
}

impl RatingFilter {
    pub fn condition(&self) -> Condition {
        Condition::all()
            .add_option(self.movie_id.map(|id| rating::Column::MovieId.eq(id)))
            .add_option(self.user_id.map(|id| rating::Column::UserId.eq(id)))
            .add_option(self.min_rating.map(|r| rating::Column::Rating.gte(r)))
            .add_option(self.max_rating.map(|r| rating::Column::Rating.lte(r)))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagFilter {
    pub movie_id: Option<i32>,
    pub user_id: Option<i32>,
}

impl TagFilter {
    pub fn condition(&self) -> Condition {
        Condition::all()
            .add_option(self.movie_id.map(|id| tag::Column::MovieId.eq(id)))
            .add_option(self.user_id.map(|id| tag::Column::UserId.eq(id)))
    }
}

/// Case-sensitive substring match. `instr` keeps `%` and `_` in the needle literal.
fn contains<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    Expr::expr(
        Func::cust(Alias::new("instr")).arg(Expr::col(column)).arg(Expr::val(needle.to_string())),
    )
    .gt(0)
}

/// A movie together with everything that references it.
#[derive(Clone, Debug, PartialEq)]
pub struct MovieRecord {
    pub movie: movie::Model,
    pub ratings: Vec<rating::Model>,
    pub tags: Vec<tag::Model>,
    pub link: Option<link::Model>,
}

pub async fn get_movie<C: ConnectionTrait>(db: &C, movie_id: i32) -> AppResult<Option<MovieRecord>> {
    debug!(movie_id, "get movie");

    let Some(movie) = movie::Entity::find_by_id(movie_id).one(db).await? else {
        return Ok(None);
    };

    let ratings = movie
        .find_related(rating::Entity)
        .order_by_asc(rating::Column::UserId)
        .all(db)
        .await?;
    let tags = movie
        .find_related(tag::Entity)
        .order_by_asc(tag::Column::UserId)
        .order_by_asc(tag::Column::Tag)
        .all(db)
        .await?;
    let link = movie.find_related(link::Entity).one(db).await?;

    Ok(Some(MovieRecord { movie, ratings, tags, link }))
}

pub async fn list_movies<C: ConnectionTrait>(
    db: &C,
    filter: &MovieFilter,
    page: Page,
) -> AppResult<Vec<movie::Model>> {
    debug!(title = ?filter.title, genres = ?filter.genres, skip = page.skip, limit = page.limit, "list movies");

    let movies = movie::Entity::find()
        .filter(filter.condition())
        .order_by_asc(movie::Column::MovieId)
        .offset(page.skip)
        .limit(page.limit)
        .all(db)
        .await?;
    Ok(movies)
}

pub async fn get_rating<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    movie_id: i32,
) -> AppResult<Option<rating::Model>> {
    debug!(user_id, movie_id, "get rating");
    Ok(rating::Entity::find_by_id((user_id, movie_id)).one(db).await?)
}

pub async fn list_ratings<C: ConnectionTrait>(
    db: &C,
    filter: &RatingFilter,
    page: Page,
) -> AppResult<Vec<rating::Model>> {
    debug!(
        movie_id = ?filter.movie_id,
        user_id = ?filter.user_id,
        min_rating = ?filter.min_rating,
        max_rating = ?filter.max_rating,
        skip = page.skip,
        limit = page.limit,
        "list ratings"
    );

    let ratings = rating::Entity::find()
        .filter(filter.condition())
        .order_by_asc(rating::Column::UserId)
        .order_by_asc(rating::Column::MovieId)
        .offset(page.skip)
        .limit(page.limit)
        .all(db)
        .await?;
    Ok(ratings)
}

pub async fn get_tag<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    movie_id: i32,
    tag_text: &str,
) -> AppResult<Option<tag::Model>> {
    debug!(user_id, movie_id, tag = %tag_text, "get tag");
    Ok(tag::Entity::find_by_id((user_id, movie_id, tag_text.to_string())).one(db).await?)
}

pub async fn list_tags<C: ConnectionTrait>(
    db: &C,
    filter: &TagFilter,
    page: Page,
) -> AppResult<Vec<tag::Model>> {
    debug!(movie_id = ?filter.movie_id, user_id = ?filter.user_id, skip = page.skip, limit = page.limit, "list tags");

    let tags = tag::Entity::find()
        .filter(filter.condition())
        .order_by_asc(tag::Column::UserId)
        .order_by_asc(tag::Column::MovieId)
        .order_by_asc(tag::Column::Tag)
        .offset(page.skip)
        .limit(page.limit)
        .all(db)
        .await?;
    Ok(tags)
}

pub async fn get_link<C: ConnectionTrait>(db: &C, movie_id: i32) -> AppResult<Option<link::Model>> {
    debug!(movie_id, "get link");
    Ok(link::Entity::find_by_id(movie_id).one(db).await?)
}

pub async fn list_links<C: ConnectionTrait>(db: &C, page: Page) -> AppResult<Vec<link::Model>> {
    debug!(skip = page.skip, limit = page.limit, "list links");

    let links = link::Entity::find()
        .order_by_asc(link::Column::MovieId)
        .offset(page.skip)
        .limit(page.limit)
        .all(db)
        .await?;
    Ok(links)
}

pub async fn count_movies<C: ConnectionTrait>(db: &C) -> AppResult<u64> {
    Ok(movie::Entity::find().count(db).await?)
}

pub async fn count_ratings<C: ConnectionTrait>(db: &C) -> AppResult<u64> {
    Ok(rating::Entity::find().count(db).await?)
}

pub async fn count_tags<C: ConnectionTrait>(db: &C) -> AppResult<u64> {
    Ok(tag::Entity::find().count(db).await?)
}

pub async fn count_links<C: ConnectionTrait>(db: &C) -> AppResult<u64> {
    Ok(link::Entity::find().count(db).await?)
}

pub async fn analytics<C: ConnectionTrait>(db: &C) -> AppResult<Analytics> {
    let (movie_count, rating_count, tag_count, link_count) =
        tokio::try_join!(count_movies(db), count_ratings(db), count_tags(db), count_links(db))?;

    debug!(movie_count, rating_count, tag_count, link_count, "analytics");
    Ok(Analytics { movie_count, rating_count, tag_count, link_count })
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    fn movie_sql(filter: &MovieFilter) -> String {
        movie::Entity::find().filter(filter.condition()).build(DbBackend::Sqlite).to_string()
    }

    #[test]
    fn empty_filter_adds_no_predicates() {
        let sql = movie_sql(&MovieFilter::default());
        assert!(sql.ends_with("WHERE TRUE"), "{sql}");
        assert!(!sql.contains("instr("), "{sql}");

        let sql = rating::Entity::find()
            .filter(RatingFilter::default().condition())
            .build(DbBackend::Sqlite)
            .to_string();
        assert!(sql.ends_with("WHERE TRUE"), "{sql}");
        assert!(!sql.contains(" = ") && !sql.contains(">=") && !sql.contains("<="), "{sql}");
    }

    #[test]
    fn movie_filters_are_anded_substring_matches() {
        let sql = movie_sql(&MovieFilter {
            title: Some("Toy".to_string()),
            genres: Some("Comedy".to_string()),
        });
        assert!(sql.contains(r#"instr("title", 'Toy') > 0"#), "{sql}");
        assert!(sql.contains(r#"instr("genres", 'Comedy') > 0"#), "{sql}");
        assert!(sql.contains(" AND "), "{sql}");
    }

    #[test]
    fn rating_range_is_inclusive() {
        let filter = RatingFilter {
            movie_id: Some(3),
            min_rating: Some(3.5),
            max_rating: Some(4.5),
            ..Default::default()
        };
        let sql = rating::Entity::find().filter(filter.condition()).build(DbBackend::Sqlite).to_string();
        assert!(sql.contains(r#""movieId" = 3"#), "{sql}");
        assert!(sql.contains(r#""rating" >= 3.5"#), "{sql}");
        assert!(sql.contains(r#""rating" <= 4.5"#), "{sql}");
        assert!(!sql.contains("userId\" ="), "{sql}");
    }

    #[test]
    fn page_defaults_and_bounds() {
        assert_eq!(Page::new(None, None).unwrap(), Page { skip: 0, limit: 100 });
        assert_eq!(Page::new(Some(20), Some(1000)).unwrap(), Page { skip: 20, limit: 1000 });
        assert!(matches!(Page::new(Some(-1), None), Err(AppError::Validation(_))));
        assert!(matches!(Page::new(None, Some(0)), Err(AppError::Validation(_))));
        assert!(matches!(Page::new(None, Some(1001)), Err(AppError::Validation(_))));
    }
}
