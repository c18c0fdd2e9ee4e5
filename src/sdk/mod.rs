//! Client SDK for the MovieLens API.
//!
//! ```rust,ignore
//! use movielens::sdk::{ClientConfig, MovieClient, MovieQuery, OutputFormat};
//!
//! let client = MovieClient::new(ClientConfig::from_env())?;
//! let table = client
//!     .list_movies(&MovieQuery::default().genres("Comedy").limit(10), "table".parse()?)
//!     .await?;
//! ```

mod client;
mod error;
pub mod format;

pub use client::{ClientConfig, LinkQuery, MovieClient, MovieQuery, RatingQuery, TagQuery};
pub use error::{SdkError, SdkResult};
pub use format::{Listing, OutputFormat, Row, Table};
