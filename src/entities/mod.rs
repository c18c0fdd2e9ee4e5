pub mod link;
pub mod movie;
pub mod rating;
pub mod tag;
