pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod popularity;
pub mod repository;

pub use error::PopularityError;
pub use popularity::recalc_actor_popularity;
