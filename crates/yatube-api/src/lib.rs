pub mod auth;
pub mod cache;
pub mod comments;
pub mod convert;
pub mod directs;
pub mod error;
pub mod follows;
pub mod groups;
pub mod likes;
pub mod media;
pub mod middleware;
pub mod posts;
pub mod profiles;
pub mod routes;

mod blocking;

pub use auth::{AppState, AppStateInner};
pub use error::ApiError;
pub use routes::router;
