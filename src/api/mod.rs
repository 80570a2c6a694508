pub mod activity_handlers;
pub mod crud;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod reservation_handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::*;
pub use state::*;
