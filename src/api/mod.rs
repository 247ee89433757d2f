//! API layer - HTTP endpoints and middleware

pub mod dispatch;
pub mod health;
pub mod middleware;
pub mod partners;
pub mod pmpartners;
pub mod router;
pub mod state;
pub mod types;

pub use router::{create_router, route_table};
pub use state::AppState;
