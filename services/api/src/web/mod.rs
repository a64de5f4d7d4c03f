pub mod rest;
pub mod state;

// Re-export the router builder and the OpenAPI aggregate to make them
// easily accessible to the binary that builds the web server.
pub use rest::{api_router, ApiDoc};
