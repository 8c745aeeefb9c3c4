pub mod handlers;
pub mod pages;
pub mod routes;

pub use handlers::AppState;
pub use pages::Pages;
pub use routes::create_router;
