pub use handlers::report_listing;

mod handlers;
pub mod models;
pub mod repository;
pub mod service;
pub mod types;
