pub mod application;
pub mod endpoints;
pub mod models;
pub mod navigation;
pub mod services;
pub mod shell;
pub mod staleness;
pub mod views;

// Re-export from application for convenience
pub use application::bootstrapper;
pub use application::config;
pub use application::error;
pub use application::state;
