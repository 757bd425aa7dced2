pub mod handlers;
pub mod middleware;
pub mod models;
pub mod plugin;
pub mod repo;
pub mod token;

pub use plugin::AuthPlugin;
