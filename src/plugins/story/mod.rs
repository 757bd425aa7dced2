pub mod handlers;
pub mod models;
mod plugin;
pub mod service;
pub mod store;

pub use plugin::StoryPlugin;
