pub mod api;
pub mod config;
pub mod events;
pub mod health;
pub mod models;
pub mod workflows;
