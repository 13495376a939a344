pub mod manager;
pub mod query;
pub mod selector;
pub mod upload;
