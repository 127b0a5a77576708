pub mod accounts;
pub mod api;
pub mod chat;
pub mod config;
pub mod content;
pub mod media;
pub mod quiz;
pub mod session;
pub mod store;
