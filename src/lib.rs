pub mod app;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod genres;
pub mod models;
pub mod pagination;
pub mod proxy;
pub mod views;
