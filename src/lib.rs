pub mod api;
pub mod app;
pub mod config;
pub mod detail;
pub mod display_mode;
pub mod error;
pub mod feed;
pub mod image;
pub mod models;
pub mod present;
pub mod view;
