pub mod api;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod form;
pub mod interrupt;
pub mod models;
