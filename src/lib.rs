//! thoughtcard renders themed social-preview cards as self-contained HTML
//! documents, ready for a headless browser to screenshot.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
