//! Library exports for the segmentation server, its tools and tests.
/// Application directory resolution.
pub mod app_dirs;
/// Server configuration.
pub mod config;
/// Tracing subscriber setup.
pub mod logging;
/// K-means segmentation of uploaded tables.
pub mod segmentation;
/// HTTP endpoint and router.
pub mod server;
/// Delimited-file parsing and column typing.
pub mod table;
