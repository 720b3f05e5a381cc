/// Miss Nova - AI-generated courses
///
/// Course generation with quizzes, multi-speaker dialogue audio, course
/// storage and gamified progress, served over HTTP.

pub mod config;
pub mod core;
pub mod database;
pub mod server;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
