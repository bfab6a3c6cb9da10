pub mod config;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod improvement;
mod interner;
pub mod model;
mod resolved;
pub mod solution;

#[cfg(test)]
mod tests;
