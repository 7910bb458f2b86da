pub mod embedding;
pub mod models;
