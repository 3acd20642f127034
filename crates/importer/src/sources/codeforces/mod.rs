mod client;
mod models;

pub use client::{CodeforcesClient, DEFAULT_BASE_URL};
pub use models::*;
