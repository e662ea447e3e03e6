pub mod middleware;
pub mod sessions;
