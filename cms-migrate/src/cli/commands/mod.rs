pub mod entries;
pub mod interactive;
pub mod models;
