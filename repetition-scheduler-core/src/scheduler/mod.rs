pub mod cost;
pub mod export;
pub mod projector;
pub mod search;
pub mod slot;
