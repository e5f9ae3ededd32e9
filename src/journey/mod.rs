pub mod filter;
pub mod group;
pub mod metadata;
pub mod stage;
pub mod touchpoint;
