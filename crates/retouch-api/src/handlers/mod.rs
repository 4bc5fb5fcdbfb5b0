pub mod download;
pub mod enhance;
pub mod health;
pub mod list;
