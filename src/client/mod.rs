pub mod api;
pub mod board;
pub mod presentation;
