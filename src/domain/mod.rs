pub mod error;
pub mod id_generator;
pub mod repository;
pub mod todo;
