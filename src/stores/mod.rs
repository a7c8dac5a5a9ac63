pub mod repository;
pub mod memory_store;
pub mod json_store;
