// Library crate exposing modules for the binary and integration tests

pub mod exchange;
pub mod model;
pub mod repository;
pub mod util;
