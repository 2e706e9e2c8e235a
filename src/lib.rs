// Library for tests to access modules

pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod normalize;
pub mod orchestrator;
pub mod query;
pub mod routes;
pub mod upstream;
pub mod version;
