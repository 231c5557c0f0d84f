pub mod answer;
pub mod config;
pub mod constants;
pub mod links;
pub mod markup;
pub mod query_service;
pub mod session;
