#![doc = "The `projectdesk` library crate."]
#![doc = ""]
#![doc = "Domain models, authentication, storage, services, routing configuration and"]
#![doc = "error handling for the project and task management API. The binary (`main.rs`)"]
#![doc = "only loads configuration, prepares the database and serves `routes::config`."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod upload;
