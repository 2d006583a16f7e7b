#![doc = "The `taskledger` library crate."]
#![doc = ""]
#![doc = "Task management REST API: user signup/login with bcrypt password hashing and"]
#![doc = "JWT sessions, and CRUD on tasks scoped to the authenticated owner."]
#![doc = "The binary (`main.rs`) builds the actix-web server from these modules."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
