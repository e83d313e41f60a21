pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod domain;
pub mod filters;
pub mod handlers;
pub mod identity;
pub mod routes;
pub mod state;
pub mod store;
pub mod support;

#[cfg(test)]
pub mod testing;
