//! Back-office API for the car catalogue.
//!
//! Wraps the Odoo GraphQL endpoint behind a key-holding proxy, typed entity
//! endpoints, and the API-testing settings store. The binary and the
//! integration tests both build the router from here.

pub mod config;
pub mod dto;
pub mod error;
pub mod graphql;
pub mod i18n;
pub mod media;
pub mod models;
pub mod response;
pub mod routes;
pub mod services;
pub mod state;
