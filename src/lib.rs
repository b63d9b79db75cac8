// src/lib.rs
pub mod billing;
pub mod cache;
pub mod config;
pub mod database;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;
