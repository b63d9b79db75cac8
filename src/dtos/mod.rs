// src/dtos/mod.rs
pub mod auth;
pub mod billing;
pub mod category;
pub mod customer;
pub mod dashboard;
pub mod product;
pub mod sale;
pub mod search;
