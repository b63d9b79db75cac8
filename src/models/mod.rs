// src/models/mod.rs
pub mod category;
pub mod customer;
pub mod product;
pub mod sale;
