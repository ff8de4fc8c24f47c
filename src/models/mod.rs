// src/models/mod.rs
pub mod school;
pub mod user;
