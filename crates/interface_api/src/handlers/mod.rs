//! Request handlers

pub mod address;
pub mod person;
pub mod health;
