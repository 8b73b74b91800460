pub mod admin;
pub mod auth;
pub mod catalog;
pub mod chat;
pub mod mitra;
pub mod orders;
pub mod reviews;
