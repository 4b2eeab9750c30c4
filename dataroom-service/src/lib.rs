//! Data room backend: Google Drive OAuth, file import and local document storage.
pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;
