//! Infrastructure layer: adapters behind the domain ports

pub mod answer;
pub mod config;
pub mod extract;
pub mod vector;
