//! Core toolkit configuration

pub mod config;
