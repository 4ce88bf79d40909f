//! # drawbridge-srv
//!
//! Configuration for the `drawbridge-srv` binary.

pub mod config;
