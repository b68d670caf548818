//! A small content-addressed version control system
//!
//! Repositories keep their data in a `.twig` directory: objects under
//! `objects/`, branch refs under `refs/heads/`, a symbolic or detached `HEAD`,
//! a JSON index and a TOML config file.

pub mod areas;
pub mod artifacts;
pub mod commands;
pub mod errors;
