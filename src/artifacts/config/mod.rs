//! Configuration schema
//!
//! Only a fixed set of `section.key` names is accepted; everything else is
//! rejected before it reaches a config file.

pub mod config_key;
