//! Index snapshot format
//!
//! The index is persisted whole as pretty-printed JSON:
//!
//! ```text
//! {
//!   "entries": {
//!     "src/main.rs": { "path": "src/main.rs", "hash": "<40-hex>" }
//!   }
//! }
//! ```

pub mod index_entry;
