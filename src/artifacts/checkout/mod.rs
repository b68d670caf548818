//! Checkout of another commit's tree
//!
//! Used by `switch` and by fast-forward `merge`, which both rewrite the
//! working tree and resynchronize the index before moving refs.

pub mod migration;
