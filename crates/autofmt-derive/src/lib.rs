//! Derive macros for `autofmt-core`.
//!
//! - `#[derive(Flatten)]` - decompose a struct into its fields' leaves
//! - `#[derive(Leaf)]` - treat a `Display` type as a single leaf with an
//!   optional format rule
//!
//! # Example
//!
//! ```ignore
//! use autofmt_core::{Flatten, Leaf};
//!
//! #[derive(Leaf)]
//! #[autofmt(format = "struct:{}")]
//! pub struct UserId(u64);
//!
//! #[derive(Flatten)]
//! pub struct Login {
//!     pub user: UserId,
//!     pub latency_ms: f64,
//!     #[autofmt(skip)]
//!     pub raw: Vec<u8>,
//! }
//! ```

use proc_macro::TokenStream;

mod attrs;
mod flatten;
mod leaf;

/// Derive `Flatten` for a struct.
///
/// Fields are flattened in declaration order. Every non-skipped field type
/// must implement `Flatten`.
///
/// # Attributes
///
/// - `#[autofmt(crate = "path")]` - path to `autofmt_core` when it is
///   re-exported under another name
///
/// # Field Attributes
///
/// - `#[autofmt(skip)]` - leave the field out of the template
#[proc_macro_derive(Flatten, attributes(autofmt))]
pub fn derive_flatten(input: TokenStream) -> TokenStream {
    flatten::derive_flatten_impl(input)
}

/// Derive `LeafFormat` and `Flatten` for a type rendered through its
/// `Display` impl.
///
/// # Attributes
///
/// - `#[autofmt(format = "...")]` - fragment with exactly one implicit slot
/// - `#[autofmt(positional)]` - render with a numbered placeholder
/// - `#[autofmt(crate = "path")]` - path to `autofmt_core`
#[proc_macro_derive(Leaf, attributes(autofmt))]
pub fn derive_leaf(input: TokenStream) -> TokenStream {
    leaf::derive_leaf_impl(input)
}
