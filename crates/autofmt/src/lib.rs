//! Log-line rendering on top of `autofmt-core` templates.
//!
//! - [`render`] parses and renders positional templates
//! - [`dispatch`] pairs a synthesized template with the call's values
//! - `stm_*!` / `fmt_*!` log through `tracing` with uniform or type-aware
//!   templates
//! - [`tracing_init`] installs the subscriber stack from `[logging]` config

pub mod dispatch;
pub mod error;
pub mod log_macros;
pub mod render;
pub mod tracing_init;

pub use autofmt_core::*;
pub use dispatch::{render_ready, render_typed, render_uniform, render_with};
pub use error::{RenderError, RenderReason, RenderResult};
pub use tracing_init::init_tracing;

#[doc(hidden)]
pub use tracing as __tracing;
