//! Log template synthesis.
//!
//! Given the argument list of a logging call, this crate builds the template
//! string a positional formatter applies to those same arguments:
//!
//! - [`rule`] maps each leaf type to a format [`Spec`] (`{}` by default,
//!   `{:.2}` for floats, user overrides on top),
//! - [`flatten`] decomposes tuples, arrays and derived structs into an
//!   ordered [`LeafSeq`],
//! - [`fragment`] checks that a leaf fragment holds exactly one slot the
//!   renderer understands,
//! - [`assemble`] joins the leaf specs into a [`Template`],
//! - [`uniform`] produces `count` identical `{}` slots for count-only call
//!   sites.
//!
//! Everything on the static path is `const fn`, so templates are computed by
//! the compiler once per call-site signature:
//!
//! ```
//! use autofmt_core::Synth;
//!
//! let template = <Synth<(f32, i32, f32, f32)>>::TEMPLATE;
//! assert_eq!(template.as_str(), "{:.2} {} {:.2} {:.2}");
//! assert_eq!(template.slot_count(), 4);
//! ```
//!
//! Going past [`MAX_ARGS`] leaves is a build error, never a runtime one:
//!
//! ```compile_fail
//! use autofmt_core::Synth;
//!
//! const TOO_WIDE: autofmt_core::Template = <Synth<[u8; 21]>>::TEMPLATE;
//! ```
//!
//! So is a leaf fragment outside the slot grammar:
//!
//! ```compile_fail
//! use autofmt_core::{LeafFormat, Spec, Synth};
//!
//! struct Hex(u32);
//! impl std::fmt::Display for Hex {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "{:x}", self.0)
//!     }
//! }
//! impl LeafFormat for Hex {
//!     const SPEC: Spec<'static> = Spec::fragment("{:x}");
//! }
//! autofmt_core::impl_leaf!(Hex);
//!
//! const REFUSED: autofmt_core::Template = <Synth<(Hex, u8)>>::TEMPLATE;
//! ```
//!
//! The runtime [`Synthesizer`] covers rules that are only known at run time
//! (configuration files, CLI input) and memoizes per signature.

extern crate self as autofmt_core;

pub mod assemble;
pub mod error;
pub mod flatten;
pub mod fragment;
pub mod rule;
pub mod synth;
pub mod uniform;

/// Upper bound on the number of slots in any template.
pub const MAX_ARGS: usize = 20;

pub use assemble::{Fault, TEMPLATE_CAPACITY, Template, assemble, assemble_bounded};
pub use autofmt_derive::{Flatten, Leaf};
pub use error::{SynthError, SynthReason, SynthResult};
pub use flatten::{Flatten, LeafRef, LeafSeq, LeafType};
pub use fragment::{FragmentError, check_fragment, count_slots};
pub use rule::{FIXED_2DP, LeafFormat, PLACEHOLDER, RuleRegistry, Rules, Spec, builtin_spec};
pub use synth::{Synth, Synthesizer, TemplateCache};
pub use uniform::{Uniform, generate};
