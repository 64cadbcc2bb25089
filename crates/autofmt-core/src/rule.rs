use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::Arc;

use orion_error::StructError;

use crate::error::{SynthReason, SynthResult};
use crate::flatten::LeafType;
use crate::fragment::check_fragment;

/// The generic placeholder every unmapped leaf renders with.
pub const PLACEHOLDER: &str = "{}";

/// Fixed two-decimal-place fragment used for floating-point leaves.
pub const FIXED_2DP: &str = "{:.2}";

// ---------------------------------------------------------------------------
// Spec - the format rule attached to one leaf
// ---------------------------------------------------------------------------

/// Format rule for a single leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Spec<'a> {
    /// No specific rule: the leaf renders with [`PLACEHOLDER`].
    Generic,
    /// No inline formatting: the leaf renders with a numbered placeholder
    /// carrying its zero-based position (`{2}` for the third leaf).
    Positional,
    /// A fragment emitted verbatim. Must contain exactly one implicit slot
    /// (see [`check_fragment`](crate::fragment::check_fragment)).
    Fragment(&'a str),
}

impl Spec<'_> {
    /// Shorthand used by [`LeafFormat`] impls.
    pub const fn fragment(fragment: &'static str) -> Spec<'static> {
        Spec::Fragment(fragment)
    }
}

// ---------------------------------------------------------------------------
// LeafFormat - static, per-type rules
// ---------------------------------------------------------------------------

/// Per-leaf-type format rule, resolved at compile time.
///
/// New leaf types extend the registry by implementing this trait, either by
/// hand or with `#[derive(Leaf)]`. The default rule is [`Spec::Generic`].
///
/// ```
/// use autofmt_core::{Flatten, LeafFormat, Spec, Synth};
/// use std::fmt;
///
/// struct Celsius(f32);
///
/// impl fmt::Display for Celsius {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "{}C", self.0)
///     }
/// }
///
/// impl LeafFormat for Celsius {
///     const SPEC: Spec<'static> = Spec::fragment("temp={}");
/// }
/// autofmt_core::impl_leaf!(Celsius);
///
/// assert_eq!(<Synth<(Celsius, u8)>>::TEMPLATE.as_str(), "temp={} {}");
/// ```
pub trait LeafFormat {
    const SPEC: Spec<'static> = Spec::Generic;
}

macro_rules! generic_leaf_format {
    ($($ty:ty),* $(,)?) => {
        $(impl LeafFormat for $ty {})*
    };
}

generic_leaf_format!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, str, String,
    IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr,
);

impl LeafFormat for f32 {
    const SPEC: Spec<'static> = Spec::fragment(FIXED_2DP);
}

impl LeafFormat for f64 {
    const SPEC: Spec<'static> = Spec::fragment(FIXED_2DP);
}

/// Static rule for a built-in leaf type given by name, as written in Rust
/// source (`"f64"`, `"String"`, ...). `None` for names that are not built-in
/// leaves.
pub fn builtin_spec(name: &str) -> Option<Spec<'static>> {
    let spec = match name {
        "f32" => <f32 as LeafFormat>::SPEC,
        "f64" => <f64 as LeafFormat>::SPEC,
        "bool" | "char" | "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16"
        | "u32" | "u64" | "u128" | "usize" | "str" | "&str" | "String" | "IpAddr"
        | "Ipv4Addr" | "Ipv6Addr" | "SocketAddr" => Spec::Generic,
        _ => return None,
    };
    Some(spec)
}

// ---------------------------------------------------------------------------
// RuleRegistry - runtime, append-only overrides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rule {
    Positional,
    Fragment(String),
}

/// Append-only set of name-keyed rules layered over the static
/// [`LeafFormat`] rules.
///
/// Keys are either the full path reported by [`std::any::type_name`]
/// (`"my_app::Point"`) or the bare type name (`"Point"`). A type cannot be
/// registered twice; call [`freeze`](Self::freeze) to obtain the immutable
/// [`Rules`] used for synthesis.
#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, Rule>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fragment override for `type_name`.
    ///
    /// Fails when the fragment does not contain exactly one well-formed,
    /// unindexed slot or when the type already has a rule.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        fragment: impl Into<String>,
    ) -> SynthResult<()> {
        let type_name = type_name.into();
        let fragment = fragment.into();
        if let Err(defect) = check_fragment(&fragment) {
            return Err(StructError::from(SynthReason::MalformedFragment).with_detail(format!(
                "rule for {type_name:?}: fragment {fragment:?}: {defect}"
            )));
        }
        self.insert(type_name, Rule::Fragment(fragment))
    }

    /// Request numbered placeholders for every occurrence of `type_name`.
    pub fn register_positional(&mut self, type_name: impl Into<String>) -> SynthResult<()> {
        self.insert(type_name.into(), Rule::Positional)
    }

    fn insert(&mut self, type_name: String, rule: Rule) -> SynthResult<()> {
        match self.rules.entry(type_name) {
            Entry::Occupied(slot) => Err(StructError::from(SynthReason::DuplicateRule)
                .with_detail(format!("type {:?} already has a rule", slot.key()))),
            Entry::Vacant(slot) => {
                tracing::debug!(type_name = %slot.key(), rule = ?rule, "leaf rule registered");
                slot.insert(rule);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn freeze(self) -> Rules {
        Rules {
            rules: Arc::new(self.rules),
        }
    }
}

/// Immutable, cheaply cloneable snapshot of a [`RuleRegistry`].
#[derive(Debug, Clone, Default)]
pub struct Rules {
    rules: Arc<HashMap<String, Rule>>,
}

impl Rules {
    /// Rule for a leaf type: a registered override if any, else its static
    /// [`LeafFormat`] rule.
    pub fn resolve(&self, leaf: &LeafType) -> Spec<'_> {
        self.resolve_name(leaf.name(), leaf.spec())
    }

    /// Rule for a type given by name, falling back to `fallback` when no
    /// override is registered. Never fails.
    pub fn resolve_name<'r>(&'r self, type_name: &str, fallback: Spec<'r>) -> Spec<'r> {
        let rule = self
            .rules
            .get(type_name)
            .or_else(|| self.rules.get(short_name(type_name)));
        match rule {
            Some(Rule::Positional) => Spec::Positional,
            Some(Rule::Fragment(fragment)) => Spec::Fragment(fragment),
            None => fallback,
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// `"alloc::vec::Vec<u8>"` → `"Vec"`, `"my_app::Point"` → `"Point"`.
fn short_name(type_name: &str) -> &str {
    let base = type_name.split('<').next().unwrap_or(type_name);
    base.rsplit("::").next().unwrap_or(base)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use orion_error::ErrorCode;

    #[test]
    fn floats_use_fixed_two_decimals() {
        assert_eq!(<f32 as LeafFormat>::SPEC, Spec::Fragment("{:.2}"));
        assert_eq!(<f64 as LeafFormat>::SPEC, Spec::Fragment("{:.2}"));
    }

    #[test]
    fn other_builtins_default_to_generic() {
        assert_eq!(<i32 as LeafFormat>::SPEC, Spec::Generic);
        assert_eq!(<str as LeafFormat>::SPEC, Spec::Generic);
        assert_eq!(<IpAddr as LeafFormat>::SPEC, Spec::Generic);
    }

    #[test]
    fn builtin_spec_by_name() {
        assert_eq!(builtin_spec("f64"), Some(Spec::Fragment(FIXED_2DP)));
        assert_eq!(builtin_spec("u16"), Some(Spec::Generic));
        assert_eq!(builtin_spec("Point"), None);
    }

    #[test]
    fn short_name_strips_path_and_generics() {
        assert_eq!(short_name("my_app::geo::Point"), "Point");
        assert_eq!(short_name("alloc::vec::Vec<u8>"), "Vec");
        assert_eq!(short_name("f32"), "f32");
    }

    #[test]
    fn registered_rule_overrides_static_rule() {
        let mut registry = RuleRegistry::new();
        registry.register("f32", "{:.4}").unwrap();
        registry.register_positional("my_app::Opaque").unwrap();
        let rules = registry.freeze();

        let f32_leaf = LeafType::of::<f32>();
        assert_eq!(rules.resolve(&f32_leaf), Spec::Fragment("{:.4}"));
        assert_eq!(rules.resolve_name("Opaque", Spec::Generic), Spec::Generic);
        assert_eq!(
            rules.resolve_name("my_app::Opaque", Spec::Generic),
            Spec::Positional
        );
    }

    #[test]
    fn bare_name_matches_full_path() {
        let mut registry = RuleRegistry::new();
        registry.register("Point", "struct:{}").unwrap();
        let rules = registry.freeze();
        assert_eq!(
            rules.resolve_name("my_app::geo::Point", Spec::Generic),
            Spec::Fragment("struct:{}")
        );
    }

    #[test]
    fn unregistered_type_keeps_fallback() {
        let rules = RuleRegistry::new().freeze();
        assert!(rules.is_empty());
        assert_eq!(
            rules.resolve_name("Unknown", Spec::Generic),
            Spec::Generic
        );
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = RuleRegistry::new();
        registry.register("Point", "struct:{}").unwrap();
        let err = registry.register("Point", "p={}").unwrap_err();
        assert_eq!(err.reason(), &SynthReason::DuplicateRule);
        assert_eq!(err.reason().error_code(), 3005);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn fragment_must_have_one_slot() {
        let mut registry = RuleRegistry::new();
        for bad in ["no slot", "{} and {}", "{unclosed", "stray}"] {
            let err = registry.register("Bad", bad).unwrap_err();
            assert_eq!(err.reason(), &SynthReason::MalformedFragment, "{bad:?}");
        }
        assert!(registry.is_empty());
        registry.register("Escaped", "{{{}}}").unwrap();
    }

    #[test]
    fn fragment_outside_slot_grammar_is_rejected() {
        let mut registry = RuleRegistry::new();
        for bad in ["{:.2f}", "{:x}", "id={0}", "{abc}"] {
            let err = registry.register("Bad", bad).unwrap_err();
            assert_eq!(err.reason(), &SynthReason::MalformedFragment, "{bad:?}");
        }
        assert!(registry.is_empty());
        registry.register("Padded", "{:>8.3}").unwrap();
        registry.register("Zeroed", "n={:05}").unwrap();
    }
}
