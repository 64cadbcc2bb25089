use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, PoisonError, RwLock};

use orion_error::StructError;

use crate::MAX_ARGS;
use crate::assemble::{Fault, Template, assemble, assemble_bounded};
use crate::error::{SynthReason, SynthResult};
use crate::flatten::{Flatten, LeafSeq};
use crate::rule::Rules;

// ---------------------------------------------------------------------------
// Synth - compile-time, type-aware synthesis
// ---------------------------------------------------------------------------

/// Compile-time template for the argument signature `T`.
///
/// `T` is usually a tuple of the call's argument types. The template is an
/// associated const, so it is computed once per `(T, SEP)` by the compiler
/// and a malformed signature is a build error.
///
/// ```
/// use autofmt_core::Synth;
///
/// assert_eq!(<Synth<(f64, &str), ','>>::TEMPLATE.as_str(), "{:.2},{}");
/// ```
pub struct Synth<T: ?Sized, const SEP: char = ' '>(PhantomData<T>);

impl<T: Flatten + ?Sized, const SEP: char> Synth<T, SEP> {
    pub const LEAVES: LeafSeq<'static> = T::LEAVES;

    pub const TEMPLATE: Template = match assemble(&T::LEAVES, SEP) {
        Ok(template) => template,
        Err(fault) => fault.raise(),
    };
}

// ---------------------------------------------------------------------------
// TemplateCache
// ---------------------------------------------------------------------------

/// Runtime memo of synthesized templates, keyed by signature name and
/// separator.
///
/// The name comes from [`std::any::type_name`], whose output is not
/// guaranteed unique: two distinct signatures reporting the same name share
/// one entry, and the first template built wins. `TypeId` would be exact but
/// needs `T: 'static`, which rules out argument tuples holding borrows.
#[derive(Debug, Default)]
pub struct TemplateCache {
    entries: RwLock<HashMap<(&'static str, char), Arc<Template>>>,
}

impl TemplateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, signature: &'static str, separator: char) -> Option<Arc<Template>> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(&(signature, separator)).cloned()
    }

    /// Cached template for the key, building it with `build` on a miss.
    /// Failed builds are not cached.
    pub fn get_or_try_insert(
        &self,
        signature: &'static str,
        separator: char,
        build: impl FnOnce() -> SynthResult<Template>,
    ) -> SynthResult<Arc<Template>> {
        if let Some(template) = self.get(signature, separator) {
            return Ok(template);
        }
        let template = Arc::new(build()?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let cached = entries
            .entry((signature, separator))
            .or_insert_with(|| {
                tracing::trace!(signature, ?separator, template = %template, "template cached");
                template
            });
        Ok(Arc::clone(cached))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Synthesizer - runtime, rule-aware synthesis
// ---------------------------------------------------------------------------

/// Runtime synthesis over frozen [`Rules`], memoized per signature.
///
/// Use this when rules come from configuration; otherwise [`Synth`] does the
/// same work at compile time.
#[derive(Debug)]
pub struct Synthesizer {
    rules: Rules,
    max_args: usize,
    cache: TemplateCache,
}

impl Synthesizer {
    pub fn new(rules: Rules) -> Self {
        Self {
            rules,
            max_args: MAX_ARGS,
            cache: TemplateCache::new(),
        }
    }

    /// Lower the slot bound. Must be in `1..=MAX_ARGS`.
    pub fn with_max_args(mut self, max_args: usize) -> SynthResult<Self> {
        if max_args == 0 || max_args > MAX_ARGS {
            return Err(StructError::from(SynthReason::InvalidBound)
                .with_detail(format!("max_args {max_args} outside 1..={MAX_ARGS}")));
        }
        self.max_args = max_args;
        Ok(self)
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn max_args(&self) -> usize {
        self.max_args
    }

    /// Leaf specs of `T` with registered overrides applied.
    pub fn leaves_of<T: Flatten + ?Sized>(&self) -> LeafSeq<'_> {
        let mut leaves = LeafSeq::new();
        T::visit_leaf_types(&mut |leaf| leaves = leaves.push(self.rules.resolve(&leaf)));
        leaves
    }

    /// Assemble an explicit leaf sequence under this synthesizer's bound.
    pub fn synthesize(&self, leaves: &LeafSeq<'_>, separator: char) -> SynthResult<Template> {
        assemble_bounded(leaves, separator, self.max_args).map_err(Fault::into_error)
    }

    /// Template for the signature `T`, computed on first use and cached.
    pub fn template_for<T: Flatten + ?Sized>(&self, separator: char) -> SynthResult<Arc<Template>> {
        let signature = std::any::type_name::<T>();
        self.cache.get_or_try_insert(signature, separator, || {
            tracing::debug!(signature, ?separator, "synthesizing template");
            self.synthesize(&self.leaves_of::<T>(), separator)
        })
    }

    pub fn cache(&self) -> &TemplateCache {
        &self.cache
    }
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(Rules::default())
    }
}

/// Same as [`Synth::TEMPLATE`], evaluated at run time. Static rules only.
pub fn static_template<T: Flatten + ?Sized>(separator: char) -> SynthResult<Template> {
    assemble(&T::LEAVES, separator).map_err(Fault::into_error)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fmt;

    use super::*;
    use crate::rule::{LeafFormat, RuleRegistry, Spec};
    use crate::uniform::generate;
    use crate::{Flatten, Leaf};

    #[derive(Leaf)]
    #[autofmt(format = "struct:{}")]
    struct Tagged(u32);

    impl fmt::Display for Tagged {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "#{}", self.0)
        }
    }

    #[derive(Flatten)]
    struct Reading {
        value: f32,
        count: i32,
    }

    #[derive(Flatten)]
    struct Sample {
        tag: Tagged,
        reading: Reading,
        #[autofmt(skip)]
        #[allow(dead_code)]
        scratch: Vec<u8>,
        ratio: f64,
    }

    #[test]
    fn derived_struct_flattens_in_field_order() {
        assert_eq!(
            <Synth<Reading>>::TEMPLATE.as_str(),
            "{:.2} {}"
        );
        assert_eq!(
            <Synth<Sample>>::TEMPLATE.as_str(),
            "struct:{} {:.2} {} {:.2}"
        );
    }

    #[test]
    fn custom_rule_applies_to_every_occurrence() {
        type Args = (Tagged, u8, [Tagged; 2]);
        assert_eq!(
            <Synth<Args>>::TEMPLATE.as_str(),
            "struct:{} {} struct:{} struct:{}"
        );
        assert_eq!(<Tagged as LeafFormat>::SPEC, Spec::Fragment("struct:{}"));
    }

    #[test]
    fn synthesis_is_idempotent() {
        let a = <Synth<(f32, i32), '|'>>::TEMPLATE;
        let b = static_template::<(f32, i32)>('|').unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str().as_bytes(), b.as_str().as_bytes());
    }

    #[test]
    fn runtime_rules_override_static_rules() {
        let mut registry = RuleRegistry::new();
        registry.register("i32", "n={}").unwrap();
        registry.register_positional("u8").unwrap();
        let synth = Synthesizer::new(registry.freeze());

        let template = synth.template_for::<(f32, i32, u8)>(' ').unwrap();
        assert_eq!(template.as_str(), "{:.2} n={} {2}");
        assert_eq!(template.slot_count(), 3);
    }

    #[test]
    fn cache_returns_shared_template() {
        let synth = Synthesizer::default();
        let first = synth.template_for::<(u8, f64)>(' ').unwrap();
        let second = synth.template_for::<(u8, f64)>(' ').unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(synth.cache().len(), 1);

        let other_sep = synth.template_for::<(u8, f64)>(',').unwrap();
        assert_eq!(other_sep.as_str(), "{},{:.2}");
        assert_eq!(synth.cache().len(), 2);
    }

    #[test]
    fn entries_are_keyed_by_name_and_separator() {
        let cache = TemplateCache::new();
        let first = cache
            .get_or_try_insert("app::Pair", ' ', || Ok(generate(2, ' ').unwrap()))
            .unwrap();
        let shared = cache
            .get_or_try_insert("app::Pair", ' ', || Ok(generate(3, ' ').unwrap()))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &shared));
        assert_eq!(shared.slot_count(), 2);

        assert!(cache.get("app::Pair", ',').is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn runtime_bound_is_enforced() {
        let synth = Synthesizer::default().with_max_args(3).unwrap();
        let err = synth.template_for::<[u8; 4]>(' ').unwrap_err();
        assert_eq!(err.reason(), &SynthReason::TooManySlots);
        assert!(synth.cache().is_empty());
        assert!(synth.template_for::<[u8; 3]>(' ').is_ok());
    }

    #[test]
    fn max_args_plus_one_fails_for_every_signature() {
        let synth = Synthesizer::default();
        assert!(synth.template_for::<[u8; MAX_ARGS + 1]>(' ').is_err());
        assert!(synth.template_for::<([u8; 10], [f32; 11])>(' ').is_err());
        assert!(synth.template_for::<([u8; 10], ([f32; 5], [char; 6]))>(',').is_err());
    }

    #[test]
    fn invalid_bound_is_rejected() {
        assert!(Synthesizer::default().with_max_args(0).is_err());
        assert!(Synthesizer::default().with_max_args(MAX_ARGS + 1).is_err());
    }
}
