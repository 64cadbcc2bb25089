use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::rc::Rc;
use std::sync::Arc;

use crate::MAX_ARGS;
use crate::rule::{LeafFormat, Spec};

// ---------------------------------------------------------------------------
// LeafSeq - fixed-capacity, const-buildable list of leaf specs
// ---------------------------------------------------------------------------

/// Ordered leaf specs of one argument list, capped at [`MAX_ARGS`].
///
/// Pushing past the cap does not grow the list; it only bumps
/// [`requested`](Self::requested), so the assembler can refuse the sequence
/// instead of silently truncating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafSeq<'a> {
    specs: [Spec<'a>; MAX_ARGS],
    len: usize,
    requested: usize,
}

impl<'a> LeafSeq<'a> {
    pub const fn new() -> Self {
        Self {
            specs: [Spec::Generic; MAX_ARGS],
            len: 0,
            requested: 0,
        }
    }

    /// Single-leaf sequence.
    pub const fn leaf(spec: Spec<'a>) -> Self {
        Self::new().push(spec)
    }

    pub const fn push(mut self, spec: Spec<'a>) -> Self {
        if self.len < MAX_ARGS {
            self.specs[self.len] = spec;
            self.len += 1;
        }
        self.requested += 1;
        self
    }

    /// Append `other` after `self`, preserving order.
    pub const fn concat(mut self, other: LeafSeq<'a>) -> Self {
        let mut i = 0;
        while i < other.len {
            self = self.push(other.specs[i]);
            i += 1;
        }
        self.requested += other.requested - other.len;
        self
    }

    /// Append `times` copies of `other`.
    pub const fn repeat(mut self, other: LeafSeq<'a>, times: usize) -> Self {
        let mut n = 0;
        while n < times {
            self = self.concat(other);
            n += 1;
        }
        self
    }

    /// Number of leaves stored.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.requested == 0
    }

    /// Number of leaves pushed, including any beyond the cap.
    pub const fn requested(&self) -> usize {
        self.requested
    }

    pub const fn is_truncated(&self) -> bool {
        self.requested > self.len
    }

    pub const fn get(&self, index: usize) -> Option<Spec<'a>> {
        if index < self.len {
            Some(self.specs[index])
        } else {
            None
        }
    }

    pub const fn as_slice(&self) -> &[Spec<'a>] {
        self.specs.split_at(self.len).0
    }
}

impl Default for LeafSeq<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FromIterator<Spec<'a>> for LeafSeq<'a> {
    fn from_iter<I: IntoIterator<Item = Spec<'a>>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), LeafSeq::push)
    }
}

// ---------------------------------------------------------------------------
// LeafType / LeafRef - runtime views of one leaf
// ---------------------------------------------------------------------------

/// Runtime descriptor of a leaf type: its name and static rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafType {
    name: &'static str,
    spec: Spec<'static>,
}

impl LeafType {
    pub fn of<T: LeafFormat + ?Sized>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            spec: T::SPEC,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn spec(&self) -> Spec<'static> {
        self.spec
    }
}

/// Borrowed leaf value handed to the renderer.
#[derive(Clone, Copy)]
pub enum LeafRef<'v> {
    Display(&'v dyn fmt::Display),
    Str(&'v str),
}

impl<'v> LeafRef<'v> {
    pub fn display<T: fmt::Display>(value: &'v T) -> Self {
        LeafRef::Display(value)
    }
}

impl<'v> From<&'v str> for LeafRef<'v> {
    fn from(value: &'v str) -> Self {
        LeafRef::Str(value)
    }
}

impl fmt::Display for LeafRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafRef::Display(value) => fmt::Display::fmt(*value, f),
            LeafRef::Str(value) => fmt::Display::fmt(*value, f),
        }
    }
}

impl fmt::Debug for LeafRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LeafRef").field(&self.to_string()).finish()
    }
}

// ---------------------------------------------------------------------------
// Flatten - structural decomposition into leaves
// ---------------------------------------------------------------------------

/// Decomposition of a value into an ordered sequence of leaves.
///
/// Leaf types yield themselves. Tuples, arrays and structs deriving
/// `Flatten` yield their fields' leaves in declaration order; references and
/// smart pointers decay to the pointee. The three methods must agree on the
/// number and order of leaves.
///
/// A type whose decomposition refers back to itself has no finite
/// [`LEAVES`](Self::LEAVES) and fails to compile.
pub trait Flatten {
    /// Static rules of every leaf, in order.
    const LEAVES: LeafSeq<'static>;

    /// Visit the runtime descriptor of every leaf type, in order.
    fn visit_leaf_types(visit: &mut dyn FnMut(LeafType));

    /// Visit every leaf value, in order.
    fn visit_leaves<'v>(&'v self, visit: &mut dyn FnMut(LeafRef<'v>));
}

/// Implement [`Flatten`] for leaf types that implement [`LeafFormat`] and
/// [`Display`](std::fmt::Display).
#[macro_export]
macro_rules! impl_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::Flatten for $ty {
                const LEAVES: $crate::LeafSeq<'static> =
                    $crate::LeafSeq::leaf(<$ty as $crate::LeafFormat>::SPEC);

                fn visit_leaf_types(visit: &mut dyn FnMut($crate::LeafType)) {
                    visit($crate::LeafType::of::<$ty>());
                }

                fn visit_leaves<'v>(&'v self, visit: &mut dyn FnMut($crate::LeafRef<'v>)) {
                    visit($crate::LeafRef::display(self));
                }
            }
        )*
    };
}

impl_leaf!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
    String, IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr,
);

impl Flatten for str {
    const LEAVES: LeafSeq<'static> = LeafSeq::leaf(<str as LeafFormat>::SPEC);

    fn visit_leaf_types(visit: &mut dyn FnMut(LeafType)) {
        visit(LeafType::of::<str>());
    }

    fn visit_leaves<'v>(&'v self, visit: &mut dyn FnMut(LeafRef<'v>)) {
        visit(LeafRef::Str(self));
    }
}

macro_rules! impl_pointer {
    ($($ptr:ident),*) => {
        $(
            impl<T: Flatten + ?Sized> Flatten for $ptr<T> {
                const LEAVES: LeafSeq<'static> = T::LEAVES;

                fn visit_leaf_types(visit: &mut dyn FnMut(LeafType)) {
                    T::visit_leaf_types(visit);
                }

                fn visit_leaves<'v>(&'v self, visit: &mut dyn FnMut(LeafRef<'v>)) {
                    (**self).visit_leaves(visit);
                }
            }
        )*
    };
}

impl_pointer!(Box, Rc, Arc);

impl<T: Flatten + ?Sized> Flatten for &T {
    const LEAVES: LeafSeq<'static> = T::LEAVES;

    fn visit_leaf_types(visit: &mut dyn FnMut(LeafType)) {
        T::visit_leaf_types(visit);
    }

    fn visit_leaves<'v>(&'v self, visit: &mut dyn FnMut(LeafRef<'v>)) {
        (**self).visit_leaves(visit);
    }
}

impl<T: Flatten + ?Sized> Flatten for &mut T {
    const LEAVES: LeafSeq<'static> = T::LEAVES;

    fn visit_leaf_types(visit: &mut dyn FnMut(LeafType)) {
        T::visit_leaf_types(visit);
    }

    fn visit_leaves<'v>(&'v self, visit: &mut dyn FnMut(LeafRef<'v>)) {
        (**self).visit_leaves(visit);
    }
}

impl<T: Flatten, const N: usize> Flatten for [T; N] {
    const LEAVES: LeafSeq<'static> = LeafSeq::new().repeat(T::LEAVES, N);

    fn visit_leaf_types(visit: &mut dyn FnMut(LeafType)) {
        for _ in 0..N {
            T::visit_leaf_types(visit);
        }
    }

    fn visit_leaves<'v>(&'v self, visit: &mut dyn FnMut(LeafRef<'v>)) {
        for item in self {
            item.visit_leaves(visit);
        }
    }
}

macro_rules! impl_tuple {
    ($($name:ident)*) => {
        impl<$($name: Flatten),*> Flatten for ($($name,)*) {
            const LEAVES: LeafSeq<'static> = LeafSeq::new()$(.concat(<$name as Flatten>::LEAVES))*;

            #[allow(unused_variables)]
            fn visit_leaf_types(visit: &mut dyn FnMut(LeafType)) {
                $(<$name as Flatten>::visit_leaf_types(visit);)*
            }

            #[allow(non_snake_case, unused_variables)]
            fn visit_leaves<'v>(&'v self, visit: &mut dyn FnMut(LeafRef<'v>)) {
                let ($($name,)*) = self;
                $($name.visit_leaves(visit);)*
            }
        }
    };
}

impl_tuple!();
impl_tuple!(A);
impl_tuple!(A B);
impl_tuple!(A B C);
impl_tuple!(A B C D);
impl_tuple!(A B C D E);
impl_tuple!(A B C D E F);
impl_tuple!(A B C D E F G);
impl_tuple!(A B C D E F G H);
impl_tuple!(A B C D E F G H I);
impl_tuple!(A B C D E F G H I J);
impl_tuple!(A B C D E F G H I J K);
impl_tuple!(A B C D E F G H I J K L);
impl_tuple!(A B C D E F G H I J K L M);
impl_tuple!(A B C D E F G H I J K L M N);
impl_tuple!(A B C D E F G H I J K L M N O);
impl_tuple!(A B C D E F G H I J K L M N O P);
impl_tuple!(A B C D E F G H I J K L M N O P Q);
impl_tuple!(A B C D E F G H I J K L M N O P Q R);
impl_tuple!(A B C D E F G H I J K L M N O P Q R S);
impl_tuple!(A B C D E F G H I J K L M N O P Q R S T);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::FIXED_2DP;

    fn leaf_names<T: Flatten + ?Sized>() -> Vec<&'static str> {
        let mut names = Vec::new();
        T::visit_leaf_types(&mut |leaf| names.push(leaf.name()));
        names
    }

    fn leaf_values<T: Flatten + ?Sized>(value: &T) -> Vec<String> {
        let mut values = Vec::new();
        value.visit_leaves(&mut |leaf| values.push(leaf.to_string()));
        values
    }

    #[test]
    fn scalar_is_single_leaf() {
        assert_eq!(i64::LEAVES.as_slice(), &[Spec::Generic]);
        assert_eq!(leaf_names::<i64>(), vec!["i64"]);
    }

    #[test]
    fn pair_flattens_in_field_order() {
        let leaves = <(f32, i32)>::LEAVES;
        assert_eq!(
            leaves.as_slice(),
            &[Spec::Fragment(FIXED_2DP), Spec::Generic]
        );
        assert_eq!(leaf_names::<(f32, i32)>(), vec!["f32", "i32"]);
        assert_eq!(leaf_values(&(1.5f32, 7)), vec!["1.5", "7"]);
    }

    #[test]
    fn nested_tuples_concatenate() {
        type Nested = (u8, (f64, (bool, char)), [u16; 2]);
        assert_eq!(Nested::LEAVES.len(), 6);
        assert_eq!(
            leaf_names::<Nested>(),
            vec!["u8", "f64", "bool", "char", "u16", "u16"]
        );
        let value: Nested = (1, (2.0, (true, 'x')), [3, 4]);
        assert_eq!(leaf_values(&value), vec!["1", "2", "true", "x", "3", "4"]);
    }

    #[test]
    fn empty_composites_contribute_nothing() {
        assert!(<()>::LEAVES.is_empty());
        assert!(<[f32; 0]>::LEAVES.is_empty());
        assert_eq!(<(u8, (), u8)>::LEAVES.len(), 2);
        assert!(leaf_values(&()).is_empty());
    }

    #[test]
    fn references_and_pointers_decay() {
        assert_eq!(<&f32>::LEAVES, f32::LEAVES);
        assert_eq!(<Box<(f64, u8)>>::LEAVES, <(f64, u8)>::LEAVES);
        assert_eq!(leaf_names::<&str>(), vec!["str"]);

        let name = String::from("core");
        let shared = Arc::new(3u8);
        let args = (&name, "lit", &shared);
        assert_eq!(leaf_values(&args), vec!["core", "lit", "3"]);
    }

    #[test]
    fn overflow_is_counted_not_stored() {
        let leaves = <[u8; 25]>::LEAVES;
        assert_eq!(leaves.len(), MAX_ARGS);
        assert_eq!(leaves.requested(), 25);
        assert!(leaves.is_truncated());

        let nested = <([u8; 15], [u8; 15])>::LEAVES;
        assert_eq!(nested.requested(), 30);
    }

    #[test]
    fn collect_from_specs() {
        let seq: LeafSeq<'_> = [Spec::Generic, Spec::Positional].into_iter().collect();
        assert_eq!(seq.get(1), Some(Spec::Positional));
        assert_eq!(seq.get(2), None);
    }
}
