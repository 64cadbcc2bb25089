//! Count-only templates: `count` identical `{}` slots.

use crate::MAX_ARGS;
use crate::assemble::{Fault, Template, check_separator};
use crate::rule::PLACEHOLDER;

/// `count` generic placeholders joined by exactly `count - 1` separators.
///
/// `generate(0, _)` is empty and `generate(1, _)` is exactly `{}`.
pub const fn generate(count: usize, separator: char) -> Result<Template, Fault> {
    match check_separator(separator) {
        Ok(()) => {}
        Err(fault) => return Err(fault),
    }
    if count > MAX_ARGS {
        return Err(Fault::TooManySlots {
            requested: count,
            max: MAX_ARGS,
        });
    }

    let mut template = Template::EMPTY;
    let mut slot = 0;
    while slot < count {
        if slot > 0 {
            if let Err(fault) = template.push_char(separator) {
                return Err(fault);
            }
        }
        if let Err(fault) = template.push_bytes(PLACEHOLDER.as_bytes()) {
            return Err(fault);
        }
        slot += 1;
    }
    template.set_slots(count);
    Ok(template)
}

/// Compile-time uniform template for `N` arguments.
///
/// ```
/// use autofmt_core::Uniform;
///
/// assert_eq!(<Uniform<3, ','>>::TEMPLATE.as_str(), "{},{},{}");
/// assert_eq!(<Uniform<1>>::TEMPLATE.as_str(), "{}");
/// ```
///
/// More than [`MAX_ARGS`] slots fails the build:
///
/// ```compile_fail
/// use autofmt_core::{Template, Uniform};
///
/// const TOO_WIDE: Template = <Uniform<21>>::TEMPLATE;
/// ```
pub struct Uniform<const N: usize, const SEP: char = ' '>;

impl<const N: usize, const SEP: char> Uniform<N, SEP> {
    pub const TEMPLATE: Template = match generate(N, SEP) {
        Ok(template) => template,
        Err(fault) => fault.raise(),
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_empty() {
        let template = generate(0, ' ').unwrap();
        assert_eq!(template.as_str(), "");
        assert_eq!(template.slot_count(), 0);
    }

    #[test]
    fn one_is_exactly_the_placeholder() {
        for sep in [' ', ',', '|'] {
            let template = generate(1, sep).unwrap();
            assert_eq!(template.as_str(), "{}");
            assert_eq!(template.len(), 2);
            assert!(!template.as_str().contains('\0'));
        }
    }

    #[test]
    fn separators_sit_between_slots() {
        for count in 2..=MAX_ARGS {
            let template = generate(count, ',').unwrap();
            let text = template.as_str();
            assert_eq!(text.len(), 2 * count + (count - 1));
            assert_eq!(text.matches(',').count(), count - 1);
            assert!(!text.starts_with(','));
            assert!(!text.ends_with(','));
            assert!(!text.contains('\0'));
            assert_eq!(template.slot_count(), count);
        }
    }

    #[test]
    fn default_separator_is_space() {
        assert_eq!(<Uniform<3>>::TEMPLATE.as_str(), "{} {} {}");
    }

    #[test]
    fn matches_runtime_generation() {
        assert_eq!(<Uniform<4, ';'>>::TEMPLATE, generate(4, ';').unwrap());
    }

    #[test]
    fn bound_and_separator_checked() {
        assert!(matches!(
            generate(MAX_ARGS + 1, ' '),
            Err(Fault::TooManySlots { .. })
        ));
        assert_eq!(generate(2, '{'), Err(Fault::InvalidSeparator('{')));
    }

    #[test]
    fn idempotent() {
        assert_eq!(generate(7, ' ').unwrap(), generate(7, ' ').unwrap());
    }
}
