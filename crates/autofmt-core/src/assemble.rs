use std::fmt;

use orion_error::StructError;

use crate::MAX_ARGS;
use crate::error::{SynthError, SynthReason};
use crate::flatten::LeafSeq;
use crate::fragment::check_fragment;
use crate::rule::{PLACEHOLDER, Spec};

/// Byte capacity of a [`Template`].
pub const TEMPLATE_CAPACITY: usize = MAX_ARGS * 16;

// ---------------------------------------------------------------------------
// Fault - const-evaluable synthesis failure
// ---------------------------------------------------------------------------

/// Structural failure detected while building a template.
///
/// On the static path a fault aborts compilation; the runtime path turns it
/// into a [`SynthError`] with [`Fault::into_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    TooManySlots { requested: usize, max: usize },
    CapacityExceeded { needed: usize },
    MalformedFragment { slot: usize },
    InvalidSeparator(char),
}

impl Fault {
    /// Abort const evaluation with a message naming the fault.
    pub const fn raise(self) -> ! {
        match self {
            Fault::TooManySlots { .. } => {
                panic!("log call site has more leaves than MAX_ARGS allows")
            }
            Fault::CapacityExceeded { .. } => {
                panic!("log template does not fit in TEMPLATE_CAPACITY bytes")
            }
            Fault::MalformedFragment { .. } => {
                panic!("leaf format fragment must contain exactly one slot")
            }
            Fault::InvalidSeparator(_) => panic!("template separator must not be a brace"),
        }
    }

    pub fn reason(&self) -> SynthReason {
        match self {
            Fault::TooManySlots { .. } => SynthReason::TooManySlots,
            Fault::CapacityExceeded { .. } => SynthReason::Capacity,
            Fault::MalformedFragment { .. } => SynthReason::MalformedFragment,
            Fault::InvalidSeparator(_) => SynthReason::InvalidSeparator,
        }
    }

    pub fn into_error(self) -> SynthError {
        StructError::from(self.reason()).with_detail(self.to_string())
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::TooManySlots { requested, max } => {
                write!(f, "{requested} leaves requested, at most {max} allowed")
            }
            Fault::CapacityExceeded { needed } => {
                write!(f, "template needs {needed} bytes, capacity is {TEMPLATE_CAPACITY}")
            }
            Fault::MalformedFragment { slot } => {
                write!(f, "fragment for leaf {slot} does not contain exactly one slot")
            }
            Fault::InvalidSeparator(sep) => write!(f, "separator {sep:?} is a template brace"),
        }
    }
}

macro_rules! const_try {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(fault) => return Err(fault),
        }
    };
}

// ---------------------------------------------------------------------------
// Template
// ---------------------------------------------------------------------------

/// Immutable template text plus the number of slots it expects.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Template {
    buf: [u8; TEMPLATE_CAPACITY],
    len: usize,
    slots: usize,
}

impl Template {
    pub const EMPTY: Template = Template {
        buf: [0; TEMPLATE_CAPACITY],
        len: 0,
        slots: 0,
    };

    pub const fn as_str(&self) -> &str {
        match std::str::from_utf8(self.buf.split_at(self.len).0) {
            Ok(text) => text,
            Err(_) => panic!("template bytes are assembled from str and char only"),
        }
    }

    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub const fn slot_count(&self) -> usize {
        self.slots
    }

    pub(crate) const fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), Fault> {
        let needed = self.len + bytes.len();
        if needed > TEMPLATE_CAPACITY {
            return Err(Fault::CapacityExceeded { needed });
        }
        let mut i = 0;
        while i < bytes.len() {
            self.buf[self.len + i] = bytes[i];
            i += 1;
        }
        self.len = needed;
        Ok(())
    }

    pub(crate) const fn push_char(&mut self, c: char) -> Result<(), Fault> {
        let mut utf8 = [0u8; 4];
        let encoded = c.encode_utf8(&mut utf8);
        self.push_bytes(encoded.as_bytes())
    }

    /// `{index}`.
    const fn push_numbered(&mut self, index: usize) -> Result<(), Fault> {
        let mut digits = [0u8; 20];
        let mut start = digits.len();
        let mut rest = index;
        loop {
            start -= 1;
            digits[start] = b'0' + (rest % 10) as u8;
            rest /= 10;
            if rest == 0 {
                break;
            }
        }
        const_try!(self.push_bytes(b"{"));
        const_try!(self.push_bytes(digits.split_at(start).1));
        self.push_bytes(b"}")
    }

    pub(crate) const fn set_slots(&mut self, slots: usize) {
        self.slots = slots;
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Template")
            .field("text", &self.as_str())
            .field("slots", &self.slots)
            .finish()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Template {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

// ---------------------------------------------------------------------------
// Separator
// ---------------------------------------------------------------------------

pub(crate) const fn check_separator(separator: char) -> Result<(), Fault> {
    if separator == '{' || separator == '}' {
        Err(Fault::InvalidSeparator(separator))
    } else {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Join leaf specs into one template, bounded by [`MAX_ARGS`].
pub const fn assemble(leaves: &LeafSeq<'_>, separator: char) -> Result<Template, Fault> {
    assemble_bounded(leaves, separator, MAX_ARGS)
}

/// Join leaf specs into one template, bounded by `max_args` (clamped to
/// [`MAX_ARGS`]).
///
/// Generic leaves emit `{}`, positional leaves emit `{i}` with their
/// zero-based position, fragments are copied verbatim. Exactly one separator
/// goes between consecutive slots.
pub const fn assemble_bounded(
    leaves: &LeafSeq<'_>,
    separator: char,
    max_args: usize,
) -> Result<Template, Fault> {
    const_try!(check_separator(separator));
    let max = if max_args < MAX_ARGS { max_args } else { MAX_ARGS };
    if leaves.requested() > max {
        return Err(Fault::TooManySlots {
            requested: leaves.requested(),
            max,
        });
    }

    let mut template = Template::EMPTY;
    let specs = leaves.as_slice();
    let mut slot = 0;
    while slot < specs.len() {
        if slot > 0 {
            const_try!(template.push_char(separator));
        }
        match specs[slot] {
            Spec::Generic => const_try!(template.push_bytes(PLACEHOLDER.as_bytes())),
            Spec::Positional => const_try!(template.push_numbered(slot)),
            Spec::Fragment(fragment) => {
                if check_fragment(fragment).is_err() {
                    return Err(Fault::MalformedFragment { slot });
                }
                const_try!(template.push_bytes(fragment.as_bytes()))
            }
        }
        slot += 1;
    }
    template.set_slots(specs.len());
    Ok(template)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
