//! Slot grammar shared by fragment validation and the renderer.
//!
//! A slot is `{` [index] [`:` [[fill]align] [`0`] [width] [`.` precision]] `}`
//! with align one of `<`, `^`, `>`. `{{` and `}}` are literal braces. Anything
//! else inside braces (type suffixes such as `x` or `f`, named arguments) is
//! malformed.

use std::fmt;

/// Why a fragment cannot stand in for one leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentError {
    /// Unbalanced brace or a slot outside the grammar, at this byte offset.
    Malformed { offset: usize },
    /// A slot with an explicit index would address another leaf's value.
    Indexed { offset: usize },
    /// The fragment holds this many slots instead of one.
    SlotCount(usize),
}

impl fmt::Display for FragmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentError::Malformed { offset } => {
                write!(f, "unbalanced or malformed slot at byte {offset}")
            }
            FragmentError::Indexed { offset } => {
                write!(f, "explicit slot index at byte {offset}")
            }
            FragmentError::SlotCount(n) => write!(f, "has {n} slots, expected exactly 1"),
        }
    }
}

/// Parsed shape of one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SlotShape {
    indexed: bool,
    /// Offset just past the closing `}`.
    end: usize,
}

const fn is_align(b: u8) -> bool {
    matches!(b, b'<' | b'^' | b'>')
}

const fn utf8_len(lead: u8) -> usize {
    if lead < 0x80 {
        1
    } else if lead >= 0xF0 {
        4
    } else if lead >= 0xE0 {
        3
    } else {
        2
    }
}

const fn skip_digits(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i
}

/// Parse the slot opening at `open`, or `None` when it is malformed.
const fn parse_slot(bytes: &[u8], open: usize) -> Option<SlotShape> {
    let mut i = open + 1;

    let after_index = skip_digits(bytes, i);
    let indexed = after_index > i;
    i = after_index;

    if i < bytes.len() && bytes[i] == b':' {
        i += 1;
        // [[fill]align]
        if i < bytes.len() {
            let fill_len = utf8_len(bytes[i]);
            let fill_is_brace = bytes[i] == b'{' || bytes[i] == b'}';
            if !fill_is_brace && i + fill_len < bytes.len() && is_align(bytes[i + fill_len]) {
                i += fill_len + 1;
            } else if is_align(bytes[i]) {
                i += 1;
            }
        }
        // ['0']
        if i < bytes.len() && bytes[i] == b'0' {
            i += 1;
        }
        // [width]
        i = skip_digits(bytes, i);
        // ['.' precision]
        if i < bytes.len() && bytes[i] == b'.' {
            let digits = skip_digits(bytes, i + 1);
            if digits == i + 1 {
                return None;
            }
            i = digits;
        }
    }

    if i < bytes.len() && bytes[i] == b'}' {
        Some(SlotShape {
            indexed,
            end: i + 1,
        })
    } else {
        None
    }
}

/// Walk `text`, returning the slot count and the offset of the first indexed
/// slot, or the offset of the first malformed brace.
const fn scan(text: &str) -> Result<(usize, Option<usize>), usize> {
    let bytes = text.as_bytes();
    let mut slots = 0;
    let mut first_indexed = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' if i + 1 < bytes.len() && bytes[i + 1] == b'{' => i += 2,
            b'}' if i + 1 < bytes.len() && bytes[i + 1] == b'}' => i += 2,
            b'{' => match parse_slot(bytes, i) {
                Some(shape) => {
                    if shape.indexed && first_indexed.is_none() {
                        first_indexed = Some(i);
                    }
                    slots += 1;
                    i = shape.end;
                }
                None => return Err(i),
            },
            b'}' => return Err(i),
            _ => i += 1,
        }
    }
    Ok((slots, first_indexed))
}

/// Number of slots in `text`, or `None` when a brace is unbalanced or a slot
/// falls outside the grammar. `{{` and `}}` do not count.
pub const fn count_slots(text: &str) -> Option<usize> {
    match scan(text) {
        Ok((slots, _)) => Some(slots),
        Err(_) => None,
    }
}

/// Check that `fragment` holds exactly one well-formed, implicit slot.
pub const fn check_fragment(fragment: &str) -> Result<(), FragmentError> {
    match scan(fragment) {
        Err(offset) => Err(FragmentError::Malformed { offset }),
        Ok((_, Some(offset))) => Err(FragmentError::Indexed { offset }),
        Ok((1, None)) => Ok(()),
        Ok((n, None)) => Err(FragmentError::SlotCount(n)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
