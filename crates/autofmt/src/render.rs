//! Positional rendering of synthesized templates.
//!
//! Slot grammar: `{` [index] [`:` [[fill]align] [`0`] [width] [`.` precision]] `}`
//! with align one of `<`, `^`, `>`. `{{` and `}}` render literal braces. This
//! is the grammar [`autofmt_core::count_slots`] accepts.
//!
//! An implicit slot takes the value at its ordinal among all slots, an
//! explicit index addresses the value directly, so `"{:.2} n={} {2}"` renders
//! three values in order. Precision is forwarded to the value's `Display`
//! impl; fill, alignment and width are applied to the rendered text, left
//! aligned by default. The `0` flag pads with zeros after any sign and
//! overrides fill and alignment.

use std::iter::repeat_n;

use autofmt_core::LeafRef;
use orion_error::StructError;
use winnow::combinator::{alt, cut_err, opt, preceded, repeat};
use winnow::error::{ContextError, ErrMode, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{literal, take_while};

use crate::error::{RenderReason, RenderResult};

// ---------------------------------------------------------------------------
// Template model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    fn from_char(c: char) -> Option<Self> {
        match c {
            '<' => Some(Align::Left),
            '^' => Some(Align::Center),
            '>' => Some(Align::Right),
            _ => None,
        }
    }
}

/// One `{...}` slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotSpec {
    /// Explicit value index, `None` for an implicit slot.
    pub index: Option<usize>,
    pub fill: char,
    pub align: Option<Align>,
    /// `0` flag: sign-aware zero padding up to `width`.
    pub zero: bool,
    pub width: Option<usize>,
    pub precision: Option<usize>,
}

impl Default for SlotSpec {
    fn default() -> Self {
        Self {
            index: None,
            fill: ' ',
            align: None,
            zero: false,
            width: None,
            precision: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'t> {
    Literal(&'t str),
    Slot(SlotSpec),
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Split a template into literal and slot segments.
pub fn parse(template: &str) -> RenderResult<Vec<Segment<'_>>> {
    segments.parse(template).map_err(|e| {
        StructError::from(RenderReason::Syntax).with_detail(format!("{template:?}: {e}"))
    })
}

fn segments<'t>(input: &mut &'t str) -> ModalResult<Vec<Segment<'t>>> {
    repeat(0.., segment).parse_next(input)
}

fn segment<'t>(input: &mut &'t str) -> ModalResult<Segment<'t>> {
    alt((
        literal("{{").value(Segment::Literal("{")),
        literal("}}").value(Segment::Literal("}")),
        slot.map(Segment::Slot),
        take_while(1.., |c: char| c != '{' && c != '}').map(Segment::Literal),
    ))
    .parse_next(input)
}

fn slot(input: &mut &str) -> ModalResult<SlotSpec> {
    literal("{").parse_next(input)?;
    let index = opt(number).parse_next(input)?;
    let mut spec = match opt(literal(":")).parse_next(input)? {
        Some(_) => cut_err(format_spec).parse_next(input)?,
        None => SlotSpec::default(),
    };
    spec.index = index;
    cut_err(literal("}"))
        .context(StrContext::Expected(StrContextValue::CharLiteral('}')))
        .parse_next(input)?;
    Ok(spec)
}

fn format_spec(input: &mut &str) -> ModalResult<SlotSpec> {
    let (fill, align) = fill_align(input);
    let zero = opt(literal("0")).parse_next(input)?.is_some();
    let width = opt(number).parse_next(input)?;
    let precision = opt(preceded(
        literal("."),
        cut_err(number).context(StrContext::Expected(StrContextValue::Description(
            "precision digits",
        ))),
    ))
    .parse_next(input)?;
    Ok(SlotSpec {
        index: None,
        fill,
        align,
        zero,
        width,
        precision,
    })
}

/// `[[fill]align]`; a fill character is only recognized when an alignment
/// follows it.
fn fill_align(input: &mut &str) -> (char, Option<Align>) {
    let mut chars = input.chars();
    if let (Some(fill), Some(next)) = (chars.next(), chars.next()) {
        if fill != '{' && fill != '}' {
            if let Some(align) = Align::from_char(next) {
                *input = &input[fill.len_utf8() + next.len_utf8()..];
                return (fill, Some(align));
            }
        }
    }
    match input.chars().next().and_then(Align::from_char) {
        Some(align) => {
            *input = &input[1..];
            (' ', Some(align))
        }
        None => (' ', None),
    }
}

fn number(input: &mut &str) -> ModalResult<usize> {
    let digits = take_while(1.., |c: char| c.is_ascii_digit()).parse_next(input)?;
    digits
        .parse::<usize>()
        .map_err(|_| ErrMode::Cut(ContextError::new()))
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Parse `template` and render it with `values`.
pub fn render(template: &str, values: &[LeafRef<'_>]) -> RenderResult<String> {
    render_segments(&parse(template)?, values)
}

/// Render pre-parsed segments. The number of slots must equal the number of
/// values and every explicit index must be in range.
pub fn render_segments(segments: &[Segment<'_>], values: &[LeafRef<'_>]) -> RenderResult<String> {
    let slots = segments
        .iter()
        .filter(|segment| matches!(segment, Segment::Slot(_)))
        .count();
    if slots != values.len() {
        return Err(StructError::from(RenderReason::ArgCount).with_detail(format!(
            "template has {slots} slots, got {} values",
            values.len()
        )));
    }

    let mut out = String::new();
    let mut ordinal = 0;
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Slot(spec) => {
                let index = spec.index.unwrap_or(ordinal);
                ordinal += 1;
                let value = values.get(index).ok_or_else(|| {
                    StructError::from(RenderReason::IndexOutOfRange).with_detail(format!(
                        "slot {{{index}}} with {} values",
                        values.len()
                    ))
                })?;
                write_slot(&mut out, spec, value);
            }
        }
    }
    Ok(out)
}

fn write_slot(out: &mut String, spec: &SlotSpec, value: &LeafRef<'_>) {
    let text = match spec.precision {
        Some(precision) => format!("{value:.precision$}"),
        None => value.to_string(),
    };
    let pad = spec
        .width
        .map_or(0, |width| width.saturating_sub(text.chars().count()));
    if spec.zero {
        let digits = text.trim_start_matches(['+', '-']);
        out.push_str(&text[..text.len() - digits.len()]);
        out.extend(repeat_n('0', pad));
        out.push_str(digits);
        return;
    }
    let (before, after) = match spec.align.unwrap_or(Align::Left) {
        Align::Left => (0, pad),
        Align::Right => (pad, 0),
        Align::Center => (pad / 2, pad - pad / 2),
    };
    out.extend(repeat_n(spec.fill, before));
    out.push_str(&text);
    out.extend(repeat_n(spec.fill, after));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
