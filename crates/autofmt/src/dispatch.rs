use autofmt_core::{Fault, Flatten, LeafRef, Synth, Synthesizer, Template, generate};
use orion_error::StructError;
use orion_error::prelude::*;

use crate::error::{RenderReason, RenderResult};
use crate::render;

// ---------------------------------------------------------------------------
// Ready templates
// ---------------------------------------------------------------------------

/// Render a synthesized template. The template's slot count must match the
/// number of values.
pub fn render_ready(template: &Template, values: &[LeafRef<'_>]) -> RenderResult<String> {
    if template.slot_count() != values.len() {
        return Err(StructError::from(RenderReason::ArgCount).with_detail(format!(
            "template {template:?} expects {} values, got {}",
            template.slot_count(),
            values.len()
        )));
    }
    render::render(template.as_str(), values)
}

// ---------------------------------------------------------------------------
// Synthesize-and-render
// ---------------------------------------------------------------------------

/// Render `value` with the compile-time template of its type.
pub fn render_typed<T: Flatten + ?Sized, const SEP: char>(value: &T) -> RenderResult<String> {
    let template = <Synth<T, SEP>>::TEMPLATE;
    render_ready(&template, &leaves_of(value))
}

/// Render `values` with one plain placeholder each.
pub fn render_uniform<const SEP: char>(values: &[LeafRef<'_>]) -> RenderResult<String> {
    let template = generate(values.len(), SEP)
        .map_err(Fault::into_error)
        .err_conv()?;
    render_ready(&template, values)
}

/// Render `value` with the runtime rules of `synth`.
pub fn render_with<T: Flatten + ?Sized>(
    synth: &Synthesizer,
    value: &T,
    separator: char,
) -> RenderResult<String> {
    let template = synth.template_for::<T>(separator).err_conv()?;
    render_ready(&template, &leaves_of(value))
}

fn leaves_of<T: Flatten + ?Sized>(value: &T) -> Vec<LeafRef<'_>> {
    let mut leaves = Vec::new();
    value.visit_leaves(&mut |leaf| leaves.push(leaf));
    leaves
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
