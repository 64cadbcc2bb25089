//! `#[autofmt(...)]` attribute parsing.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, LitStr, Path};

/// Parsed `#[autofmt(...)]` attributes on a type.
#[derive(Debug, Default)]
pub struct TypeAttrs {
    /// Fragment override (`format = "..."`)
    pub format: Option<LitStr>,
    /// Numbered placeholder requested
    pub positional: bool,
    /// Path to `autofmt_core`
    pub krate: Option<Path>,
}

/// Parsed `#[autofmt(...)]` attributes on a field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    pub skip: bool,
}

impl TypeAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("autofmt") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("format") {
                    result.format = Some(meta.value()?.parse()?);
                    Ok(())
                } else if meta.path.is_ident("positional") {
                    result.positional = true;
                    Ok(())
                } else if meta.path.is_ident("crate") {
                    let lit: LitStr = meta.value()?.parse()?;
                    result.krate = Some(lit.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown autofmt attribute"))
                }
            })?;
        }

        if let (Some(format), true) = (&result.format, result.positional) {
            return Err(syn::Error::new(
                format.span(),
                "`format` and `positional` are mutually exclusive",
            ));
        }

        Ok(result)
    }

    pub fn core_path(&self) -> TokenStream2 {
        match &self.krate {
            Some(path) => quote! { #path },
            None => quote! { ::autofmt_core },
        }
    }
}

impl FieldAttrs {
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut result = Self::default();

        for attr in attrs {
            if !attr.path().is_ident("autofmt") {
                continue;
            }
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    result.skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unknown autofmt field attribute"))
                }
            })?;
        }

        Ok(result)
    }
}
