//! Implementation of the `#[derive(Leaf)]` macro.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input, parse_quote};

use crate::attrs::TypeAttrs;

pub fn derive_leaf_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_leaf_inner(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_leaf_inner(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let attrs = TypeAttrs::from_attrs(&input.attrs)?;
    let core = attrs.core_path();

    let spec = match (&attrs.format, attrs.positional) {
        (Some(format), _) => quote! { #core::Spec::Fragment(#format) },
        (None, true) => quote! { #core::Spec::Positional },
        (None, false) => quote! { #core::Spec::Generic },
    };

    let mut generics = input.generics.clone();
    generics
        .make_where_clause()
        .predicates
        .push(parse_quote!(Self: ::core::fmt::Display));
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics #core::LeafFormat for #name #ty_generics #where_clause {
            const SPEC: #core::Spec<'static> = #spec;
        }

        impl #impl_generics #core::Flatten for #name #ty_generics #where_clause {
            const LEAVES: #core::LeafSeq<'static> =
                #core::LeafSeq::leaf(<Self as #core::LeafFormat>::SPEC);

            fn visit_leaf_types(visit: &mut dyn FnMut(#core::LeafType)) {
                visit(#core::LeafType::of::<Self>());
            }

            fn visit_leaves<'__v>(&'__v self, visit: &mut dyn FnMut(#core::LeafRef<'__v>)) {
                visit(#core::LeafRef::display(self));
            }
        }
    })
}
