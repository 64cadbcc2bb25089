//! Implementation of the `#[derive(Flatten)]` macro.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Index, parse_macro_input, parse_quote};

use crate::attrs::{FieldAttrs, TypeAttrs};

pub fn derive_flatten_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_flatten_inner(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_flatten_inner(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let attrs = TypeAttrs::from_attrs(&input.attrs)?;
    let core = attrs.core_path();

    let fields = match &input.data {
        Data::Struct(data) => &data.fields,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Flatten can only be derived for structs; enum variants have no fixed arity",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "Flatten cannot be derived for unions",
            ));
        }
    };

    // (field type, accessor) for every field that takes part, in order
    let mut members = Vec::new();
    match fields {
        Fields::Named(named) => {
            for field in &named.named {
                if FieldAttrs::from_attrs(&field.attrs)?.skip {
                    continue;
                }
                let ident = &field.ident;
                members.push((field.ty.clone(), quote! { #ident }));
            }
        }
        Fields::Unnamed(unnamed) => {
            for (i, field) in unnamed.unnamed.iter().enumerate() {
                if FieldAttrs::from_attrs(&field.attrs)?.skip {
                    continue;
                }
                let index = Index::from(i);
                members.push((field.ty.clone(), quote! { #index }));
            }
        }
        Fields::Unit => {}
    }

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(#core::Flatten));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let types: Vec<_> = members.iter().map(|(ty, _)| ty).collect();
    let accessors: Vec<_> = members.iter().map(|(_, access)| access).collect();

    Ok(quote! {
        impl #impl_generics #core::Flatten for #name #ty_generics #where_clause {
            const LEAVES: #core::LeafSeq<'static> = #core::LeafSeq::new()
                #(.concat(<#types as #core::Flatten>::LEAVES))*;

            #[allow(unused_variables)]
            fn visit_leaf_types(visit: &mut dyn FnMut(#core::LeafType)) {
                #(<#types as #core::Flatten>::visit_leaf_types(visit);)*
            }

            #[allow(unused_variables)]
            fn visit_leaves<'__v>(&'__v self, visit: &mut dyn FnMut(#core::LeafRef<'__v>)) {
                #(#core::Flatten::visit_leaves(&self.#accessors, visit);)*
            }
        }
    })
}
