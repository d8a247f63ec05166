//! Provides derive macros for `sky::HasDependencies`.
use std::collections::HashSet;

use quote::quote;
use syn::{Data, DataStruct, DeriveInput, Fields, FieldsNamed};

struct Fold {
    function_body: proc_macro2::TokenStream,
    where_constraints: Vec<proc_macro2::TokenStream>,
}

fn get_fold(input: &DeriveInput) -> syn::Result<Fold> {
    let name = &input.ident;
    let fields = match &input.data {
        Data::Struct(DataStruct {
            fields: Fields::Named(FieldsNamed { named, .. }),
            ..
        }) => named,
        _ => {
            return Err(syn::Error::new(
                name.span(),
                "deriving HasDependencies only supports structs with named fields".to_string(),
            ));
        }
    };

    let where_constraints: Vec<_> = fields
        .iter()
        .map(|field| &field.ty)
        .collect::<HashSet<_>>()
        .into_iter()
        .map(|ty| {
            quote! {
                #ty: sky::HasDependencies
            }
        })
        .collect();
    let merges: Vec<_> = fields
        .iter()
        .map(|field| {
            // UNWRAP: safe because we only support structs (which all have named fields)
            let ident = field.ident.clone().unwrap();
            quote! {
                .merge(self.#ident.dependencies())
            }
        })
        .collect();
    let function_body = quote! {
        sky::Dependencies::default()
            #(#merges)*
    };
    Ok(Fold {
        function_body,
        where_constraints,
    })
}

#[proc_macro_derive(HasDependencies)]
pub fn derive_has_dependencies(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input: DeriveInput = syn::parse_macro_input!(input);
    let name = &input.ident;

    let Fold {
        function_body,
        where_constraints,
    } = match get_fold(&input) {
        Ok(f) => f,
        Err(e) => return e.into_compile_error().into(),
    };

    let output = quote! {
        impl sky::HasDependencies for #name
        where
            #(#where_constraints),*
        {
            fn dependencies(&self) -> sky::Dependencies {
                #function_body
            }
        }
    };
    output.into()
}
