use darling::FromDeriveInput;
use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::{quote, ToTokens};
use syn::{
    parse_macro_input, Data, DeriveInput, GenericArgument, Ident, Path, PathArguments,
    PathSegment, Type,
};

#[derive(FromDeriveInput)]
#[darling(attributes(request))]
struct DeriveRequestOpts {
    /// Fields which are not an executor themselves but contain structs which hold one.
    executor: Option<darling::util::PathList>,
}

/// Implements `crate::Request` for a struct. Every `Arc<Executor>` field gets the executor the
/// struct was requested with, fields listed in `#[request(executor(...))]` are walked recursively
/// (through `Option`, `Vec` and `HashMap` values).
#[proc_macro_derive(Request, attributes(request))]
pub fn derive_request(input: TokenStream) -> TokenStream {
    let derive_input = parse_macro_input!(input as DeriveInput);
    let request_opts = match DeriveRequestOpts::from_derive_input(&derive_input) {
        Ok(opts) => opts,
        Err(err) => return err.write_errors().into(),
    };
    let DeriveInput {
        ident,
        generics,
        data,
        ..
    } = &derive_input;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let executor_fields = request_opts.executor.unwrap_or_default();
    let mut impl_executor = vec![];

    if let Data::Struct(data_struct) = data {
        for field in data_struct.fields.iter() {
            let Some(field_ident) = &field.ident else {
                continue;
            };
            let Type::Path(ty) = &field.ty else {
                continue;
            };

            if executor_fields.iter().any(|path| path.is_ident(field_ident)) {
                impl_executor.push(set_executor_recursive(
                    quote! { self.#field_ident },
                    &field_ident.to_string(),
                    &ty.path,
                ));
                continue;
            }

            if let Some(segment) = ty.path.segments.last() {
                if segment.ident == "Arc"
                    && segment_types(segment)
                        .first()
                        .is_some_and(|p| p.is_ident("Executor"))
                {
                    impl_executor.push(quote! {
                        self.#field_ident = executor.clone();
                    })
                }
            }
        }
    }

    let expanded = quote! {
        impl #impl_generics crate::Request for #ident #ty_generics #where_clause {
            fn __set_executor(&mut self, executor: std::sync::Arc<crate::Executor>) {
                #(#impl_executor)*
            }
        }
    };
    expanded.into()
}

fn set_executor_recursive(set_path: TokenStream2, name: &str, path: &Path) -> TokenStream2 {
    let Some(segment) = path.segments.last() else {
        return quote! {};
    };
    let inner = segment_types(segment);

    let nested = |prefix: &str, ty: Option<&Path>| -> (Ident, TokenStream2) {
        let binding = Ident::new(&format!("{prefix}{name}"), Span::call_site());
        let check = ty.map_or_else(
            || quote! {},
            |ty| set_executor_recursive(binding.to_token_stream(), &binding.to_string(), ty),
        );
        (binding, check)
    };

    if segment.ident == "Option" {
        let (binding, check) = nested("option_", inner.first());
        quote! {
            if let Some(#binding) = &mut #set_path {
                #check
            }
        }
    } else if segment.ident == "Vec" {
        let (binding, check) = nested("vec_", inner.first());
        quote! {
            for #binding in #set_path.iter_mut() {
                #check
            }
        }
    } else if segment.ident == "HashMap" {
        let (binding, check) = nested("hash_map_", inner.get(1));
        quote! {
            for #binding in #set_path.values_mut() {
                #check
            }
        }
    } else {
        quote! {
            #set_path.__set_executor(executor.clone());
        }
    }
}

fn segment_types(segment: &PathSegment) -> Vec<Path> {
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return vec![];
    };
    args.args
        .iter()
        .filter_map(|arg| match arg {
            GenericArgument::Type(Type::Path(ty)) => Some(ty.path.clone()),
            _ => None,
        })
        .collect()
}
