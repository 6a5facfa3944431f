use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

/// The capabilities named in `#[system(...)]`.
#[derive(Default)]
struct Capabilities {
    bind_pool: bool,
    initialize: bool,
    execute: bool,
    reactive: bool,
}

impl Capabilities {
    fn parse(ast: &DeriveInput) -> syn::Result<Self> {
        let mut capabilities = Self::default();
        for attr in ast.attrs.iter().filter(|attr| attr.path().is_ident("system")) {
            attr.parse_nested_meta(|meta| {
                let flag = if meta.path.is_ident("bind_pool") {
                    &mut capabilities.bind_pool
                } else if meta.path.is_ident("initialize") {
                    &mut capabilities.initialize
                } else if meta.path.is_ident("execute") {
                    &mut capabilities.execute
                } else if meta.path.is_ident("reactive") {
                    &mut capabilities.reactive
                } else {
                    return Err(meta.error(
                        "expected one of `bind_pool`, `initialize`, `execute`, `reactive`",
                    ));
                };
                *flag = true;
                Ok(())
            })?;
        }
        Ok(capabilities)
    }
}

fn accessor(enabled: bool, method: &str, capability: &str) -> TokenStream2 {
    if !enabled {
        return TokenStream2::new();
    }
    let method = syn::Ident::new(method, proc_macro2::Span::call_site());
    let capability = syn::Ident::new(capability, proc_macro2::Span::call_site());
    quote! {
        fn #method(&mut self) -> ::core::option::Option<&mut dyn ::rusty_pool::ecs::system::#capability> {
            ::core::option::Option::Some(self)
        }
    }
}

pub fn derive_system(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let capabilities = match Capabilities::parse(&ast) {
        Ok(capabilities) => capabilities,
        Err(error) => return error.to_compile_error().into(),
    };

    let name = &ast.ident;
    let (impl_generics, type_generics, where_clause) = ast.generics.split_for_impl();

    let bind_pool = accessor(capabilities.bind_pool, "as_bind_pool", "BindPool");
    let initialize = accessor(capabilities.initialize, "as_initialize", "Initialize");
    let execute = accessor(capabilities.execute, "as_execute", "Execute");
    let reactive = accessor(capabilities.reactive, "as_reactive", "Reactive");

    TokenStream::from(quote! {
        impl #impl_generics ::rusty_pool::ecs::System for #name #type_generics #where_clause {
            #bind_pool
            #initialize
            #execute
            #reactive
        }
    })
}
