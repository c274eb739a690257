extern crate proc_macro;

use migrad_macro_utils::MigradManifest;
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Implements `migrad_nn::module::Module` by forwarding to the type's inherent
/// `forward` and `parameters` methods.
///
/// The type must have a lifetime parameter tying it to its graph. By default
/// `forward` returns `Vec<Value>`; `#[module(output = single)]` selects a
/// single `Value`.
#[proc_macro_derive(Module, attributes(module))]
pub fn derive_module(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let manifest = MigradManifest::default();
    let migrad_core_path = manifest.get_path("migrad_core");
    let migrad_nn_path = manifest.get_path("migrad_nn");
    let migrad_scalar_path = manifest.get_path("migrad_scalar");

    let Some(lifetime) = ast.generics.lifetimes().next().map(|def| def.lifetime.clone()) else {
        return syn::Error::new_spanned(name, "Module needs a lifetime parameter for its graph")
            .to_compile_error()
            .into();
    };

    let single_output = ast
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("module"))
        .and_then(|attr| {
            attr.parse_args::<syn::ExprAssign>().ok().and_then(|expr| match (*expr.left, *expr.right) {
                (syn::Expr::Path(left), syn::Expr::Path(right)) if left.path.is_ident("output") => {
                    Some(right.path.is_ident("single"))
                }
                _ => None,
            })
        })
        .unwrap_or(false);

    let output_type = if single_output {
        quote!(#migrad_scalar_path::Value<#lifetime>)
    } else {
        quote!(Vec<#migrad_scalar_path::Value<#lifetime>>)
    };

    let expanded = quote! {
        impl #impl_generics #migrad_nn_path::module::Module<#lifetime>
            for #name #ty_generics #where_clause
        {
            type Output = #output_type;

            fn forward(&self, input: &[#migrad_scalar_path::Value<#lifetime>])
                -> #migrad_core_path::error::Result<Self::Output> {
                self.forward(input)
            }
            fn parameters(&self) -> Vec<#migrad_scalar_path::Value<#lifetime>> {
                self.parameters()
            }
        }
    };
    TokenStream::from(expanded)
}

#[proc_macro_derive(Optimizer)]
pub fn derive_optimizer(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();

    let manifest = MigradManifest::default();
    let migrad_core_path = manifest.get_path("migrad_core");
    let migrad_nn_path = manifest.get_path("migrad_nn");
    let migrad_scalar_path = manifest.get_path("migrad_scalar");

    let expanded = quote! {
        impl #impl_generics #migrad_nn_path::optimizer::Optimizer for #name #ty_generics #where_clause {
            fn step(&mut self, parameters: &[#migrad_scalar_path::Value<'_>])
                -> #migrad_core_path::error::Result<()> {
                self.step(parameters)
            }
            fn zero_grad(&mut self, parameters: &[#migrad_scalar_path::Value<'_>])
                -> #migrad_core_path::error::Result<()> {
                self.zero_grad(parameters)
            }
            fn set_learning_rate(&mut self, learning_rate: f64) {
                self.set_learning_rate(learning_rate)
            }
        }
    };

    TokenStream::from(expanded)
}
