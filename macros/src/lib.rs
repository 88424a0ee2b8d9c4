extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Adds JSON helpers to a map event payload.
///
/// The generated functions attach the payload type name to decode errors so
/// a warning about a bad event says which event it was.
#[proc_macro_derive(Payload)]
pub fn payload_macro(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let type_name = name.to_string();

    let expanded = quote! {
        impl #impl_generics #name #ty_generics #where_clause {
            pub fn from_value(value: serde_json::Value) -> anyhow::Result<Self>
            where
                Self: Sized,
                for<'de> Self: serde::Deserialize<'de>,
            {
                serde_json::from_value(value)
                    .map_err(|e| anyhow::anyhow!("Cannot decode {} payload: {e}", #type_name))
            }

            pub fn from_string<'a>(str: impl Into<&'a str>) -> anyhow::Result<Self>
            where
                Self: Sized,
                for<'de> Self: serde::Deserialize<'de>,
            {
                serde_json::from_str(str.into())
                    .map_err(|e| anyhow::anyhow!("Cannot decode {} payload: {e}", #type_name))
            }

            pub fn to_value(&self) -> anyhow::Result<serde_json::Value>
            where
                Self: serde::Serialize,
            {
                serde_json::to_value(self)
                    .map_err(|e| anyhow::anyhow!("Cannot encode {} payload: {e}", #type_name))
            }
        }
    };

    TokenStream::from(expanded)
}
