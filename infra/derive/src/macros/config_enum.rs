use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr};

/// Expands `#[derive(ConfigEnum)]` into a `FromConfigStr` impl with exact-name lookup.
pub fn expand_derive(input: DeriveInput) -> TokenStream {
    let name = &input.ident;
    let Data::Enum(data) = &input.data else {
        return syn::Error::new_spanned(name, "ConfigEnum can only be derived for enums")
            .to_compile_error();
    };
    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "ConfigEnum does not support generics")
            .to_compile_error();
    }
    if let Some(variant) = data.variants.iter().find(|v| !matches!(v.fields, Fields::Unit)) {
        return syn::Error::new_spanned(variant, "ConfigEnum requires fieldless variants")
            .to_compile_error();
    }

    let idents: Vec<_> = data.variants.iter().map(|v| &v.ident).collect();
    let names = idents.iter().map(|ident| LitStr::new(&ident.to_string(), ident.span()));

    quote! {
        #[automatically_derived]
        impl ::propset::coercion::FromConfigStr for #name {
            const CATEGORY: ::propset::coercion::TypeCategory =
                ::propset::coercion::TypeCategory::Enumeration;

            fn from_config_str(
                raw: &str,
            ) -> ::std::result::Result<::std::option::Option<Self>, ::propset::coercion::ConversionError> {
                match raw {
                    #(#names => ::std::result::Result::Ok(::std::option::Option::Some(Self::#idents)),)*
                    _ => ::std::result::Result::Err(
                        ::propset::coercion::ConversionError::unknown_constant::<Self>(raw),
                    ),
                }
            }
        }
    }
}
