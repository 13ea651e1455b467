use proc_macro2::TokenStream;
use quote::quote;
use syn::parse::Parser;
use syn::{FnArg, ImplItem, ImplItemFn, ItemImpl, Meta, Type, Visibility};

const DEFAULT_CLASS_ATTR: &str = "default_class";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Role {
    Setter,
    Adder,
    Reader,
}

impl Role {
    fn of(name: &str) -> Option<Self> {
        let (prefix, rest) = name.split_once('_')?;
        if rest.is_empty() {
            return None;
        }
        match prefix {
            "set" => Some(Self::Setter),
            "add" => Some(Self::Adder),
            "get" | "is" => Some(Self::Reader),
            _ => None,
        }
    }
}

struct Discovered<'a> {
    method: &'a ImplItemFn,
    role: Role,
    params: Vec<&'a Type>,
    default_class: Option<Type>,
}

struct ConfigurableArgs {
    instantiable: bool,
}

/// Expands the `#[configurable]` attribute macro.
///
/// Emits the original impl block (minus helper attributes), an `Introspect` impl that
/// registers every discovered method, and a `Parameter` impl for the self type.
pub fn expand_configurable(args: TokenStream, mut input: ItemImpl) -> TokenStream {
    let ConfigurableArgs { instantiable } = match parse_args(args) {
        Ok(args) => args,
        Err(err) => return err.to_compile_error(),
    };
    if let Some((_, path, _)) = &input.trait_ {
        return syn::Error::new_spanned(path, "configurable expects an inherent impl block")
            .to_compile_error();
    }
    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(
            &input.generics,
            "configurable does not support generic impl blocks",
        )
        .to_compile_error();
    }

    let discovered = match discover(&input) {
        Ok(discovered) => discovered,
        Err(err) => return err.to_compile_error(),
    };
    let registrations: Vec<TokenStream> = discovered.iter().map(registration_tokens).collect();

    strip_helper_attrs(&mut input);
    let self_ty = &input.self_ty;
    let param_type = if instantiable {
        quote! { ::propset::ParamType::instantiable::<Self>() }
    } else {
        quote! { ::propset::ParamType::complex::<Self>() }
    };

    quote! {
        #input

        #[automatically_derived]
        impl ::propset::Introspect for #self_ty {
            fn introspect(&self) -> ::std::result::Result<::propset::Capabilities, ::propset::IntrospectionError> {
                ::propset::Capabilities::builder::<Self>()
                    #(#registrations)*
                    .build()
            }
        }

        #[automatically_derived]
        impl ::propset::Parameter for #self_ty {
            fn param_type() -> ::propset::ParamType {
                #param_type
            }
        }
    }
}

fn parse_args(args: TokenStream) -> syn::Result<ConfigurableArgs> {
    let parser = syn::punctuated::Punctuated::<Meta, syn::Token![,]>::parse_terminated;
    let metas = parser.parse2(args)?;

    let mut instantiable = false;
    for meta in metas {
        match meta {
            Meta::Path(path) if path.is_ident("instantiable") => {
                if instantiable {
                    return Err(syn::Error::new_spanned(path, "Duplicate `instantiable` argument"));
                }
                instantiable = true;
            },
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "Unsupported argument; expected `instantiable`",
                ));
            },
        }
    }

    Ok(ConfigurableArgs { instantiable })
}

fn discover(input: &ItemImpl) -> syn::Result<Vec<Discovered<'_>>> {
    let mut discovered = Vec::new();

    for item in &input.items {
        let ImplItem::Fn(method) = item else { continue };
        let default_class = default_class_hint(method)?;
        let Some(role) = Role::of(&method.sig.ident.to_string()) else {
            if let Some(hint) = &default_class {
                return Err(syn::Error::new_spanned(
                    hint,
                    "default_class is only allowed on set_* and add_* methods",
                ));
            }
            continue;
        };
        if !is_discoverable(method) {
            continue;
        }
        let Some((mutable, params)) = receiver_and_params(method) else { continue };

        let fits = match role {
            Role::Setter | Role::Adder => mutable,
            Role::Reader => !mutable && params.is_empty(),
        };
        if !fits {
            continue;
        }
        if role == Role::Reader && default_class.is_some() {
            return Err(syn::Error::new_spanned(
                &method.sig.ident,
                "default_class is only allowed on set_* and add_* methods",
            ));
        }

        discovered.push(Discovered { method, role, params, default_class });
    }

    Ok(discovered)
}

fn is_discoverable(method: &ImplItemFn) -> bool {
    matches!(method.vis, Visibility::Public(_))
        && method.sig.asyncness.is_none()
        && method.sig.generics.params.is_empty()
}

/// Returns `(takes &mut self, parameter types)`; `None` when the method has no `self`
/// receiver or takes a reference-typed argument.
fn receiver_and_params(method: &ImplItemFn) -> Option<(bool, Vec<&Type>)> {
    let mut inputs = method.sig.inputs.iter();
    let Some(FnArg::Receiver(receiver)) = inputs.next() else {
        return None;
    };
    receiver.reference.as_ref()?;

    let mut params = Vec::new();
    for input in inputs {
        let FnArg::Typed(typed) = input else { return None };
        if matches!(*typed.ty, Type::Reference(_)) {
            return None;
        }
        params.push(typed.ty.as_ref());
    }

    Some((receiver.mutability.is_some(), params))
}

fn default_class_hint(method: &ImplItemFn) -> syn::Result<Option<Type>> {
    let mut hint = None;
    for attr in method.attrs.iter().filter(|attr| attr.path().is_ident(DEFAULT_CLASS_ATTR)) {
        if hint.is_some() {
            return Err(syn::Error::new_spanned(attr, "Duplicate `default_class` attribute"));
        }
        hint = Some(attr.parse_args::<Type>()?);
    }
    Ok(hint)
}

fn registration_tokens(found: &Discovered<'_>) -> TokenStream {
    let ident = &found.method.sig.ident;
    let params = &found.params;

    let registration = match (found.role, params.len()) {
        (Role::Reader, _) => quote! { .getter(stringify!(#ident)) },
        (Role::Setter, 1) => quote! { .setter(stringify!(#ident), Self::#ident) },
        (Role::Adder, 1) => quote! { .adder(stringify!(#ident), Self::#ident) },
        _ => quote! {
            .method(::propset::MethodDescriptor::new(
                stringify!(#ident),
                ::std::vec![#(::propset::ParamType::opaque::<#params>()),*],
            ))
        },
    };
    let hint = found.default_class.as_ref().map(|ty| {
        quote! { .default_class::<#ty>(stringify!(#ident)) }
    });

    quote! { #registration #hint }
}

fn strip_helper_attrs(input: &mut ItemImpl) {
    for item in &mut input.items {
        if let ImplItem::Fn(method) = item {
            method.attrs.retain(|attr| !attr.path().is_ident(DEFAULT_CLASS_ATTR));
        }
    }
}
