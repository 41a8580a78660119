use proc_macro::TokenStream;
use quote::{format_ident, quote};
use std::collections::HashMap;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, Meta, Token, parse_macro_input};

/// Helper enum for parsed attribute values
enum MetaValue {
    Str(String),
    Expr(syn::Expr),
    Flag,
}

/// Check if the struct has #[allow(missing_docs)] attribute
fn check_allow_missing_docs(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|attr| {
        if attr.path().is_ident("allow") {
            attr.parse_args::<syn::Ident>()
                .map(|ident| ident == "missing_docs")
                .unwrap_or(false)
        } else {
            false
        }
    })
}

/// Define a struct whose fields are options resolved by a registry
///
/// ```ignore
/// define_options! {
///     pub struct ServerOptions {
///         #[option(name = "port", doc = "Server port", default = 8080)]
///         pub port: i32,
///     }
/// }
/// ```
#[proc_macro]
pub fn define_options(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_options(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn generate_options(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let struct_name = &input.ident;
    let vis = &input.vis;
    let struct_attrs = &input.attrs;

    let allow_missing_docs = check_allow_missing_docs(struct_attrs);

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    input,
                    "define_options! only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                input,
                "define_options! only supports structs",
            ));
        }
    };

    let mut field_defs = Vec::new();
    let mut declares = Vec::new();
    let mut resolved_fields = Vec::new();
    let mut default_fields = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        let field_vis = &field.vis;
        let field_type = &field.ty;
        let field_attrs = &field.attrs;

        let config = parse_option_config(field, field_name, allow_missing_docs)?;

        // Forward cfg attributes so feature-gated fields disappear everywhere
        let cfg_attrs: Vec<&Attribute> = field_attrs
            .iter()
            .filter(|attr| attr.path().is_ident("cfg"))
            .collect();

        field_defs.push(quote! {
            #(#cfg_attrs)*
            #field_vis #field_name: ::layered_options::OptionField<#field_type>
        });

        let name = &config.name;
        let description = &config.description;
        // String literals are converted so `default = "x"` works for String fields
        let default_expr = match &config.default {
            Some(
                expr @ syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(_),
                    ..
                }),
            ) => quote! { ::core::convert::Into::<#field_type>::into(#expr) },
            Some(expr) => quote! { #expr },
            None => quote! { <#field_type as ::core::default::Default>::default() },
        };
        let bare_name = field_name.unraw();
        let default_ident = format_ident!("__{}_default", bare_name);
        let cell_ident = format_ident!("__{}_cell", bare_name);

        declares.push(quote! {
            #(#cfg_attrs)*
            let #default_ident: #field_type = #default_expr;
            #(#cfg_attrs)*
            let #cell_ident = options.declare::<#field_type>(
                #name,
                ::core::clone::Clone::clone(&#default_ident),
                #description,
            );
        });

        resolved_fields.push(quote! {
            #(#cfg_attrs)*
            #field_name: ::layered_options::macros::resolved_field(
                &options,
                #name,
                #description,
                #default_ident,
                &#cell_ident,
            )
        });

        default_fields.push(quote! {
            #(#cfg_attrs)*
            #field_name: ::layered_options::macros::default_field::<#field_type>(
                #name,
                #description,
                #default_expr,
            )
        });
    }

    // Filter out allow(missing_docs) from the struct definition
    let filtered_attrs: Vec<&Attribute> = struct_attrs
        .iter()
        .filter(|attr| {
            if attr.path().is_ident("allow")
                && let Ok(ident) = attr.parse_args::<syn::Ident>()
                && ident == "missing_docs"
            {
                return false;
            }
            true
        })
        .collect();

    let struct_def = quote! {
        #(#filtered_attrs)*
        #vis struct #struct_name {
            #(#field_defs),*
        }
    };

    let from_options_impl = quote! {
        impl ::layered_options::FromOptions for #struct_name {
            fn load_or_error(
                mut options: ::layered_options::Options<'_>,
            ) -> ::core::result::Result<Self, ::layered_options::ErrorList> {
                #(#declares)*

                options.load()?;

                Ok(Self {
                    #(#resolved_fields),*
                })
            }

            fn defaults() -> Self {
                Self {
                    #(#default_fields),*
                }
            }

            #[allow(unused_variables)]
            fn describe() -> ::layered_options::Options<'static> {
                let mut options = ::layered_options::Options::new();

                #(#declares)*

                options
            }
        }
    };

    Ok(quote! {
        #struct_def
        #from_options_impl
    })
}

#[derive(Debug)]
struct OptionConfig {
    name: String,
    description: String,
    default: Option<syn::Expr>,
}

/// Parse #[option(name = "x", doc = "y", default = val)] syntax
fn parse_option_list(meta_list: &syn::MetaList) -> syn::Result<HashMap<String, MetaValue>> {
    let mut values = HashMap::new();

    meta_list.parse_nested_meta(|meta| {
        let key = meta
            .path
            .get_ident()
            .ok_or_else(|| meta.error("expected identifier"))?
            .to_string();

        if meta.input.peek(Token![=]) {
            meta.input.parse::<Token![=]>()?;

            if key == "name" || key == "doc" {
                let value: syn::LitStr = meta.input.parse()?;
                values.insert(key, MetaValue::Str(value.value()));
            } else {
                let expr: syn::Expr = meta.input.parse()?;
                values.insert(key, MetaValue::Expr(expr));
            }
        } else {
            values.insert(key, MetaValue::Flag);
        }

        Ok(())
    })?;

    Ok(values)
}

fn parse_option_config(
    field: &syn::Field,
    field_name: &syn::Ident,
    allow_missing_docs: bool,
) -> syn::Result<OptionConfig> {
    let option_attr = field
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("option"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                field,
                "field must have an #[option(...)] attribute with doc and optionally name and default",
            )
        })?;

    let parsed = match &option_attr.meta {
        Meta::List(list) => parse_option_list(list)?,
        _ => {
            return Err(syn::Error::new_spanned(
                option_attr,
                "option attribute must be a list: #[option(doc = \"...\", ...)]",
            ));
        }
    };

    if let Some(unknown) = parsed
        .keys()
        .find(|key| !matches!(key.as_str(), "name" | "doc" | "default"))
    {
        return Err(syn::Error::new_spanned(
            option_attr,
            format!("unknown option attribute `{}`", unknown),
        ));
    }

    let name = match parsed.get("name") {
        Some(MetaValue::Str(s)) => s.clone(),
        None => field_name.unraw().to_string(),
        _ => {
            return Err(syn::Error::new_spanned(
                option_attr,
                "name must be a string literal",
            ));
        }
    };

    let description = match parsed.get("doc") {
        Some(MetaValue::Str(s)) => s.trim().to_string(),
        None if allow_missing_docs => String::new(),
        None => {
            return Err(syn::Error::new_spanned(
                option_attr,
                "option must have doc = \"description\" (or use #[allow(missing_docs)] on struct)",
            ));
        }
        _ => {
            return Err(syn::Error::new_spanned(
                option_attr,
                "doc must be a string literal",
            ));
        }
    };

    let default = match parsed.get("default") {
        Some(MetaValue::Expr(e)) => Some(e.clone()),
        Some(_) => {
            return Err(syn::Error::new_spanned(
                option_attr,
                "default must be given a value: default = ...",
            ));
        }
        None => None,
    };

    Ok(OptionConfig {
        name,
        description,
        default,
    })
}
