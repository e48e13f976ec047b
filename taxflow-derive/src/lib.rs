use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Lit, LitStr, Meta, Type};

/// Derive macro that generates a field table for a serde-deserialized input record.
///
/// For each field, extracts:
/// - Wire name (respects `#[serde(rename_all = "...")]` on the struct and
///   `#[serde(rename = "...")]` on the field)
/// - Kind (money / flag / count / text / list, from the field type)
/// - Description (from doc comments)
/// - Aliases (from `#[serde(alias = "...")]`)
///
/// Generates an `input_fields() -> &'static [InputField]` method. `InputField`
/// must be in scope where the derive is used.
#[proc_macro_derive(InputFields, attributes(serde))]
pub fn derive_input_fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("InputFields only supports structs with named fields"),
        },
        _ => panic!("InputFields only supports structs"),
    };

    let rename_all = container_rename_all(&input.attrs);

    let entries = fields.iter().map(|field| {
        let field_name = field.ident.as_ref().unwrap().to_string();
        let attrs = field_serde_attrs(&field.attrs);

        let wire_name = attrs.rename.unwrap_or_else(|| match rename_all.as_deref() {
            Some("camelCase") => to_camel_case(&field_name),
            Some("kebab-case") => field_name.replace('_', "-"),
            _ => field_name,
        });
        let kind = field_kind(&field.ty);
        let description = get_doc_comment(&field.attrs);
        let aliases = attrs.aliases;

        quote! {
            InputField {
                name: #wire_name,
                kind: #kind,
                description: #description,
                aliases: &[#(#aliases),*],
            }
        }
    });

    let expanded = quote! {
        impl #name {
            pub fn input_fields() -> &'static [InputField] {
                static FIELDS: &[InputField] = &[
                    #(#entries),*
                ];
                FIELDS
            }
        }
    };

    TokenStream::from(expanded)
}

#[derive(Default)]
struct SerdeFieldAttrs {
    rename: Option<String>,
    aliases: Vec<String>,
}

fn container_rename_all(attrs: &[Attribute]) -> Option<String> {
    let mut rename_all = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename_all") {
                let value: LitStr = meta.value()?.parse()?;
                rename_all = Some(value.value());
                Ok(())
            } else {
                skip_meta_value(&meta)
            }
        });
    }
    rename_all
}

fn field_serde_attrs(attrs: &[Attribute]) -> SerdeFieldAttrs {
    let mut out = SerdeFieldAttrs::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("serde")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") && meta.input.peek(syn::Token![=]) {
                let value: LitStr = meta.value()?.parse()?;
                out.rename = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("alias") {
                let value: LitStr = meta.value()?.parse()?;
                out.aliases.push(value.value());
                Ok(())
            } else {
                skip_meta_value(&meta)
            }
        });
    }
    out
}

// Consume `= value` or `(...)` so unrelated serde options don't abort parsing.
fn skip_meta_value(meta: &syn::meta::ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        meta.value()?.parse::<syn::Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

fn to_camel_case(snake: &str) -> String {
    let mut out = String::with_capacity(snake.len());
    let mut upper_next = false;
    for ch in snake.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

fn field_kind(ty: &Type) -> &'static str {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return match segment.ident.to_string().as_str() {
                "Amount" => "money",
                "bool" => "flag",
                "u8" | "u16" | "u32" | "u64" | "usize" => "count",
                "Vec" => "list",
                _ => "text",
            };
        }
    }
    "text"
}

fn get_doc_comment(attrs: &[Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}
