//! `#[derive(Record)]` for `struct_qs`.
//!
//! The derive turns the `#[qs(...)]` attributes of a struct into the static
//! field list the codec works from, and generates per-field dispatch so that
//! every field is encoded and decoded through its own type's impls.

use proc_macro::TokenStream;
use proc_macro2::Literal;
use quote::quote;
use syn::{
    Data, DeriveInput, Error, Fields, Ident, LitStr, Token,
    ext::IdentExt,
    parse::{Parse, ParseStream},
    parse_macro_input,
    punctuated::Punctuated,
    spanned::Spanned,
};

#[proc_macro_derive(Record, attributes(qs))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_record(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

/// One comma-separated argument of `#[qs(...)]`.
enum Arg {
    /// `"name,option,..."`
    Tag(LitStr),
    /// `embed`, `custom`
    Flag(Ident),
    /// `layout = "..."`, `del = "..."`
    Value(Ident, LitStr),
}

impl Parse for Arg {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(Arg::Tag(input.parse()?));
        }
        let ident: Ident = input.parse()?;
        if input.peek(Token![=]) {
            input.parse::<Token![=]>()?;
            return Ok(Arg::Value(ident, input.parse()?));
        }
        Ok(Arg::Flag(ident))
    }
}

#[derive(Default)]
struct FieldAttrs {
    tag: Option<LitStr>,
    embed: bool,
    custom: bool,
    layout: Option<LitStr>,
    del: Option<LitStr>,
}

impl FieldAttrs {
    fn from_field(field: &syn::Field) -> syn::Result<Self> {
        let mut attrs = FieldAttrs::default();
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("qs")) {
            let args = attr.parse_args_with(Punctuated::<Arg, Token![,]>::parse_terminated)?;
            for arg in args {
                attrs.apply(arg)?;
            }
        }
        if attrs.embed && attrs.custom {
            return Err(Error::new(
                field.span(),
                "`embed` and `custom` cannot be combined",
            ));
        }
        Ok(attrs)
    }

    fn apply(&mut self, arg: Arg) -> syn::Result<()> {
        match arg {
            Arg::Tag(tag) => set_once(&mut self.tag, tag, "tag"),
            Arg::Flag(flag) if flag == "embed" => {
                self.embed = true;
                Ok(())
            }
            Arg::Flag(flag) if flag == "custom" => {
                self.custom = true;
                Ok(())
            }
            Arg::Value(name, value) if name == "layout" => set_once(&mut self.layout, value, "layout"),
            Arg::Value(name, value) if name == "del" => set_once(&mut self.del, value, "del"),
            Arg::Flag(other) | Arg::Value(other, _) => Err(Error::new(
                other.span(),
                format!("unknown `qs` attribute `{other}`"),
            )),
        }
    }

    fn is_excluded(&self) -> bool {
        self.tag.as_ref().is_some_and(|tag| tag.value() == "-")
    }
}

fn set_once(slot: &mut Option<LitStr>, value: LitStr, what: &str) -> syn::Result<()> {
    if slot.is_some() {
        return Err(Error::new(value.span(), format!("duplicate `qs` {what}")));
    }
    *slot = Some(value);
    Ok(())
}

fn expand_record(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(Error::new(
            input.generics.span(),
            "#[derive(Record)] does not support generic structs",
        ));
    }
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(Error::new(
                    input.ident.span(),
                    "#[derive(Record)] requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new(
                input.ident.span(),
                "#[derive(Record)] only supports structs",
            ));
        }
    };

    let mut defs = Vec::new();
    let mut encode_arms = Vec::new();
    let mut decode_arms = Vec::new();

    for field in fields {
        let attrs = FieldAttrs::from_field(field)?;
        if attrs.is_excluded() {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let ty = &field.ty;
        let index = Literal::usize_unsuffixed(defs.len());
        let name = ident.unraw().to_string();
        let raw_tag = attrs.tag.as_ref().map(LitStr::value).unwrap_or_default();

        let kind = if attrs.custom {
            quote!(::struct_qs::Kind::Custom)
        } else {
            quote!(<#ty as ::struct_qs::Shape>::KIND)
        };
        let mut def = quote!(::struct_qs::FieldDef::new(#name, #raw_tag, #kind));
        if attrs.embed {
            def = quote!(#def.embedded());
        }
        if let Some(layout) = &attrs.layout {
            def = quote!(#def.layout(#layout));
        }
        if let Some(del) = &attrs.del {
            def = quote!(#def.delimiter(#del));
        }
        defs.push(def);

        if attrs.custom {
            encode_arms.push(quote! {
                #index => ::struct_qs::ser::custom(&self.#ident, key, tag, out),
            });
        } else {
            encode_arms.push(quote! {
                #index => ::struct_qs::ser::field(&self.#ident, key, tag, out),
            });
            decode_arms.push(quote! {
                #index => ::struct_qs::de::field(&mut self.#ident, key, tag, input),
            });
        }
    }

    let name = &input.ident;
    Ok(quote! {
        impl ::struct_qs::Record for #name {
            fn schema() -> &'static ::struct_qs::Schema {
                static SCHEMA: ::std::sync::OnceLock<::struct_qs::Schema> =
                    ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| ::struct_qs::Schema::new(::std::vec![#(#defs),*]))
            }

            #[allow(unused_variables)]
            fn encode_field(
                &self,
                index: usize,
                key: &str,
                tag: &::struct_qs::Tag<'_>,
                out: &mut ::struct_qs::Values,
            ) -> ::struct_qs::Result<()> {
                match index {
                    #(#encode_arms)*
                    _ => ::std::result::Result::Ok(()),
                }
            }

            #[allow(unused_variables)]
            fn decode_field(
                &mut self,
                index: usize,
                key: &str,
                tag: &::struct_qs::Tag<'_>,
                input: &mut ::struct_qs::Input<'_>,
            ) -> ::struct_qs::Result<bool> {
                match index {
                    #(#decode_arms)*
                    _ => ::std::result::Result::Ok(false),
                }
            }
        }

        impl ::struct_qs::Shape for #name {
            const KIND: ::struct_qs::Kind = ::struct_qs::Kind::Nested;
        }

        impl ::struct_qs::Encode for #name {
            fn is_empty(&self) -> bool {
                false
            }

            fn encode(
                &self,
                key: &str,
                _tag: &::struct_qs::Tag<'_>,
                out: &mut ::struct_qs::Values,
            ) -> ::struct_qs::Result<()> {
                ::struct_qs::ser::record(self, key, out)
            }
        }

        impl ::struct_qs::Decode for #name {
            fn decode(
                &mut self,
                key: &str,
                _tag: &::struct_qs::Tag<'_>,
                input: &mut ::struct_qs::Input<'_>,
            ) -> ::struct_qs::Result<bool> {
                ::struct_qs::de::record(self, key, input)
            }
        }

        impl ::struct_qs::Source for #name {
            fn encode_source(&self, out: &mut ::struct_qs::Values) -> ::struct_qs::Result<()> {
                ::struct_qs::ser::record(self, "", out)
            }
        }

        impl ::struct_qs::Target for #name {
            fn decode_target(&mut self, input: &mut ::struct_qs::Input<'_>) -> ::struct_qs::Result<()> {
                ::struct_qs::de::record(self, "", input).map(|_| ())
            }
        }
    })
}
