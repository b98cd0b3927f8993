use proc_macro2::{Span, TokenStream};
use proc_macro_error2::{Diagnostic, Level};
use quote::{quote, quote_spanned};
use std::collections::LinkedList;
use syn::{parse2, spanned::Spanned, Attribute, Data, DeriveInput, Expr, Field, Fields, Ident, LitStr};

enum Kind {
    Rule(Expr),
    Embed,
    Skip,
}

/// A field, and the bindings it contributes to the chain.
struct Bound {
    anchors: Vec<LitStr>,
    ident: Ident,
    kind: Kind,
}

pub fn derive(input: TokenStream) -> Result<TokenStream, LinkedList<Diagnostic>> {
    let input = parse2::<DeriveInput>(input).map_err(|e| {
        LinkedList::from([Diagnostic::spanned(e.span(), Level::Error, e.to_string())])
    })?;
    let fields = named_fields(&input)?;
    let bound = bind_fields(&fields)?;
    Ok(generate(&input, &bound))
}

fn named_fields(input: &DeriveInput) -> Result<Vec<&Field>, LinkedList<Diagnostic>> {
    let name = &input.ident;
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => Ok(named.named.iter().collect()),
            Fields::Unit => Ok(Vec::new()),
            Fields::Unnamed(unnamed) => Err(LinkedList::from([Diagnostic::spanned(
                unnamed.span(),
                Level::Error,
                "`Record` can only be derived for structs with named fields".to_owned(),
            )
            .help(format!("Try `struct {name} {{ .. }}`"))])),
        },
        Data::Enum(data) => Err(LinkedList::from([Diagnostic::spanned(
            data.enum_token.span(),
            Level::Error,
            "`Record` cannot be derived for enums".to_owned(),
        )
        .help("Use `variants(..)` to parse keywords into an enum field".to_owned())])),
        Data::Union(data) => Err(LinkedList::from([Diagnostic::spanned(
            data.union_token.span(),
            Level::Error,
            "`Record` cannot be derived for unions".to_owned(),
        )])),
    }
}

fn bind_fields(fields: &[&Field]) -> Result<Vec<Bound>, LinkedList<Diagnostic>> {
    let mut errors = LinkedList::new();
    let bound = fields
        .iter()
        .filter_map(|field| bind_field(field, &mut errors))
        .collect();

    if errors.is_empty() {
        Ok(bound)
    } else {
        Err(errors)
    }
}

fn bind_field(field: &Field, errors: &mut LinkedList<Diagnostic>) -> Option<Bound> {
    let mut anchors = Vec::new();
    let mut kind: Option<(Span, Kind)> = None;

    for attr in &field.attrs {
        let found = if attr.path().is_ident("anchor") {
            match attr.parse_args::<LitStr>() {
                Ok(lit) => anchors.push(lit),
                Err(_) => errors.push_back(
                    Diagnostic::spanned(
                        attr.span(),
                        Level::Error,
                        "An anchor must be a single string literal".to_owned(),
                    )
                    .help("Try `#[anchor(\"keyword\")]`".to_owned()),
                ),
            }
            continue;
        } else if attr.path().is_ident("rule") {
            match attr.parse_args::<Expr>() {
                Ok(rule) => Kind::Rule(rule),
                Err(e) => {
                    errors.push_back(Diagnostic::spanned(attr.span(), Level::Error, e.to_string()));
                    continue;
                }
            }
        } else if attr.path().is_ident("embed") {
            match flag(attr, errors) {
                Some(()) => Kind::Embed,
                None => continue,
            }
        } else if attr.path().is_ident("skip") {
            match flag(attr, errors) {
                Some(()) => Kind::Skip,
                None => continue,
            }
        } else {
            continue;
        };

        if let Some((first, _)) = &kind {
            errors.push_back(
                Diagnostic::spanned(
                    attr.span(),
                    Level::Error,
                    "A field takes only one of `rule`, `embed` or `skip`".to_owned(),
                )
                .span_note(*first, "Already bound here".to_owned()),
            );
        } else {
            kind = Some((attr.span(), found));
        }
    }

    let ident = field.ident.clone()?;
    match kind {
        Some((_, kind)) => Some(Bound {
            anchors,
            ident,
            kind,
        }),
        None => {
            errors.push_back(
                Diagnostic::spanned(
                    field.span(),
                    Level::Error,
                    format!("The field `{ident}` has no binding"),
                )
                .help(format!(
                    "Add `#[rule(..)]` to parse `{ident}`, `#[embed]` if it is a `Record`, or `#[skip]`"
                )),
            );
            None
        }
    }
}

fn flag(attr: &Attribute, errors: &mut LinkedList<Diagnostic>) -> Option<()> {
    match attr.meta.require_path_only() {
        Ok(_) => Some(()),
        Err(e) => {
            errors.push_back(Diagnostic::spanned(attr.span(), Level::Error, e.to_string()));
            None
        }
    }
}

fn generate(input: &DeriveInput, fields: &[Bound]) -> TokenStream {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut bindings = Vec::new();
    for Bound {
        anchors,
        ident,
        kind,
    } in fields
    {
        bindings.extend(anchors.iter().map(|lit| {
            quote_spanned! { lit.span()=>
                ::paramparse::binding::anchor(::paramparse::rules::literal(#lit))
            }
        }));
        match kind {
            Kind::Rule(rule) => bindings.push(quote_spanned! { rule.span()=>
                ::paramparse::binding::field(|record: &mut Self| &mut record.#ident, #rule)
            }),
            Kind::Embed => bindings.push(quote! {
                ::paramparse::binding::embed(
                    |record: &mut Self| &mut record.#ident,
                    ::paramparse::record::derived(),
                )
            }),
            Kind::Skip => (),
        }
    }

    let chain = bindings
        .into_iter()
        .rev()
        .fold(quote!(::paramparse::chain::End), |rest, binding| {
            quote!((#binding, #rest))
        });

    quote! {
        impl #impl_generics ::paramparse::Record for #name #ty_generics #where_clause {
            fn parse_into(&mut self, text: &str) -> ::core::result::Result<usize, ::paramparse::NoMatch> {
                ::paramparse::Chain::<Self>::parse(&Self::__paramparse_chain(), self, text)
            }

            fn repr(f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::paramparse::Binding::<Self>::repr(&Self::__paramparse_chain(), f)
            }
        }

        impl #impl_generics #name #ty_generics #where_clause {
            #[doc(hidden)]
            #[inline]
            fn __paramparse_chain() -> impl ::paramparse::Chain<Self> {
                #chain
            }
        }
    }
}
