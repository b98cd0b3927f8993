//! Bindings associate a [Rule] with where (or whether) its value is written into a record.
use std::{
    fmt::{Display, Error, Formatter},
    marker::PhantomData,
    sync::Arc,
};

use crate::{NoMatch, Rule};
use derive_where::derive_where;

/// One step of a composition over records of type `R`.
///
/// Returns the number of bytes consumed. A failing binding may still have written to the
/// record, nothing is rolled back.
#[cfg_attr(
    feature = "nightly",
    rustc_on_unimplemented(
        message = "`{Self}` cannot be bound to records of type `{R}`",
        label = "Not a `Binding` for `{R}`",
    )
)]
pub trait Binding<R> {
    fn bind(&self, record: &mut R, text: &str) -> Result<usize, NoMatch>;

    /// Produces a representation of the grammar matched, for logging & error messages.
    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error>;
}

/// Renders the grammar of a binding.
pub fn grammar<R, B: Binding<R> + ?Sized>(binding: &B) -> String {
    struct Show<'a, R, B: ?Sized>(&'a B, PhantomData<fn(&mut R)>);

    impl<R, B: Binding<R> + ?Sized> Display for Show<'_, R, B> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            self.0.repr(f)
        }
    }

    Show(binding, PhantomData).to_string()
}

/// Writes the value of a rule into a field.
#[derive_where(Clone; P: Clone)]
#[derive_where(Debug; P: std::fmt::Debug)]
pub struct Field<R, P: Rule> {
    access: fn(&mut R) -> &mut P::Suc,
    rule: P,
}

/// Bind a rule to the field returned by `access`, which is only written when the rule matches.
/// ```
/// # use paramparse::prelude::*;
/// #[derive(Default)]
/// struct Latency {
///     millis: i32,
/// }
///
/// let mut latency = Latency::default();
/// let binding = field(|l: &mut Latency| &mut l.millis, int());
/// assert_eq!(binding.bind(&mut latency, "250"), Ok(3));
/// assert_eq!(latency.millis, 250);
/// ```
pub fn field<R, P: Rule>(access: fn(&mut R) -> &mut P::Suc, rule: P) -> Field<R, P> {
    Field { access, rule }
}

impl<R, P: Rule> Binding<R> for Field<R, P> {
    #[inline]
    fn bind(&self, record: &mut R, text: &str) -> Result<usize, NoMatch> {
        let (value, read) = self.rule.comp(text)?;
        *(self.access)(record) = value;
        Ok(read)
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        self.rule.repr(f)
    }
}

/// Matches a rule without writing anything, used for keywords fixed by the grammar.
#[derive(Clone, Copy, Debug)]
pub struct Anchor<P>(P);

pub fn anchor<P: Rule>(rule: P) -> Anchor<P> {
    Anchor(rule)
}

impl<R, P: Rule> Binding<R> for Anchor<P> {
    #[inline]
    fn bind(&self, _: &mut R, text: &str) -> Result<usize, NoMatch> {
        self.0.comp(text).map(|(_, read)| read)
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        self.0.repr(f)
    }
}

/// Applies a sub-record's composition directly to one of the record's fields.
#[derive_where(Clone; C: Clone)]
#[derive_where(Debug; C: std::fmt::Debug)]
pub struct Embed<R, T, C> {
    access: fn(&mut R) -> &mut T,
    composition: C,
}

/// Unlike [nested](crate::combinators::nested), the field is updated in place, so when the
/// sub-record fails part way the fields it already matched remain written.
pub fn embed<R, T, C: Binding<T>>(access: fn(&mut R) -> &mut T, composition: C) -> Embed<R, T, C> {
    Embed {
        access,
        composition,
    }
}

impl<R, T, C: Binding<T>> Binding<R> for Embed<R, T, C> {
    #[inline]
    fn bind(&self, record: &mut R, text: &str) -> Result<usize, NoMatch> {
        self.composition.bind((self.access)(record), text)
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        self.composition.repr(f)
    }
}

impl<R, B: Binding<R> + ?Sized> Binding<R> for &B {
    #[inline]
    fn bind(&self, record: &mut R, text: &str) -> Result<usize, NoMatch> {
        (**self).bind(record, text)
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        (**self).repr(f)
    }
}

impl<R, B: Binding<R> + ?Sized> Binding<R> for Box<B> {
    #[inline]
    fn bind(&self, record: &mut R, text: &str) -> Result<usize, NoMatch> {
        (**self).bind(record, text)
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        (**self).repr(f)
    }
}

impl<R, B: Binding<R> + ?Sized> Binding<R> for Arc<B> {
    #[inline]
    fn bind(&self, record: &mut R, text: &str) -> Result<usize, NoMatch> {
        (**self).bind(record, text)
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        (**self).repr(f)
    }
}
