//! Rules built by wrapping other rules, adding optionality, repetition and nesting.
use std::{
    fmt::{Error, Formatter},
    marker::PhantomData,
};

use crate::{
    record::{derived, Derived},
    Binding, Record, Repr, Rule, RuleResult,
};
use derive_where::derive_where;

/// The sentinel marking an explicitly absent [optional] value.
pub const NONE: &str = "none";

/// The separator between the items of an [array].
pub const SEPARATOR: &str = ", ";

/// Matches either [`NONE`], or the inner rule.
#[derive(Clone, Copy, Debug)]
pub struct Optional<P>(P);

/// Checks for [`NONE`] before the inner rule is attempted, so an inner rule that could match
/// `none` itself never sees it.
pub fn optional<P: Rule>(rule: P) -> Optional<P> {
    Optional(rule)
}

impl<P: Rule> Rule for Optional<P> {
    type Suc = Option<P::Suc>;

    #[inline]
    fn comp(&self, text: &str) -> RuleResult<Self::Suc> {
        if text.starts_with(NONE) {
            Ok((None, NONE.len()))
        } else {
            let (value, read) = self.0.comp(text)?;
            Ok((Some(value), read))
        }
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "({NONE} | {})", Repr(&self.0))
    }
}

/// Matches the inner rule repeatedly in the pattern:
/// ```text
/// I, I, I ...
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Array<P>(P);

/// The list ends at the first item that fails or matches nothing, and such an item is not
/// included (nor is the separator before it). This never fails, an empty list is valid.
pub fn array<P: Rule>(rule: P) -> Array<P> {
    Array(rule)
}

impl<P: Rule> Rule for Array<P> {
    type Suc = Vec<P::Suc>;

    fn comp(&self, text: &str) -> RuleResult<Self::Suc> {
        let mut items = Vec::new();
        let mut read = 0;
        let mut next = 0;

        while let Some(rest) = text.get(next..) {
            match self.0.comp(rest) {
                Ok((item, len)) if len > 0 => {
                    items.push(item);
                    read = next + len;
                }
                _ => break,
            }

            if text
                .get(read..)
                .is_some_and(|after| after.starts_with(SEPARATOR))
            {
                next = read + SEPARATOR.len();
            } else {
                break;
            }
        }

        Ok((items, read))
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}{SEPARATOR}...", Repr(&self.0))
    }
}

/// Parses a whole sub-record with its own composition, producing the record as a value.
#[derive_where(Clone; C: Clone)]
#[derive_where(Debug; C: std::fmt::Debug)]
pub struct Nested<T, C> {
    composition: C,
    _marker: PhantomData<fn() -> T>,
}

/// Each match starts from a fresh `T::default()`, so fields of `T` the composition does not
/// bind keep their default values.
pub fn nested<T: Default, C: Binding<T>>(composition: C) -> Nested<T, C> {
    Nested {
        composition,
        _marker: PhantomData,
    }
}

/// A [nested] sub-record that derives its grammar through [Record].
pub fn record<T: Record + Default>() -> Nested<T, Derived<T>> {
    nested(derived())
}

impl<T: Default, C: Binding<T>> Rule for Nested<T, C> {
    type Suc = T;

    fn comp(&self, text: &str) -> RuleResult<T> {
        let mut record = T::default();
        let read = self.composition.bind(&mut record, text)?;
        Ok((record, read))
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        self.composition.repr(f)
    }
}

/// Applies a provided function to the value of a successful match.
#[derive(Clone, Copy, Debug)]
pub struct MapSuc<P, F>(P, F);

pub fn mapsuc<S, P, F>(rule: P, func: F) -> MapSuc<P, F>
where
    P: Rule,
    F: Fn(P::Suc) -> S,
{
    MapSuc(rule, func)
}

impl<S, P, F> Rule for MapSuc<P, F>
where
    P: Rule,
    F: Fn(P::Suc) -> S,
{
    type Suc = S;

    #[inline]
    fn comp(&self, text: &str) -> RuleResult<S> {
        let (value, read) = self.0.comp(text)?;
        Ok(((self.1)(value), read))
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        self.0.repr(f)
    }
}
