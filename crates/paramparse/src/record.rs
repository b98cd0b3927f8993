//! Records that carry their own grammar, usually through `#[derive(Record)]`.
use std::{
    fmt::{Error, Formatter},
    marker::PhantomData,
};

use crate::{Binding, NoMatch};
use derive_where::derive_where;

/// A struct that knows how to parse itself.
///
/// Deriving generates a [Chain](crate::Chain) from the field attributes:
/// ```
/// use paramparse::prelude::*;
///
/// #[derive(Record, Default, Debug, PartialEq)]
/// struct ClientPort {
///     #[anchor("client_port")]
///     #[rule(int())]
///     low: i32,
///     #[rule(optional(int()))]
///     high: Option<i32>,
/// }
///
/// assert_eq!(
///     ClientPort::parse("client_port 8000 8001"),
///     Ok((ClientPort { low: 8000, high: Some(8001) }, 21))
/// );
/// ```
pub trait Record: Sized {
    /// Parse `text` into this record, returning the number of bytes consumed.
    ///
    /// On failure any fields matched before the failing element stay written.
    fn parse_into(&mut self, text: &str) -> Result<usize, NoMatch>;

    /// Produces a representation of the record's grammar.
    fn repr(f: &mut Formatter<'_>) -> Result<(), Error>;

    /// Parse a fresh record from `text`.
    fn parse(text: &str) -> Result<(Self, usize), NoMatch>
    where
        Self: Default,
    {
        let mut record = Self::default();
        let read = record.parse_into(text)?;
        Ok((record, read))
    }
}

/// The grammar of a [Record] as a [Binding], for use with
/// [embed](crate::binding::embed) and [nested](crate::combinators::nested).
#[derive_where(Clone, Copy, Debug, Default)]
pub struct Derived<T>(PhantomData<fn() -> T>);

pub fn derived<T: Record>() -> Derived<T> {
    Derived(PhantomData)
}

impl<T: Record> Binding<T> for Derived<T> {
    #[inline]
    fn bind(&self, record: &mut T, text: &str) -> Result<usize, NoMatch> {
        record.parse_into(text)
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        T::repr(f)
    }
}
