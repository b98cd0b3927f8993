//! Declarative rules for parsing fixed grammar parameter strings directly into structs.
//!
//! A grammar is declared once as an ordered composition of [rules](Rule) bound to the fields of
//! a destination record, then applied to many inputs:
//! ```
//! use paramparse::prelude::*;
//!
//! #[derive(Default)]
//! struct Port {
//!     low: i32,
//!     high: Option<i32>,
//! }
//!
//! let grammar = Sequence::new()
//!     .anchor(literal("port"))
//!     .field(|p: &mut Port| &mut p.low, int())
//!     .field(|p: &mut Port| &mut p.high, optional(int()));
//!
//! let mut port = Port::default();
//! assert_eq!(grammar.parse(&mut port, "port 554 none"), Ok(13));
//! assert_eq!((port.low, port.high), (554, None));
//! ```
//!
//! Bindings are separated by exactly one space, arrays by `", "`, and `none` marks an absent
//! optional. Parsing is a single left to right pass with no backtracking, and a failure leaves
//! any fields already written in place.
#![allow(internal_features)]
#![cfg_attr(feature = "nightly", feature(rustc_attrs))]
#![warn(clippy::style)]
#![warn(clippy::perf)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]

// Lets the derive macro's `::paramparse` paths resolve inside this crate's own tests.
extern crate self as paramparse;

use std::fmt::{Display, Error, Formatter};

pub mod binding;
pub mod chain;
pub mod combinators;
pub mod error;
pub mod record;
pub mod rules;
pub mod sequence;

pub use binding::Binding;
pub use chain::Chain;
pub use error::NoMatch;
pub use record::Record;
pub use sequence::Sequence;

#[cfg(feature = "derive")]
pub use paramparse_derive::Record;

/// The value produced by a [Rule], and the number of bytes it consumed.
pub type RuleResult<S> = Result<(S, usize), NoMatch>;

/// The core trait for recognising a grammar element at the start of some text.
///
/// On success the consumed length is never more than `text.len()`, and always lands on a
/// character boundary.
#[cfg_attr(
    feature = "nightly",
    rustc_on_unimplemented(
        message = "`{Self}` is not a `Rule` so cannot be combined & bound as one",
        label = "Not `Rule`",
    )
)]
pub trait Rule {
    type Suc;

    /// Attempt to match at the start of `text`.
    fn comp(&self, text: &str) -> RuleResult<Self::Suc>;

    /// Produces a representation of the grammar matched, for logging & error messages.
    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error>;
}

/// A simple wrapper to allow the [Rule::repr] function to implement [Display]
pub struct Repr<T>(pub T);

impl<P: Rule + ?Sized> Display for Repr<&P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.repr(f)
    }
}

/// Everything needed to declare a grammar.
pub mod prelude {
    pub use crate::binding::{anchor, embed, field, grammar, Binding};
    pub use crate::chain::{Chain, End};
    pub use crate::combinators::{array, mapsuc, nested, optional, record};
    pub use crate::rules::{hex, int, literal, number, tags, variants};
    pub use crate::{chain, NoMatch, Record, Repr, Rule, Sequence};
}
