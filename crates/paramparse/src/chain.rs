//! Compositions fixed entirely at compile time, as a nested tuple of bindings.
//! ```text
//! (B1, (B2, (B3, End)))
//! ```
//! Every binding's value type is checked against its field, and parsing matches a
//! [Sequence](crate::Sequence) of the same bindings byte for byte.
use std::fmt::{Error, Formatter};

use crate::{
    sequence::{delimit, step},
    Binding, NoMatch,
};

/// A list of bindings applied in order, separated by single spaces.
#[cfg_attr(
    feature = "nightly",
    rustc_on_unimplemented(
        message = "`{Self}` is not a chain of bindings for `{R}`, construct one with `chain!`",
        label = "Not a `Chain`",
    )
)]
pub trait Chain<R>: Binding<R> {
    /// The number of bindings in the chain.
    const LEN: usize;

    /// Parse `text` into `dest`, returning the number of bytes consumed.
    fn parse(&self, dest: &mut R, text: &str) -> Result<usize, NoMatch> {
        self.bind(dest, text)
    }
}

/// The empty chain.
#[derive(Clone, Copy, Debug, Default)]
pub struct End;

impl<R> Binding<R> for End {
    #[inline]
    fn bind(&self, _: &mut R, _: &str) -> Result<usize, NoMatch> {
        Ok(0)
    }

    fn repr(&self, _: &mut Formatter<'_>) -> Result<(), Error> {
        Ok(())
    }
}

impl<R> Chain<R> for End {
    const LEN: usize = 0;
}

impl<R, B: Binding<R>, Rest: Chain<R>> Binding<R> for (B, Rest) {
    #[inline]
    fn bind(&self, record: &mut R, text: &str) -> Result<usize, NoMatch> {
        let read = step(&self.0, record, text, 0)?;
        if Rest::LEN == 0 {
            Ok(read)
        } else {
            let read = delimit(text, read)?;
            let rest = text.get(read..).ok_or(NoMatch::at(read))?;
            self.1
                .bind(record, rest)
                .map(|len| read + len)
                .map_err(|e| e.offset(read))
        }
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        self.0.repr(f)?;
        if Rest::LEN > 0 {
            write!(f, " ")?;
            self.1.repr(f)?;
        }
        Ok(())
    }
}

impl<R, B: Binding<R>, Rest: Chain<R>> Chain<R> for (B, Rest) {
    const LEN: usize = Rest::LEN + 1;
}

/// Helper to build a [Chain] from a list of bindings.
/// ```ignore
/// (B1, (B2, (B3, End)))
/// // is equivalent to
/// chain!(B1, B2, B3)
/// ```
#[macro_export]
macro_rules! chain {
    () => {
        $crate::chain::End
    };
    ($b:expr $(, $rest:expr)* $(,)?) => {
        ($b, $crate::chain!($($rest),*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        binding::{anchor, embed, field},
        combinators::{array, optional},
        rules::{int, literal},
        Sequence,
    };

    #[derive(Default, Debug, PartialEq)]
    struct S {
        n1: i32,
        n2: i32,
    }

    #[derive(Default, Debug, PartialEq)]
    struct Nest {
        n: i32,
        s: S,
    }

    fn chain_len<R, C: Chain<R>>(_: &C) -> usize {
        C::LEN
    }

    #[test]
    fn struct_number() {
        let grammar = chain!(
            field(|s: &mut S| &mut s.n1, int()),
            field(|s: &mut S| &mut s.n2, int()),
        );
        let mut s = S::default();
        assert_eq!(grammar.parse(&mut s, "1 13"), Ok(4));
        assert_eq!(s, S { n1: 1, n2: 13 });
        assert_eq!(chain_len::<S, _>(&grammar), 2);
    }

    #[test]
    fn empty_chain() {
        let mut s = S::default();
        assert_eq!(Chain::<S>::parse(&chain!(), &mut s, "1"), Ok(0));
    }

    #[test]
    fn nested_chain_in_place() {
        let grammar = chain!(
            field(|n: &mut Nest| &mut n.n, int()),
            embed(
                |n: &mut Nest| &mut n.s,
                chain!(
                    field(|s: &mut S| &mut s.n1, int()),
                    field(|s: &mut S| &mut s.n2, int()),
                )
            ),
        );
        let mut n = Nest::default();
        assert_eq!(grammar.parse(&mut n, "3 2 1"), Ok(5));
        assert_eq!(
            n,
            Nest {
                n: 3,
                s: S { n1: 2, n2: 1 }
            }
        );
    }

    #[test]
    fn failure_offsets_match_sequence() {
        let chained = chain!(
            anchor(literal("hello")),
            field(|s: &mut S| &mut s.n1, int()),
            field(|s: &mut S| &mut s.n2, int()),
        );
        let sequence = Sequence::new()
            .anchor(literal("hello"))
            .field(|s: &mut S| &mut s.n1, int())
            .field(|s: &mut S| &mut s.n2, int());

        for text in ["hello 2 3", "hello 2", "hello", "hell 1 2", "hello 1,2", "hello 1 2 3", ""] {
            let (mut a, mut b) = (S::default(), S::default());
            assert_eq!(chained.parse(&mut a, text), sequence.parse(&mut b, text), "{text}");
            assert_eq!(a, b, "{text}");
        }
    }

    #[derive(Default, Debug, PartialEq)]
    struct Listing {
        ids: Vec<i32>,
        last: Option<i32>,
    }

    #[test]
    fn grammar_repr() {
        let grammar = chain!(
            anchor(literal("ids")),
            field(|l: &mut Listing| &mut l.ids, array(int())),
            field(|l: &mut Listing| &mut l.last, optional(int())),
        );
        assert_eq!(
            crate::binding::grammar::<Listing, _>(&grammar),
            "ids <int>, ... (none | <int>)"
        );
    }
}
