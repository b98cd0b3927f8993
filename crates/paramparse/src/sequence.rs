//! The runtime composition engine, an ordered list of bindings registered at construction.
use std::fmt::{self, Debug, Display, Error, Formatter};

use tracing::trace;

use crate::{
    binding::{anchor, embed, field, grammar},
    Binding, NoMatch, Rule,
};

/// The single byte required between consecutive bindings.
pub const DELIMITER: u8 = b' ';

/// Steps over the [`DELIMITER`] expected at `read`.
pub(crate) fn delimit(text: &str, read: usize) -> Result<usize, NoMatch> {
    if text.as_bytes().get(read) == Some(&DELIMITER) {
        Ok(read + 1)
    } else {
        trace!(at = read, "missing delimiter between bindings");
        Err(NoMatch::at(read))
    }
}

/// Applies a binding from `read`, returning the position after it.
pub(crate) fn step<R, B: Binding<R> + ?Sized>(
    binding: &B,
    record: &mut R,
    text: &str,
    read: usize,
) -> Result<usize, NoMatch> {
    let rest = text.get(read..).ok_or(NoMatch::at(read))?;
    match binding.bind(record, rest) {
        Ok(len) => Ok(read + len),
        Err(e) => {
            let e = e.offset(read);
            trace!(at = e.at, grammar = %grammar::<R, B>(binding), "binding did not match");
            Err(e)
        }
    }
}

type DynBinding<R> = Box<dyn Binding<R> + Send + Sync>;

/// Bindings applied in the order they were added, separated by single spaces.
///
/// Built once, then shared (it is [Send] and [Sync]) and reused for any number of parses.
pub struct Sequence<R> {
    bindings: Vec<DynBinding<R>>,
}

impl<R> Default for Sequence<R> {
    fn default() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }
}

impl<R: 'static> Sequence<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append any binding, including another sequence over the same record.
    #[must_use]
    pub fn then<B: Binding<R> + Send + Sync + 'static>(mut self, binding: B) -> Self {
        self.bindings.push(Box::new(binding));
        self
    }

    /// Append a [field] binding.
    #[must_use]
    pub fn field<P: Rule + Send + Sync + 'static>(
        self,
        access: fn(&mut R) -> &mut P::Suc,
        rule: P,
    ) -> Self {
        self.then(field(access, rule))
    }

    /// Append an [anchor] binding.
    #[must_use]
    pub fn anchor<P: Rule + Send + Sync + 'static>(self, rule: P) -> Self {
        self.then(anchor(rule))
    }

    /// Append an [embed] binding.
    #[must_use]
    pub fn embed<T: 'static, C: Binding<T> + Send + Sync + 'static>(
        self,
        access: fn(&mut R) -> &mut T,
        composition: C,
    ) -> Self {
        self.then(embed(access, composition))
    }
}

impl<R> Sequence<R> {
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Parse `text` into `dest`, returning the number of bytes consumed.
    ///
    /// Stops at the first binding (or missing delimiter) that fails. Fields written by the
    /// bindings before it are left as they are.
    pub fn parse(&self, dest: &mut R, text: &str) -> Result<usize, NoMatch> {
        let mut read = 0;
        for (index, binding) in self.bindings.iter().enumerate() {
            if index > 0 {
                read = delimit(text, read)?;
            }
            read = step(binding.as_ref(), dest, text, read)?;
        }
        Ok(read)
    }
}

impl<R> Binding<R> for Sequence<R> {
    fn bind(&self, record: &mut R, text: &str) -> Result<usize, NoMatch> {
        self.parse(record, text)
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        let mut bindings = self.bindings.iter();
        if let Some(first) = bindings.next() {
            first.repr(f)?;
        }
        for binding in bindings {
            write!(f, " ")?;
            binding.repr(f)?;
        }
        Ok(())
    }
}

impl<R> Display for Sequence<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Binding::repr(self, f)
    }
}

impl<R> Debug for Sequence<R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("grammar", &self.to_string())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        combinators::{array, optional},
        rules::{hex, int, literal},
    };
    use std::{sync::Arc, thread};

    #[derive(Default, Debug, PartialEq, Clone)]
    struct S {
        n1: i32,
        n2: i32,
    }

    fn pair() -> Sequence<S> {
        Sequence::new()
            .field(|s: &mut S| &mut s.n1, int())
            .field(|s: &mut S| &mut s.n2, int())
    }

    #[test]
    fn struct_number() {
        let mut s = S::default();
        assert_eq!(pair().parse(&mut s, "1 13"), Ok(4));
        assert_eq!(s, S { n1: 1, n2: 13 });
    }

    #[test]
    fn empty_sequence_consumes_nothing() {
        let mut s = S::default();
        assert_eq!(Sequence::<S>::new().parse(&mut s, "1 2"), Ok(0));
        assert!(Sequence::<S>::new().is_empty());
        assert_eq!(pair().len(), 2);
    }

    #[test]
    fn requires_single_space() {
        let mut s = S::default();
        assert_eq!(pair().parse(&mut s, "1,13"), Err(NoMatch::at(1)));
        assert_eq!(pair().parse(&mut s, "1"), Err(NoMatch::at(1)));
        // the numeric prefix skips any extra leading whitespace itself
        assert_eq!(pair().parse(&mut s, "1  13"), Ok(5));
    }

    #[test]
    fn trailing_text_is_not_consumed() {
        let mut s = S::default();
        assert_eq!(pair().parse(&mut s, "7 8 9"), Ok(3));
        assert_eq!(s, S { n1: 7, n2: 8 });
    }

    #[test]
    fn no_rollback_on_failure() {
        let grammar = Sequence::new()
            .field(|s: &mut S| &mut s.n1, int())
            .anchor(literal("and"))
            .field(|s: &mut S| &mut s.n2, int());
        let mut s = S { n1: 0, n2: 99 };
        assert_eq!(grammar.parse(&mut s, "5 or 6"), Err(NoMatch::at(2)));
        assert_eq!(s, S { n1: 5, n2: 99 });
    }

    #[test]
    fn literal_anchor() {
        let grammar = Sequence::new()
            .anchor(literal("hello"))
            .field(|s: &mut S| &mut s.n1, int());
        let mut s = S::default();
        assert_eq!(grammar.parse(&mut s, "hello 2"), Ok(7));
        assert_eq!(s.n1, 2);
        assert_eq!(grammar.parse(&mut s, "hello"), Err(NoMatch::at(5)));
        assert_eq!(grammar.parse(&mut s, "hell 1"), Err(NoMatch::at(0)));
    }

    #[test]
    fn sequences_flatten() {
        let grammar = Sequence::new()
            .anchor(literal("pair"))
            .then(pair())
            .anchor(literal("end"));
        let mut s = S::default();
        assert_eq!(grammar.parse(&mut s, "pair 3 4 end"), Ok(12));
        assert_eq!(s, S { n1: 3, n2: 4 });
    }

    #[derive(Default, Debug, PartialEq)]
    struct Mixed {
        mask: u32,
        ids: Vec<i32>,
        limit: Option<i32>,
    }

    #[test]
    fn grammar_display() {
        let grammar = Sequence::new()
            .anchor(literal("mask"))
            .field(|m: &mut Mixed| &mut m.mask, hex())
            .field(|m: &mut Mixed| &mut m.ids, array(int()))
            .field(|m: &mut Mixed| &mut m.limit, optional(int()));
        assert_eq!(grammar.to_string(), "mask <hex> <int>, ... (none | <int>)");

        let mut m = Mixed::default();
        assert_eq!(grammar.parse(&mut m, "mask 0f 1, 2 none"), Ok(17));
        assert_eq!(
            m,
            Mixed {
                mask: 15,
                ids: vec![1, 2],
                limit: None
            }
        );
    }

    #[test]
    fn shared_between_threads() {
        let grammar = Arc::new(pair());
        let handles = (0..4)
            .map(|i| {
                let grammar = Arc::clone(&grammar);
                thread::spawn(move || {
                    let mut s = S::default();
                    let text = format!("{i} {}", i * 10);
                    grammar.parse(&mut s, &text).map(|read| (s, read))
                })
            })
            .collect::<Vec<_>>();

        for (i, handle) in handles.into_iter().enumerate() {
            let i = i as i32;
            let expected = S { n1: i, n2: i * 10 };
            let (s, _) = handle.join().expect("parser thread panicked").expect("parse failed");
            assert_eq!(s, expected);
        }
    }
}
