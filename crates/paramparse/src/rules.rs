//! Primitive rules, each matching a single grammar element at the start of the text.
use std::{
    fmt::{Error, Formatter},
    marker::PhantomData,
};

use crate::{NoMatch, Rule, RuleResult};
use derive_where::derive_where;

/// Integer types a numeric prefix can be narrowed into.
///
/// Prefixes are first read into an [`i64`], saturating at its bounds. Narrower targets then
/// keep the low bits, so `4294967297` read as an [`i32`] is `1`.
pub trait FromLong: Sized {
    fn from_long(value: i64) -> Self;
}

macro_rules! wrap_from_long {
    ($($t:ty),*) => {
        $(
            impl FromLong for $t {
                #[inline]
                fn from_long(value: i64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

wrap_from_long!(i8, i16, i32, i64, u8, u16, u32, u64, usize);

/// Reads the longest numeric prefix in the radix, returning the value and bytes consumed.
/// - Leading whitespace, a sign and (for base 16) a `0x` prefix are part of the number.
/// - Without any digits nothing is consumed and the value is zero.
fn scan_long(text: &str, radix: u32) -> (i64, usize) {
    let bytes = text.as_bytes();
    let is_digit = |pos: usize| {
        bytes
            .get(pos)
            .and_then(|b| char::from(*b).to_digit(radix))
    };

    let mut pos = bytes
        .iter()
        .take_while(|b| b.is_ascii_whitespace() || **b == b'\x0b')
        .count();

    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    if radix == 16
        && bytes.get(pos) == Some(&b'0')
        && matches!(bytes.get(pos + 1), Some(b'x' | b'X'))
        && is_digit(pos + 2).is_some()
    {
        pos += 2;
    }

    let start = pos;
    let mut magnitude: i128 = 0;
    while let Some(digit) = is_digit(pos) {
        magnitude = magnitude
            .saturating_mul(i128::from(radix))
            .saturating_add(i128::from(digit));
        pos += 1;
    }

    if pos == start {
        return (0, 0);
    }

    let value = if negative { -magnitude } else { magnitude };
    (
        value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64,
        pos,
    )
}

/// Parses a numeric prefix, always succeeding.
///
/// <div class="warning">With no digits present this matches zero bytes with the value zero, so a
/// zero length match is the caller's signal that no number was present.</div>
#[derive_where(Clone, Copy, Debug)]
pub struct Number<T> {
    radix: u32,
    _marker: PhantomData<T>,
}

/// A numeric prefix in any radix from 2 to 36, a radix outside that range is clamped into it.
pub fn number<T: FromLong>(radix: u32) -> Number<T> {
    Number {
        radix: radix.clamp(2, 36),
        _marker: PhantomData,
    }
}

/// A decimal integer, such as `-42`.
pub fn int() -> Number<i32> {
    number(10)
}

/// A hexadecimal integer, such as `00000003`.
pub fn hex() -> Number<u32> {
    number(16)
}

impl<T: FromLong> Rule for Number<T> {
    type Suc = T;

    #[inline]
    fn comp(&self, text: &str) -> RuleResult<T> {
        let (value, read) = scan_long(text, self.radix);
        Ok((T::from_long(value), read))
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self.radix {
            10 => write!(f, "<int>"),
            16 => write!(f, "<hex>"),
            r => write!(f, "<base {r}>"),
        }
    }
}

/// Matches fixed text exactly (case sensitive).
#[derive(Clone, Copy, Debug)]
pub struct Literal {
    text: &'static str,
}

pub fn literal(text: &'static str) -> Literal {
    Literal { text }
}

impl Rule for Literal {
    type Suc = ();

    #[inline]
    fn comp(&self, text: &str) -> RuleResult<()> {
        if text.starts_with(self.text) {
            Ok(((), self.text.len()))
        } else {
            Err(NoMatch::here())
        }
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "{}", self.text)
    }
}

fn write_alternatives<'a>(
    f: &mut Formatter<'_>,
    mut tags: impl Iterator<Item = &'a str>,
) -> Result<(), Error> {
    write!(f, "(")?;
    if let Some(first) = tags.next() {
        write!(f, "{first}")?;
    }
    for tag in tags {
        write!(f, " | {tag}")?;
    }
    write!(f, ")")
}

/// Matches the first tag (in declared order) that prefixes the text, returning its index.
///
/// Tags are not matched greedily: with `["A", "AB"]` the text `AB` matches `A`, so
/// overlapping tags should be listed longest first.
#[derive(Clone, Copy, Debug)]
pub struct Tags {
    tags: &'static [&'static str],
}

pub fn tags(tags: &'static [&'static str]) -> Tags {
    Tags { tags }
}

impl Rule for Tags {
    type Suc = usize;

    #[inline]
    fn comp(&self, text: &str) -> RuleResult<usize> {
        self.tags
            .iter()
            .position(|tag| text.starts_with(tag))
            .map(|index| (index, self.tags[index].len()))
            .ok_or(NoMatch::here())
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write_alternatives(f, self.tags.iter().copied())
    }
}

/// As [tags], but each tag produces a value (typically an enum variant) rather than an index.
#[derive_where(Clone, Copy)]
#[derive_where(Debug; E: std::fmt::Debug)]
pub struct Variants<E: 'static> {
    variants: &'static [(&'static str, E)],
}

pub fn variants<E: Clone + 'static>(variants: &'static [(&'static str, E)]) -> Variants<E> {
    Variants { variants }
}

impl<E: Clone + 'static> Rule for Variants<E> {
    type Suc = E;

    #[inline]
    fn comp(&self, text: &str) -> RuleResult<E> {
        self.variants
            .iter()
            .find(|(tag, _)| text.starts_with(tag))
            .map(|(tag, value)| (value.clone(), tag.len()))
            .ok_or(NoMatch::here())
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write_alternatives(f, self.variants.iter().map(|(tag, _)| *tag))
    }
}

impl<P: Rule + ?Sized> Rule for &P {
    type Suc = P::Suc;

    #[inline]
    fn comp(&self, text: &str) -> RuleResult<Self::Suc> {
        (**self).comp(text)
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        (**self).repr(f)
    }
}

impl<P: Rule + ?Sized> Rule for Box<P> {
    type Suc = P::Suc;

    #[inline]
    fn comp(&self, text: &str) -> RuleResult<Self::Suc> {
        (**self).comp(text)
    }

    fn repr(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        (**self).repr(f)
    }
}
