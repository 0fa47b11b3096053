/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Decoder for the textual range encoding. Encoding is the
//! [`std::fmt::Display`] implementation of each type.
//!
//! ```text
//! range    = dim { ',' dim }
//! dim      = '' | list | named
//! list     = '(' [ element { ',' element } ] ')' | element
//! element  = [int] [ ':' [int] [ ':' [int] ] ]
//! named    = quoted ( quoted list | '{' [ group { ',' group } ] '}' )
//! group    = quoted quoted list
//! quoted   = '"' { char | '\"' | '\\' } '"'
//! ```
//!
//! Whitespace is allowed between tokens. Omitted element bounds
//! default to `0`, `-1` (the end) and a step of `1`.

use nom::IResult;
use nom::character::complete::char;
use nom::character::complete::digit1;
use nom::character::complete::multispace0;
use nom::combinator::map;
use nom::combinator::opt;
use nom::combinator::recognize;
use nom::error::ErrorKind;
use nom::error::ParseError;
use nom::multi::separated_list0;
use nom::multi::separated_list1;
use nom::sequence::delimited;
use nom::sequence::pair;
use nom::sequence::preceded;
use nom::sequence::terminated;

use crate::dim::Dim;
use crate::element::SliceElement;
use crate::group::CompositeRange1D;
use crate::group::Range1DGroup;
use crate::range::Range;
use crate::range1d::Range1D;

/// An error decoding a range from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid range `{text}` at position {position}: {reason}")]
pub struct DecodeError {
    /// Byte offset of the offending input.
    pub position: usize,
    /// The offending fragment, up to the next delimiter.
    pub text: String,
    pub reason: &'static str,
}

impl DecodeError {
    fn new(input: &str, rest: &str, reason: &'static str) -> Self {
        let end = match rest.find(|c: char| matches!(c, ',' | ')' | '}')) {
            Some(0) => rest.chars().next().map_or(0, |c| c.len_utf8()),
            Some(end) => end,
            None => rest.len(),
        };
        Self {
            position: input.len() - rest.len(),
            text: rest[..end].trim_end().to_string(),
            reason,
        }
    }
}

/// Decode a range. The empty string is [`Range::all`].
pub fn decode(input: &str) -> Result<Range, DecodeError> {
    tracing::trace!(input, "decode");
    if input.trim().is_empty() {
        return Ok(Range::all());
    }
    finish(input, range).map(Range::from_dims)
}

/// Decode a single, possibly named, dimension.
pub fn decode_dim(input: &str) -> Result<Dim, DecodeError> {
    finish(input, dim)
}

/// Decode an unnamed dimension.
pub fn decode_range1d(input: &str) -> Result<Range1D, DecodeError> {
    finish(input, slice_list)
}

pub fn decode_element(input: &str) -> Result<SliceElement, DecodeError> {
    finish(input, element)
}

/// Where parsing stopped and what was expected there.
#[derive(Debug)]
struct Failure<'a> {
    input: &'a str,
    reason: &'static str,
}

impl<'a> ParseError<&'a str> for Failure<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        let reason = match kind {
            ErrorKind::Char => "unexpected character",
            ErrorKind::Digit => "expected an integer",
            _ => "malformed input",
        };
        Failure { input, reason }
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

type Res<'a, T> = IResult<&'a str, T, Failure<'a>>;

fn fail<'a, T>(input: &'a str, reason: &'static str) -> Res<'a, T> {
    Err(nom::Err::Failure(Failure { input, reason }))
}

/// Run `parser`, turning a recoverable error into a failure with
/// `reason`.
fn expect<'a, T>(
    mut parser: impl FnMut(&'a str) -> Res<'a, T>,
    reason: &'static str,
) -> impl FnMut(&'a str) -> Res<'a, T> {
    move |input| {
        parser(input).map_err(|err| match err {
            nom::Err::Error(_) => nom::Err::Failure(Failure { input, reason }),
            other => other,
        })
    }
}

fn finish<'a, T>(
    input: &'a str,
    parser: impl FnMut(&'a str) -> Res<'a, T>,
) -> Result<T, DecodeError> {
    match terminated(parser, multispace0)(input) {
        Ok(("", value)) => Ok(value),
        Ok((rest, _)) => Err(DecodeError::new(input, rest, "unexpected trailing input")),
        Err(nom::Err::Error(failure) | nom::Err::Failure(failure)) => {
            Err(DecodeError::new(input, failure.input, failure.reason))
        }
        Err(nom::Err::Incomplete(_)) => Err(DecodeError::new(input, "", "incomplete input")),
    }
}

fn comma(input: &str) -> Res<'_, char> {
    preceded(multispace0, char(','))(input)
}

fn integer(input: &str) -> Res<'_, i64> {
    let (rest, digits) = recognize(pair(opt(char('-')), digit1))(input)?;
    // The extremes have no successor or predecessor to bound a slice with.
    match digits.parse::<i64>() {
        Ok(value) if value != i64::MAX && value != i64::MIN => Ok((rest, value)),
        _ => fail(input, "integer literal out of range"),
    }
}

fn bound(input: &str) -> Res<'_, Option<i64>> {
    delimited(multispace0, opt(integer), multispace0)(input)
}

fn element(input: &str) -> Res<'_, SliceElement> {
    let (rest, from) = bound(input)?;
    let (rest, tail) = opt(pair(
        preceded(char(':'), bound),
        opt(preceded(char(':'), bound)),
    ))(rest)?;
    let Some((to, step)) = tail else {
        return Ok((rest, from.map_or(SliceElement::All, SliceElement::Single)));
    };
    let step = step.flatten().unwrap_or(1);
    match SliceElement::stepped(from.unwrap_or(0), to.unwrap_or(-1), step) {
        Ok(elem) => Ok((rest, elem)),
        Err(_) => fail(input, "step must be nonzero"),
    }
}

fn slice_list(input: &str) -> Res<'_, Range1D> {
    let (rest, open) = opt(preceded(multispace0, char('(')))(input)?;
    if open.is_none() {
        return map(element, Range1D::from)(rest);
    }
    let (rest, close) = opt(preceded(multispace0, char(')')))(rest)?;
    if close.is_some() {
        return Ok((rest, Range1D::none()));
    }
    let (rest, elems) = separated_list1(comma, element)(rest)?;
    let (rest, _) = expect(preceded(multispace0, char(')')), "expected `)`")(rest)?;
    Ok((rest, Range1D::from_elements(elems)))
}

fn quoted(input: &str) -> Res<'_, String> {
    let (rest, _) = preceded(multispace0, char('"'))(input)?;
    let mut text = String::new();
    let mut chars = rest.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((&rest[i + 1..], text)),
            '\\' => match chars.next() {
                Some((_, escaped)) => text.push(escaped),
                None => break,
            },
            c => text.push(c),
        }
    }
    fail(input, "unterminated string")
}

fn group(input: &str) -> Res<'_, Range1DGroup> {
    let (rest, name) = quoted(input)?;
    let (rest, color) = expect(quoted, "expected a color")(rest)?;
    let (rest, range) = slice_list(rest)?;
    Ok((rest, Range1DGroup::new(name, color, range)))
}

fn named(input: &str) -> Res<'_, Dim> {
    let (rest, name) = quoted(input)?;
    let (rest, groups) = opt(preceded(
        preceded(multispace0, char('{')),
        separated_list0(comma, group),
    ))(rest)?;
    if let Some(groups) = groups {
        let (rest, _) = expect(preceded(multispace0, char('}')), "expected `}`")(rest)?;
        return match CompositeRange1D::new(name, groups) {
            Ok(composite) => Ok((rest, Dim::Composite(composite))),
            Err(_) => fail(input, "invalid composite"),
        };
    }
    let (rest, color) = expect(quoted, "expected a color or `{`")(rest)?;
    let (rest, range) = slice_list(rest)?;
    Ok((rest, Dim::Group(Range1DGroup::new(name, color, range))))
}

fn dim(input: &str) -> Res<'_, Dim> {
    let (rest, _) = multispace0(input)?;
    match rest.chars().next() {
        Some('"') => named(rest),
        None | Some(',') => Ok((rest, Dim::default())),
        Some(_) => map(slice_list, Dim::Plain)(rest),
    }
}

fn range(input: &str) -> Res<'_, Vec<Dim>> {
    separated_list1(comma, dim)(input)
}
