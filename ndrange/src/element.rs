/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::num::NonZeroI64;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::parse::DecodeError;

/// The type of error for range operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum RangeError {
    #[error("unbound element `{elem}` cannot be resolved without a size")]
    MissingSize { elem: String },

    #[error("invalid step size: 0")]
    ZeroStep,

    #[error("position {position} out of range {size}")]
    PositionOutOfRange { position: i64, size: i64 },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

pub(crate) const ONE: NonZeroI64 = match NonZeroI64::new(1) {
    Some(one) => one,
    None => unreachable!(),
};

pub(crate) const MINUS_ONE: NonZeroI64 = match NonZeroI64::new(-1) {
    Some(minus_one) => minus_one,
    None => unreachable!(),
};

/// Resolve a bound against `total`. Negative bounds count from the
/// end: `-1` is one past the last index, `-2` the last index.
pub(crate) fn fix(value: i64, total: i64) -> i64 {
    if value < 0 { total + (value + 1) } else { value }
}

/// One primitive of a one-dimensional selection: everything, nothing,
/// a single index, or an arithmetic run of indices.
///
/// A `Slice` is half-open: `to` is exclusive in the direction of
/// travel. Negative `from`/`to` are relative to the end of the
/// dimension and are resolved only when a size is supplied. For a
/// negative step, `to == -1` instead means "down to and including 0",
/// and needs no size.
///
/// ```
/// # use ndrange::SliceElement;
/// let e = SliceElement::slice(2, 5);
/// assert_eq!(e.iter(None).unwrap().collect::<Vec<_>>(), vec![2, 3, 4]);
///
/// // The last two indices of a dimension of size 10.
/// let e = SliceElement::slice(-3, -1);
/// assert_eq!(e.iter(Some(10)).unwrap().collect::<Vec<_>>(), vec![8, 9]);
/// ```
///
/// Equality is defined by the selected index sequence rather than the
/// literal fields: `Single(3)`, `Slice(3, 4, 1)` and `Slice(3, 2, -1)`
/// are all equal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum SliceElement {
    /// Every index of the dimension.
    All,
    /// No index at all.
    None,
    /// Exactly one index.
    Single(i64),
    /// `from`, `from + step`, ... up to (excluding) `to`.
    Slice {
        from: i64,
        to: i64,
        step: NonZeroI64,
    },
}

impl SliceElement {
    /// The slice `from..to` with step 1.
    pub fn slice(from: i64, to: i64) -> Self {
        SliceElement::Slice { from, to, step: ONE }
    }

    /// The slice `from..to` with the given step, which must be nonzero.
    pub fn stepped(from: i64, to: i64, step: i64) -> Result<Self, RangeError> {
        let step = NonZeroI64::new(step).ok_or(RangeError::ZeroStep)?;
        Ok(SliceElement::Slice { from, to, step })
    }

    /// The literal `(from, to, step)` triple this element stands for.
    /// `Single(i64::MAX)` has no exclusive upper bound and is spelled
    /// descending.
    pub fn bounds(&self) -> (i64, i64, i64) {
        match *self {
            SliceElement::All => (0, -1, 1),
            SliceElement::None => (0, 0, 1),
            SliceElement::Single(index) => match index.checked_add(1) {
                Some(to) => (index, to, 1),
                None => (index, index - 1, -1),
            },
            SliceElement::Slice { from, to, step } => (from, to, step.get()),
        }
    }

    /// The step between consecutive indices.
    pub fn step(&self) -> i64 {
        self.bounds().2
    }

    pub fn is_all(&self) -> bool {
        self.bounds() == (0, -1, 1)
    }

    /// Whether this element selects nothing, regardless of size.
    pub fn is_none(&self) -> bool {
        matches!(self, SliceElement::None) || matches!(self.size(None), Ok(0))
    }

    /// Whether this element selects exactly one index, judged by its
    /// literal fields.
    pub fn is_single(&self) -> bool {
        match *self {
            SliceElement::Single(_) => true,
            SliceElement::Slice { from, to, step } => from.checked_add(step.get()) == Some(to),
            _ => false,
        }
    }

    /// Whether resolving this element requires the size of the
    /// dimension.
    pub fn is_unbound(&self) -> bool {
        match *self {
            SliceElement::All => true,
            SliceElement::None => false,
            SliceElement::Single(index) => index < 0,
            SliceElement::Slice { from, to, step } => {
                from < 0 || (to < 0 && !(to == -1 && step.get() < 0))
            }
        }
    }

    /// Resolve into concrete `(start, stop, step)`. `stop` is exclusive
    /// in the direction of travel and may be `-1` for a descending run
    /// that includes 0.
    pub(crate) fn resolve(&self, total: Option<i64>) -> Result<(i64, i64, i64), RangeError> {
        let (from, to, step) = self.bounds();
        if !self.is_unbound() {
            return Ok((from, to, step));
        }
        let Some(total) = total else {
            return Err(RangeError::MissingSize {
                elem: self.describe(),
            });
        };
        if let SliceElement::Single(index) = *self {
            return Ok(SliceElement::Single(fix(index, total)).bounds());
        }
        let to = if step < 0 && to == -1 {
            -1
        } else {
            fix(to, total)
        };
        Ok((fix(from, total), to, step))
    }

    fn describe(&self) -> String {
        match self {
            SliceElement::All => "all".to_string(),
            other => other.to_string(),
        }
    }

    /// The number of indices this element selects; never negative.
    pub fn size(&self, total: Option<i64>) -> Result<i64, RangeError> {
        let (start, stop, step) = self.resolve(total)?;
        Ok(count(start, stop, step))
    }

    /// The absolute index of the `local`-th index of this element.
    pub fn invert(&self, local: i64, total: Option<i64>) -> Result<i64, RangeError> {
        if self.is_all() {
            return Ok(local);
        }
        let (start, _, step) = self.resolve(total)?;
        Ok(start + local * step)
    }

    /// Whether `value` is one of the indices selected by this element.
    pub fn contains(&self, value: i64, total: Option<i64>) -> Result<bool, RangeError> {
        if self.is_all() {
            return Ok(value >= 0 && total.map_or(true, |total| value < total));
        }
        let (start, stop, step) = self.resolve(total)?;
        Ok(if step > 0 {
            value >= start && value < stop && (value - start) % step == 0
        } else {
            value <= start && value > stop && (start - value) % -step == 0
        })
    }

    /// The first selected index, if any.
    pub fn first(&self, total: Option<i64>) -> Result<Option<i64>, RangeError> {
        Ok(self.iter(total)?.next())
    }

    /// The last selected index, if any.
    pub fn last(&self, total: Option<i64>) -> Result<Option<i64>, RangeError> {
        Ok(self.iter(total)?.last())
    }

    /// A fresh iterator over the selected indices.
    pub fn iter(&self, total: Option<i64>) -> Result<SliceElementIter, RangeError> {
        let (start, stop, step) = self.resolve(total)?;
        Ok(SliceElementIter {
            next: start,
            remaining: count(start, stop, step),
            step,
        })
    }

    /// The element that selects the same indices in the opposite
    /// order. Unbound elements with a step other than ±1 cannot be
    /// reversed without a size.
    pub fn reverse(&self) -> Result<Self, RangeError> {
        match *self {
            SliceElement::All => Ok(SliceElement::Slice {
                from: -2,
                to: -1,
                step: MINUS_ONE,
            }),
            SliceElement::None | SliceElement::Single(_) => Ok(*self),
            SliceElement::Slice { .. } if self.is_none() => Ok(SliceElement::None),
            SliceElement::Slice { from, to, step } => match step.get() {
                // Ascending runs stopping at 0 are empty whatever the size.
                1 if to == 0 => Ok(SliceElement::None),
                1 => Ok(SliceElement::Slice {
                    from: to.saturating_sub(1),
                    to: from.saturating_sub(1),
                    step: MINUS_ONE,
                }),
                // Starting one past the end, the run reaches the end.
                -1 if from == -1 => Ok(SliceElement::slice(to.saturating_add(1), -1)),
                -1 => Ok(SliceElement::slice(to.saturating_add(1), from.saturating_add(1))),
                step => {
                    let n = self.size(None)?;
                    if n == 0 {
                        return Ok(SliceElement::None);
                    }
                    let last = from + (n - 1) * step;
                    SliceElement::stepped(last, from - step.signum(), -step)
                }
            },
        }
    }

    /// The same element with every end-relative bound moved by
    /// `offset`, which must not be positive. The descending "down to
    /// 0" sentinel is not relative and stays put.
    pub(crate) fn shift_relative(&self, offset: i64) -> Self {
        let shift = |value: i64| if value < 0 { value.saturating_add(offset) } else { value };
        match *self {
            SliceElement::All => SliceElement::slice(0, shift(-1)),
            SliceElement::None => SliceElement::None,
            SliceElement::Single(index) => SliceElement::Single(shift(index)),
            SliceElement::Slice { from, to, step } => SliceElement::Slice {
                from: shift(from),
                to: if step.get() < 0 && to == -1 { to } else { shift(to) },
                step,
            },
        }
    }

    /// The normal form used for equality and hashing.
    fn canonical(&self) -> (i64, i64, i64) {
        if self.is_unbound() {
            return self.bounds();
        }
        let (start, _, step) = self.bounds();
        match self.size(None) {
            Ok(0) => (0, 0, 1),
            Ok(1) => SliceElement::Single(start).bounds(),
            Ok(n) => n
                .checked_mul(step)
                .and_then(|span| start.checked_add(span))
                .map_or_else(|| self.bounds(), |stop| (start, stop, step)),
            Err(_) => self.bounds(),
        }
    }
}

fn count(start: i64, stop: i64, step: i64) -> i64 {
    let (start, stop, step) = (i128::from(start), i128::from(stop), i128::from(step));
    let n = if step > 0 {
        if stop > start {
            (stop - start + step - 1) / step
        } else {
            0
        }
    } else if start > stop {
        (start - stop - step - 1) / -step
    } else {
        0
    };
    i64::try_from(n).unwrap_or(i64::MAX)
}

impl PartialEq for SliceElement {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for SliceElement {}

impl Hash for SliceElement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for SliceElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return Ok(());
        }
        let (from, to, step) = self.bounds();
        // A relative descending single keeps its literal form.
        if self.is_single() && (step == 1 || !self.is_unbound()) {
            return write!(f, "{}", from);
        }
        write!(f, "{}:{}", from, to)?;
        if step != 1 {
            write!(f, ":{}", step)?;
        }
        Ok(())
    }
}

impl FromStr for SliceElement {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::decode_element(s)
    }
}

impl From<i64> for SliceElement {
    fn from(index: i64) -> Self {
        SliceElement::Single(index)
    }
}

impl From<std::ops::Range<i64>> for SliceElement {
    fn from(r: std::ops::Range<i64>) -> Self {
        SliceElement::slice(r.start, r.end)
    }
}

impl From<std::ops::RangeFrom<i64>> for SliceElement {
    fn from(r: std::ops::RangeFrom<i64>) -> Self {
        SliceElement::slice(r.start, -1)
    }
}

/// Iterator over the indices of a [`SliceElement`].
#[derive(Debug, Clone)]
pub struct SliceElementIter {
    next: i64,
    remaining: i64,
    step: i64,
}

impl Iterator for SliceElementIter {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining <= 0 {
            return None;
        }
        let value = self.next;
        self.next = self.next.wrapping_add(self.step);
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.remaining).unwrap_or(0);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SliceElementIter {}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(elem: SliceElement, total: Option<i64>) -> Vec<i64> {
        elem.iter(total).unwrap().collect()
    }

    #[test]
    fn test_size() {
        assert_eq!(SliceElement::None.size(None).unwrap(), 0);
        assert_eq!(SliceElement::Single(7).size(None).unwrap(), 1);
        assert_eq!(SliceElement::slice(1, 10).size(None).unwrap(), 9);
        assert_eq!(SliceElement::All.size(Some(5)).unwrap(), 5);

        // A reversed pair of bounds is empty, not negative.
        assert_eq!(SliceElement::slice(10, 1).size(None).unwrap(), 0);

        let e = SliceElement::stepped(0, 10, 3).unwrap();
        assert_eq!(e.size(None).unwrap(), 4);
        assert_eq!(collect(e, None), vec![0, 3, 6, 9]);
    }

    #[test]
    fn test_unbound() {
        assert!(SliceElement::All.is_unbound());
        assert!(SliceElement::slice(-3, -1).is_unbound());
        assert!(!SliceElement::slice(1, 3).is_unbound());
        assert!(!SliceElement::stepped(4, -1, -1).unwrap().is_unbound());

        assert!(matches!(
            SliceElement::slice(-3, -1).size(None),
            Err(RangeError::MissingSize { .. })
        ));
        assert_eq!(
            SliceElement::All.iter(None).unwrap_err().to_string(),
            "unbound element `all` cannot be resolved without a size"
        );
    }

    #[test]
    fn test_negative_bounds() {
        assert_eq!(collect(SliceElement::slice(-3, -1), Some(10)), vec![8, 9]);
        assert_eq!(collect(SliceElement::slice(2, -2), Some(5)), vec![2, 3]);
        assert_eq!(collect(SliceElement::Single(-2), Some(5)), vec![4]);
        assert_eq!(collect(SliceElement::slice(0, -1), Some(3)), vec![0, 1, 2]);
    }

    #[test]
    fn test_descending() {
        let e = SliceElement::stepped(4, -1, -1).unwrap();
        assert_eq!(collect(e, None), vec![4, 3, 2, 1, 0]);

        let e = SliceElement::stepped(-2, -1, -1).unwrap();
        assert_eq!(collect(e, Some(4)), vec![3, 2, 1, 0]);

        let e = SliceElement::stepped(9, 2, -3).unwrap();
        assert_eq!(collect(e, None), vec![9, 6, 3]);
        assert!(e.contains(6, None).unwrap());
        assert!(!e.contains(7, None).unwrap());
        assert!(!e.contains(2, None).unwrap());
    }

    #[test]
    fn test_contains_and_invert() {
        let e = SliceElement::slice(2, 6);
        assert!(e.contains(2, None).unwrap());
        assert!(e.contains(5, None).unwrap());
        assert!(!e.contains(6, None).unwrap());
        assert_eq!(e.invert(0, None).unwrap(), 2);
        assert_eq!(e.invert(3, None).unwrap(), 5);

        assert!(SliceElement::All.contains(100, None).unwrap());
        assert!(!SliceElement::All.contains(100, Some(10)).unwrap());
        assert_eq!(SliceElement::All.invert(42, None).unwrap(), 42);
    }

    #[test]
    fn test_iter_is_restartable() {
        let e = SliceElement::slice(0, 3);
        let first: Vec<_> = e.iter(None).unwrap().collect();
        let second: Vec<_> = e.iter(None).unwrap().collect();
        assert_eq!(first, second);
        assert_eq!(e.iter(None).unwrap().len(), 3);
    }

    #[test]
    fn test_reverse() {
        let e = SliceElement::slice(2, 6);
        assert_eq!(collect(e.reverse().unwrap(), None), vec![5, 4, 3, 2]);
        assert_eq!(e.reverse().unwrap().reverse().unwrap(), e);

        let e = SliceElement::slice(0, 3);
        assert_eq!(collect(e.reverse().unwrap(), None), vec![2, 1, 0]);

        assert_eq!(
            collect(SliceElement::All.reverse().unwrap(), Some(3)),
            vec![2, 1, 0]
        );
        assert_eq!(
            collect(SliceElement::slice(-3, -1).reverse().unwrap(), Some(10)),
            vec![9, 8]
        );

        let e = SliceElement::stepped(1, 10, 4).unwrap();
        assert_eq!(collect(e.reverse().unwrap(), None), vec![9, 5, 1]);

        let e = SliceElement::stepped(-5, -1, 2).unwrap();
        assert!(matches!(
            e.reverse(),
            Err(RangeError::MissingSize { .. })
        ));
    }

    #[test]
    fn test_reverse_empty() {
        for e in [
            SliceElement::slice(5, 0),
            SliceElement::slice(0, 0),
            SliceElement::slice(-3, 0),
            SliceElement::stepped(0, 4, -1).unwrap(),
        ] {
            let reversed = e.reverse().unwrap();
            assert!(!reversed.is_unbound(), "{e} reversed to {reversed}");
            assert_eq!(reversed.size(Some(10)).unwrap(), 0);
        }
    }

    #[test]
    fn test_reverse_relative() {
        // Descending from one past the end keeps the last index.
        let e = SliceElement::stepped(-1, -3, -1).unwrap();
        assert_eq!(collect(e.reverse().unwrap(), Some(10)), vec![9]);

        let e = SliceElement::stepped(-2, -1, -1).unwrap();
        assert_eq!(collect(e.reverse().unwrap(), Some(4)), vec![0, 1, 2, 3]);

        let e = SliceElement::slice(0, -2);
        assert_eq!(collect(e.reverse().unwrap(), Some(4)), vec![2, 1, 0]);

        let e = SliceElement::slice(-4, 3);
        assert_eq!(collect(e.reverse().unwrap(), Some(5)), vec![2]);
    }

    #[test]
    fn test_extreme_indices() {
        let e = SliceElement::Single(i64::MAX);
        assert_eq!(e.size(None).unwrap(), 1);
        assert_eq!(collect(e, None), vec![i64::MAX]);
        assert!(e.contains(i64::MAX, None).unwrap());
        assert_eq!(e.to_string(), i64::MAX.to_string());
        assert_eq!(e, SliceElement::stepped(i64::MAX, i64::MAX - 1, -1).unwrap());

        let e = SliceElement::slice(i64::MAX - 2, i64::MAX);
        assert_eq!(collect(e, None), vec![i64::MAX - 2, i64::MAX - 1]);

        let e = SliceElement::stepped(0, i64::MAX, i64::MAX - 1).unwrap();
        assert_eq!(collect(e, None), vec![0, i64::MAX - 1]);
        assert!(!e.is_single());
        assert_eq!(e, e.reverse().unwrap().reverse().unwrap());

        let e = SliceElement::stepped(i64::MAX - 1, 0, i64::MAX).unwrap();
        assert!(!e.is_single());
        assert!(e.is_none());
    }

    #[test]
    fn test_equality() {
        assert_eq!(SliceElement::Single(3), SliceElement::slice(3, 4));
        assert_eq!(
            SliceElement::Single(3),
            SliceElement::stepped(3, 2, -1).unwrap()
        );
        assert_eq!(SliceElement::None, SliceElement::slice(5, 5));
        assert_eq!(SliceElement::All, SliceElement::slice(0, -1));
        assert_eq!(
            SliceElement::stepped(2, 10, 3).unwrap(),
            SliceElement::stepped(2, 9, 3).unwrap()
        );
        assert_ne!(SliceElement::slice(1, 10), SliceElement::slice(1, 9));
    }

    #[test]
    fn test_display() {
        assert_eq!(SliceElement::All.to_string(), "");
        assert_eq!(SliceElement::Single(5).to_string(), "5");
        assert_eq!(SliceElement::slice(1, 2).to_string(), "1");
        assert_eq!(SliceElement::slice(1, 10).to_string(), "1:10");
        assert_eq!(SliceElement::stepped(1, 2, 3).unwrap().to_string(), "1:2:3");
        assert_eq!(SliceElement::None.to_string(), "0:0");
        assert_eq!(SliceElement::stepped(3, 2, -1).unwrap().to_string(), "3");
        assert_eq!(
            SliceElement::stepped(-1, -2, -1).unwrap().to_string(),
            "-1:-2:-1"
        );
    }

    #[test]
    fn test_zero_step() {
        assert_eq!(
            SliceElement::stepped(0, 4, 0).unwrap_err(),
            RangeError::ZeroStep
        );
    }
}
