/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::collections::HashMap;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use itertools::EitherOrBoth;
use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;

use crate::element::MINUS_ONE;
use crate::element::ONE;
use crate::element::RangeError;
use crate::element::SliceElement;
use crate::element::SliceElementIter;
use crate::parse::DecodeError;

/// An ordered sequence of [`SliceElement`]s describing a selection
/// along one axis.
///
/// A `Range1D` doubles as a coordinate map from a view to the data it
/// was taken from: position `i` of the view is the `i`-th index of the
/// sequence. [`Range1D::pre_multiply`] composes two such maps and
/// [`Range1D::index_range_of`] goes the other way.
///
/// ```
/// # use ndrange::Range1D;
/// let view = Range1D::from_indices(&[10, 11, 12, 20]);
/// assert_eq!(view.to_string(), "(10:13,20)");
///
/// // The 2nd and 4th elements of the view, in data space.
/// let sub = Range1D::from_indices(&[1, 3]);
/// assert_eq!(view.pre_multiply(&sub, None).unwrap().to_list(None).unwrap(), vec![11, 20]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range1D {
    elems: Vec<SliceElement>,
}

impl Range1D {
    pub(crate) const EMPTY: Range1D = Range1D { elems: Vec::new() };

    /// Selects every index.
    pub fn all() -> Self {
        Self {
            elems: vec![SliceElement::All],
        }
    }

    /// Selects nothing.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn single(index: i64) -> Self {
        Self {
            elems: vec![SliceElement::Single(index)],
        }
    }

    /// The indices `from..to`.
    pub fn slice(from: i64, to: i64) -> Self {
        Self {
            elems: vec![SliceElement::slice(from, to)],
        }
    }

    /// The indices `from..to` stepping by `step`.
    pub fn stepped(from: i64, to: i64, step: i64) -> Result<Self, RangeError> {
        Ok(Self {
            elems: vec![SliceElement::stepped(from, to, step)?],
        })
    }

    pub fn from_elements(elems: Vec<SliceElement>) -> Self {
        Self { elems }
    }

    /// Compress an explicit list of indices into the shortest sequence
    /// of elements that reproduces it in order. Only runs of
    /// consecutive indices (delta of +1 or -1) become slices; every
    /// other index is kept as a single.
    pub fn from_indices(indices: &[i64]) -> Self {
        Self {
            elems: compress(indices),
        }
    }

    pub fn builder() -> Range1DBuilder {
        Range1DBuilder::default()
    }

    pub fn elements(&self) -> &[SliceElement] {
        &self.elems
    }

    /// The number of elements (not indices) in this range.
    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn is_all(&self) -> bool {
        matches!(self.elems.as_slice(), [elem] if elem.is_all())
    }

    pub fn is_none(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn is_unbound(&self) -> bool {
        self.elems.iter().any(SliceElement::is_unbound)
    }

    /// Whether this range is a single open-ended slice starting at 0
    /// with step 1, that is, a lookup that maps every position to
    /// itself.
    pub fn is_identity(&self) -> bool {
        match self.elems.as_slice() {
            [elem] => {
                let (from, to, step) = elem.bounds();
                from == 0 && step == 1 && to < 0
            }
            _ => false,
        }
    }

    /// The number of selected indices.
    pub fn size(&self, total: Option<i64>) -> Result<i64, RangeError> {
        self.elems.iter().map(|elem| elem.size(total)).sum()
    }

    /// A fresh iterator over the selected indices, in order.
    pub fn iter(&self, total: Option<i64>) -> Result<Range1DIter, RangeError> {
        let iters = self
            .elems
            .iter()
            .map(|elem| elem.iter(total))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Range1DIter(iters.into_iter().flatten()))
    }

    pub fn to_list(&self, total: Option<i64>) -> Result<Vec<i64>, RangeError> {
        Ok(self.iter(total)?.collect())
    }

    pub fn contains(&self, value: i64, total: Option<i64>) -> Result<bool, RangeError> {
        for elem in &self.elems {
            if elem.contains(value, total)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn first(&self, total: Option<i64>) -> Result<Option<i64>, RangeError> {
        Ok(self.iter(total)?.next())
    }

    pub fn last(&self, total: Option<i64>) -> Result<Option<i64>, RangeError> {
        Ok(self.iter(total)?.last())
    }

    /// The set union of both ranges, sorted ascending.
    pub fn union(&self, other: &Range1D, total: Option<i64>) -> Result<Range1D, RangeError> {
        if self.is_all() || other.is_none() {
            return Ok(self.clone());
        }
        if other.is_all() || self.is_none() {
            return Ok(other.clone());
        }
        let lhs = sorted_set(self.to_list(total)?);
        let rhs = sorted_set(other.to_list(total)?);
        tracing::trace!(lhs = lhs.len(), rhs = rhs.len(), "union");
        let merged: Vec<i64> = lhs
            .into_iter()
            .merge_join_by(rhs, |x, y| x.cmp(y))
            .map(|either| match either {
                EitherOrBoth::Left(x) => x,
                EitherOrBoth::Right(y) => y,
                EitherOrBoth::Both(x, _) => x,
            })
            .collect();
        Ok(Range1D::from_indices(&merged))
    }

    /// The set intersection of both ranges, sorted ascending.
    pub fn intersect(&self, other: &Range1D, total: Option<i64>) -> Result<Range1D, RangeError> {
        if self.is_none() || other.is_none() {
            return Ok(Range1D::none());
        }
        if self.is_all() {
            return Ok(other.clone());
        }
        if other.is_all() {
            return Ok(self.clone());
        }
        let lhs = sorted_set(self.to_list(total)?);
        let rhs = sorted_set(other.to_list(total)?);
        tracing::trace!(lhs = lhs.len(), rhs = rhs.len(), "intersect");
        let common: Vec<i64> = lhs
            .into_iter()
            .merge_join_by(rhs, |x, y| x.cmp(y))
            .filter_map(|either| match either {
                EitherOrBoth::Both(x, _) => Some(x),
                _ => None,
            })
            .collect();
        Ok(Range1D::from_indices(&common))
    }

    /// The indices of `self` not in `other`, in the order of `self`.
    pub fn without(&self, other: &Range1D, total: Option<i64>) -> Result<Range1D, RangeError> {
        if self.is_none() || other.is_none() {
            return Ok(self.clone());
        }
        if other.is_all() {
            return Ok(Range1D::none());
        }
        let excluded: HashSet<i64> = other.iter(total)?.collect();
        tracing::trace!(excluded = excluded.len(), "without");
        let kept: Vec<i64> = self
            .iter(total)?
            .filter(|index| !excluded.contains(index))
            .collect();
        Ok(Range1D::from_indices(&kept))
    }

    /// Compose two coordinate maps: `self` maps view positions to data
    /// indices and `sub` selects positions of the view. The result
    /// holds, for each index of `sub`, the corresponding index of
    /// `self`. Positions of `sub` beyond the end of `self` are dropped.
    ///
    /// Relative bounds in `sub` are resolved against the length of
    /// `self`, so composing with a bounded `self` never needs `total`.
    /// Neither does an identity `self`: without a size its result
    /// rebases the relative bounds of `sub` and keeps positions that may
    /// turn out to be past the end.
    pub fn pre_multiply(&self, sub: &Range1D, total: Option<i64>) -> Result<Range1D, RangeError> {
        if self.is_all() {
            return Ok(sub.clone());
        }
        if sub.is_all() {
            return Ok(self.clone());
        }
        if self.is_none() || sub.is_none() {
            return Ok(Range1D::none());
        }
        if let ([elem], None) = (self.elems.as_slice(), total) {
            if self.is_identity() {
                // `self` stops `-1 - to` short of the end.
                let (_, to, _) = elem.bounds();
                return Ok(Range1D {
                    elems: sub.elems.iter().map(|e| e.shift_relative(to + 1)).collect(),
                });
            }
        }
        let lookup = self.to_list(total)?;
        let len = lookup.len() as i64;
        tracing::trace!(len, "pre_multiply");
        let mapped: Vec<i64> = sub
            .iter(Some(len))?
            .filter_map(|position| {
                usize::try_from(position)
                    .ok()
                    .and_then(|position| lookup.get(position))
                    .copied()
            })
            .collect();
        Ok(Range1D::from_indices(&mapped))
    }

    /// The position within this range of each of the given absolute
    /// indices, or `None` when absent.
    pub fn index_of(
        &self,
        indices: &[i64],
        total: Option<i64>,
    ) -> Result<Vec<Option<i64>>, RangeError> {
        if self.is_all() {
            return Ok(indices
                .iter()
                .map(|&index| {
                    (index >= 0 && total.map_or(true, |total| index < total)).then_some(index)
                })
                .collect());
        }
        let positions = self.positions(total)?;
        Ok(indices
            .iter()
            .map(|index| positions.get(index).copied())
            .collect())
    }

    /// The positions within this range of the indices selected by
    /// `other`. Indices of `other` not in this range are omitted.
    pub fn index_range_of(
        &self,
        other: &Range1D,
        total: Option<i64>,
    ) -> Result<Range1D, RangeError> {
        if self.is_none() || other.is_none() {
            return Ok(Range1D::none());
        }
        if self.is_all() {
            return Ok(other.clone());
        }
        let positions = self.positions(total)?;
        let mapped: Vec<i64> = other
            .iter(total)?
            .filter_map(|index| positions.get(&index).copied())
            .collect();
        Ok(Range1D::from_indices(&mapped))
    }

    fn positions(&self, total: Option<i64>) -> Result<HashMap<i64, i64>, RangeError> {
        let mut positions = HashMap::new();
        for (position, index) in self.iter(total)?.enumerate() {
            positions.entry(index).or_insert(position as i64);
        }
        Ok(positions)
    }

    /// The absolute index at `position` within this range.
    pub fn invert(&self, position: i64, total: Option<i64>) -> Result<i64, RangeError> {
        let mut local = position;
        if local >= 0 {
            for elem in &self.elems {
                if elem.is_all() && total.is_none() {
                    return elem.invert(local, total);
                }
                let size = elem.size(total)?;
                if local < size {
                    return elem.invert(local, total);
                }
                local -= size;
            }
        }
        Err(RangeError::PositionOutOfRange {
            position,
            size: self.size(total)?,
        })
    }

    /// The same indices, sorted ascending.
    pub fn sort(&self, total: Option<i64>) -> Result<Range1D, RangeError> {
        if self.is_all() || self.is_none() {
            return Ok(self.clone());
        }
        let mut indices = self.to_list(total)?;
        indices.sort_unstable();
        Ok(Range1D::from_indices(&indices))
    }

    /// The same indices, sorted ascending and without duplicates.
    pub fn to_set(&self, total: Option<i64>) -> Result<Range1D, RangeError> {
        if self.is_all() || self.is_none() {
            return Ok(self.clone());
        }
        Ok(Range1D::from_indices(&sorted_set(self.to_list(total)?)))
    }

    /// The same indices in the opposite order.
    pub fn reverse(&self) -> Result<Range1D, RangeError> {
        let elems = self
            .elems
            .iter()
            .rev()
            .map(SliceElement::reverse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Range1D { elems })
    }

    /// References to the items of `data` selected by this range.
    /// Indices outside of `data` are skipped. `total` defaults to the
    /// length of `data`.
    pub fn select<'a, T>(
        &self,
        data: &'a [T],
        total: Option<i64>,
    ) -> Result<Vec<&'a T>, RangeError> {
        let total = total.or_else(|| i64::try_from(data.len()).ok());
        if self.is_all() {
            return Ok(data.iter().collect());
        }
        if let [elem] = self.elems.as_slice() {
            if let (start, stop, 1) = elem.resolve(total)? {
                let len = data.len() as i64;
                let start = start.clamp(0, len);
                let stop = stop.clamp(start, len);
                return Ok(data[start as usize..stop as usize].iter().collect());
            }
        }
        Ok(self
            .iter(total)?
            .filter_map(|index| usize::try_from(index).ok().and_then(|index| data.get(index)))
            .collect())
    }

    /// The items of `data` selected by this range.
    pub fn filter<T: Clone>(&self, data: &[T], total: Option<i64>) -> Result<Vec<T>, RangeError> {
        Ok(self.select(data, total)?.into_iter().cloned().collect())
    }
}

fn sorted_set(mut indices: Vec<i64>) -> Vec<i64> {
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// Greedy left-to-right run detection. Validity of a run is hereditary
/// (every sub-run of a run is a run), so taking the longest run at each
/// step yields the minimal element count.
fn compress(indices: &[i64]) -> Vec<SliceElement> {
    let mut elems = Vec::new();
    let mut start = 0;
    while start < indices.len() {
        // A run may only end where its exclusive stop is representable.
        let extends = |at: usize, delta: i64| {
            indices.get(at + 1).is_some_and(|&next| {
                next.checked_sub(indices[at]) == Some(delta) && next.checked_add(delta).is_some()
            })
        };
        let delta = [1, -1].into_iter().find(|&delta| extends(start, delta));
        match delta {
            Some(delta) => {
                let mut end = start + 1;
                while extends(end, delta) {
                    end += 1;
                }
                elems.push(SliceElement::Slice {
                    from: indices[start],
                    to: indices[end] + delta,
                    step: if delta == 1 { ONE } else { MINUS_ONE },
                });
                start = end + 1;
            }
            _ => {
                elems.push(SliceElement::Single(indices[start]));
                start += 1;
            }
        }
    }
    elems
}

impl fmt::Display for Range1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return Ok(());
        }
        match self.elems.as_slice() {
            [elem] if elem.is_single() => write!(f, "{}", elem),
            elems => write!(f, "({})", elems.iter().join(",")),
        }
    }
}

impl FromStr for Range1D {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::decode_range1d(s)
    }
}

impl From<SliceElement> for Range1D {
    fn from(elem: SliceElement) -> Self {
        Self { elems: vec![elem] }
    }
}

impl From<Vec<SliceElement>> for Range1D {
    fn from(elems: Vec<SliceElement>) -> Self {
        Self { elems }
    }
}

/// Iterator over the indices of a [`Range1D`].
#[derive(Debug, Clone)]
pub struct Range1DIter(std::iter::Flatten<std::vec::IntoIter<SliceElementIter>>);

impl Iterator for Range1DIter {
    type Item = i64;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }
}

/// Builds a [`Range1D`] in place. The finished range is immutable.
#[derive(Debug, Clone, Default)]
pub struct Range1DBuilder {
    elems: Vec<SliceElement>,
}

impl Range1DBuilder {
    /// Append an element.
    pub fn push(&mut self, elem: impl Into<SliceElement>) -> &mut Self {
        self.elems.push(elem.into());
        self
    }

    /// Replace the contents with a single slice.
    pub fn set_slice(&mut self, from: i64, to: i64, step: i64) -> Result<&mut Self, RangeError> {
        self.elems = vec![SliceElement::stepped(from, to, step)?];
        Ok(self)
    }

    /// Replace the contents with the compressed form of `indices`.
    pub fn set_list(&mut self, indices: &[i64]) -> &mut Self {
        self.elems = compress(indices);
        self
    }

    pub fn finish(&mut self) -> Range1D {
        Range1D {
            elems: std::mem::take(&mut self.elems),
        }
    }
}
