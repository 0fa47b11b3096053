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
use std::str::FromStr;
use std::sync::LazyLock;

use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;

use crate::dim::Dim;
use crate::element::RangeError;
use crate::element::SliceElement;
use crate::parse::DecodeError;
use crate::range1d::Range1D;

static ALL_DIM: LazyLock<Dim> = LazyLock::new(Dim::default);

/// A selection over a multidimensional dataset: one [`Dim`] per axis.
///
/// Axes beyond [`Range::ndim`] are implicitly [`Range1D::all`], so the
/// zero-dimensional [`Range::all`] selects everything regardless of
/// rank.
///
/// ```
/// # use ndrange::Range;
/// let r: Range = "(0:2),(1,3)".parse().unwrap();
/// let mut cells = Vec::new();
/// r.product(&[], |coords| cells.push(coords.to_vec())).unwrap();
/// assert_eq!(cells, vec![vec![0, 1], vec![0, 3], vec![1, 1], vec![1, 3]]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Range {
    dims: Vec<Dim>,
}

impl Range {
    /// Selects everything, in any number of dimensions.
    pub fn all() -> Self {
        Self::default()
    }

    /// Selects nothing, in two dimensions.
    pub fn none() -> Self {
        Self {
            dims: vec![Dim::Plain(Range1D::none()), Dim::Plain(Range1D::none())],
        }
    }

    pub fn from_dims(dims: Vec<Dim>) -> Self {
        Self { dims }
    }

    /// One dimension per index list, each compressed.
    pub fn list(indices: Vec<Vec<i64>>) -> Self {
        Self {
            dims: indices
                .iter()
                .map(|indices| Dim::Plain(Range1D::from_indices(indices)))
                .collect(),
        }
    }

    /// The single cell at `coords`.
    pub fn cell(coords: &[i64]) -> Self {
        Self {
            dims: coords
                .iter()
                .map(|&index| Dim::Plain(Range1D::single(index)))
                .collect(),
        }
    }

    /// Concatenate the dimensions of `ranges`.
    pub fn join(ranges: impl IntoIterator<Item = Range>) -> Self {
        Self {
            dims: ranges.into_iter().flat_map(|range| range.dims).collect(),
        }
    }

    /// One single-dimension range per dimension.
    pub fn split(&self) -> Vec<Range> {
        self.dims
            .iter()
            .map(|dim| Range {
                dims: vec![dim.clone()],
            })
            .collect()
    }

    pub fn builder() -> RangeBuilder {
        RangeBuilder::default()
    }

    /// The materialized dimensions.
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// The `k`-th dimension, which is all when not materialized.
    pub fn dim(&self, k: usize) -> &Dim {
        self.dims.get(k).unwrap_or(&*ALL_DIM)
    }

    /// The number of materialized dimensions.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn is_all(&self) -> bool {
        self.dims.iter().all(Dim::is_all)
    }

    pub fn is_none(&self) -> bool {
        !self.dims.is_empty() && self.dims.iter().all(Dim::is_none)
    }

    pub fn is_unbound(&self) -> bool {
        self.dims.iter().any(Dim::is_unbound)
    }

    pub fn is_identity(&self) -> bool {
        self.dims.iter().all(Dim::is_identity)
    }

    /// The number of selected indices per dimension. Covers every
    /// materialized dimension and every dimension of `sizes`.
    pub fn size(&self, sizes: &[i64]) -> Result<Vec<i64>, RangeError> {
        (0..self.rank(sizes.len()))
            .map(|k| self.dim(k).size(total(sizes, k)))
            .collect()
    }

    /// Whether the cell at `coords` is selected.
    pub fn contains(&self, coords: &[i64], sizes: &[i64]) -> Result<bool, RangeError> {
        for (k, &index) in coords.iter().enumerate() {
            if !self.dim(k).contains(index, total(sizes, k))? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Transpose: the dimensions in reverse order.
    pub fn swap(&self) -> Range {
        Range {
            dims: self.dims.iter().rev().cloned().collect(),
        }
    }

    /// Call `f` with the coordinates of every selected cell, in
    /// row-major order. A zero-dimensional range has exactly one cell,
    /// the empty coordinate.
    pub fn product<F>(&self, sizes: &[i64], mut f: F) -> Result<(), RangeError>
    where
        F: FnMut(&[i64]),
    {
        let lists = self
            .dims
            .iter()
            .enumerate()
            .map(|(k, dim)| dim.to_list(total(sizes, k)))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::trace!(ndim = lists.len(), "product");
        let mut coords = Vec::with_capacity(lists.len());
        visit(&lists, &mut coords, &mut f);
        Ok(())
    }

    /// Apply the range to nested data: dimension `k` selects among the
    /// items of every array at depth `k`. Leaves, and arrays deeper
    /// than [`Range::ndim`], are kept as they are. A dimension without
    /// a size resolves against the length of the array it selects
    /// from.
    pub fn filter<T: Clone>(
        &self,
        data: &Nested<T>,
        sizes: &[i64],
    ) -> Result<Nested<T>, RangeError> {
        if self.is_all() {
            return Ok(data.clone());
        }
        self.filter_at(0, data, sizes)
    }

    fn filter_at<T: Clone>(
        &self,
        k: usize,
        data: &Nested<T>,
        sizes: &[i64],
    ) -> Result<Nested<T>, RangeError> {
        match data {
            Nested::Array(items) if k < self.ndim() => {
                let selected = self.dim(k).select(items, total(sizes, k))?;
                Ok(Nested::Array(
                    selected
                        .into_iter()
                        .map(|item| self.filter_at(k + 1, item, sizes))
                        .collect::<Result<_, _>>()?,
                ))
            }
            other => Ok(other.clone()),
        }
    }

    /// The absolute coordinates of the cell at view position `coords`.
    pub fn invert(&self, coords: &[i64], sizes: &[i64]) -> Result<Vec<i64>, RangeError> {
        coords
            .iter()
            .enumerate()
            .map(|(k, &position)| self.dim(k).invert(position, total(sizes, k)))
            .collect()
    }

    /// The view position of the cell at absolute `coords`, per
    /// dimension; `None` where the index is not selected.
    pub fn index_of(
        &self,
        coords: &[i64],
        sizes: &[i64],
    ) -> Result<Vec<Option<i64>>, RangeError> {
        coords
            .iter()
            .enumerate()
            .map(|(k, &index)| {
                Ok(self
                    .dim(k)
                    .index_of(&[index], total(sizes, k))?
                    .into_iter()
                    .next()
                    .flatten())
            })
            .collect()
    }

    /// The positions within this range of the cells selected by `other`.
    pub fn index_range_of(&self, other: &Range, sizes: &[i64]) -> Result<Range, RangeError> {
        if self.is_none() || other.is_none() {
            return Ok(Range::none());
        }
        self.zip(other, sizes, Dim::index_range_of)
    }

    /// Dimension-wise union.
    pub fn union(&self, other: &Range, sizes: &[i64]) -> Result<Range, RangeError> {
        if self.is_all() || other.is_none() {
            return Ok(self.clone());
        }
        if other.is_all() || self.is_none() {
            return Ok(other.clone());
        }
        self.zip(other, sizes, Dim::union)
    }

    /// Dimension-wise intersection.
    pub fn intersect(&self, other: &Range, sizes: &[i64]) -> Result<Range, RangeError> {
        if self.is_none() || other.is_none() {
            return Ok(Range::none());
        }
        if self.is_all() {
            return Ok(other.clone());
        }
        if other.is_all() {
            return Ok(self.clone());
        }
        self.zip(other, sizes, Dim::intersect)
    }

    /// Dimension-wise difference.
    pub fn without(&self, other: &Range, sizes: &[i64]) -> Result<Range, RangeError> {
        if self.is_none() || other.is_none() {
            return Ok(self.clone());
        }
        if other.is_all() {
            return Ok(Range::none());
        }
        self.zip(other, sizes, Dim::without)
    }

    /// Dimension-wise composition, see [`Dim::pre_multiply`].
    pub fn pre_multiply(&self, sub: &Range, sizes: &[i64]) -> Result<Range, RangeError> {
        if self.is_all() {
            return Ok(sub.clone());
        }
        if sub.is_all() {
            return Ok(self.clone());
        }
        self.zip(sub, sizes, Dim::pre_multiply)
    }

    fn zip<F>(&self, other: &Range, sizes: &[i64], op: F) -> Result<Range, RangeError>
    where
        F: Fn(&Dim, &Dim, Option<i64>) -> Result<Dim, RangeError>,
    {
        let dims = (0..self.rank(other.ndim()))
            .map(|k| op(self.dim(k), other.dim(k), total(sizes, k)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Range { dims })
    }

    fn rank(&self, other: usize) -> usize {
        self.ndim().max(other)
    }

    /// The dimensions without trailing all dimensions.
    fn significant(&self) -> &[Dim] {
        let len = self
            .dims
            .iter()
            .rposition(|dim| *dim != *ALL_DIM)
            .map_or(0, |k| k + 1);
        &self.dims[..len]
    }
}

fn total(sizes: &[i64], k: usize) -> Option<i64> {
    sizes.get(k).copied()
}

fn visit<F: FnMut(&[i64])>(lists: &[Vec<i64>], coords: &mut Vec<i64>, f: &mut F) {
    match lists.split_first() {
        None => f(coords),
        Some((head, rest)) => {
            for &index in head {
                coords.push(index);
                visit(rest, coords, f);
                coords.pop();
            }
        }
    }
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for Range {}

impl Hash for Range {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.dims.iter().join(","))
    }
}

impl FromStr for Range {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::decode(s)
    }
}

impl From<Vec<Dim>> for Range {
    fn from(dims: Vec<Dim>) -> Self {
        Self { dims }
    }
}

impl From<Range1D> for Range {
    fn from(range: Range1D) -> Self {
        Self {
            dims: vec![Dim::Plain(range)],
        }
    }
}

/// Builds a [`Range`] dimension by dimension. The finished range is
/// immutable.
#[derive(Debug, Clone, Default)]
pub struct RangeBuilder {
    dims: Vec<Dim>,
}

impl RangeBuilder {
    /// The `k`-th dimension, materializing all dimensions up to it.
    pub fn dim_mut(&mut self, k: usize) -> &mut Dim {
        if self.dims.len() <= k {
            self.dims.resize_with(k + 1, Dim::default);
        }
        &mut self.dims[k]
    }

    pub fn set_dim(&mut self, k: usize, dim: impl Into<Dim>) -> &mut Self {
        *self.dim_mut(k) = dim.into();
        self
    }

    pub fn set_slice(
        &mut self,
        k: usize,
        from: i64,
        to: i64,
        step: i64,
    ) -> Result<&mut Self, RangeError> {
        let elem = SliceElement::stepped(from, to, step)?;
        Ok(self.set_dim(k, Range1D::from(elem)))
    }

    pub fn set_list(&mut self, k: usize, indices: &[i64]) -> &mut Self {
        self.set_dim(k, Range1D::from_indices(indices))
    }

    pub fn finish(&mut self) -> Range {
        Range {
            dims: std::mem::take(&mut self.dims),
        }
    }
}

/// Arbitrarily nested arrays, the data a [`Range`] filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Nested<T> {
    Array(Vec<Nested<T>>),
    Leaf(T),
}

impl<T> From<Vec<T>> for Nested<T> {
    fn from(items: Vec<T>) -> Self {
        Nested::Array(items.into_iter().map(Nested::Leaf).collect())
    }
}
