/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

use crate::element::RangeError;
use crate::group::CompositeRange1D;
use crate::group::Range1DGroup;
use crate::parse::DecodeError;
use crate::range1d::Range1D;
use crate::range1d::Range1DIter;

/// One dimension of a [`crate::Range`]: a plain range, a named group,
/// or a composite of groups.
///
/// Every operation acts on the [`Dim::base`] indices. Set operations
/// keep the shape of `self`; composition follows the rules of
/// [`Dim::pre_multiply`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dim {
    Plain(Range1D),
    Group(Range1DGroup),
    Composite(CompositeRange1D),
}

impl Dim {
    /// The indices this dimension selects.
    pub fn base(&self) -> &Range1D {
        match self {
            Dim::Plain(range) => range,
            Dim::Group(group) => group.range(),
            Dim::Composite(composite) => composite.base(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Dim::Plain(_) => None,
            Dim::Group(group) => Some(group.name()),
            Dim::Composite(composite) => Some(composite.name()),
        }
    }

    pub fn is_all(&self) -> bool {
        self.base().is_all()
    }

    pub fn is_none(&self) -> bool {
        self.base().is_none()
    }

    pub fn is_unbound(&self) -> bool {
        self.base().is_unbound()
    }

    pub fn is_identity(&self) -> bool {
        self.base().is_identity()
    }

    pub fn size(&self, total: Option<i64>) -> Result<i64, RangeError> {
        self.base().size(total)
    }

    pub fn iter(&self, total: Option<i64>) -> Result<Range1DIter, RangeError> {
        self.base().iter(total)
    }

    pub fn to_list(&self, total: Option<i64>) -> Result<Vec<i64>, RangeError> {
        self.base().to_list(total)
    }

    pub fn contains(&self, value: i64, total: Option<i64>) -> Result<bool, RangeError> {
        self.base().contains(value, total)
    }

    pub fn invert(&self, position: i64, total: Option<i64>) -> Result<i64, RangeError> {
        self.base().invert(position, total)
    }

    pub fn index_of(
        &self,
        indices: &[i64],
        total: Option<i64>,
    ) -> Result<Vec<Option<i64>>, RangeError> {
        self.base().index_of(indices, total)
    }

    pub fn select<'a, T>(
        &self,
        data: &'a [T],
        total: Option<i64>,
    ) -> Result<Vec<&'a T>, RangeError> {
        self.base().select(data, total)
    }

    pub fn filter<T: Clone>(&self, data: &[T], total: Option<i64>) -> Result<Vec<T>, RangeError> {
        self.base().filter(data, total)
    }

    pub fn union(&self, other: &Dim, total: Option<i64>) -> Result<Dim, RangeError> {
        let other = other.base();
        Ok(match self {
            Dim::Plain(range) => Dim::Plain(range.union(other, total)?),
            Dim::Group(group) => Dim::Group(group.union(other, total)?),
            Dim::Composite(composite) => Dim::Composite(composite.union(other, total)?),
        })
    }

    pub fn intersect(&self, other: &Dim, total: Option<i64>) -> Result<Dim, RangeError> {
        let other = other.base();
        Ok(match self {
            Dim::Plain(range) => Dim::Plain(range.intersect(other, total)?),
            Dim::Group(group) => Dim::Group(group.intersect(other, total)?),
            Dim::Composite(composite) => Dim::Composite(composite.intersect(other, total)?),
        })
    }

    pub fn without(&self, other: &Dim, total: Option<i64>) -> Result<Dim, RangeError> {
        let other = other.base();
        Ok(match self {
            Dim::Plain(range) => Dim::Plain(range.without(other, total)?),
            Dim::Group(group) => Dim::Group(group.without(other, total)?),
            Dim::Composite(composite) => Dim::Composite(composite.without(other, total)?),
        })
    }

    /// Compose with `sub`, see [`Range1D::pre_multiply`].
    ///
    /// A composite `self` composes each of its groups. Otherwise a
    /// composite or group `sub` carries its names and colors over to
    /// the result, so that selecting a stratification of a view yields
    /// the same stratification in data space.
    pub fn pre_multiply(&self, sub: &Dim, total: Option<i64>) -> Result<Dim, RangeError> {
        Ok(match (self, sub) {
            (Dim::Composite(composite), _) => {
                Dim::Composite(composite.pre_multiply(sub.base(), total)?)
            }
            (_, Dim::Composite(groups)) => {
                let base = self.base();
                Dim::Composite(groups.map_groups(total, |group| {
                    Ok(group.with_range(base.pre_multiply(group.range(), total)?))
                })?)
            }
            (Dim::Plain(range), Dim::Group(group)) => {
                Dim::Group(group.with_range(range.pre_multiply(group.range(), total)?))
            }
            (Dim::Group(group), _) => Dim::Group(group.pre_multiply(sub.base(), total)?),
            (Dim::Plain(range), Dim::Plain(sub)) => Dim::Plain(range.pre_multiply(sub, total)?),
        })
    }

    /// The positions within this dimension of the indices of `other`,
    /// shaped like `other`.
    pub fn index_range_of(&self, other: &Dim, total: Option<i64>) -> Result<Dim, RangeError> {
        let base = self.base();
        Ok(match other {
            Dim::Plain(range) => Dim::Plain(base.index_range_of(range, total)?),
            Dim::Group(group) => {
                Dim::Group(group.with_range(base.index_range_of(group.range(), total)?))
            }
            Dim::Composite(composite) => Dim::Composite(composite.map_groups(total, |group| {
                Ok(group.with_range(base.index_range_of(group.range(), total)?))
            })?),
        })
    }

    pub fn sort(&self, total: Option<i64>) -> Result<Dim, RangeError> {
        self.map(total, |range| range.sort(total))
    }

    pub fn to_set(&self, total: Option<i64>) -> Result<Dim, RangeError> {
        self.map(total, |range| range.to_set(total))
    }

    pub fn reverse(&self) -> Result<Dim, RangeError> {
        self.map(None, Range1D::reverse)
    }

    /// Apply `op` to the plain range or to every group's range.
    fn map<F>(&self, total: Option<i64>, op: F) -> Result<Dim, RangeError>
    where
        F: Fn(&Range1D) -> Result<Range1D, RangeError>,
    {
        Ok(match self {
            Dim::Plain(range) => Dim::Plain(op(range)?),
            Dim::Group(group) => Dim::Group(group.with_range(op(group.range())?)),
            Dim::Composite(composite) => Dim::Composite(
                composite.map_groups(total, |group| Ok(group.with_range(op(group.range())?)))?,
            ),
        })
    }
}

impl Default for Dim {
    fn default() -> Self {
        Dim::Plain(Range1D::all())
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dim::Plain(range) => fmt::Display::fmt(range, f),
            Dim::Group(group) => fmt::Display::fmt(group, f),
            Dim::Composite(composite) => fmt::Display::fmt(composite, f),
        }
    }
}

impl FromStr for Dim {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::parse::decode_dim(s)
    }
}

impl From<Range1D> for Dim {
    fn from(range: Range1D) -> Self {
        Dim::Plain(range)
    }
}

impl From<Range1DGroup> for Dim {
    fn from(group: Range1DGroup) -> Self {
        Dim::Group(group)
    }
}

impl From<CompositeRange1D> for Dim {
    fn from(composite: CompositeRange1D) -> Self {
        Dim::Composite(composite)
    }
}
