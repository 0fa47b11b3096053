/*
 * Copyright (c) Meta Platforms, Inc. and affiliates.
 * All rights reserved.
 *
 * This source code is licensed under the BSD-style license found in the
 * LICENSE file in the root directory of this source tree.
 */

//! Named and colored dimensions, used to stratify an axis into
//! categories.

use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use itertools::Itertools;
use serde::Deserialize;
use serde::Serialize;

use crate::element::RangeError;
use crate::range1d::Range1D;

static EMPTY: Range1D = Range1D::EMPTY;

/// A [`Range1D`] with a name and a color.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range1DGroup {
    name: String,
    color: String,
    range: Range1D,
}

impl Range1DGroup {
    pub fn new(name: impl Into<String>, color: impl Into<String>, range: Range1D) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
            range,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn range(&self) -> &Range1D {
        &self.range
    }

    pub fn into_range(self) -> Range1D {
        self.range
    }

    /// A group with the same name and color around another range.
    pub fn with_range(&self, range: Range1D) -> Self {
        Self {
            name: self.name.clone(),
            color: self.color.clone(),
            range,
        }
    }

    pub fn union(&self, other: &Range1D, total: Option<i64>) -> Result<Self, RangeError> {
        Ok(self.with_range(self.range.union(other, total)?))
    }

    pub fn intersect(&self, other: &Range1D, total: Option<i64>) -> Result<Self, RangeError> {
        Ok(self.with_range(self.range.intersect(other, total)?))
    }

    pub fn without(&self, other: &Range1D, total: Option<i64>) -> Result<Self, RangeError> {
        Ok(self.with_range(self.range.without(other, total)?))
    }

    pub fn pre_multiply(&self, sub: &Range1D, total: Option<i64>) -> Result<Self, RangeError> {
        Ok(self.with_range(self.range.pre_multiply(sub, total)?))
    }
}

impl fmt::Display for Range1DGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            Quoted(&self.name),
            Quoted(&self.color),
            self.range
        )
    }
}

/// A named collection of groups. The union of the groups is cached as
/// the base range of the composite.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "CompositeParts", into = "CompositeParts")]
pub struct CompositeRange1D {
    name: String,
    groups: Vec<Range1DGroup>,
    /// `None` iff there is exactly one group, whose range is the base.
    base: Option<Range1D>,
}

#[derive(Serialize, Deserialize)]
struct CompositeParts {
    name: String,
    groups: Vec<Range1DGroup>,
}

impl TryFrom<CompositeParts> for CompositeRange1D {
    type Error = RangeError;

    fn try_from(parts: CompositeParts) -> Result<Self, Self::Error> {
        CompositeRange1D::new(parts.name, parts.groups)
    }
}

impl From<CompositeRange1D> for CompositeParts {
    fn from(composite: CompositeRange1D) -> Self {
        CompositeParts {
            name: composite.name,
            groups: composite.groups,
        }
    }
}

impl CompositeRange1D {
    /// Create a composite, deriving its base without a known size.
    pub fn new(name: impl Into<String>, groups: Vec<Range1DGroup>) -> Result<Self, RangeError> {
        Self::with_size(name, groups, None)
    }

    /// Create a composite, deriving its base as the union of the
    /// groups resolved against `total`.
    ///
    /// When no total is given and some group is unbound, the base is
    /// the concatenation of the groups' elements instead: the same set
    /// of indices, without materializing any of them.
    pub fn with_size(
        name: impl Into<String>,
        groups: Vec<Range1DGroup>,
        total: Option<i64>,
    ) -> Result<Self, RangeError> {
        let base = match groups.as_slice() {
            [_] => None,
            [] => Some(Range1D::none()),
            groups if total.is_none() && groups.iter().any(|g| g.range().is_unbound()) => {
                Some(Range1D::from_elements(
                    groups
                        .iter()
                        .flat_map(|g| g.range().elements())
                        .copied()
                        .collect(),
                ))
            }
            groups => Some(
                groups
                    .iter()
                    .try_fold(Range1D::none(), |base, g| base.union(g.range(), total))?,
            ),
        };
        Ok(Self {
            name: name.into(),
            groups,
            base,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn groups(&self) -> &[Range1DGroup] {
        &self.groups
    }

    /// The union of all groups.
    pub fn base(&self) -> &Range1D {
        match (&self.base, self.groups.as_slice()) {
            (Some(base), _) => base,
            (None, [group]) => group.range(),
            (None, _) => &EMPTY,
        }
    }

    /// Apply `op` to every group, re-deriving the base from the result.
    pub(crate) fn map_groups<F>(&self, total: Option<i64>, op: F) -> Result<Self, RangeError>
    where
        F: Fn(&Range1DGroup) -> Result<Range1DGroup, RangeError>,
    {
        let groups = self.groups.iter().map(op).collect::<Result<Vec<_>, _>>()?;
        Self::with_size(self.name.clone(), groups, total)
    }

    pub fn union(&self, other: &Range1D, total: Option<i64>) -> Result<Self, RangeError> {
        self.map_groups(total, |g| g.union(other, total))
    }

    pub fn intersect(&self, other: &Range1D, total: Option<i64>) -> Result<Self, RangeError> {
        self.map_groups(total, |g| g.intersect(other, total))
    }

    pub fn without(&self, other: &Range1D, total: Option<i64>) -> Result<Self, RangeError> {
        self.map_groups(total, |g| g.without(other, total))
    }

    pub fn pre_multiply(&self, sub: &Range1D, total: Option<i64>) -> Result<Self, RangeError> {
        self.map_groups(total, |g| g.pre_multiply(sub, total))
    }
}

impl PartialEq for CompositeRange1D {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.groups == other.groups
    }
}

impl Eq for CompositeRange1D {}

impl Hash for CompositeRange1D {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.groups.hash(state);
    }
}

impl fmt::Display for CompositeRange1D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{{{}}}",
            Quoted(&self.name),
            self.groups.iter().join(",")
        )
    }
}

/// Writes a name in double quotes, escaping `"` and `\`.
struct Quoted<'a>(&'a str);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        for c in self.0.chars() {
            if matches!(c, '"' | '\\') {
                f.write_str("\\")?;
            }
            write!(f, "{}", c)?;
        }
        f.write_str("\"")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strata() -> CompositeRange1D {
        CompositeRange1D::new(
            "sex",
            vec![
                Range1DGroup::new("f", "red", Range1D::slice(0, 3)),
                Range1DGroup::new("m", "blue", Range1D::from_indices(&[5, 3, 4])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_base_is_union() {
        let c = strata();
        assert_eq!(c.base(), &Range1D::slice(0, 6));
    }

    #[test]
    fn test_single_group_base() {
        let c = CompositeRange1D::new(
            "ungrouped",
            vec![Range1DGroup::new("all", "gray", Range1D::from_indices(&[4, 2]))],
        )
        .unwrap();
        assert!(c.base.is_none());
        assert_eq!(c.base(), &Range1D::from_indices(&[4, 2]));
    }

    #[test]
    fn test_unbound_groups() {
        let c = CompositeRange1D::new(
            "tail",
            vec![
                Range1DGroup::new("a", "red", Range1D::slice(0, 2)),
                Range1DGroup::new("b", "blue", Range1D::slice(-3, -1)),
            ],
        )
        .unwrap();
        assert_eq!(c.base().to_list(Some(10)).unwrap(), vec![0, 1, 8, 9]);

        let c = CompositeRange1D::with_size("tail", c.groups().to_vec(), Some(10)).unwrap();
        assert_eq!(c.base(), &Range1D::from_indices(&[0, 1, 8, 9]));
    }

    #[test]
    fn test_ops_rederive_base() {
        let c = strata();
        let i = c.intersect(&Range1D::slice(2, 5), None).unwrap();
        assert_eq!(i.groups()[0].range(), &Range1D::single(2));
        assert_eq!(i.groups()[1].range(), &Range1D::slice(3, 5));
        assert_eq!(i.base(), &Range1D::slice(2, 5));
        assert_eq!(i.groups()[1].color(), "blue");

        let w = c.without(&Range1D::slice(0, 4), None).unwrap();
        assert!(w.groups()[0].range().is_none());
        assert_eq!(w.base().to_list(None).unwrap(), vec![5, 4]);

        let u = c.union(&Range1D::single(9), None).unwrap();
        assert_eq!(u.base().to_list(None).unwrap(), vec![0, 1, 2, 3, 4, 5, 9]);
    }

    #[test]
    fn test_group_ops() {
        let g = Range1DGroup::new("g", "green", Range1D::slice(10, 20));
        let p = g.pre_multiply(&Range1D::from_indices(&[0, 5]), None).unwrap();
        assert_eq!(p.name(), "g");
        assert_eq!(p.range().to_list(None).unwrap(), vec![10, 15]);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            strata().to_string(),
            r#""sex"{"f""red"(0:3),"m""blue"(5,3:5)}"#
        );
        let g = Range1DGroup::new(r#"a "b""#, "c\\d", Range1D::single(1));
        assert_eq!(g.to_string(), r#""a \"b\"""c\\d"1"#);
    }

    #[test]
    fn test_serde() {
        let c = strata();
        let json = serde_json::to_string(&c).unwrap();
        assert!(!json.contains("base"));
        let back: CompositeRange1D = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
        assert_eq!(back.base(), c.base());
    }
}
