use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The set of locations a principal may act on.
///
/// `None` is the unrestricted scope held by super admins; every other
/// principal carries the explicit set of location ids assigned to it. Putting
/// the unrestricted case here keeps the ALL-access rule in one place instead
/// of scattering super-admin special cases through every handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationScope(Option<BTreeSet<Uuid>>);

impl LocationScope {
    pub fn unrestricted() -> Self {
        Self(None)
    }

    pub fn assigned(ids: impl IntoIterator<Item = Uuid>) -> Self {
        Self(Some(ids.into_iter().collect()))
    }

    pub fn is_unrestricted(&self) -> bool {
        self.0.is_none()
    }

    /// True for a restricted scope with no locations at all.
    pub fn is_empty(&self) -> bool {
        self.0.as_ref().is_some_and(|ids| ids.is_empty())
    }

    pub fn contains(&self, location_id: Uuid) -> bool {
        match &self.0 {
            None => true,
            Some(ids) => ids.contains(&location_id),
        }
    }

    /// All-or-nothing containment for a requested location set.
    pub fn contains_all<'a>(&self, requested: impl IntoIterator<Item = &'a Uuid>) -> bool {
        match &self.0 {
            None => true,
            Some(ids) => requested.into_iter().all(|id| ids.contains(id)),
        }
    }

    /// True when every location in `self` is also in `other`. An
    /// unrestricted scope is only contained in another unrestricted scope.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (_, None) => true,
            (None, Some(_)) => false,
            (Some(mine), Some(theirs)) => mine.is_subset(theirs),
        }
    }

    /// True when the two scopes share at least one location.
    pub fn overlaps(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, _) | (_, None) => true,
            (Some(mine), Some(theirs)) => mine.intersection(theirs).next().is_some(),
        }
    }

    /// Ids to narrow a query with; `None` means no narrowing is needed.
    pub fn narrowing_ids(&self) -> Option<Vec<Uuid>> {
        self.0.as_ref().map(|ids| ids.iter().copied().collect())
    }
}
