//! Role label modeling shared by credentials and guards.

// std
use std::collections::btree_set::Iter;
// self
use crate::_prelude::*;

/// Label carried by the administrator role in the admin console preset.
pub const ROLE_ADMIN: &str = "Admin";
/// Label carried by the store manager role.
pub const ROLE_MANAGER: &str = "Manager";
/// Label carried by floor staff.
pub const ROLE_STAFF: &str = "Staff";
/// Label carried by back-office administrators in the staff console preset.
pub const ROLE_ADMINISTRATOR: &str = "Administrator";

/// Raw `roles` claim as issued by the backend: either one label or many.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoleClaim {
	/// Single role label.
	Single(String),
	/// Multiple role labels.
	Multiple(Vec<String>),
}
impl RoleClaim {
	/// Normalizes the claim into a canonical [`RoleSet`].
	pub fn normalize(&self) -> RoleSet {
		match self {
			Self::Single(label) => RoleSet::new([label.as_str()]),
			Self::Multiple(labels) => RoleSet::new(labels.iter().map(String::as_str)),
		}
	}
}
impl From<RoleClaim> for RoleSet {
	fn from(value: RoleClaim) -> Self {
		value.normalize()
	}
}

/// Normalized, deduplicated, and sorted set of role labels.
///
/// Labels are trimmed and empty entries dropped. Comparison stays case-sensitive so `admin` and
/// `Admin` are distinct roles, matching how the backend issues them.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct RoleSet(BTreeSet<String>);
impl RoleSet {
	/// Creates a normalized role set from any iterator of labels.
	pub fn new<I, S>(labels: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		Self(
			labels
				.into_iter()
				.filter_map(|label| {
					let trimmed = label.as_ref().trim();

					(!trimmed.is_empty()).then(|| trimmed.to_owned())
				})
				.collect(),
		)
	}

	/// Roles admitted to the admin console.
	pub fn admin_console() -> Self {
		Self::new([ROLE_ADMIN, ROLE_MANAGER])
	}

	/// Roles admitted to the staff console.
	pub fn staff_console() -> Self {
		Self::new([ROLE_STAFF, ROLE_MANAGER, ROLE_ADMINISTRATOR])
	}

	/// Number of distinct labels.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true if no labels are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns true if the set contains the provided label.
	pub fn contains(&self, label: &str) -> bool {
		self.0.contains(label)
	}

	/// Returns true when at least one label is shared with `other`.
	pub fn intersects(&self, other: &RoleSet) -> bool {
		// Walk the smaller set and probe the larger one.
		let (small, large) =
			if self.len() <= other.len() { (self, other) } else { (other, self) };

		small.iter().any(|label| large.contains(label))
	}

	/// Iterator over labels in sorted order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}
}
impl Debug for RoleSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("RoleSet").field(&self.0).finish()
	}
}
impl Display for RoleSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0.iter().map(String::as_str).collect::<Vec<_>>().join(","))
	}
}
impl From<Vec<String>> for RoleSet {
	fn from(value: Vec<String>) -> Self {
		Self::new(value)
	}
}
impl From<RoleSet> for Vec<String> {
	fn from(value: RoleSet) -> Self {
		value.0.into_iter().collect()
	}
}
impl<'a> FromIterator<&'a str> for RoleSet {
	fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
		Self::new(iter)
	}
}
impl FromStr for RoleSet {
	type Err = std::convert::Infallible;

	/// Parses a comma-delimited list such as `Admin,Manager`.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::new(s.split(',')))
	}
}

/// Iterator over role labels.
pub struct RoleIter<'a> {
	inner: Iter<'a, String>,
}
impl<'a> Iterator for RoleIter<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		self.inner.next().map(String::as_str)
	}
}
impl<'a> IntoIterator for &'a RoleSet {
	type IntoIter = RoleIter<'a>;
	type Item = &'a str;

	fn into_iter(self) -> Self::IntoIter {
		RoleIter { inner: self.0.iter() }
	}
}
