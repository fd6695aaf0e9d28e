use std::collections::HashSet;

/// The document sources a subject may read, resolved fresh for every query
/// and discarded after the merge step. Membership is exact string equality;
/// nothing here matches on prefixes or substrings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizedSet {
	ids: HashSet<String>,
}
impl AuthorizedSet {
	pub fn empty() -> Self {
		Self { ids: HashSet::new() }
	}

	/// Builds the set from oracle object identifiers of the form
	/// `"{object_type}:{id}"`. Identifiers carrying a different type prefix
	/// are dropped rather than kept verbatim: an identifier we cannot
	/// attribute to the queried object type is not a grant.
	pub fn from_prefixed<I>(objects: I, object_type: &str) -> Self
	where
		I: IntoIterator<Item = String>,
	{
		let prefix = format!("{object_type}:");
		let ids = objects
			.into_iter()
			.filter_map(|object| {
				if let Some(id) = object.strip_prefix(&prefix) {
					(!id.is_empty()).then(|| id.to_string())
				} else if object.contains(':') {
					None
				} else {
					Some(object)
				}
			})
			.collect();

		Self { ids }
	}

	pub fn contains(&self, source: &str) -> bool {
		self.ids.contains(source)
	}

	pub fn is_empty(&self) -> bool {
		self.ids.is_empty()
	}

	pub fn len(&self) -> usize {
		self.ids.len()
	}
}
