use crate::ids::{Timestamp, VersionId};
use crate::patch::{make_patch, Patch};
use crate::traits::VersionSource;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Immutable node in the revision forest.
///
/// `patch` turns the text of `parent` (or the empty string for a root) into the text of this
/// version.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Version {
    pub id: VersionId,
    pub date: Timestamp,
    pub patch: Patch,
    #[cfg_attr(feature = "serde", serde(default))]
    pub parent: Option<VersionId>,
}

impl Version {
    pub fn new(
        id: impl Into<VersionId>,
        date: Timestamp,
        patch: Patch,
        parent: Option<VersionId>,
    ) -> Self {
        Self {
            id: id.into(),
            date,
            patch,
            parent,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

impl AsRef<Version> for Version {
    fn as_ref(&self) -> &Version {
        self
    }
}

/// Create a version by diffing `old_text` against `new_text`, stamped by `source`.
pub fn new_version_with<S: VersionSource>(
    source: &mut S,
    old_text: &str,
    new_text: &str,
    parent: Option<&VersionId>,
) -> Version {
    Version {
        id: source.next_id(),
        date: source.now(),
        patch: make_patch(old_text, new_text),
        parent: parent.cloned(),
    }
}

/// Create a version with a random id and the current wall-clock time.
#[cfg(feature = "system")]
pub fn new_version(old_text: &str, new_text: &str, parent: Option<&VersionId>) -> Version {
    new_version_with(&mut crate::traits::SystemSource, old_text, new_text, parent)
}
