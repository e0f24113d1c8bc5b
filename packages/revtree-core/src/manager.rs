use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::compile::compile_text;
use crate::error::{Error, Result};
use crate::ids::{Timestamp, VersionId};
use crate::version::Version;

/// Revision forest of a single document.
///
/// Versions are write-once. The main-branch tip is recomputed on every insertion and the
/// materialized main branch is memoized until the next one. Not meant for concurrent mutation.
#[derive(Debug)]
pub struct VersionManager {
    versions: HashMap<VersionId, Arc<Version>>,
    /// Tip of the main branch, or the traversal error that prevented choosing one.
    last_version: std::result::Result<Option<VersionId>, Error>,
    main_branch: OnceCell<Vec<Arc<Version>>>,
}

impl Default for VersionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionManager {
    pub fn new() -> Self {
        Self {
            versions: HashMap::new(),
            last_version: Ok(None),
            main_branch: OnceCell::new(),
        }
    }

    /// Rehydrate a manager from an unordered collection of versions.
    ///
    /// Children may appear before their parents; the tip is selected once, after every version
    /// is registered.
    pub fn from_versions(versions: impl IntoIterator<Item = Version>) -> Result<Self> {
        let mut manager = Self::new();
        for version in versions {
            manager.insert(version)?;
        }
        manager.refresh();
        Ok(manager)
    }

    /// Register a new version.
    ///
    /// Only a duplicate id is rejected. A parent that is not (yet) registered is accepted; the
    /// resulting traversal failure is reported by [`Self::last_version`] and
    /// [`Self::main_branch`].
    pub fn add_version(&mut self, version: Version) -> Result<()> {
        self.insert(version)?;
        self.refresh();
        Ok(())
    }

    /// Snapshot of every stored version, in no particular order.
    pub fn all_versions(&self) -> Vec<Arc<Version>> {
        self.versions.values().cloned().collect()
    }

    pub fn get(&self, id: &VersionId) -> Option<&Arc<Version>> {
        self.versions.get(id)
    }

    pub fn contains(&self, id: &VersionId) -> bool {
        self.versions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    /// Tip of the main branch, `None` when the manager is empty.
    pub fn last_version(&self) -> Result<Option<&VersionId>> {
        match &self.last_version {
            Ok(tip) => Ok(tip.as_ref()),
            Err(err) => Err(err.clone()),
        }
    }

    /// Path from the root of `id`'s tree down to `id`, inclusive.
    pub fn branch(&self, id: &VersionId) -> Result<Vec<Arc<Version>>> {
        let mut branch = Vec::new();
        let mut current = Some(id);
        while let Some(id) = current {
            let version = self
                .versions
                .get(id)
                .ok_or_else(|| Error::NotFound(id.clone()))?;
            if branch.len() == self.versions.len() {
                return Err(Error::Cycle(id.clone()));
            }
            branch.push(Arc::clone(version));
            current = version.parent.as_ref();
        }
        branch.reverse();
        Ok(branch)
    }

    /// The canonical branch, root to tip. Empty when no versions are stored.
    pub fn main_branch(&self) -> Result<&[Arc<Version>]> {
        if let Some(branch) = self.main_branch.get() {
            return Ok(branch.as_slice());
        }
        let branch = match self.last_version()? {
            Some(tip) => self.branch(tip)?,
            None => Vec::new(),
        };
        Ok(self.main_branch.get_or_init(|| branch).as_slice())
    }

    /// Versions no other version names as its parent, sorted by id.
    pub fn leaves(&self) -> Vec<&VersionId> {
        let parents: HashSet<&VersionId> = self
            .versions
            .values()
            .filter_map(|v| v.parent.as_ref())
            .collect();
        let mut leaves: Vec<&VersionId> = self
            .versions
            .keys()
            .filter(|id| !parents.contains(id))
            .collect();
        leaves.sort();
        leaves
    }

    /// Text of the document at `id`.
    pub fn compile_branch(&self, id: &VersionId) -> Result<String> {
        compile_text(self.branch(id)?)
    }

    /// Text of the document at the main-branch tip.
    pub fn compile_main_branch(&self) -> Result<String> {
        compile_text(self.main_branch()?)
    }

    /// Check the whole forest up front: every parent resolves and no parent chain loops.
    pub fn validate(&self) -> Result<()> {
        let mut depths = HashMap::new();
        for id in self.versions.keys() {
            self.root_distance(id, &mut depths)?;
        }
        Ok(())
    }

    fn insert(&mut self, version: Version) -> Result<()> {
        if self.versions.contains_key(&version.id) {
            return Err(Error::AlreadyExists(version.id));
        }
        tracing::debug!(id = %version.id, parent = ?version.parent, "registering version");
        self.versions.insert(version.id.clone(), Arc::new(version));
        Ok(())
    }

    fn refresh(&mut self) {
        self.last_version = self.select_tip();
        if let Err(err) = &self.last_version {
            tracing::warn!(error = %err, "main branch tip unavailable");
        }
        self.main_branch = OnceCell::new();
    }

    /// Pick the leaf farthest from its root; equally deep leaves go to the oldest `date`, and
    /// identical dates to the smallest id.
    fn select_tip(&self) -> Result<Option<VersionId>> {
        let mut depths = HashMap::new();
        let mut best: Option<(usize, Timestamp, &VersionId)> = None;
        let mut ties = 0usize;

        // Leaves come sorted by id, so the first of several equal candidates is the smallest.
        for leaf in self.leaves() {
            let distance = self.root_distance(leaf, &mut depths)?;
            let date = self.versions[leaf].date;
            match best {
                Some((best_distance, best_date, _))
                    if (distance, date) == (best_distance, best_date) =>
                {
                    ties += 1;
                }
                Some((best_distance, best_date, _))
                    if distance < best_distance
                        || (distance == best_distance && date > best_date) => {}
                _ => {
                    best = Some((distance, date, leaf));
                    ties = 1;
                }
            }
        }

        let Some((distance, date, tip)) = best else {
            // Without leaves every stored version sits on a parent cycle.
            return match self.versions.keys().min() {
                Some(id) => Err(Error::Cycle(id.clone())),
                None => Ok(None),
            };
        };
        if ties > 1 {
            tracing::warn!(
                date,
                distance,
                ties,
                "longest leaves share a date; choosing smallest id"
            );
        }
        tracing::debug!(tip = %tip, distance, "selected main branch tip");
        Ok(Some(tip.clone()))
    }

    /// Edges between `id` and its root, memoized in `depths` across calls.
    fn root_distance<'a>(
        &'a self,
        id: &'a VersionId,
        depths: &mut HashMap<&'a VersionId, usize>,
    ) -> Result<usize> {
        // Climb until a root or an already measured ancestor, then unwind assigning depths.
        let mut pending: Vec<&'a VersionId> = Vec::new();
        let mut current = id;
        let base = loop {
            if let Some(&depth) = depths.get(current) {
                break depth;
            }
            let version = self
                .versions
                .get(current)
                .ok_or_else(|| Error::NotFound(current.clone()))?;
            match &version.parent {
                None => {
                    depths.insert(current, 0);
                    break 0;
                }
                Some(parent) => {
                    if pending.len() == self.versions.len() {
                        return Err(Error::Cycle(current.clone()));
                    }
                    pending.push(current);
                    current = parent;
                }
            }
        };

        let mut depth = base;
        for id in pending.into_iter().rev() {
            depth += 1;
            depths.insert(id, depth);
        }
        Ok(depth)
    }
}
