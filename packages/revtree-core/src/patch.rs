use dissimilar::Chunk;

use crate::error::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const DEFAULT_CONTEXT: usize = 4;

/// Tuning for patch generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatchConfig {
    /// Characters of unchanged text kept on each side of an edit.
    pub context: usize,
}

impl Default for PatchConfig {
    fn default() -> Self {
        Self {
            context: DEFAULT_CONTEXT,
        }
    }
}

/// A single contiguous replacement within a text.
///
/// `before` and `after` share the same leading and trailing context, so a hunk can be located
/// again even when the text around it has shifted.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hunk {
    /// Byte offset in the source text where `before` is expected.
    pub start: usize,
    /// Source text replaced by this hunk, context included.
    pub before: String,
    /// Replacement text, context included.
    pub after: String,
}

impl Hunk {
    fn open(source: &str, offset: usize, context: usize) -> Self {
        let start = suffix_start(&source[..offset], context);
        let lead = &source[start..offset];
        Self {
            start,
            before: lead.to_owned(),
            after: lead.to_owned(),
        }
    }

    fn push_equal(&mut self, text: &str) {
        self.before.push_str(text);
        self.after.push_str(text);
    }
}

/// Ordered edit list turning one text into another.
///
/// Hunk offsets are relative to the text the patch was made from; a patch is only meaningful when
/// applied on top of that text.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Patch {
    hunks: Vec<Hunk>,
}

impl Patch {
    pub fn new(hunks: Vec<Hunk>) -> Self {
        Self { hunks }
    }

    pub fn hunks(&self) -> &[Hunk] {
        &self.hunks
    }

    pub fn len(&self) -> usize {
        self.hunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Apply this patch alone to `base`, failing if any hunk does not match.
    pub fn apply(&self, base: &str) -> Result<String> {
        apply_patches([self], base)
    }
}

impl FromIterator<Hunk> for Patch {
    fn from_iter<I: IntoIterator<Item = Hunk>>(iter: I) -> Self {
        Self {
            hunks: iter.into_iter().collect(),
        }
    }
}

/// Result of applying patches without stopping at the first mismatch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PatchApplication {
    pub text: String,
    /// One flag per hunk, in the flattened order of all applied patches.
    pub applied: Vec<bool>,
}

impl PatchApplication {
    /// Flat index of the first hunk that failed to apply.
    pub fn first_failure(&self) -> Option<usize> {
        self.applied.iter().position(|ok| !ok)
    }
}

/// Build a patch from `old` to `new` with the default context size.
pub fn make_patch(old: &str, new: &str) -> Patch {
    make_patch_with(old, new, &PatchConfig::default())
}

/// Build a patch from `old` to `new`.
///
/// Edits separated by at most `2 * context` unchanged characters share a hunk.
pub fn make_patch_with(old: &str, new: &str, config: &PatchConfig) -> Patch {
    let chunks = dissimilar::diff(old, new);
    let last = chunks.len().saturating_sub(1);

    let mut hunks = Vec::new();
    let mut open: Option<Hunk> = None;
    let mut offset = 0;

    for (i, chunk) in chunks.into_iter().enumerate() {
        match chunk {
            Chunk::Equal(text) => {
                if let Some(mut hunk) = open.take() {
                    if i < last && text.chars().count() <= 2 * config.context {
                        hunk.push_equal(text);
                        open = Some(hunk);
                    } else {
                        hunk.push_equal(&text[..prefix_end(text, config.context)]);
                        hunks.push(hunk);
                    }
                }
                offset += text.len();
            }
            Chunk::Delete(text) => {
                open.get_or_insert_with(|| Hunk::open(old, offset, config.context))
                    .before
                    .push_str(text);
                offset += text.len();
            }
            Chunk::Insert(text) => {
                open.get_or_insert_with(|| Hunk::open(old, offset, config.context))
                    .after
                    .push_str(text);
            }
        }
    }
    hunks.extend(open);

    Patch { hunks }
}

/// Apply `patches` in order on top of `base`, skipping hunks that do not match.
pub fn apply_patches_lenient<'a>(
    patches: impl IntoIterator<Item = &'a Patch>,
    base: &str,
) -> PatchApplication {
    let mut text = base.to_owned();
    let mut applied = Vec::new();

    for patch in patches {
        // Drift between recorded offsets and where hunks of this patch actually landed.
        let mut delta: isize = 0;
        for hunk in &patch.hunks {
            let expected = hunk.start as isize + delta;
            match locate(&text, hunk, expected) {
                Some(at) => {
                    text.replace_range(at..at + hunk.before.len(), &hunk.after);
                    delta = (at + hunk.after.len()) as isize
                        - (hunk.start + hunk.before.len()) as isize;
                    applied.push(true);
                }
                None => {
                    tracing::warn!(
                        segment = applied.len(),
                        start = hunk.start,
                        "patch segment does not match text"
                    );
                    applied.push(false);
                }
            }
        }
    }

    PatchApplication { text, applied }
}

/// Apply `patches` in order on top of `base`.
///
/// Fails with [`Error::ApplyFailure`] naming the first hunk that could not be matched; no partial
/// text is returned.
pub fn apply_patches<'a>(
    patches: impl IntoIterator<Item = &'a Patch>,
    base: &str,
) -> Result<String> {
    let result = apply_patches_lenient(patches, base);
    match result.first_failure() {
        Some(index) => Err(Error::ApplyFailure { index }),
        None => Ok(result.text),
    }
}

fn locate(text: &str, hunk: &Hunk, expected: isize) -> Option<usize> {
    let exact = usize::try_from(expected).ok().filter(|&at| at <= text.len());
    if let Some(at) = exact {
        if text.get(at..at + hunk.before.len()) == Some(hunk.before.as_str()) {
            return Some(at);
        }
    }
    // Pure insertions carry no text to search for.
    if hunk.before.is_empty() {
        return None;
    }

    let anchor = expected.clamp(0, text.len() as isize) as usize;
    text.match_indices(hunk.before.as_str())
        .map(|(at, _)| at)
        .min_by_key(|&at| at.abs_diff(anchor))
}

fn prefix_end(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}

fn suffix_start(text: &str, chars: usize) -> usize {
    if chars == 0 {
        return text.len();
    }
    text.char_indices().rev().nth(chars - 1).map_or(0, |(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_bounds_respect_char_boundaries() {
        let text = "añb€c";
        assert_eq!(&text[..prefix_end(text, 2)], "añ");
        assert_eq!(&text[suffix_start(text, 2)..], "€c");
        assert_eq!(prefix_end(text, 10), text.len());
        assert_eq!(suffix_start(text, 10), 0);
        assert_eq!(suffix_start(text, 0), text.len());
    }

    #[test]
    fn locate_prefers_nearest_occurrence() {
        let hunk = Hunk {
            start: 0,
            before: "ab".into(),
            after: "xy".into(),
        };
        // "ab" at 0 and 6; expected offset 5 is closest to 6.
        assert_eq!(locate("ab----ab", &hunk, 5), Some(6));
        assert_eq!(locate("ab----ab", &hunk, 1), Some(0));
        assert_eq!(locate("------", &hunk, 0), None);
    }

    #[test]
    fn pure_insertion_needs_valid_offset() {
        let hunk = Hunk {
            start: 0,
            before: String::new(),
            after: "z".into(),
        };
        assert_eq!(locate("abc", &hunk, 3), Some(3));
        assert_eq!(locate("abc", &hunk, 4), None);
        assert_eq!(locate("ñ", &hunk, 1), None);
    }
}
