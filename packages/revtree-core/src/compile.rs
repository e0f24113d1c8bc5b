use crate::error::Result;
use crate::patch::apply_patches;
use crate::version::Version;

/// Reconstruct the text at the end of `versions`, ordered root to leaf.
///
/// Any hunk that fails to apply aborts the whole reconstruction.
pub fn compile_text<I>(versions: I) -> Result<String>
where
    I: IntoIterator,
    I::Item: AsRef<Version>,
{
    let versions: Vec<I::Item> = versions.into_iter().collect();
    apply_patches(versions.iter().map(|v| &v.as_ref().patch), "")
}
