//! Sticky directive lookup
//!
//! Backgrounds and music stay in effect until a later line replaces them.
//! Their current value is derived by walking backward from the play head
//! rather than tracked incrementally, so any jump or back-navigation lands
//! on the same answer.

use crate::types::ScriptLine;

/// Scan `index` down to `0`, returning the first value `extract` yields
///
/// An `index` past the end of `scripts` is clamped to the last line.
pub fn scan<'a, T>(
    scripts: &'a [ScriptLine],
    index: usize,
    extract: impl FnMut(&'a ScriptLine) -> Option<T>,
) -> Option<T> {
    let last = scripts.len().checked_sub(1)?;
    scripts[..=index.min(last)].iter().rev().find_map(extract)
}

/// Index of the nearest line at or before `index` matching `pred`
pub fn position(
    scripts: &[ScriptLine],
    index: usize,
    mut pred: impl FnMut(&ScriptLine) -> bool,
) -> Option<usize> {
    let last = scripts.len().checked_sub(1)?;
    (0..=index.min(last)).rev().find(|&i| pred(&scripts[i]))
}
