//! Sorted-unique set helpers over grammar symbols.
//!
//! Terminal sets are [`BTreeSet`]s so that iteration order (and therefore
//! every dump, diagnostic and test expectation) is deterministic.

use std::collections::BTreeSet;

/// A sorted, duplicate-free set of terminal names.
pub type TerminalSet = BTreeSet<String>;

/// Adds every element of `src` to `dst`.
///
/// Returns `true` if `dst` grew. The knowledge engine relies on this to
/// detect its fixed point without comparing whole tables.
pub fn union_into(dst: &mut TerminalSet, src: &TerminalSet) -> bool {
    let before = dst.len();
    dst.extend(src.iter().cloned());
    dst.len() != before
}

/// Elements of `a` that are not in `b`, in sorted order.
pub fn difference<'a, I>(a: I, b: &BTreeSet<&str>) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    sorted_unique(a.into_iter().filter(|s| !b.contains(s)).map(str::to_string))
}

/// Sorts a sequence and removes duplicates.
pub fn sorted_unique<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut v: Vec<String> = items.into_iter().collect();
    v.sort();
    v.dedup();
    v
}
