use std::collections::HashSet;

use crate::types::VideoReference;

/// Drop repeated ids, keeping the first occurrence of each in input order.
pub fn dedupe<I>(refs: I) -> Vec<VideoReference>
where
    I: IntoIterator<Item = VideoReference>,
{
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();

    for reference in refs {
        if seen.insert(reference.id.clone()) {
            unique.push(reference);
        }
    }

    unique
}
