//! Listing helpers shared by the services.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDir::Asc => ordering,
            SortDir::Desc => ordering.reverse(),
        }
    }
}

/// Stable sort of `rows` by `compare`, flipped for [`SortDir::Desc`].
pub fn sort_rows<T>(rows: &mut [T], dir: SortDir, compare: impl Fn(&T, &T) -> Ordering) {
    rows.sort_by(|a, b| dir.apply(compare(a, b)));
}

/// Case-insensitive string ordering used by name sorts.
pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descending_reverses_and_stays_stable() {
        let mut rows = vec![(2, 'a'), (1, 'b'), (2, 'c')];
        sort_rows(&mut rows, SortDir::Desc, |a, b| a.0.cmp(&b.0));
        assert_eq!(rows, vec![(2, 'a'), (2, 'c'), (1, 'b')]);
    }
}
