//! Path word index.
//!
//! Records, across every composed literal path of one compilation, which
//! literal segment appears at which depth. Parameter segments advance the
//! depth but are never recorded. Pattern paths are ignored.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::routing::path::{RoutePath, SEPARATOR};

/// Leading characters that mark a segment as a path parameter.
///
/// `:` is the classic marker; `{` and `*` cover axum-style captures.
pub const PARAM_MARKERS: [char; 3] = [':', '{', '*'];

/// Returns true if the segment is a path parameter.
pub fn is_param_segment(segment: &str) -> bool {
    segment.starts_with(&PARAM_MARKERS[..])
}

/// Mapping from literal path word to the depths it was seen at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PathWordIndex {
    words: BTreeMap<String, BTreeSet<usize>>,
}

impl PathWordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every literal word of `path`. Depth starts at 1.
    pub fn index(&mut self, path: &RoutePath) {
        let RoutePath::Literal(path) = path else {
            return;
        };

        let segments = path.split(SEPARATOR).filter(|segment| !segment.is_empty());
        for (depth, segment) in (1..).zip(segments) {
            if is_param_segment(segment) {
                continue;
            }
            match self.words.get_mut(segment) {
                Some(depths) => {
                    depths.insert(depth);
                }
                None => {
                    self.words.insert(segment.to_string(), BTreeSet::from([depth]));
                }
            }
        }
    }

    /// Depths at which `word` was seen.
    pub fn depths(&self, word: &str) -> Option<&BTreeSet<usize>> {
        self.words.get(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word)
    }

    /// Words seen at exactly `depth`, in lexical order.
    pub fn words_at(&self, depth: usize) -> impl Iterator<Item = &str> + '_ {
        self.words
            .iter()
            .filter(move |(_, depths)| depths.contains(&depth))
            .map(|(word, _)| word.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<usize>)> + '_ {
        self.words.iter().map(|(word, depths)| (word.as_str(), depths))
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
