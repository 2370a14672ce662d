//! The routing trie. One node per pattern segment, keyed on `/`-delimited
//! parts. Lookup is a backtracking depth-first search: a static child and a
//! wildcard child may coexist at the same depth, and only walking the full
//! remaining path tells which subtree (if any) completes the match.

/// Splits a pattern or a concrete path into its segments.
///
/// Empty segments are dropped, so `/p//x` behaves as `/p/x`. Segmentation
/// stops right after a catch-all segment: the catch-all absorbs the tail, so
/// anything written after it in the pattern is never materialized.
pub(crate) fn parse_pattern(pattern: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    for part in pattern.split('/') {
        if part.is_empty() {
            continue;
        }
        parts.push(part);
        if part.starts_with('*') {
            break;
        }
    }
    parts
}

fn is_wild(part: &str) -> bool {
    part.starts_with(':') || part.starts_with('*')
}

/// A node in the routing trie, representing one segment position.
#[derive(Debug, Default)]
pub(crate) struct Node {
    /// The segment token as registered. Empty only on the synthetic root.
    part: String,
    /// The full original pattern, set on the node where a registered route
    /// terminates. `None` on intermediate nodes.
    pattern: Option<String>,
    /// Whether `part` starts with `:` or `*`.
    is_wild: bool,
    /// Children in registration order. The order is part of the matching
    /// contract: ambiguous siblings are tried first-registered-first.
    children: Vec<Node>,
}

impl Node {
    fn new(part: &str) -> Node {
        Node {
            part: part.to_owned(),
            pattern: None,
            is_wild: is_wild(part),
            children: Vec::new(),
        }
    }

    /// The pattern terminating at this node, if any.
    pub(crate) fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Inserts `pattern` (already split into `parts`) below this node.
    ///
    /// Re-inserting an identical pattern overwrites the stored pattern string
    /// and creates no new nodes.
    pub(crate) fn insert(&mut self, pattern: &str, parts: &[&str], depth: usize) {
        if depth == parts.len() {
            self.pattern = Some(pattern.to_owned());
            return;
        }

        let part = parts[depth];
        let idx = match self.children.iter().position(|child| child.part == part) {
            Some(idx) => idx,
            None => {
                self.children.push(Node::new(part));
                self.children.len() - 1
            }
        };
        self.children[idx].insert(pattern, parts, depth + 1);
    }

    /// Finds the node whose pattern matches `parts`, or `None`.
    ///
    /// A node is terminal once the path is exhausted, or immediately at a
    /// catch-all segment; either way it only matches if a registered route
    /// actually ends there, so the root and intermediate nodes never match on
    /// their own. Otherwise every child that equals the current segment or is
    /// a wildcard is tried in registration order, and the first subtree
    /// yielding a full match wins.
    pub(crate) fn search(&self, parts: &[&str], depth: usize) -> Option<&Node> {
        if depth == parts.len() || self.part.starts_with('*') {
            return self.pattern.is_some().then_some(self);
        }

        let part = parts[depth];
        self.children
            .iter()
            .filter(|child| child.part == part || child.is_wild)
            .find_map(|child| child.search(parts, depth + 1))
    }
}
