//! Vertex and edge attribute types.

use alsvin_types::Phase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a vertex within one graph.
///
/// Identifiers are handed out by a monotone counter and never reused, even
/// after the vertex is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u32);

impl VertexId {
    /// The id as an array index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl From<u32> for VertexId {
    fn from(id: u32) -> Self {
        VertexId(id)
    }
}

/// The kind of a ZX-graph vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexKind {
    /// An input or output boundary. Carries no phase; degree is one in a
    /// well-formed graph.
    Boundary,
    /// A Z-spider (green).
    Z,
    /// An X-spider (red).
    X,
    /// An H-box. Defaults to phase π, where it denotes a plain Hadamard.
    HBox,
}

impl VertexKind {
    /// True for Z- and X-spiders.
    #[inline]
    pub fn is_spider(self) -> bool {
        matches!(self, VertexKind::Z | VertexKind::X)
    }

    /// The opposite spider colour. Identity for non-spiders.
    pub fn toggled(self) -> Self {
        match self {
            VertexKind::Z => VertexKind::X,
            VertexKind::X => VertexKind::Z,
            other => other,
        }
    }

    /// The default phase for a fresh vertex of this kind.
    pub fn default_phase(self) -> Phase {
        match self {
            VertexKind::HBox => Phase::pi(),
            _ => Phase::zero(),
        }
    }
}

impl fmt::Display for VertexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            VertexKind::Boundary => "B",
            VertexKind::Z => "Z",
            VertexKind::X => "X",
            VertexKind::HBox => "H",
        };
        write!(f, "{s}")
    }
}

/// The kind of an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EdgeKind {
    /// A plain wire.
    Simple,
    /// A Hadamard-coloured wire.
    Hadamard,
}

impl EdgeKind {
    /// The other edge kind.
    pub fn toggled(self) -> Self {
        match self {
            EdgeKind::Simple => EdgeKind::Hadamard,
            EdgeKind::Hadamard => EdgeKind::Simple,
        }
    }

    /// Compose two wire segments into one: an even number of Hadamards
    /// cancels out.
    pub fn combined(self, other: EdgeKind) -> Self {
        if self == other {
            EdgeKind::Simple
        } else {
            EdgeKind::Hadamard
        }
    }
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EdgeKind::Simple => "S",
            EdgeKind::Hadamard => "H",
        };
        write!(f, "{s}")
    }
}

/// The edges present between one pair of vertices.
///
/// After normalisation a pair carries at most one edge of each kind, so a
/// pair's connectivity is two booleans. A Simple and a Hadamard edge between
/// the same vertices coexist; two edges of the same kind annihilate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSet {
    simple: bool,
    hadamard: bool,
}

impl EdgeSet {
    /// The empty set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A set holding one edge of the given kind.
    pub fn single(kind: EdgeKind) -> Self {
        let mut set = Self::default();
        set.insert(kind);
        set
    }

    /// Whether an edge of `kind` is present.
    #[inline]
    pub fn contains(&self, kind: EdgeKind) -> bool {
        match kind {
            EdgeKind::Simple => self.simple,
            EdgeKind::Hadamard => self.hadamard,
        }
    }

    /// Add an edge of `kind`. Returns false if it was already present.
    pub fn insert(&mut self, kind: EdgeKind) -> bool {
        let slot = match kind {
            EdgeKind::Simple => &mut self.simple,
            EdgeKind::Hadamard => &mut self.hadamard,
        };
        let was = *slot;
        *slot = true;
        !was
    }

    /// Remove an edge of `kind`. Returns true if it was present.
    pub fn remove(&mut self, kind: EdgeKind) -> bool {
        let slot = match kind {
            EdgeKind::Simple => &mut self.simple,
            EdgeKind::Hadamard => &mut self.hadamard,
        };
        let was = *slot;
        *slot = false;
        was
    }

    /// True when no edge of either kind is present.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.simple && !self.hadamard
    }

    /// Number of edges in the set (0, 1, or 2).
    #[inline]
    pub fn len(&self) -> usize {
        usize::from(self.simple) + usize::from(self.hadamard)
    }

    /// The kinds present, Simple first.
    pub fn kinds(&self) -> impl Iterator<Item = EdgeKind> + '_ {
        [
            self.simple.then_some(EdgeKind::Simple),
            self.hadamard.then_some(EdgeKind::Hadamard),
        ]
        .into_iter()
        .flatten()
    }
}

/// A ZX-graph vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// The vertex kind.
    pub kind: VertexKind,
    /// The phase, a rational multiple of π. Ignored for boundaries.
    pub phase: Phase,
    /// Logical qubit index. Meaningful for boundaries; retained as a
    /// routing hint otherwise. Negative values mark "no qubit".
    pub qubit: i32,
    /// Layout row, presentation and stable tie-breaking only.
    pub row: f64,
    /// Layout column, presentation and stable tie-breaking only.
    pub col: f64,
}

impl Vertex {
    /// Create a vertex with the default phase of its kind.
    pub fn new(kind: VertexKind, qubit: i32, row: f64, col: f64) -> Self {
        Self {
            kind,
            phase: kind.default_phase(),
            qubit,
            row,
            col,
        }
    }

    /// True for Z- and X-spiders.
    #[inline]
    pub fn is_spider(&self) -> bool {
        self.kind.is_spider()
    }

    /// True for boundaries.
    #[inline]
    pub fn is_boundary(&self) -> bool {
        self.kind == VertexKind::Boundary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_set_insert_remove() {
        let mut set = EdgeSet::empty();
        assert!(set.insert(EdgeKind::Simple));
        assert!(!set.insert(EdgeKind::Simple));
        assert!(set.insert(EdgeKind::Hadamard));
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.kinds().collect::<Vec<_>>(),
            vec![EdgeKind::Simple, EdgeKind::Hadamard]
        );
        assert!(set.remove(EdgeKind::Simple));
        assert!(!set.remove(EdgeKind::Simple));
        assert!(!set.is_empty());
    }

    #[test]
    fn test_edge_kind_algebra() {
        assert_eq!(EdgeKind::Simple.toggled(), EdgeKind::Hadamard);
        assert_eq!(
            EdgeKind::Hadamard.combined(EdgeKind::Hadamard),
            EdgeKind::Simple
        );
        assert_eq!(
            EdgeKind::Simple.combined(EdgeKind::Hadamard),
            EdgeKind::Hadamard
        );
    }

    #[test]
    fn test_default_phases() {
        assert_eq!(VertexKind::HBox.default_phase(), Phase::pi());
        assert_eq!(VertexKind::Z.default_phase(), Phase::zero());
    }
}
