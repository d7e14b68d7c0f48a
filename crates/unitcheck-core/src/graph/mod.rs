pub mod circuits;
pub mod csr;
pub mod scc;

use csr::{CsrError, CsrList};
use thiserror::Error;

// Dense vertex ids, local to the graph that hands them out.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct VertexId(pub u32);

impl VertexId {
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for VertexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    #[error("CSR error: {0}")]
    Csr(#[from] CsrError),
    #[error("edge {from} -> {to} leaves the vertex range 0..{vertex_count}")]
    VertexOutOfRange {
        from: VertexId,
        to: VertexId,
        vertex_count: usize,
    },
}

/// Fixed directed graph over dense vertex ids `0..n`.
///
/// Adjacency is stored CSR-style with every row sorted. A graph produced by
/// [`Graph::induced_subgraph`] renumbers its vertices but remembers, for each local id,
/// the id that vertex had in the outermost graph it was cut from; see
/// [`Graph::convert_vertex_name`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    /// vertex -> outward neighbours (sorted, no duplicates)
    adjacency: CsrList<VertexId>,
    /// local id -> id in the outermost graph
    names: Vec<VertexId>,
}

impl Graph {
    /// Zero vertices, zero edges.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from one row of outward neighbours per vertex. Every id in `rows` must be
    /// below `rows.len()`; callers that cannot guarantee this use [`Graph::from_edges`].
    pub fn from_adjacency(rows: Vec<Vec<VertexId>>) -> Self {
        debug_assert!(rows
            .iter()
            .flatten()
            .all(|v| v.index() < rows.len()));
        let names = (0..rows.len()).map(VertexId::new).collect();
        Self {
            adjacency: CsrList::from_buckets_sorted(rows),
            names,
        }
    }

    /// Build from an edge list over `vertex_count` vertices. Parallel edges collapse.
    pub fn from_edges(
        vertex_count: usize,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> Result<Self, GraphError> {
        let mut rows = vec![Vec::new(); vertex_count];
        for (from, to) in edges {
            let (from, to) = (VertexId(from), VertexId(to));
            if from.index() >= vertex_count || to.index() >= vertex_count {
                return Err(GraphError::VertexOutOfRange {
                    from,
                    to,
                    vertex_count,
                });
            }
            rows[from.index()].push(to);
        }
        Ok(Self::from_adjacency(rows))
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.rows()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.nnz()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count() == 0
    }

    pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertex_count()).map(VertexId::new)
    }

    /// Vertices `v` points to, in ascending order. Panics if `v` is not a vertex.
    pub fn outward_neighbours(&self, v: VertexId) -> &[VertexId] {
        self.adjacency.row_unchecked(v.index())
    }

    pub fn try_outward_neighbours(&self, v: VertexId) -> Result<&[VertexId], GraphError> {
        Ok(self.adjacency.row(v.index())?)
    }

    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.adjacency
            .row(from.index())
            .is_ok_and(|row| row.binary_search(&to).is_ok())
    }

    pub fn has_self_loop(&self, v: VertexId) -> bool {
        self.has_edge(v, v)
    }

    /// Map a local vertex id back to the outermost graph's numbering.
    pub fn convert_vertex_name(&self, v: VertexId) -> VertexId {
        self.names[v.index()]
    }

    pub fn convert_vertex_names(&self, vertices: &[VertexId]) -> Vec<VertexId> {
        vertices
            .iter()
            .map(|&v| self.convert_vertex_name(v))
            .collect()
    }

    /// The subgraph on `subset` with exactly the edges whose endpoints both lie in it.
    ///
    /// Vertex `subset[i]` becomes local vertex `i` of the result. The result's name
    /// mapping composes with this graph's, so it always leads back to the outermost ids.
    /// `subset` must not repeat a vertex.
    pub fn induced_subgraph(&self, subset: &[VertexId]) -> Graph {
        let mut position: Vec<Option<VertexId>> = vec![None; self.vertex_count()];
        for (i, &v) in subset.iter().enumerate() {
            debug_assert!(position[v.index()].is_none(), "vertex {v} repeated");
            position[v.index()] = Some(VertexId::new(i));
        }

        let rows = subset
            .iter()
            .map(|&v| {
                self.outward_neighbours(v)
                    .iter()
                    .filter_map(|w| position[w.index()])
                    .collect()
            })
            .collect();

        Graph {
            adjacency: CsrList::from_buckets_sorted(rows),
            names: self.convert_vertex_names(subset),
        }
    }

    /// Same structure, with the name mapping reset to the identity.
    pub(crate) fn detached(&self) -> Graph {
        Graph {
            adjacency: self.adjacency.clone(),
            names: self.vertices().collect(),
        }
    }
}

impl std::fmt::Display for Graph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Graph {{")?;
        writeln!(
            f,
            "  vertices: {}, edges: {}",
            self.vertex_count(),
            self.edge_count()
        )?;
        for v in self.vertices() {
            let name = self.convert_vertex_name(v);
            if name == v {
                write!(f, "  {v} -> [")?;
            } else {
                write!(f, "  {v} ({name}) -> [")?;
            }
            for (i, w) in self.outward_neighbours(v).iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{w}")?;
            }
            writeln!(f, "]")?;
        }
        write!(f, "}}")
    }
}
