//! Elementary circuit enumeration (Johnson, 1975).
//!
//! Reference: Donald B. Johnson, "Finding All the Elementary Circuits of a Directed Graph",
//! SIAM J. Computing, Vol. 4, No. 1, March 1975.

use fixedbitset::FixedBitSet;
use smallvec::SmallVec;

use super::scc::strongly_connected_components;
use super::{Graph, VertexId};

/// Every elementary circuit of `graph`, each exactly once.
///
/// A circuit is listed as the vertices along it, starting at its smallest vertex and
/// without repeating that vertex at the end. Ids are reported through `graph`'s own name
/// mapping, so a subgraph reports ids of the graph it was cut from.
pub fn elementary_circuits(graph: &Graph) -> Vec<Vec<VertexId>> {
    let root = graph.detached();
    let n = root.vertex_count();
    let mut circuits = Vec::new();

    let mut s = 0;
    while s < n {
        let rest: Vec<VertexId> = (s..n).map(VertexId::new).collect();
        let components = strongly_connected_components(&root.induced_subgraph(&rest));
        let Some(working) = components
            .into_iter()
            .min_by_key(|component| component.convert_vertex_name(VertexId(0)))
        else {
            break;
        };

        // Local vertex 0 of a component is its smallest vertex.
        s = working.convert_vertex_name(VertexId(0)).index();

        let mut search = BlockedSearch::new(&working);
        search.circuit(VertexId(0));
        log::trace!(
            "{} circuits through vertex {s} in a component of {} vertices",
            search.found.len(),
            working.vertex_count()
        );

        circuits.extend(
            search
                .found
                .iter()
                .map(|path| graph.convert_vertex_names(&working.convert_vertex_names(path))),
        );
        s += 1;
    }

    circuits
}

/// One `CIRCUIT(s)` run over a strongly connected component rooted at local vertex 0.
struct BlockedSearch<'g> {
    graph: &'g Graph,
    blocked: FixedBitSet,
    /// b[u]: vertices to unblock once u takes part in a circuit
    b: Vec<SmallVec<[VertexId; 4]>>,
    path: Vec<VertexId>,
    found: Vec<Vec<VertexId>>,
}

impl<'g> BlockedSearch<'g> {
    fn new(graph: &'g Graph) -> Self {
        let n = graph.vertex_count();
        Self {
            graph,
            blocked: FixedBitSet::with_capacity(n),
            b: vec![SmallVec::new(); n],
            path: Vec::with_capacity(n),
            found: Vec::new(),
        }
    }

    /// Returns true when at least one circuit back to the root went through `v`.
    fn circuit(&mut self, v: VertexId) -> bool {
        let start = VertexId(0);
        let graph = self.graph;
        let mut closed = false;

        self.path.push(v);
        self.blocked.insert(v.index());

        for &u in graph.outward_neighbours(v) {
            if u == start {
                self.found.push(self.path.clone());
                closed = true;
            } else if !self.blocked.contains(u.index()) && self.circuit(u) {
                closed = true;
            }
        }

        if closed {
            self.unblock(v);
        } else {
            for &u in graph.outward_neighbours(v) {
                let deferred = &mut self.b[u.index()];
                if !deferred.contains(&v) {
                    deferred.push(v);
                }
            }
        }

        self.path.pop();
        closed
    }

    fn unblock(&mut self, u: VertexId) {
        self.blocked.set(u.index(), false);
        for w in std::mem::take(&mut self.b[u.index()]) {
            if self.blocked.contains(w.index()) {
                self.unblock(w);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn raw(circuits: &[Vec<VertexId>]) -> Vec<Vec<u32>> {
        circuits
            .iter()
            .map(|c| c.iter().map(|v| v.0).collect())
            .collect()
    }

    /// Bidirectional edges between horizontally and vertically adjacent cells.
    fn grid(rows: u32, cols: u32) -> Graph {
        let mut edges = Vec::new();
        for r in 0..rows {
            for c in 0..cols {
                let v = r * cols + c;
                if c + 1 < cols {
                    edges.push((v, v + 1));
                    edges.push((v + 1, v));
                }
                if r + 1 < rows {
                    edges.push((v, v + cols));
                    edges.push((v + cols, v));
                }
            }
        }
        Graph::from_edges((rows * cols) as usize, edges).unwrap()
    }

    /// Counts circuits by trying every simple path whose vertices all exceed its start.
    fn brute_force_count(graph: &Graph) -> usize {
        fn walk(graph: &Graph, start: VertexId, v: VertexId, on_path: &mut Vec<bool>) -> usize {
            let mut count = 0;
            for &u in graph.outward_neighbours(v) {
                if u == start {
                    count += 1;
                } else if u > start && !on_path[u.index()] {
                    on_path[u.index()] = true;
                    count += walk(graph, start, u, on_path);
                    on_path[u.index()] = false;
                }
            }
            count
        }

        graph
            .vertices()
            .map(|s| {
                let mut on_path = vec![false; graph.vertex_count()];
                on_path[s.index()] = true;
                walk(graph, s, s, &mut on_path)
            })
            .sum()
    }

    #[test]
    fn test_empty_graph() {
        assert!(elementary_circuits(&Graph::empty()).is_empty());
    }

    #[test]
    fn test_acyclic_graph() {
        let graph = Graph::from_edges(4, [(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
        assert!(elementary_circuits(&graph).is_empty());
    }

    #[test]
    fn test_single_triangle() {
        let graph = Graph::from_edges(3, [(0, 1), (1, 2), (2, 0)]).unwrap();
        assert_eq!(raw(&elementary_circuits(&graph)), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_self_loop_is_length_one_circuit() {
        let graph = Graph::from_edges(3, [(0, 1), (1, 1), (1, 2)]).unwrap();
        assert_eq!(raw(&elementary_circuits(&graph)), vec![vec![1]]);
    }

    #[test]
    fn test_complete_digraph_on_three_vertices() {
        let graph =
            Graph::from_edges(3, [(0, 1), (1, 0), (0, 2), (2, 0), (1, 2), (2, 1)]).unwrap();
        let circuits = raw(&elementary_circuits(&graph));

        assert_eq!(
            circuits,
            vec![
                vec![0, 1],
                vec![0, 1, 2],
                vec![0, 2],
                vec![0, 2, 1],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn test_grid_3x3() {
        let circuits = elementary_circuits(&grid(3, 3));

        assert_eq!(circuits.len(), 38);
        let by_length = circuits.iter().map(Vec::len).counts();
        assert_eq!(by_length[&2], 12);
        assert_eq!(by_length[&4], 8);
        assert_eq!(by_length[&6], 8);
        assert_eq!(by_length[&8], 10);
        assert_eq!(by_length.len(), 4);
    }

    #[test]
    fn test_circuits_are_elementary_and_unique() {
        let circuits = raw(&elementary_circuits(&grid(3, 4)));

        for circuit in &circuits {
            assert!(circuit.iter().all_unique(), "{circuit:?} repeats a vertex");
            assert_eq!(circuit[0], *circuit.iter().min().unwrap());
        }
        assert!(circuits.iter().all_unique());
    }

    #[test]
    fn test_matches_brute_force_on_generated_graphs() {
        // xorshift, fixed seed
        let mut state = 0x2545_f491_u32;
        let mut next = move || {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state
        };

        for _ in 0..40 {
            let n = 2 + next() % 6;
            let edges: Vec<(u32, u32)> = (0..n * 2).map(|_| (next() % n, next() % n)).collect();
            let graph = Graph::from_edges(n as usize, edges).unwrap();

            assert_eq!(
                elementary_circuits(&graph).len(),
                brute_force_count(&graph),
                "mismatch on {graph}"
            );
        }
    }

    #[test]
    fn test_subgraph_reports_outer_names() {
        let graph = Graph::from_edges(6, [(1, 5), (5, 3), (3, 1), (0, 2)]).unwrap();
        let sub = graph.induced_subgraph(&[VertexId(5), VertexId(3), VertexId(1)]);

        // Local order is 5, 3, 1 so the circuit starts at local 0 (= 5).
        assert_eq!(raw(&elementary_circuits(&sub)), vec![vec![5, 3, 1]]);
    }
}
