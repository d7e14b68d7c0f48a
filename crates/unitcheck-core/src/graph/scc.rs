//! Path-based strongly connected components (Gabow).
//!
//! One depth-first traversal with two stacks: `nodes` holds every visited vertex not yet
//! assigned to a component, `representatives` holds the candidate component roots along
//! the current path. A back or cross edge into a vertex still on `nodes` contracts the
//! path by popping every representative discovered after that vertex.

use super::{Graph, VertexId};

/// Non-trivial strongly connected components of `graph`, each as an induced subgraph.
///
/// A component is non-trivial when it has more than one vertex, or when it is a single
/// vertex with an edge to itself. Components come out ordered by their smallest vertex,
/// and each component's vertices keep ascending order, so local vertex 0 of every
/// returned graph is that component's smallest vertex.
pub fn strongly_connected_components(graph: &Graph) -> Vec<Graph> {
    let representative = SccFinder::run(graph);

    // Group by representative, in ascending vertex order.
    let mut group_of: Vec<Option<usize>> = vec![None; graph.vertex_count()];
    let mut groups: Vec<Vec<VertexId>> = Vec::new();
    for v in graph.vertices() {
        let rep = representative[v.index()];
        let group = *group_of[rep.index()].get_or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(v);
    }

    let components: Vec<Graph> = groups
        .into_iter()
        .filter(|members| members.len() > 1 || graph.has_self_loop(members[0]))
        .map(|members| graph.induced_subgraph(&members))
        .collect();

    log::trace!(
        "{} non-trivial components in a graph of {} vertices",
        components.len(),
        graph.vertex_count()
    );
    components
}

struct SccFinder<'g> {
    graph: &'g Graph,
    /// discovery number per vertex
    preorder: Vec<Option<u32>>,
    next_preorder: u32,
    /// component representative per vertex, once assigned
    component: Vec<Option<VertexId>>,
    nodes: Vec<VertexId>,
    representatives: Vec<VertexId>,
}

impl<'g> SccFinder<'g> {
    /// Representative of every vertex's component.
    fn run(graph: &'g Graph) -> Vec<VertexId> {
        let n = graph.vertex_count();
        let mut finder = Self {
            graph,
            preorder: vec![None; n],
            next_preorder: 0,
            component: vec![None; n],
            nodes: Vec::with_capacity(n),
            representatives: Vec::with_capacity(n),
        };

        for v in graph.vertices() {
            if finder.preorder[v.index()].is_none() {
                finder.visit(v);
            }
        }

        debug_assert!(finder.nodes.is_empty() && finder.representatives.is_empty());
        finder
            .component
            .into_iter()
            .zip(graph.vertices())
            .map(|(rep, v)| rep.unwrap_or(v))
            .collect()
    }

    fn visit(&mut self, v: VertexId) {
        self.preorder[v.index()] = Some(self.next_preorder);
        self.next_preorder += 1;
        self.nodes.push(v);
        self.representatives.push(v);

        let graph = self.graph;
        for &w in graph.outward_neighbours(v) {
            match self.preorder[w.index()] {
                None => self.visit(w),
                Some(w_pre) if self.component[w.index()].is_none() => {
                    while let Some(&top) = self.representatives.last() {
                        if self.preorder_of(top) > w_pre {
                            self.representatives.pop();
                        } else {
                            break;
                        }
                    }
                }
                Some(_) => {}
            }
        }

        if self.representatives.last() == Some(&v) {
            self.representatives.pop();
            while let Some(w) = self.nodes.pop() {
                self.component[w.index()] = Some(v);
                if w == v {
                    break;
                }
            }
        }
    }

    fn preorder_of(&self, v: VertexId) -> u32 {
        self.preorder[v.index()].unwrap_or(u32::MAX)
    }
}
