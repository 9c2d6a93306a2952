use {
    num::Zero,
    std::{
        cmp::Ordering,
        collections::{BinaryHeap, HashSet, VecDeque},
        hash::Hash,
        ops::Add,
    },
};

pub struct BreadthFirstSearchState<V> {
    queue: VecDeque<V>,
    explored: HashSet<V>,
    neighbors: Vec<V>,
}

impl<V> BreadthFirstSearchState<V> {
    fn clear(&mut self) {
        self.queue.clear();
        self.explored.clear();
        self.neighbors.clear();
    }
}

impl<V> Default for BreadthFirstSearchState<V> {
    fn default() -> Self {
        Self {
            queue: Default::default(),
            explored: Default::default(),
            neighbors: Default::default(),
        }
    }
}

/// An implementation of https://en.wikipedia.org/wiki/Breadth-first_search
///
/// Distances and parents live with the implementor, recorded through `update_parent`. An
/// implementor whose `is_end` is constantly `false` runs to exhaustion, visiting every vertex
/// reachable from the start once.
pub trait BreadthFirstSearch {
    type Vertex: Clone + Eq + Hash;

    fn start(&self) -> &Self::Vertex;
    fn is_end(&self, vertex: &Self::Vertex) -> bool;
    fn neighbors(&self, vertex: &Self::Vertex, neighbors: &mut Vec<Self::Vertex>);
    fn update_parent(&mut self, from: &Self::Vertex, to: &Self::Vertex);
    fn reset(&mut self);

    fn run_internal(
        &mut self,
        state: &mut BreadthFirstSearchState<Self::Vertex>,
    ) -> Option<Self::Vertex> {
        self.reset();

        state.clear();

        let start: Self::Vertex = self.start().clone();

        state.explored.insert(start.clone());
        state.queue.push_back(start);

        while let Some(current) = state.queue.pop_front() {
            if self.is_end(&current) {
                return Some(current);
            }

            self.neighbors(&current, &mut state.neighbors);

            for neighbor in state.neighbors.drain(..) {
                if state.explored.insert(neighbor.clone()) {
                    self.update_parent(&current, &neighbor);
                    state.queue.push_back(neighbor);
                }
            }
        }

        None
    }

    fn run(&mut self) -> Option<Self::Vertex> {
        self.run_internal(&mut BreadthFirstSearchState::default())
    }
}

pub struct OpenSetElement<V, C>(pub V, pub C);

impl<V, C: Ord> PartialEq for OpenSetElement<V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.1 == other.1
    }
}

impl<V, C: Ord> PartialOrd for OpenSetElement<V, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<V, C: Ord> Eq for OpenSetElement<V, C> {}

impl<V, C: Ord> Ord for OpenSetElement<V, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse the order so that cost is minimized when popping from the heap
        other.1.cmp(&self.1)
    }
}

pub struct WeightedGraphSearchState<V, C> {
    open_set: BinaryHeap<OpenSetElement<V, C>>,
    neighbors: Vec<OpenSetElement<V, C>>,
}

impl<V, C> WeightedGraphSearchState<V, C> {
    fn clear(&mut self) {
        self.open_set.clear();
        self.neighbors.clear();
    }
}

impl<V, C: Ord> Default for WeightedGraphSearchState<V, C> {
    fn default() -> Self {
        Self {
            open_set: Default::default(),
            neighbors: Default::default(),
        }
    }
}

pub fn zero_heuristic<W: WeightedGraphSearch + ?Sized>(
    _search: &W,
    _vertex: &W::Vertex,
) -> W::Cost {
    W::Cost::zero()
}

/// An implementation of https://en.wikipedia.org/wiki/A*_search_algorithm and
/// https://en.wikipedia.org/wiki/Dijkstra%27s_algorithm
///
/// Cost bookkeeping lives with the implementor: `cost_from_start` is the best known path cost
/// (`Cost::max`-like sentinel for unvisited vertices), and `update_vertex` records an improvement.
/// Instead of re-keying heap entries on improvement, a fresh element is pushed and stale pops are
/// skipped when their estimate no longer matches the implementor's bookkeeping.
pub trait WeightedGraphSearch {
    type Vertex: Clone + Eq + Hash;
    type Cost: Add<Self::Cost, Output = Self::Cost> + Copy + Ord + Zero;

    fn start(&self) -> &Self::Vertex;
    fn is_end(&self, vertex: &Self::Vertex) -> bool;
    fn cost_from_start(&self, vertex: &Self::Vertex) -> Self::Cost;

    /// Must never overestimate the remaining cost to an end vertex, or `run_a_star` loses its
    /// optimality guarantee.
    fn heuristic(&self, vertex: &Self::Vertex) -> Self::Cost;

    /// The cost is from `vertex` to the neighbor.
    fn neighbors(
        &self,
        vertex: &Self::Vertex,
        neighbors: &mut Vec<OpenSetElement<Self::Vertex, Self::Cost>>,
    );

    fn update_vertex(&mut self, from: &Self::Vertex, to: &Self::Vertex, cost: Self::Cost);
    fn reset(&mut self);

    fn run_internal<F: Fn(&Self, &Self::Vertex) -> Self::Cost>(
        &mut self,
        state: &mut WeightedGraphSearchState<Self::Vertex, Self::Cost>,
        heuristic: F,
    ) -> Option<Self::Vertex> {
        self.reset();
        state.clear();

        let start: Self::Vertex = self.start().clone();
        let start_estimate: Self::Cost = self.cost_from_start(&start) + heuristic(self, &start);

        state.open_set.push(OpenSetElement(start, start_estimate));

        while let Some(OpenSetElement(current, estimate)) = state.open_set.pop() {
            let start_to_current: Self::Cost = self.cost_from_start(&current);

            if estimate > start_to_current + heuristic(self, &current) {
                // Stale entry, a cheaper path to this vertex was found after it was pushed
                continue;
            }

            if self.is_end(&current) {
                return Some(current);
            }

            self.neighbors(&current, &mut state.neighbors);

            for OpenSetElement(neighbor, current_to_neighbor) in state.neighbors.drain(..) {
                let start_to_neighbor: Self::Cost = start_to_current + current_to_neighbor;

                if start_to_neighbor < self.cost_from_start(&neighbor) {
                    self.update_vertex(&current, &neighbor, start_to_neighbor);

                    let neighbor_estimate: Self::Cost =
                        start_to_neighbor + heuristic(self, &neighbor);

                    state.open_set.push(OpenSetElement(neighbor, neighbor_estimate));
                }
            }
        }

        None
    }

    fn run_a_star(&mut self) -> Option<Self::Vertex> {
        self.run_internal(&mut WeightedGraphSearchState::default(), Self::heuristic)
    }

    fn run_dijkstra(&mut self) -> Option<Self::Vertex> {
        self.run_internal(&mut WeightedGraphSearchState::default(), zero_heuristic)
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::collections::HashMap};

    struct SmallWeightedGraph {
        edges: HashMap<u8, Vec<(u8, u32)>>,
        start: u8,
        end: u8,
        costs: HashMap<u8, u32>,
    }

    impl WeightedGraphSearch for SmallWeightedGraph {
        type Vertex = u8;
        type Cost = u32;

        fn start(&self) -> &u8 {
            &self.start
        }

        fn is_end(&self, vertex: &u8) -> bool {
            *vertex == self.end
        }

        fn cost_from_start(&self, vertex: &u8) -> u32 {
            self.costs.get(vertex).copied().unwrap_or(u32::MAX)
        }

        fn heuristic(&self, _vertex: &u8) -> u32 {
            0_u32
        }

        fn neighbors(&self, vertex: &u8, neighbors: &mut Vec<OpenSetElement<u8, u32>>) {
            neighbors.extend(
                self.edges
                    .get(vertex)
                    .into_iter()
                    .flatten()
                    .map(|&(neighbor, cost)| OpenSetElement(neighbor, cost)),
            );
        }

        fn update_vertex(&mut self, _from: &u8, to: &u8, cost: u32) {
            self.costs.insert(*to, cost);
        }

        fn reset(&mut self) {
            self.costs.clear();
            self.costs.insert(self.start, 0_u32);
        }
    }

    #[test]
    fn test_dijkstra_prefers_cheap_detour() {
        let mut graph: SmallWeightedGraph = SmallWeightedGraph {
            edges: [
                (0_u8, vec![(1_u8, 10_u32), (2_u8, 1_u32)]),
                (2_u8, vec![(1_u8, 2_u32)]),
                (1_u8, vec![(3_u8, 1_u32)]),
            ]
            .into_iter()
            .collect(),
            start: 0_u8,
            end: 3_u8,
            costs: HashMap::new(),
        };

        assert_eq!(graph.run_dijkstra(), Some(3_u8));
        assert_eq!(graph.costs[&3_u8], 4_u32);
    }
}
