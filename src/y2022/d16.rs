use {
    crate::*,
    nom::{
        branch::alt,
        bytes::complete::{tag, take_while_m_n},
        character::complete::line_ending,
        combinator::{map, opt},
        error::Error,
        multi::{many0, separated_list1},
        sequence::{preceded, terminated, tuple},
        Err, IResult,
    },
    std::{
        collections::HashMap,
        fmt::{Debug, Formatter, Result as FmtResult},
    },
};

#[derive(Clone, Copy, Eq, Hash, PartialEq)]
struct ValveName([u8; 2_usize]);

impl ValveName {
    const START: Self = Self(*b"AA");
}

impl Debug for ValveName {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        write!(f, "{}{}", self.0[0_usize] as char, self.0[1_usize] as char)
    }
}

impl Parse for ValveName {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            take_while_m_n(2_usize, 2_usize, |c: char| c.is_ascii_uppercase()),
            |name: &str| {
                let mut name_bytes: [u8; 2_usize] = [0_u8; 2_usize];

                name_bytes.copy_from_slice(name.as_bytes());

                Self(name_bytes)
            },
        )(input)
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
struct ScanLine {
    name: ValveName,
    flow_rate: u32,
    tunnels: Vec<ValveName>,
}

impl Parse for ScanLine {
    fn parse<'i>(input: &'i str) -> IResult<&'i str, Self> {
        map(
            tuple((
                preceded(tag("Valve "), ValveName::parse),
                preceded(tag(" has flow rate="), parse_integer::<u32>),
                preceded(
                    alt((
                        tag("; tunnels lead to valves "),
                        tag("; tunnel leads to valve "),
                    )),
                    separated_list1(tag(", "), ValveName::parse),
                ),
            )),
            |(name, flow_rate, tunnels)| Self {
                name,
                flow_rate,
                tunnels,
            },
        )(input)
    }
}

#[derive(Debug, PartialEq)]
pub enum ParseSolutionError<'i> {
    Parse(Err<Error<&'i str>>),
    DuplicateValve(usize),
    UnknownTunnelTarget(usize),
    MissingStartValve,
}

/// Runs one breadth-first search over the raw tunnel graph to exhaustion, recording the hop count
/// to every reachable valve.
struct TunnelDistances<'a> {
    adjacency: &'a [Vec<usize>],
    start: usize,
    distances: Vec<u32>,
}

impl<'a> TunnelDistances<'a> {
    const UNREACHABLE: u32 = u32::MAX;

    fn new(adjacency: &'a [Vec<usize>], start: usize) -> Self {
        let mut tunnel_distances: Self = Self {
            adjacency,
            start,
            distances: Vec::new(),
        };

        tunnel_distances.run();

        tunnel_distances
    }
}

impl<'a> BreadthFirstSearch for TunnelDistances<'a> {
    type Vertex = usize;

    fn start(&self) -> &usize {
        &self.start
    }

    fn is_end(&self, _vertex: &usize) -> bool {
        false
    }

    fn neighbors(&self, vertex: &usize, neighbors: &mut Vec<usize>) {
        neighbors.extend_from_slice(&self.adjacency[*vertex]);
    }

    fn update_parent(&mut self, from: &usize, to: &usize) {
        self.distances[*to] = self.distances[*from] + 1_u32;
    }

    fn reset(&mut self) {
        self.distances.clear();
        self.distances.resize(self.adjacency.len(), Self::UNREACHABLE);
        self.distances[self.start] = 0_u32;
    }
}

/// The scan consolidated to the valves that matter: the positive-flow valves (bit `i` of a subset
/// mask is flow valve `i`) plus the start valve, with pairwise fewest-hop distances.
struct ReducedGraph {
    flow_rates: Vec<u32>,

    /// `flow_rates.len() + 1` rows; the last row and column belong to the start valve
    distances: Vec<Vec<u32>>,
}

impl ReducedGraph {
    fn start_index(&self) -> usize {
        self.flow_rates.len()
    }

    /// Best total release per opened subset within the time budget, starting at the start valve.
    /// Entries for subsets no schedule completes stay zero.
    fn best_released_by_subset(&self, minutes: u32) -> Vec<u32> {
        let mut table: Vec<u32> = vec![0_u32; 1_usize << self.flow_rates.len()];

        self.fill_table(&mut table, self.start_index(), minutes, 0_u32, 0_u32);

        table
    }

    fn fill_table(
        &self,
        table: &mut [u32],
        valve: usize,
        minutes_left: u32,
        opened: u32,
        released: u32,
    ) {
        let entry: &mut u32 = &mut table[opened as usize];

        *entry = (*entry).max(released);

        for next_valve in 0_usize..self.flow_rates.len() {
            let next_valve_bit: u32 = 1_u32 << next_valve;

            if opened & next_valve_bit == 0_u32 {
                // Walking there plus the minute spent opening
                let cost: u32 = self.distances[valve][next_valve].saturating_add(1_u32);

                if cost < minutes_left {
                    let minutes_left: u32 = minutes_left - cost;

                    self.fill_table(
                        table,
                        next_valve,
                        minutes_left,
                        opened | next_valve_bit,
                        released + minutes_left * self.flow_rates[next_valve],
                    );
                }
            }
        }
    }
}

/// Raises each subset's entry to the best over all of its subsets, so `table[mask]` becomes the
/// best release achievable using only valves within `mask`.
fn monotone_closure(mut table: Vec<u32>) -> Vec<u32> {
    let valve_count: u32 = table.len().trailing_zeros();

    for valve in 0_u32..valve_count {
        let valve_bit: usize = 1_usize << valve;

        for mask in 0_usize..table.len() {
            if mask & valve_bit != 0_usize {
                table[mask] = table[mask].max(table[mask & !valve_bit]);
            }
        }
    }

    table
}

#[cfg_attr(test, derive(Debug))]
pub struct Solution(Vec<ScanLine>);

impl Solution {
    const Q1_MINUTES: u32 = 30_u32;
    const Q2_MINUTES: u32 = 26_u32;
    const Q2_AGENTS: u32 = 2_u32;

    fn reduced_graph(&self) -> ReducedGraph {
        let index_by_name: HashMap<ValveName, usize> = self
            .0
            .iter()
            .enumerate()
            .map(|(index, scan_line)| (scan_line.name, index))
            .collect();
        let adjacency: Vec<Vec<usize>> = self
            .0
            .iter()
            .map(|scan_line| {
                scan_line
                    .tunnels
                    .iter()
                    .map(|tunnel| index_by_name[tunnel])
                    .collect()
            })
            .collect();
        let flow_valves: Vec<usize> = (0_usize..self.0.len())
            .filter(|&index| self.0[index].flow_rate > 0_u32)
            .collect();
        let sources: Vec<usize> = flow_valves
            .iter()
            .copied()
            .chain([index_by_name[&ValveName::START]])
            .collect();

        ReducedGraph {
            flow_rates: flow_valves
                .iter()
                .map(|&index| self.0[index].flow_rate)
                .collect(),
            distances: sources
                .iter()
                .map(|&source| {
                    let tunnel_distances: TunnelDistances =
                        TunnelDistances::new(&adjacency, source);

                    flow_valves
                        .iter()
                        .map(|&flow_valve| tunnel_distances.distances[flow_valve])
                        .collect()
                })
                .collect(),
        }
    }

    /// Best total release within `minutes`, with `agents` working simultaneously from the start
    /// valve, each opening its own pairwise-disjoint set of valves.
    fn max_released(&self, minutes: u32, agents: u32) -> u32 {
        if agents == 0_u32 {
            return 0_u32;
        }

        let closed_table: Vec<u32> =
            monotone_closure(self.reduced_graph().best_released_by_subset(minutes));
        let mut combined: Vec<u32> = closed_table.clone();

        for _ in 1_u32..agents {
            let mut next_combined: Vec<u32> = vec![0_u32; combined.len()];

            for mask in 0_usize..combined.len() {
                // Enumerate the submasks of mask as one agent's share
                let mut share: usize = mask;

                loop {
                    next_combined[mask] =
                        next_combined[mask].max(closed_table[share] + combined[mask ^ share]);

                    if share == 0_usize {
                        break;
                    }

                    share = (share - 1_usize) & mask;
                }
            }

            combined = next_combined;
        }

        combined[combined.len() - 1_usize]
    }
}

impl<'i> TryFrom<&'i str> for Solution {
    type Error = ParseSolutionError<'i>;

    fn try_from(input: &'i str) -> Result<Self, Self::Error> {
        use ParseSolutionError as Error;

        let scan_lines: Vec<ScanLine> = many0(terminated(ScanLine::parse, opt(line_ending)))(input)
            .map_err(Error::Parse)?
            .1;
        let mut index_by_name: HashMap<ValveName, usize> = HashMap::new();

        for (index, scan_line) in scan_lines.iter().enumerate() {
            if index_by_name.insert(scan_line.name, index).is_some() {
                return Err(Error::DuplicateValve(index));
            }
        }

        if !index_by_name.contains_key(&ValveName::START) {
            return Err(Error::MissingStartValve);
        }

        for (index, scan_line) in scan_lines.iter().enumerate() {
            if scan_line
                .tunnels
                .iter()
                .any(|tunnel| !index_by_name.contains_key(tunnel))
            {
                return Err(Error::UnknownTunnelTarget(index));
            }
        }

        Ok(Self(scan_lines))
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.max_released(Self::Q1_MINUTES, 1_u32));
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.max_released(Self::Q2_MINUTES, Self::Q2_AGENTS));
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &'static str = "\
        Valve AA has flow rate=0; tunnels lead to valves DD, II, BB\n\
        Valve BB has flow rate=13; tunnels lead to valves CC, AA\n\
        Valve CC has flow rate=2; tunnels lead to valves DD, BB\n\
        Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE\n\
        Valve EE has flow rate=3; tunnels lead to valves FF, DD\n\
        Valve FF has flow rate=0; tunnels lead to valves EE, GG\n\
        Valve GG has flow rate=0; tunnels lead to valves FF, HH\n\
        Valve HH has flow rate=22; tunnel leads to valve GG\n\
        Valve II has flow rate=0; tunnels lead to valves AA, JJ\n\
        Valve JJ has flow rate=21; tunnel leads to valve II\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| SOLUTION_STR.try_into().unwrap())
    }

    #[test]
    fn test_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.0.len(), 10_usize);
        assert_eq!(
            solution.0[7_usize],
            ScanLine {
                name: ValveName(*b"HH"),
                flow_rate: 22_u32,
                tunnels: vec![ValveName(*b"GG")],
            }
        );
        assert_eq!(
            Solution::try_from("Valve BB has flow rate=13; tunnel leads to valve BB\n")
                .unwrap_err(),
            ParseSolutionError::MissingStartValve
        );
    }

    #[test]
    fn test_reduced_graph() {
        let graph: ReducedGraph = solution().reduced_graph();

        assert_eq!(
            graph.flow_rates,
            vec![13_u32, 2_u32, 20_u32, 3_u32, 22_u32, 21_u32]
        );

        // BB is flow valve 0, JJ flow valve 5, and the start row is last
        assert_eq!(graph.distances[graph.start_index()][0_usize], 1_u32);
        assert_eq!(graph.distances[0_usize][5_usize], 3_u32);
    }

    #[test]
    fn test_reduced_distances_satisfy_triangle_inequality() {
        let graph: ReducedGraph = solution().reduced_graph();

        for i in 0_usize..graph.distances.len() {
            for j in 0_usize..graph.flow_rates.len() {
                for k in 0_usize..graph.flow_rates.len() {
                    assert!(
                        graph.distances[i][j]
                            <= graph.distances[i][k].saturating_add(graph.distances[k][j])
                    );
                }
            }
        }
    }

    #[test]
    fn test_max_released_alone() {
        assert_eq!(solution().max_released(30_u32, 1_u32), 1651_u32);
    }

    #[test]
    fn test_max_released_with_partner() {
        assert_eq!(solution().max_released(26_u32, 2_u32), 1707_u32);
    }

    #[test]
    fn test_partner_subsets_are_disjoint() {
        let solution: &Solution = solution();
        let table: Vec<u32> = solution
            .reduced_graph()
            .best_released_by_subset(26_u32);

        // The best over pairs of disjoint subsets matches the two-agent answer, so that answer
        // never needs one valve opened by both agents
        let mut best_disjoint_pair: u32 = 0_u32;

        for (mask, released) in table.iter().enumerate() {
            for (other_mask, other_released) in table.iter().enumerate() {
                if mask & other_mask == 0_usize {
                    best_disjoint_pair = best_disjoint_pair.max(released + other_released);
                }
            }
        }

        assert_eq!(best_disjoint_pair, solution.max_released(26_u32, 2_u32));
    }

    #[test]
    fn test_more_agents_never_hurt() {
        let solution: &Solution = solution();
        let mut previous: u32 = 0_u32;

        for agents in 1_u32..=4_u32 {
            let max_released: u32 = solution.max_released(26_u32, agents);

            assert!(max_released >= previous);

            previous = max_released;
        }
    }
}
