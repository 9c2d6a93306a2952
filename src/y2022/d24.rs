use {
    crate::*,
    bitvec::prelude::*,
    glam::IVec2,
    num::integer::lcm,
    std::collections::HashMap,
    strum::IntoEnumIterator,
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum ValleyCell {
    Wall,
    Clear,
    Blizzard(Direction),
}

#[derive(Debug, PartialEq)]
pub struct InvalidValleyCellChar(char);

impl TryFrom<char> for ValleyCell {
    type Error = InvalidValleyCellChar;

    fn try_from(valley_cell_char: char) -> Result<Self, Self::Error> {
        match valley_cell_char {
            '#' => Ok(Self::Wall),
            '.' => Ok(Self::Clear),
            '^' => Ok(Self::Blizzard(Direction::North)),
            '>' => Ok(Self::Blizzard(Direction::East)),
            'v' => Ok(Self::Blizzard(Direction::South)),
            '<' => Ok(Self::Blizzard(Direction::West)),
            _ => Err(InvalidValleyCellChar(valley_cell_char)),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ParseSolutionError {
    GridParse(GridParseError<InvalidValleyCellChar>),
    TooSmall(IVec2),
    InvalidBorderCell(IVec2),
    WallInInterior(IVec2),
}

/// A search vertex. `time` is reduced modulo the blizzard period, since occupancy at equal
/// residues is identical; the full elapsed time is the path cost.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct TrekVertex {
    pos: IVec2,
    time: u32,
    trip: u32,
}

struct TrekSearcher<'s> {
    solution: &'s Solution,
    trips: u32,
    period: u32,

    /// Interior occupancy per time residue, indexed by `t mod period`
    occupancies: Vec<BitVec>,
    start: TrekVertex,
    times: HashMap<TrekVertex, u32>,
}

impl<'s> TrekSearcher<'s> {
    const UNVISITED: u32 = u32::MAX;

    fn new(solution: &'s Solution, trips: u32) -> Self {
        let dimensions: IVec2 = solution.dimensions;
        let period: u32 = lcm(dimensions.x, dimensions.y) as u32;

        Self {
            solution,
            trips,
            period,
            occupancies: (0_u32..period)
                .map(|time| solution.occupancy_at(time as i32))
                .collect(),
            start: TrekVertex {
                pos: solution.start_door(),
                time: 0_u32,
                trip: 0_u32,
            },
            times: HashMap::new(),
        }
    }

    fn target_door(&self, trip: u32) -> IVec2 {
        if trip % 2_u32 == 0_u32 {
            self.solution.end_door()
        } else {
            self.solution.start_door()
        }
    }

    fn is_open_at(&self, pos: IVec2, time: u32) -> bool {
        if pos == self.solution.start_door() || pos == self.solution.end_door() {
            true
        } else {
            self.solution.dimensions.cmpgt(pos).all()
                && pos.cmpge(IVec2::ZERO).all()
                && !self.occupancies[time as usize][self.solution.interior_index(pos)]
        }
    }

    fn fewest_steps(&mut self) -> Option<u32> {
        let end: TrekVertex = self.run_a_star()?;

        self.times.get(&end).copied()
    }
}

impl<'s> WeightedGraphSearch for TrekSearcher<'s> {
    type Vertex = TrekVertex;
    type Cost = u32;

    fn start(&self) -> &TrekVertex {
        &self.start
    }

    fn is_end(&self, vertex: &TrekVertex) -> bool {
        vertex.trip == self.trips
    }

    fn cost_from_start(&self, vertex: &TrekVertex) -> u32 {
        self.times.get(vertex).copied().unwrap_or(Self::UNVISITED)
    }

    fn heuristic(&self, vertex: &TrekVertex) -> u32 {
        if vertex.trip == self.trips {
            0_u32
        } else {
            // The current trip still needs the walk to its door, and each remaining whole trip at
            // least the Manhattan span between the two doors
            let door_span: u32 = manhattan_magnitude_2d(self.solution.dimensions) as u32;

            manhattan_distance_2d(vertex.pos, self.target_door(vertex.trip)) as u32
                + (self.trips - 1_u32 - vertex.trip) * door_span
        }
    }

    fn neighbors(&self, vertex: &TrekVertex, neighbors: &mut Vec<OpenSetElement<TrekVertex, u32>>) {
        let time: u32 = (vertex.time + 1_u32) % self.period;
        let target_door: IVec2 = self.target_door(vertex.trip);

        neighbors.extend(
            Direction::iter()
                .map(|direction| vertex.pos + direction.vec())
                .chain([vertex.pos])
                .filter(|&pos| self.is_open_at(pos, time))
                .map(|pos| {
                    let trip: u32 = vertex.trip + (pos == target_door) as u32;

                    OpenSetElement(TrekVertex { pos, time, trip }, 1_u32)
                }),
        );
    }

    fn update_vertex(&mut self, _from: &TrekVertex, to: &TrekVertex, cost: u32) {
        self.times.insert(*to, cost);
    }

    fn reset(&mut self) {
        self.times.clear();
        self.times.insert(self.start, 0_u32);
    }
}

#[cfg_attr(test, derive(Debug))]
pub struct Solution {
    /// Interior dimensions, walls excluded
    dimensions: IVec2,

    /// Initial blizzard positions over the interior, row-major, one set per heading
    blizzards: [BitVec; 4_usize],
}

impl Solution {
    /// The gap in the top wall, one row above the interior
    fn start_door(&self) -> IVec2 {
        IVec2::new(0_i32, -1_i32)
    }

    /// The gap in the bottom wall, one row below the interior
    fn end_door(&self) -> IVec2 {
        IVec2::new(self.dimensions.x - 1_i32, self.dimensions.y)
    }

    fn interior_index(&self, pos: IVec2) -> usize {
        pos.y as usize * self.dimensions.x as usize + pos.x as usize
    }

    /// Interior occupancy at an absolute time, computed by tracing each cell back to the four
    /// blizzard sources that could have wrapped onto it. A pure function of
    /// `time mod lcm(width, height)`.
    fn occupancy_at(&self, time: i32) -> BitVec {
        let width: i32 = self.dimensions.x;
        let height: i32 = self.dimensions.y;
        let mut occupancy: BitVec = bitvec![0; (width * height) as usize];

        for y in 0_i32..height {
            for x in 0_i32..width {
                let sources: [(Direction, IVec2); 4_usize] = [
                    (Direction::North, IVec2::new(x, (y + time).rem_euclid(height))),
                    (Direction::East, IVec2::new((x - time).rem_euclid(width), y)),
                    (Direction::South, IVec2::new(x, (y - time).rem_euclid(height))),
                    (Direction::West, IVec2::new((x + time).rem_euclid(width), y)),
                ];

                if sources.into_iter().any(|(direction, source)| {
                    self.blizzards[direction as usize][self.interior_index(source)]
                }) {
                    occupancy.set(self.interior_index(IVec2::new(x, y)), true);
                }
            }
        }

        occupancy
    }

    fn fewest_steps(&self, trips: u32) -> Option<u32> {
        TrekSearcher::new(self, trips).fewest_steps()
    }
}

impl TryFrom<&str> for Solution {
    type Error = ParseSolutionError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        use ParseSolutionError as Error;

        let cells: Grid2D<ValleyCell> = input.try_into().map_err(Error::GridParse)?;
        let grid_dimensions: IVec2 = cells.dimensions();

        if grid_dimensions.cmplt(IVec2::splat(3_i32)).any() {
            return Err(Error::TooSmall(grid_dimensions));
        }

        let dimensions: IVec2 = grid_dimensions - IVec2::splat(2_i32);
        let start_door_gap: IVec2 = IVec2::new(1_i32, 0_i32);
        let end_door_gap: IVec2 = grid_dimensions - IVec2::new(2_i32, 1_i32);
        let mut blizzards: [BitVec; 4_usize] =
            [(); 4_usize].map(|_| bitvec![0; (dimensions.x * dimensions.y) as usize]);

        for (index, cell) in cells.cells().iter().enumerate() {
            let pos: IVec2 = cells.pos_from_index(index);

            if cells.is_border(pos) {
                let expected: ValleyCell = if pos == start_door_gap || pos == end_door_gap {
                    ValleyCell::Clear
                } else {
                    ValleyCell::Wall
                };

                if *cell != expected {
                    return Err(Error::InvalidBorderCell(pos));
                }
            } else {
                let interior_pos: IVec2 = pos - IVec2::ONE;

                match cell {
                    ValleyCell::Wall => return Err(Error::WallInInterior(pos)),
                    ValleyCell::Clear => (),
                    ValleyCell::Blizzard(direction) => {
                        let interior_index: usize = interior_pos.y as usize
                            * dimensions.x as usize
                            + interior_pos.x as usize;

                        blizzards[*direction as usize].set(interior_index, true);
                    }
                }
            }
        }

        Ok(Self {
            dimensions,
            blizzards,
        })
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.fewest_steps(1_u32));
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.fewest_steps(3_u32));
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &'static str = "\
        #.######\n\
        #>>.<^<#\n\
        #.<..<<#\n\
        #>v.><>#\n\
        #<^v^^>#\n\
        ######.#\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| SOLUTION_STR.try_into().unwrap())
    }

    #[test]
    fn test_try_from_str() {
        let solution: &Solution = solution();

        assert_eq!(solution.dimensions, IVec2::new(6_i32, 4_i32));
        assert_eq!(
            solution
                .blizzards
                .iter()
                .map(|blizzards| blizzards.count_ones())
                .sum::<usize>(),
            19_usize
        );
    }

    #[test]
    fn test_occupancy_periodicity() {
        let solution: &Solution = solution();
        let period: i32 = lcm(solution.dimensions.x, solution.dimensions.y);

        for time in [0_i32, 1_i32, 5_i32, 7_i32] {
            assert_eq!(
                solution.occupancy_at(time),
                solution.occupancy_at(time + period)
            );
            assert_eq!(
                solution.occupancy_at(time),
                solution.occupancy_at(time + 3_i32 * period)
            );
        }
    }

    #[test]
    fn test_occupancy_at_zero_matches_initial_blizzards() {
        let solution: &Solution = solution();
        let mut union: BitVec = bitvec![0; 24];

        for index in 0_usize..union.len() {
            if solution.blizzards.iter().any(|blizzards| blizzards[index]) {
                union.set(index, true);
            }
        }

        assert_eq!(solution.occupancy_at(0_i32), union);
    }

    #[test]
    fn test_single_trip() {
        assert_eq!(solution().fewest_steps(1_u32), Some(18_u32));
    }

    #[test]
    fn test_three_trips() {
        assert_eq!(solution().fewest_steps(3_u32), Some(54_u32));
    }

    #[test]
    fn test_invalid_border() {
        assert_eq!(
            Solution::try_from(
                "\
                #.##\n\
                #..#\n\
                #.##\n"
            )
            .unwrap_err(),
            ParseSolutionError::InvalidBorderCell(IVec2::new(1_i32, 2_i32))
        );
    }
}
