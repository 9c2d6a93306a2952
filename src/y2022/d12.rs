use {
    crate::*,
    glam::IVec2,
    strum::IntoEnumIterator,
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum ElevationCell {
    Start,
    End,
    Height(u8),
}

impl ElevationCell {
    fn height(self) -> u8 {
        match self {
            Self::Start => 0_u8,
            Self::End => 25_u8,
            Self::Height(height) => height,
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct InvalidElevationChar(char);

impl TryFrom<char> for ElevationCell {
    type Error = InvalidElevationChar;

    fn try_from(elevation_char: char) -> Result<Self, Self::Error> {
        match elevation_char {
            'S' => Ok(Self::Start),
            'E' => Ok(Self::End),
            'a'..='z' => Ok(Self::Height(elevation_char as u8 - b'a')),
            _ => Err(InvalidElevationChar(elevation_char)),
        }
    }
}

#[derive(Debug, PartialEq)]
pub enum ParseSolutionError {
    GridParse(GridParseError<InvalidElevationChar>),
    StartCount(usize),
    EndCount(usize),
}

/// Searches the elevation grid for a fewest-steps path. All edges cost one step, so this is run in
/// Dijkstra mode.
///
/// `descend` flips both the legality rule and the goal: instead of climbing from `start` to `end`
/// with ascents of at most one, the search walks from `end` down to any lowest-elevation cell, with
/// each step legal exactly when the reverse climb would have been.
struct PathSearcher<'s> {
    solution: &'s Solution,
    descend: bool,
    steps: Grid2D<u32>,
}

impl<'s> PathSearcher<'s> {
    const UNVISITED: u32 = u32::MAX;

    fn new(solution: &'s Solution, descend: bool) -> Self {
        Self {
            solution,
            descend,
            steps: Grid2D::allocate(solution.heights.dimensions()),
        }
    }

    fn search_start(&self) -> IVec2 {
        if self.descend {
            self.solution.end
        } else {
            self.solution.start
        }
    }

    fn is_legal_step(&self, from: IVec2, to: IVec2) -> Option<bool> {
        let from_height: u8 = *self.solution.heights.get(from)?;
        let to_height: u8 = *self.solution.heights.get(to)?;

        Some(if self.descend {
            from_height <= to_height + 1_u8
        } else {
            to_height <= from_height + 1_u8
        })
    }

    fn fewest_steps(&mut self) -> Option<u32> {
        let end: IVec2 = self.run_dijkstra()?;

        self.steps.get(end).copied()
    }
}

impl<'s> WeightedGraphSearch for PathSearcher<'s> {
    type Vertex = IVec2;
    type Cost = u32;

    fn start(&self) -> &IVec2 {
        if self.descend {
            &self.solution.end
        } else {
            &self.solution.start
        }
    }

    fn is_end(&self, vertex: &IVec2) -> bool {
        if self.descend {
            self.solution
                .heights
                .get(*vertex)
                .map_or(false, |height| *height == 0_u8)
        } else {
            *vertex == self.solution.end
        }
    }

    fn cost_from_start(&self, vertex: &IVec2) -> u32 {
        self.steps.get(*vertex).copied().unwrap_or(Self::UNVISITED)
    }

    fn heuristic(&self, _vertex: &IVec2) -> u32 {
        0_u32
    }

    fn neighbors(&self, vertex: &IVec2, neighbors: &mut Vec<OpenSetElement<IVec2, u32>>) {
        neighbors.extend(Direction::iter().filter_map(|direction| {
            let neighbor: IVec2 = *vertex + direction.vec();

            (self.is_legal_step(*vertex, neighbor) == Some(true))
                .then_some(OpenSetElement(neighbor, 1_u32))
        }));
    }

    fn update_vertex(&mut self, _from: &IVec2, to: &IVec2, cost: u32) {
        if let Some(steps) = self.steps.get_mut(*to) {
            *steps = cost;
        }
    }

    fn reset(&mut self) {
        self.steps.cells_mut().fill(Self::UNVISITED);

        let search_start: IVec2 = self.search_start();

        if let Some(steps) = self.steps.get_mut(search_start) {
            *steps = 0_u32;
        }
    }
}

pub struct Solution {
    heights: Grid2D<u8>,
    start: IVec2,
    end: IVec2,
}

impl Solution {
    fn fewest_steps_from_start(&self) -> Option<u32> {
        PathSearcher::new(self, false).fewest_steps()
    }

    fn fewest_steps_from_any_lowest(&self) -> Option<u32> {
        PathSearcher::new(self, true).fewest_steps()
    }
}

impl TryFrom<&str> for Solution {
    type Error = ParseSolutionError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        use ParseSolutionError as Error;

        let cells: Grid2D<ElevationCell> = input.try_into().map_err(Error::GridParse)?;

        let single_pos = |target: ElevationCell,
                              error: fn(usize) -> Error|
         -> Result<IVec2, Error> {
            let mut positions = cells
                .cells()
                .iter()
                .enumerate()
                .filter(|(_, cell)| **cell == target)
                .map(|(index, _)| cells.pos_from_index(index));

            match (positions.next(), positions.next()) {
                (Some(pos), None) => Ok(pos),
                (None, _) => Err(error(0_usize)),
                _ => Err(error(2_usize)),
            }
        };

        let start: IVec2 = single_pos(ElevationCell::Start, Error::StartCount)?;
        let end: IVec2 = single_pos(ElevationCell::End, Error::EndCount)?;
        let mut heights: Grid2D<u8> = Grid2D::allocate(cells.dimensions());

        for (height, cell) in heights.cells_mut().iter_mut().zip(cells.cells()) {
            *height = cell.height();
        }

        Ok(Self {
            heights,
            start,
            end,
        })
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.fewest_steps_from_start());
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.fewest_steps_from_any_lowest());
    }
}
