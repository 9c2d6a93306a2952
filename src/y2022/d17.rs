use {
    crate::*,
    std::collections::{HashMap, HashSet},
    strum::EnumCount,
};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Jet {
    Left,
    Right,
}

#[derive(Debug, PartialEq)]
pub struct InvalidJetChar(char);

impl TryFrom<char> for Jet {
    type Error = InvalidJetChar;

    fn try_from(jet_char: char) -> Result<Self, Self::Error> {
        match jet_char {
            '<' => Ok(Self::Left),
            '>' => Ok(Self::Right),
            _ => Err(InvalidJetChar(jet_char)),
        }
    }
}

#[derive(Clone, Copy, Debug, EnumCount)]
#[repr(usize)]
enum RockShape {
    HorizontalLine,
    Plus,
    RightAngle,
    VerticalLine,
    Square,
}

impl RockShape {
    /// Row masks bottom-up, pre-shifted to the spawn column two cells off the left wall. Bit `x`
    /// is the cell `x` cells off the left wall.
    const ROWS: [&'static [u8]; Self::COUNT] = [
        &[0x3C_u8],
        &[0x08_u8, 0x1C_u8, 0x08_u8],
        &[0x1C_u8, 0x10_u8, 0x10_u8],
        &[0x04_u8, 0x04_u8, 0x04_u8, 0x04_u8],
        &[0x0C_u8, 0x0C_u8],
    ];

    fn from_rock_index(rock_index: u64) -> Self {
        // SAFETY: The discriminant is taken modulo the variant count
        unsafe { std::mem::transmute((rock_index % Self::COUNT as u64) as usize) }
    }

    fn rows(self) -> &'static [u8] {
        Self::ROWS[self as usize]
    }
}

const CHAMBER_WIDTH: usize = 7_usize;
const LEFT_WALL_MASK: u8 = 0x01_u8;
const RIGHT_WALL_MASK: u8 = 1_u8 << (CHAMBER_WIDTH - 1_usize);

/// The chamber of settled rock, rows indexed from the floor up
struct Tower<'s> {
    jets: &'s [Jet],
    jet_index: usize,
    rows: Vec<u8>,
}

impl<'s> Tower<'s> {
    fn new(jets: &'s [Jet]) -> Self {
        Self {
            jets,
            jet_index: 0_usize,
            rows: Vec::new(),
        }
    }

    fn height(&self) -> u64 {
        self.rows.len() as u64
    }

    fn overlaps(&self, rock_rows: &[u8], bottom: usize) -> bool {
        rock_rows.iter().enumerate().any(|(row_index, rock_row)| {
            self.rows
                .get(bottom + row_index)
                .map_or(0_u8, |settled_row| *settled_row)
                & rock_row
                != 0_u8
        })
    }

    fn drop_rock(&mut self, rock_shape: RockShape) {
        let mut rock_rows: [u8; 4_usize] = [0_u8; 4_usize];
        let rock_height: usize = rock_shape.rows().len();

        rock_rows[..rock_height].copy_from_slice(rock_shape.rows());

        let rock_rows: &mut [u8] = &mut rock_rows[..rock_height];
        let mut bottom: usize = self.rows.len() + 3_usize;

        loop {
            let jet: Jet = self.jets[self.jet_index];

            self.jet_index = (self.jet_index + 1_usize) % self.jets.len();

            let (wall_mask, shift): (u8, fn(u8) -> u8) = match jet {
                Jet::Left => (LEFT_WALL_MASK, |row| row >> 1_u32),
                Jet::Right => (RIGHT_WALL_MASK, |row| row << 1_u32),
            };

            if rock_rows.iter().all(|rock_row| rock_row & wall_mask == 0_u8) {
                let mut shifted: [u8; 4_usize] = [0_u8; 4_usize];

                for (shifted_row, rock_row) in shifted.iter_mut().zip(rock_rows.iter()) {
                    *shifted_row = shift(*rock_row);
                }

                if !self.overlaps(&shifted[..rock_height], bottom) {
                    rock_rows.copy_from_slice(&shifted[..rock_height]);
                }
            }

            if bottom == 0_usize || self.overlaps(rock_rows, bottom - 1_usize) {
                break;
            }

            bottom -= 1_usize;
        }

        if self.rows.len() < bottom + rock_height {
            self.rows.resize(bottom + rock_height, 0_u8);
        }

        for (row_index, rock_row) in rock_rows.iter().enumerate() {
            self.rows[bottom + row_index] |= rock_row;
        }
    }

    /// The set of empty cells reachable by a 4-directional flood fill seeded from the row just
    /// above the tower top, never rising above that row. Cells are encoded as
    /// `(depth below the seed row) << 3 | x` and sorted, so the fingerprint is canonical no matter
    /// the fill order.
    fn surface_fingerprint(&self) -> Vec<u32> {
        let top: i32 = self.rows.len() as i32;

        let is_empty = |x: i32, y: i32| -> bool {
            x >= 0_i32
                && x < CHAMBER_WIDTH as i32
                && y >= 0_i32
                && y <= top
                && (y == top || self.rows[y as usize] & (1_u8 << x) == 0_u8)
        };

        let mut visited: HashSet<(i32, i32)> = (0_i32..CHAMBER_WIDTH as i32)
            .map(|x| (x, top))
            .collect();
        let mut stack: Vec<(i32, i32)> = visited.iter().copied().collect();

        while let Some((x, y)) = stack.pop() {
            for (next_x, next_y) in [
                (x - 1_i32, y),
                (x + 1_i32, y),
                (x, y - 1_i32),
                (x, y + 1_i32),
            ] {
                if is_empty(next_x, next_y) && visited.insert((next_x, next_y)) {
                    stack.push((next_x, next_y));
                }
            }
        }

        let mut fingerprint: Vec<u32> = visited
            .into_iter()
            .map(|(x, y)| (((top - y) as u32) << 3_u32) | x as u32)
            .collect();

        fingerprint.sort_unstable();

        fingerprint
    }
}

#[derive(Debug, PartialEq)]
pub enum ParseSolutionError {
    EmptyJetPattern,
    InvalidJetChar(InvalidJetChar),
}

#[cfg_attr(test, derive(Debug))]
pub struct Solution {
    jets: Vec<Jet>,
}

impl Solution {
    /// Tower height after `rocks` rocks have settled.
    ///
    /// Simulation state is fingerprinted before each drop; when a `(rock shape, jet index,
    /// reachable surface)` triple repeats, everything between the two visits repeats forever, and
    /// the remaining rocks are resolved by extrapolation plus a lookup into the recorded
    /// per-rock heights for the off-cycle remainder.
    fn height_after(&self, rocks: u64) -> u64 {
        let mut tower: Tower = Tower::new(&self.jets);

        // heights[k] is the tower height after k rocks
        let mut heights: Vec<u64> = vec![0_u64];
        let mut seen: HashMap<(usize, usize, Vec<u32>), u64> = HashMap::new();

        for dropped in 0_u64..rocks {
            let rock_shape: RockShape = RockShape::from_rock_index(dropped);
            let key: (usize, usize, Vec<u32>) = (
                rock_shape as usize,
                tower.jet_index,
                tower.surface_fingerprint(),
            );

            if let Some(&previous) = seen.get(&key) {
                let rocks_per_cycle: u64 = dropped - previous;
                let height_per_cycle: u64 = heights[dropped as usize] - heights[previous as usize];
                let remaining: u64 = rocks - dropped;
                let remainder_height: u64 = heights[(previous + remaining % rocks_per_cycle)
                    as usize]
                    - heights[previous as usize];

                return heights[dropped as usize]
                    + (remaining / rocks_per_cycle) * height_per_cycle
                    + remainder_height;
            }

            seen.insert(key, dropped);
            tower.drop_rock(rock_shape);
            heights.push(tower.height());
        }

        heights[rocks as usize]
    }
}

impl TryFrom<&str> for Solution {
    type Error = ParseSolutionError;

    fn try_from(input: &str) -> Result<Self, Self::Error> {
        use ParseSolutionError as Error;

        let jets: Vec<Jet> = input
            .lines()
            .next()
            .unwrap_or("")
            .chars()
            .map(|jet_char| Jet::try_from(jet_char).map_err(Error::InvalidJetChar))
            .collect::<Result<_, _>>()?;

        if jets.is_empty() {
            Err(Error::EmptyJetPattern)
        } else {
            Ok(Self { jets })
        }
    }
}

impl RunQuestions for Solution {
    fn q1_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.height_after(2022_u64));
    }

    fn q2_internal(&mut self, _args: &QuestionArgs) {
        dbg!(self.height_after(1_000_000_000_000_u64));
    }
}

#[cfg(test)]
mod tests {
    use {super::*, std::sync::OnceLock};

    const SOLUTION_STR: &'static str = ">>><<><>><<<>><>>><<<>>><<<><<<>><>><<>>\n";

    fn solution() -> &'static Solution {
        static ONCE_LOCK: OnceLock<Solution> = OnceLock::new();

        ONCE_LOCK.get_or_init(|| SOLUTION_STR.try_into().unwrap())
    }

    #[test]
    fn test_try_from_str() {
        assert_eq!(solution().jets.len(), 40_usize);
        assert_eq!(solution().jets[..3_usize], [Jet::Right, Jet::Right, Jet::Right]);
        assert_eq!(
            Solution::try_from("\n").unwrap_err(),
            ParseSolutionError::EmptyJetPattern
        );
        assert_eq!(
            Solution::try_from("<>x").unwrap_err(),
            ParseSolutionError::InvalidJetChar(InvalidJetChar('x'))
        );
    }

    #[test]
    fn test_first_rocks() {
        let solution: &Solution = solution();

        assert_eq!(solution.height_after(0_u64), 0_u64);
        assert_eq!(solution.height_after(1_u64), 1_u64);
        assert_eq!(solution.height_after(2_u64), 4_u64);
        assert_eq!(solution.height_after(3_u64), 6_u64);
        assert_eq!(solution.height_after(10_u64), 17_u64);
    }

    #[test]
    fn test_height_after_many_rocks() {
        assert_eq!(solution().height_after(2022_u64), 3068_u64);
    }

    #[test]
    fn test_extrapolation_matches_direct_simulation() {
        let solution: &Solution = solution();
        let mut tower: Tower = Tower::new(&solution.jets);

        for dropped in 0_u64..500_u64 {
            assert_eq!(tower.height(), solution.height_after(dropped));
            tower.drop_rock(RockShape::from_rock_index(dropped));
        }
    }

    #[test]
    fn test_extrapolated_height() {
        assert_eq!(
            solution().height_after(1_000_000_000_000_u64),
            1_514_285_714_288_u64
        );
    }
}
