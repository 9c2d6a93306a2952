use {
    glam::IVec2,
    static_assertions::const_assert,
    std::mem::transmute,
    strum::{EnumCount, EnumIter},
};

#[derive(Clone, Copy, Debug, Default, EnumCount, EnumIter, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Direction {
    #[default]
    North,
    East,
    South,
    West,
}

// `from_u8` masks by `Self::COUNT - 1`, which only yields valid discriminants for a power-of-two
// variant count
const_assert!(Direction::COUNT.is_power_of_two());

impl Direction {
    const MASK: u8 = Direction::COUNT as u8 - 1_u8;

    const VECS: [IVec2; Direction::COUNT] = [IVec2::NEG_Y, IVec2::X, IVec2::Y, IVec2::NEG_X];

    pub const fn from_u8(value: u8) -> Self {
        // SAFETY: `value & Self::MASK` is a valid `Direction` discriminant, see the `const_assert`
        // above
        unsafe { transmute(value & Self::MASK) }
    }

    pub const fn vec(self) -> IVec2 {
        Self::VECS[self as usize]
    }

    pub const fn rev(self) -> Self {
        Self::from_u8(self as u8 + 2_u8)
    }
}

impl From<Direction> for IVec2 {
    fn from(direction: Direction) -> Self {
        direction.vec()
    }
}

pub fn manhattan_magnitude_2d(vec: IVec2) -> i32 {
    vec.abs().element_sum()
}

pub fn manhattan_distance_2d(a: IVec2, b: IVec2) -> i32 {
    manhattan_magnitude_2d(a - b)
}

/// A dense rectangular grid of cells stored in row-major order
///
/// Positions are `IVec2`s with `x` as the column (increasing east) and `y` as the row (increasing
/// south), matching the text form the grid is parsed from.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid2D<T> {
    cells: Vec<T>,
    dimensions: IVec2,
}

impl<T> Grid2D<T> {
    pub fn try_from_cells_and_dimensions(cells: Vec<T>, dimensions: IVec2) -> Option<Self> {
        (dimensions.cmpge(IVec2::ZERO).all()
            && cells.len() == dimensions.x as usize * dimensions.y as usize)
            .then_some(Self { cells, dimensions })
    }

    pub fn dimensions(&self) -> IVec2 {
        self.dimensions
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    pub fn contains(&self, pos: IVec2) -> bool {
        pos.cmpge(IVec2::ZERO).all() && pos.cmplt(self.dimensions).all()
    }

    pub fn is_border(&self, pos: IVec2) -> bool {
        self.contains(pos)
            && (pos.cmpeq(IVec2::ZERO).any() || (pos + IVec2::ONE).cmpeq(self.dimensions).any())
    }

    pub fn index_from_pos(&self, pos: IVec2) -> usize {
        pos.y as usize * self.dimensions.x as usize + pos.x as usize
    }

    pub fn try_index_from_pos(&self, pos: IVec2) -> Option<usize> {
        self.contains(pos).then(|| self.index_from_pos(pos))
    }

    pub fn pos_from_index(&self, index: usize) -> IVec2 {
        let width: usize = self.dimensions.x as usize;

        IVec2::new((index % width) as i32, (index / width) as i32)
    }

    pub fn get(&self, pos: IVec2) -> Option<&T> {
        self.try_index_from_pos(pos).map(|index| &self.cells[index])
    }

    pub fn get_mut(&mut self, pos: IVec2) -> Option<&mut T> {
        self.try_index_from_pos(pos)
            .map(|index| &mut self.cells[index])
    }
}

impl<T: Default> Grid2D<T> {
    pub fn allocate(dimensions: IVec2) -> Self {
        let capacity: usize = (dimensions.x.max(0_i32) * dimensions.y.max(0_i32)) as usize;
        let mut cells: Vec<T> = Vec::with_capacity(capacity);

        cells.resize_with(capacity, T::default);

        Self { cells, dimensions }
    }
}

#[derive(Debug, PartialEq)]
pub enum GridParseError<E> {
    EmptyInput,

    /// The 1-based line number and the length the first line established
    UnevenLineLength(usize, usize),
    CellParseError(E),
}

impl<T: TryFrom<char>> TryFrom<&str> for Grid2D<T> {
    type Error = GridParseError<<T as TryFrom<char>>::Error>;

    /// Parses one cell per character, one row per line. A blank line ends the grid, so a trailing
    /// newline is tolerated.
    fn try_from(input: &str) -> Result<Self, Self::Error> {
        use GridParseError as Error;

        let mut cells: Vec<T> = Vec::new();
        let mut width: usize = 0_usize;
        let mut height: usize = 0_usize;

        for (line_index, line) in input.lines().enumerate() {
            if line.is_empty() {
                break;
            }

            if height == 0_usize {
                width = line.chars().count();
            } else if line.chars().count() != width {
                return Err(Error::UnevenLineLength(line_index + 1_usize, width));
            }

            for c in line.chars() {
                cells.push(c.try_into().map_err(Error::CellParseError)?);
            }

            height += 1_usize;
        }

        if cells.is_empty() {
            Err(Error::EmptyInput)
        } else {
            Ok(Self {
                cells,
                dimensions: IVec2::new(width as i32, height as i32),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use {super::*, strum::IntoEnumIterator};

    #[test]
    fn test_direction_vecs_and_rev() {
        for direction in Direction::iter() {
            assert_eq!(direction.vec() + direction.rev().vec(), IVec2::ZERO);
            assert_eq!(manhattan_magnitude_2d(direction.vec()), 1_i32);
        }
    }

    #[test]
    fn test_grid_parse() {
        #[derive(Debug, PartialEq)]
        struct Cell(u8);

        impl TryFrom<char> for Cell {
            type Error = char;

            fn try_from(c: char) -> Result<Self, char> {
                c.to_digit(10_u32).map(|digit| Self(digit as u8)).ok_or(c)
            }
        }

        let grid: Grid2D<Cell> = Grid2D::try_from("12\n34\n").unwrap();

        assert_eq!(grid.dimensions(), IVec2::new(2_i32, 2_i32));
        assert_eq!(grid.get(IVec2::new(1_i32, 1_i32)), Some(&Cell(4_u8)));
        assert_eq!(grid.get(IVec2::new(2_i32, 0_i32)), None);
        assert_eq!(
            Grid2D::<Cell>::try_from("12\n345\n"),
            Err(GridParseError::UnevenLineLength(2_usize, 2_usize))
        );
        assert_eq!(
            Grid2D::<Cell>::try_from("1x\n").unwrap_err(),
            GridParseError::CellParseError('x')
        );
    }
}
