//! Logical grid shared by every cartridge.
//!
//! A [`Board`] stores what is on each cell, never how it is lit. Highlights,
//! territory markers and corner colors are painted on the host by each game.

use std::fmt;

use crate::constants::ORTHOGONAL;

/// One of the two players. Player One is red and always moves first.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// Identity of the player to move, derived from the turn counter.
    pub fn from_turn(turn: u32) -> Self {
        if turn % 2 == 0 { Player::One } else { Player::Two }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Index into per-player arrays such as score tables.
    pub fn index(self) -> usize {
        match self {
            Player::One => 0,
            Player::Two => 1,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "red"),
            Player::Two => write!(f, "blue"),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rank {
    #[default]
    Man,
    King,
}

/// Content of a single cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Piece { owner: Player, rank: Rank },
}

impl Cell {
    /// A plain piece (checkers man, Go stone, disc, marble).
    pub fn man(owner: Player) -> Self {
        Cell::Piece {
            owner,
            rank: Rank::Man,
        }
    }

    pub fn king(owner: Player) -> Self {
        Cell::Piece {
            owner,
            rank: Rank::King,
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Piece { owner, .. } => Some(owner),
        }
    }

    pub fn is_king(self) -> bool {
        matches!(self, Cell::Piece { rank: Rank::King, .. })
    }
}

/// `(x, y)`: column from the left, row from the top.
pub type Point = (usize, usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Board {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
        }
    }

    /// A square board of `size` x `size` cells.
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn contains(&self, (x, y): Point) -> bool {
        x < self.width && y < self.height
    }

    fn idx(&self, (x, y): Point) -> usize {
        assert!(
            x < self.width && y < self.height,
            "({x}, {y}) is outside the {}x{} board",
            self.width,
            self.height
        );
        y * self.width + x
    }

    /// Content of a cell. Panics if `pt` is off the board.
    pub fn get(&self, pt: Point) -> Cell {
        self.cells[self.idx(pt)]
    }

    /// Overwrite a cell. Panics if `pt` is off the board.
    pub fn set(&mut self, pt: Point, cell: Cell) {
        let i = self.idx(pt);
        self.cells[i] = cell;
    }

    /// Step from `pt` by `(dx, dy)`, or `None` when that leaves the board.
    pub fn offset(&self, (x, y): Point, dx: isize, dy: isize) -> Option<Point> {
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        self.contains((nx, ny)).then_some((nx, ny))
    }

    /// The up to 4 orthogonal neighbors of a point that lie on the board.
    pub fn orthogonal_neighbors(&self, pt: Point) -> impl Iterator<Item = Point> + '_ {
        ORTHOGONAL
            .iter()
            .filter_map(move |&(dx, dy)| self.offset(pt, dx, dy))
    }

    /// Every point, row by row.
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let (w, h) = (self.width, self.height);
        (0..h).flat_map(move |y| (0..w).map(move |x| (x, y)))
    }

    /// Number of cells matching a predicate.
    pub fn count(&self, pred: impl Fn(Cell) -> bool) -> usize {
        self.cells.iter().filter(|&&c| pred(c)).count()
    }

    /// Pieces currently owned by `player`.
    pub fn pieces(&self, player: Player) -> usize {
        self.count(|c| c.owner() == Some(player))
    }

    /// Index used by flat visited arrays sized `width * height`.
    pub fn flat_index(&self, pt: Point) -> usize {
        self.idx(pt)
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }
}

/// Parse a vertex such as `D4` into a point on a board of `height` rows.
///
/// Columns are letters from `A`, skipping `I`. Rows count from 1 at the
/// bottom. Returns `None` for anything malformed.
pub fn parse_vertex(s: &str, height: usize) -> Option<Point> {
    let bytes = s.as_bytes();
    if bytes.len() < 2 {
        return None;
    }

    let col_char = bytes[0].to_ascii_uppercase();
    if !col_char.is_ascii_uppercase() || col_char == b'I' {
        return None;
    }
    let mut col = (col_char - b'A') as usize;
    if col_char > b'I' {
        col -= 1;
    }

    let row: usize = s[1..].parse().ok()?;
    if row == 0 || row > height {
        return None;
    }
    Some((col, height - row))
}

/// Letter of column `x`, skipping `I`. Only 25 columns have one.
pub fn column_name(x: usize) -> Option<char> {
    let skip = usize::from(x >= 8);
    let offset = u8::try_from(x + skip).ok().filter(|&n| n < 26)?;
    Some(char::from(b'A' + offset))
}

/// Name of a point as a vertex (inverse of [`parse_vertex`]).
pub fn vertex_name((x, y): Point, height: usize) -> Option<String> {
    if y >= height {
        return None;
    }
    Some(format!("{}{}", column_name(x)?, height - y))
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let ch = match self.get((x, y)) {
                    Cell::Empty => '.',
                    Cell::Piece {
                        owner: Player::One,
                        rank: Rank::Man,
                    } => 'x',
                    Cell::Piece {
                        owner: Player::One,
                        rank: Rank::King,
                    } => 'X',
                    Cell::Piece {
                        owner: Player::Two,
                        rank: Rank::Man,
                    } => 'o',
                    Cell::Piece {
                        owner: Player::Two,
                        rank: Rank::King,
                    } => 'O',
                };
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
