use crate::errors::{GameError, GameResult};
use crate::players::Side;
use itertools::Itertools;
use ndarray::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, ops::Deref};

pub const SIZE: usize = 3;
pub const CELLS: usize = SIZE * SIZE;
pub const CENTER: usize = 4;
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Three board indices that win when one side holds all of them.
pub type WinLine = [usize; 3];

/// Rows, then columns, then the two diagonals. Lookups that can match more
/// than one line always resolve in this order.
pub const WIN_LINES: [WinLine; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Mark(Side),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }
    pub fn side(self) -> Option<Side> {
        match self {
            Cell::Empty => None,
            Cell::Mark(side) => Some(side),
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Cell::Empty => '-',
            Cell::Mark(side) => side.as_char(),
        }
    }
}

/// How a finished round ended.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    Won { side: Side, line: WinLine },
    Drawn,
}

/// Status of a board. Always computed from the cells, never stored.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameStatus {
    InProgress,
    Won { side: Side, line: WinLine },
    Drawn,
}

impl GameStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
    pub fn outcome(&self) -> Option<Outcome> {
        match *self {
            GameStatus::InProgress => None,
            GameStatus::Won { side, line } => Some(Outcome::Won { side, line }),
            GameStatus::Drawn => Some(Outcome::Drawn),
        }
    }
}

/// Row-major 3x3 grid. `Board` is a plain value: placing a mark returns a
/// new board and leaves the old one untouched.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELLS],
}

impl Deref for Board {
    type Target = [Cell; CELLS];
    fn deref(&self) -> &Self::Target {
        &self.cells
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.iter().map(|cell| cell.as_char()).collect::<String>())
    }
}

impl Board {
    pub fn new() -> Self {
        Board::default()
    }

    pub fn from_cells(cells: [Cell; CELLS]) -> Self {
        Board { cells }
    }

    /// Builds a board from a 9-character picture such as `"XX--O----"`.
    /// `X` is side A, `O` is side B, anything else is empty. Mostly handy in tests.
    pub fn from_picture(picture: &str) -> Self {
        let mut cells = [Cell::Empty; CELLS];
        for (cell, ch) in cells.iter_mut().zip(picture.chars().filter(|c| !c.is_whitespace())) {
            *cell = match ch {
                'X' | 'x' => Cell::Mark(Side::A),
                'O' | 'o' | '0' => Cell::Mark(Side::B),
                _ => Cell::Empty,
            };
        }
        Board { cells }
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// Returns a copy of the board with `mark` at `index`.
    pub fn place(&self, index: usize, mark: Side) -> GameResult<Board> {
        match self.cell(index) {
            Some(Cell::Empty) => {
                let mut next = *self;
                next.cells[index] = Cell::Mark(mark);
                Ok(next)
            }
            _ => Err(GameError::InvalidMove { index }),
        }
    }

    pub fn empty_cells(&self) -> Vec<usize> {
        self.iter()
            .enumerate()
            .filter(|(_index, cell)| cell.is_empty())
            .map(|(index, _)| index)
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.iter().all(|cell| !cell.is_empty())
    }

    pub fn marks_of(&self, side: Side) -> usize {
        self.iter().filter(|&&cell| cell == Cell::Mark(side)).count()
    }

    /// First line in `WIN_LINES` order held entirely by one side.
    pub fn winner(&self) -> Option<WinLine> {
        WIN_LINES.iter().copied().find(|&[a, b, c]| {
            !self.cells[a].is_empty() && self.cells[a] == self.cells[b] && self.cells[b] == self.cells[c]
        })
    }

    pub fn status(&self) -> GameStatus {
        match self.winner() {
            Some(line) => match self.cells[line[0]] {
                Cell::Mark(side) => GameStatus::Won { side, line },
                Cell::Empty => unreachable!("winning lines never start on an empty cell"),
            },
            None if self.is_full() => GameStatus::Drawn,
            None => GameStatus::InProgress,
        }
    }

    pub fn grid(&self) -> ArrayView2<'_, Cell> {
        ArrayView2::from_shape((SIZE, SIZE), &self.cells[..])
            .expect("a board always holds SIZE * SIZE cells")
    }

    /// Three text rows, cells separated by spaces.
    pub fn render(&self) -> String {
        self.grid()
            .rows()
            .into_iter()
            .map(|row| row.iter().map(|cell| cell.as_char()).join(" "))
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn place_returns_a_new_board() {
        let board = Board::new();
        let next = board.place(4, Side::A).unwrap();
        assert_eq!(next[4], Cell::Mark(Side::A));
        assert_eq!(board, Board::new());
    }

    #[test]
    fn place_rejects_taken_and_out_of_range_cells() {
        let board = Board::from_picture("X--------");
        assert_eq!(board.place(0, Side::B), Err(GameError::InvalidMove { index: 0 }));
        assert_eq!(board.place(9, Side::B), Err(GameError::InvalidMove { index: 9 }));
        assert_eq!(board, Board::from_picture("X--------"));
    }

    #[test]
    fn empty_cells_are_ascending() {
        let board = Board::from_picture("X-O-X-O--");
        assert_eq!(board.empty_cells(), vec![1, 3, 5, 7, 8]);
        assert!(!board.is_full());
        assert!(Board::from_picture("XOXXOOOXX").is_full());
    }

    #[test]
    fn row_of_b_wins() {
        let board = Board::from_picture("OOOXX-X--");
        assert_eq!(board.winner(), Some([0, 1, 2]));
        assert_eq!(
            board.status(),
            GameStatus::Won {
                side: Side::B,
                line: [0, 1, 2]
            }
        );
    }

    #[test]
    fn full_board_without_line_is_drawn() {
        let board = Board::from_picture("XOXXOOOXX");
        assert_eq!(board.winner(), None);
        assert_eq!(board.status(), GameStatus::Drawn);
        assert_eq!(board.status().outcome(), Some(Outcome::Drawn));
    }

    #[test]
    fn malformed_board_resolves_first_line() {
        // Column 0 and the anti-diagonal are both complete; column comes first.
        let board = Board::from_picture("X-XXX-XOO");
        assert_eq!(board.winner(), Some([0, 3, 6]));
        // A full X board reports the top row.
        assert_eq!(Board::from_picture("XXXXXXXXX").winner(), Some([0, 1, 2]));
    }

    #[test]
    fn is_game_in_progress() {
        assert_eq!(Board::new().status(), GameStatus::InProgress);
        assert!(!GameStatus::InProgress.is_over());
    }

    #[test]
    fn render_draws_three_rows() {
        let board = Board::from_picture("X---O---X");
        assert_eq!(board.render(), "X - -\n- O -\n- - X");
        assert_eq!(board.to_string(), "X---O---X");
        assert_eq!(board.grid()[[1, 1]], Cell::Mark(Side::B));
        assert_eq!(board.marks_of(Side::A), 2);
    }
}
