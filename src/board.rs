//! Grid representation of a Connect 4 position
//!
//! The [`Board`] is the exchange format between the searchers and whatever
//! drives them. Pieces obey gravity: within a column the occupied cells always
//! form a contiguous run starting at row 0, the bottom row.

use std::fmt;
use std::str::FromStr;

use crate::bitboard::BitBoard;
use crate::error::{Error, Result};
use crate::{HEIGHT, WIDTH};

/// One of the two sides of a game
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Player::One => write!(f, "Player 1"),
            Player::Two => write!(f, "Player 2"),
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Cell::PlayerOne => Some(Player::One),
            Cell::PlayerTwo => Some(Player::Two),
            Cell::Empty => None,
        }
    }

    fn symbol(self) -> char {
        match self {
            Cell::PlayerOne => 'X',
            Cell::PlayerTwo => 'O',
            Cell::Empty => ' ',
        }
    }

    fn from_symbol(symbol: char) -> Option<Self> {
        match symbol {
            'X' => Some(Cell::PlayerOne),
            'O' => Some(Cell::PlayerTwo),
            ' ' => Some(Cell::Empty),
            _ => None,
        }
    }
}

/// The state of a game from the point of view of a single player
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Win,
    Draw,
    Ongoing,
}

// (row, column) steps of the four alignment directions
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

const BORDER: &str = "|==============|";
const COLUMN_LABELS: &str = "|0 1 2 3 4 5 6 |";

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub struct Board {
    cells: [Cell; WIDTH * HEIGHT], // cells are stored left-to-right, bottom-to-top
    heights: [usize; WIDTH],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; WIDTH * HEIGHT],
            heights: [0; WIDTH],
        }
    }

    /// Builds a board from rows of cells, `rows[0]` being the bottom row
    ///
    /// Fails with [`Error::InvalidBoard`] if any piece floats above an empty cell.
    pub fn from_cells(rows: [[Cell; WIDTH]; HEIGHT]) -> Result<Self> {
        let mut board = Self::new();
        for column in 0..WIDTH {
            for (row, cells) in rows.iter().enumerate() {
                let cell = cells[column];
                if cell.is_empty() {
                    continue;
                }
                if board.heights[column] != row {
                    return Err(Error::InvalidBoard(format!(
                        "floating piece at row {} of column {}",
                        row, column
                    )));
                }
                board.cells[column + WIDTH * row] = cell;
                board.heights[column] += 1;
            }
        }
        Ok(board)
    }

    /// Plays a sequence of 0-indexed columns, alternating players starting with [`Player::One`]
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();
        let mut player = Player::One;

        for column_char in moves.as_ref().chars() {
            let column = column_char.to_digit(10).ok_or_else(|| {
                Error::InvalidBoard(format!("could not parse '{}' as a valid move", column_char))
            })? as usize;
            // abort if the position is won at any point
            if board.four_in_a_row(player.opponent(), None) {
                return Err(Error::InvalidBoard("invalid position, game is over".into()));
            }
            board.drop(column, player)?;
            player = player.opponent();
        }
        Ok(board)
    }

    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[column + WIDTH * row]
    }

    /// Number of pieces in `column`
    pub fn height(&self, column: usize) -> usize {
        self.heights[column]
    }

    pub fn playable(&self, column: usize) -> bool {
        column < WIDTH && self.heights[column] < HEIGHT
    }

    /// Non-full columns in left-to-right order
    pub fn legal_columns(&self) -> impl Iterator<Item = usize> + '_ {
        (0..WIDTH).filter(move |&column| self.playable(column))
    }

    pub fn is_full(&self) -> bool {
        self.heights.iter().all(|&height| height == HEIGHT)
    }

    pub fn num_moves(&self) -> usize {
        self.heights.iter().sum()
    }

    /// Row of the topmost piece in `column`, the last one placed there
    pub fn top_row(&self, column: usize) -> Option<usize> {
        match self.heights.get(column) {
            Some(&height) if height > 0 => Some(height - 1),
            _ => None,
        }
    }

    fn check_column(&self, column: usize) -> Result<()> {
        if column >= WIDTH {
            return Err(Error::ColumnOutOfRange { column });
        }
        if self.heights[column] == HEIGHT {
            return Err(Error::ColumnFull { column });
        }
        Ok(())
    }

    /// Places a piece for `player` in the lowest empty row of `column`, returning that row
    ///
    /// The board is left untouched when the column is out of range or full.
    pub fn drop(&mut self, column: usize, player: Player) -> Result<usize> {
        self.check_column(column)?;
        let row = self.heights[column];
        self.cells[column + WIDTH * row] = player.cell();
        self.heights[column] += 1;
        Ok(row)
    }

    /// Removes the topmost piece of `column`, undoing the last [`Board::drop`] into it
    pub fn lift(&mut self, column: usize) -> Result<Cell> {
        let row = match self.top_row(column) {
            Some(row) => row,
            None if column >= WIDTH => return Err(Error::ColumnOutOfRange { column }),
            None => {
                return Err(Error::InvalidBoard(format!(
                    "cannot lift a piece from empty column {}",
                    column
                )))
            }
        };
        let cell = std::mem::replace(&mut self.cells[column + WIDTH * row], Cell::Empty);
        self.heights[column] -= 1;
        Ok(cell)
    }

    /// Checks for four aligned pieces of `player`
    ///
    /// With `last_column` only the lines passing through the topmost piece of
    /// that column are examined, which is enough when that piece was the last
    /// one played. Without it every line of the board is checked.
    pub fn four_in_a_row(&self, player: Player, last_column: Option<usize>) -> bool {
        let column = match last_column {
            Some(column) => column,
            None => return BitBoard::encode(self, player).connected_four(),
        };
        let row = match self.top_row(column) {
            Some(row) => row,
            None => return false,
        };
        let cell = player.cell();
        if self.get(row, column) != cell {
            return false;
        }

        DIRECTIONS.iter().any(|&(d_row, d_column)| {
            let run = 1
                + self.run_length(row, column, d_row, d_column, cell)
                + self.run_length(row, column, -d_row, -d_column, cell);
            run >= 4
        })
    }

    // number of consecutive `cell`s stepping away from (row, column), excluding the start
    fn run_length(&self, row: usize, column: usize, d_row: isize, d_column: isize, cell: Cell) -> usize {
        let mut run = 0;
        let mut y = row as isize + d_row;
        let mut x = column as isize + d_column;
        while x >= 0
            && x < WIDTH as isize
            && y >= 0
            && y < HEIGHT as isize
            && self.get(y as usize, x as usize) == cell
        {
            run += 1;
            y += d_row;
            x += d_column;
        }
        run
    }

    /// Columns where a drop by `player` would complete four in a row
    pub fn winning_columns(&self, player: Player) -> impl Iterator<Item = usize> {
        let bitboard = BitBoard::encode(self, player);
        let winning = bitboard.winning_cells();
        (0..WIDTH).filter(move |&column| bitboard.move_bit(column) & winning != 0)
    }

    /// Game state for `player`, both players have to be checked to detect a finished game
    pub fn game_outcome(&self, player: Player, last_column: Option<usize>) -> GameState {
        if self.four_in_a_row(player, last_column) {
            GameState::Win
        } else if self.is_full() {
            GameState::Draw
        } else {
            GameState::Ongoing
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", BORDER)?;
        for row in (0..HEIGHT).rev() {
            write!(f, "|")?;
            for column in 0..WIDTH {
                write!(f, "{} ", self.get(row, column).symbol())?;
            }
            writeln!(f, "|")?;
        }
        writeln!(f, "{}", BORDER)?;
        write!(f, "{}", COLUMN_LABELS)
    }
}

impl FromStr for Board {
    type Err = Error;

    /// Parses the output of the [`Display`](fmt::Display) implementation
    fn from_str(s: &str) -> Result<Self> {
        let lines: Vec<&str> = s.lines().collect();
        if lines.len() != HEIGHT + 3 {
            return Err(Error::InvalidBoard(format!(
                "expected {} lines, found {}",
                HEIGHT + 3,
                lines.len()
            )));
        }

        let mut rows = [[Cell::Empty; WIDTH]; HEIGHT];
        for (line_index, line) in lines[1..=HEIGHT].iter().enumerate() {
            let symbols: Vec<char> = line.chars().collect();
            if symbols.len() < 2 * WIDTH + 1 {
                return Err(Error::InvalidBoard(format!("row line too short: '{}'", line)));
            }
            // the first text row is the top of the board
            let row = HEIGHT - 1 - line_index;
            for (column, cell) in rows[row].iter_mut().enumerate() {
                let symbol = symbols[1 + 2 * column];
                *cell = Cell::from_symbol(symbol).ok_or_else(|| {
                    Error::InvalidBoard(format!("unknown cell symbol '{}'", symbol))
                })?;
            }
        }
        Self::from_cells(rows)
    }
}
