//! Packed bit representation of one player's pieces
//!
//! Each column takes `HEIGHT + 1` bits, bottom row first, with an always-empty
//! sentinel bit on top. The sentinel stops shifted runs from leaking from the
//! top of one column into the bottom of the next, so a shift by 1 moves one
//! row, by `HEIGHT + 1` one column and by `HEIGHT` / `HEIGHT + 2` along the
//! two diagonals.

use crate::board::{Board, Player};
use crate::{HEIGHT, WIDTH};

mod static_masks {
    use crate::{HEIGHT, WIDTH};

    pub const fn bottom_mask() -> u64 {
        let mut mask = 0;
        let mut column = 0;
        while column < WIDTH {
            mask |= 1 << (column * (HEIGHT + 1));
            column += 1;
        }
        mask
    }
    pub const fn full_board_mask() -> u64 {
        bottom_mask() * ((1 << HEIGHT as u64) - 1)
    }
}

// vertical, horizontal and the two diagonals
const DIRECTIONS: [usize; 4] = [1, HEIGHT + 1, HEIGHT, HEIGHT + 2];

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct BitBoard {
    // tiles of the player of interest
    position: u64,
    // tiles of both players
    mask: u64,
}

impl BitBoard {
    /// Encodes the pieces of `player` on `board`
    pub fn encode(board: &Board, player: Player) -> Self {
        let cell = player.cell();
        let mut position = 0;
        let mut mask = 0;
        for column in 0..WIDTH {
            for row in 0..board.height(column) {
                let tile = 1 << (column * (HEIGHT + 1) + row);
                mask |= tile;
                if board.get(row, column) == cell {
                    position |= tile;
                }
            }
        }
        Self { position, mask }
    }

    pub fn from_masks(position: u64, mask: u64) -> Self {
        debug_assert_eq!(position & !mask, 0, "position tiles must be occupied");
        Self { position, mask }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn bottom_mask(column: usize) -> u64 {
        1 << (column * (HEIGHT + 1))
    }

    pub fn column_mask(column: usize) -> u64 {
        ((1 << HEIGHT) - 1) << (column * (HEIGHT + 1))
    }

    /// The tile a drop into `column` would fill, 0 if the column is full
    pub fn move_bit(&self, column: usize) -> u64 {
        (self.mask + Self::bottom_mask(column)) & Self::column_mask(column)
    }

    /// A copy with the player of interest having dropped into `column`
    pub fn play(&self, column: usize) -> Self {
        let tile = self.move_bit(column);
        Self {
            position: self.position | tile,
            mask: self.mask | tile,
        }
    }

    fn empty_tiles(&self) -> u64 {
        static_masks::full_board_mask() & !self.mask
    }

    pub fn connected_four(&self) -> bool {
        let pos = self.position;
        DIRECTIONS.iter().any(|&d| {
            // mark all runs of 2
            let m = pos & (pos >> d);
            // check for runs of 2 * (runs of 2)
            m & (m >> (2 * d)) != 0
        })
    }

    /// Looks for three aligned tiles
    ///
    /// Returns `None` without any, otherwise whether at least one of them
    /// can still be extended through an empty tile at either end.
    pub fn connected_three(&self) -> Option<bool> {
        let pos = self.position;
        let empty = self.empty_tiles();
        let mut found = false;
        for &d in DIRECTIONS.iter() {
            // mark the lowest tile of every run of 3
            let starts = pos & (pos >> d) & (pos >> (2 * d));
            if starts == 0 {
                continue;
            }
            found = true;
            let before = starts >> d;
            let after = starts << (3 * d);
            if (before | after) & empty != 0 {
                return Some(true);
            }
        }
        if found {
            Some(false)
        } else {
            None
        }
    }

    pub fn connected_two(&self) -> bool {
        let pos = self.position;
        DIRECTIONS.iter().any(|&d| pos & (pos >> d) != 0)
    }

    /// Whether `n` tiles are aligned in any direction, for `n` in 2..=4
    pub fn connected(&self, n: usize) -> bool {
        match n {
            0 => true,
            1 => self.position != 0,
            2 => self.connected_two(),
            3 => self.connected_three().is_some(),
            4 => self.connected_four(),
            _ => false,
        }
    }

    /// Length of the longest alignment, capped at 4
    pub fn connectivity(&self) -> u32 {
        if self.connected_four() {
            4
        } else if self.connected_three().is_some() {
            3
        } else if self.connected_two() {
            2
        } else if self.position != 0 {
            1
        } else {
            0
        }
    }

    /// Empty tiles that would complete an alignment of 4
    pub fn winning_cells(&self) -> u64 {
        let player_mask = self.position;

        // vertical
        // find the top ends of 3-alignments
        let mut r = (player_mask << 1) & (player_mask << 2) & (player_mask << 3);

        // horizontal and both diagonals
        for &d in DIRECTIONS[1..].iter() {
            let mut p = (player_mask << d) & (player_mask << (2 * d));
            // find the right ends of 3-alignments
            r |= p & (player_mask << (3 * d));
            // find holes of the type ...O O _ O...
            r |= p & (player_mask >> d);

            p = (player_mask >> d) & (player_mask >> (2 * d));
            // find the left ends of 3-alignments
            r |= p & (player_mask >> (3 * d));
            // find holes of the type ...O _ O O...
            r |= p & (player_mask << d);
        }

        r & self.empty_tiles()
    }
}
