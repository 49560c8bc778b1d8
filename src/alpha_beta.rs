//! Depth-limited minimax search with alpha-beta pruning

use std::time::Instant;

use tracing::debug;

use crate::agent::{forced_move, Agent, ForcedMove};
use crate::board::{Board, GameState, Player};
use crate::config::AlphaBetaConfig;
use crate::error::{Error, Result};
use crate::evaluator::evaluate;
use crate::WIDTH;

/// The move chosen by an [`AlphaBeta`] search and how it was found
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    pub column: usize,
    /// Set when the root position dictated the move and no tree was searched
    pub forced: Option<ForcedMove>,
    /// Value of the root position, `None` for forced moves
    pub score: Option<i32>,
    /// Value returned by the subtree of each playable root column
    pub column_scores: [Option<i32>; WIDTH],
    /// The number of positions searched (for diagnostics only)
    pub node_count: usize,
}

/// An agent searching a fixed number of plies ahead
///
/// # Position Scoring
/// Leaves are scored with [`evaluate`] for the searching player minus the same
/// evaluation for the opponent, multiplied by `depth + 1` where `depth` is the
/// number of plies left when the leaf was reached. A win found after 1 ply is
/// therefore worth more than the same win found at the horizon, so the search
/// prefers quick wins and slow losses.
#[derive(Clone, Debug, Default)]
pub struct AlphaBeta {
    config: AlphaBetaConfig,
}

impl AlphaBeta {
    pub fn new(config: AlphaBetaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AlphaBetaConfig {
        &self.config
    }

    /// Picks the best column for `player` on a private copy of `board`
    ///
    /// Fails with [`Error::NoLegalMove`] if the board is full.
    pub fn search(&self, board: &Board, player: Player) -> Result<SearchOutcome> {
        self.config.validate()?;
        let start = Instant::now();

        if let Some(forced) = forced_move(board, player)? {
            debug!(?forced, %player, "alpha-beta forced move");
            return Ok(SearchOutcome {
                column: forced.column(),
                forced: Some(forced),
                score: None,
                column_scores: [None; WIDTH],
                node_count: 1,
            });
        }

        let mut search = Search {
            player,
            node_count: 1,
        };
        // the only copy mutated by the search, restored after every child
        let mut board = *board;
        let depth = self.config.depth;

        let mut alpha = i32::MIN;
        let mut column_scores = [None; WIDTH];
        for column in 0..WIDTH {
            if !board.playable(column) {
                continue;
            }
            board.drop(column, player)?;
            let score = search.minimax(&mut board, player.opponent(), column, depth - 1, alpha, i32::MAX);
            board.lift(column)?;
            let score = score?;

            column_scores[column] = Some(score);
            alpha = alpha.max(score);
        }

        // the first column reaching the root value, later ties may only be bounds
        let column = column_scores
            .iter()
            .position(|&score| score == Some(alpha))
            .ok_or(Error::NoLegalMove)?;

        debug!(
            column,
            score = alpha,
            nodes = search.node_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            %player,
            "alpha-beta search complete"
        );

        Ok(SearchOutcome {
            column,
            forced: None,
            score: Some(alpha),
            column_scores,
            node_count: search.node_count,
        })
    }
}

impl Agent for AlphaBeta {
    fn name(&self) -> &str {
        "alpha-beta"
    }

    fn choose_move(&mut self, board: &Board, player: Player) -> Result<usize> {
        Ok(self.search(board, player)?.column)
    }
}

// state of a single search call
struct Search {
    // the maximising player
    player: Player,
    node_count: usize,
}

impl Search {
    /// Value of `board` after a drop into `last_column`, with `to_move` playing next
    ///
    /// `board` is returned exactly as it was received, every move is undone
    /// before the next sibling is tried.
    fn minimax(
        &mut self,
        board: &mut Board,
        to_move: Player,
        last_column: usize,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> Result<i32> {
        self.node_count += 1;

        let finished = |player| board.game_outcome(player, Some(last_column)) != GameState::Ongoing;
        if depth == 0 || finished(Player::One) || finished(Player::Two) {
            return Ok(self.terminal_value(board, depth));
        }

        let maximising = to_move == self.player;
        let mut value = if maximising { i32::MIN } else { i32::MAX };

        for column in 0..WIDTH {
            if !board.playable(column) {
                continue;
            }
            board.drop(column, to_move)?;
            let score = self.minimax(board, to_move.opponent(), column, depth - 1, alpha, beta);
            board.lift(column)?;
            let score = score?;

            if maximising {
                value = value.max(score);
                alpha = alpha.max(value);
            } else {
                value = value.min(score);
                beta = beta.min(value);
            }
            // the other player will not allow this branch
            if alpha >= beta {
                break;
            }
        }
        Ok(value)
    }

    fn terminal_value(&self, board: &Board, depth: u32) -> i32 {
        let weight = depth as i32 + 1;
        weight * evaluate(board, self.player) - weight * evaluate(board, self.player.opponent())
    }
}
