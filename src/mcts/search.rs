//! The MCTS search loop: select, expand, simulate and backpropagate until the
//! time budget runs out.

use std::cmp::Ordering;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

use crate::agent::{forced_move, Agent, ForcedMove};
use crate::bitboard::BitBoard;
use crate::board::{Board, Player};
use crate::config::{MctsConfig, SelectionPolicy};
use crate::error::{Error, Result};
use crate::evaluator::{evaluate_bitboard, TERMINAL_SCORE};
use crate::mcts::node::{Node, NodeId};
use crate::mcts::tree::{Playout, Tree};
use crate::WIDTH;

/// Statistics of one root child once the search has finished
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildStats {
    pub column: usize,
    pub simulations: u32,
    /// Playouts won by the searching player after this move
    pub wins: u32,
}

/// The move chosen by an [`Mcts`] search and how it was found
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MctsOutcome {
    pub column: usize,
    /// Set when the root position dictated the move and no tree was built
    pub forced: Option<ForcedMove>,
    pub iterations: u64,
    /// Size of the tree when the search stopped
    pub nodes: usize,
    /// Root children in expansion order
    pub children: Vec<ChildStats>,
}

/// An agent running Monte Carlo Tree Search for a fixed wall-clock budget
#[derive(Clone, Debug, Default)]
pub struct Mcts {
    config: MctsConfig,
}

impl Mcts {
    pub fn new(config: MctsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Builds a fresh tree for `player` to move on `board` and picks a root child
    ///
    /// Iterates until the deadline has passed (with at least one root child
    /// expanded), `max_iterations` is reached or nothing is left to expand.
    /// A time budget past the range of [`Instant`] sets no deadline at all.
    pub fn search(&self, board: &Board, player: Player) -> Result<MctsOutcome> {
        self.config.validate()?;
        let start = Instant::now();

        if let Some(forced) = forced_move(board, player)? {
            debug!(?forced, %player, "mcts forced move");
            return Ok(MctsOutcome {
                column: forced.column(),
                forced: Some(forced),
                iterations: 0,
                nodes: 0,
                children: Vec::new(),
            });
        }

        // a budget too large to represent leaves only the iteration cap
        let deadline = start.checked_add(self.config.time_budget);
        let mut search = MctsSearch::new(board, player, &self.config);
        loop {
            if let Some(max) = self.config.max_iterations {
                if search.iterations() >= max {
                    break;
                }
            }
            let expired = deadline.map_or(false, |deadline| Instant::now() >= deadline);
            if expired && !search.tree().root().children.is_empty() {
                break;
            }
            if !search.iterate()? {
                break;
            }
        }

        let column = search.best_column(self.config.selection)?;
        let tree = search.tree();
        let children = tree
            .children(NodeId::ROOT)
            .filter_map(|node| {
                node.column.map(|column| ChildStats {
                    column,
                    simulations: node.simulations,
                    wins: node.wins,
                })
            })
            .collect();

        debug!(
            column,
            iterations = search.iterations(),
            nodes = tree.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            %player,
            "mcts search complete"
        );

        Ok(MctsOutcome {
            column,
            forced: None,
            iterations: search.iterations(),
            nodes: tree.len(),
            children,
        })
    }
}

impl Agent for Mcts {
    fn name(&self) -> &str {
        "mcts"
    }

    fn choose_move(&mut self, board: &Board, player: Player) -> Result<usize> {
        Ok(self.search(board, player)?.column)
    }
}

/// A single search in progress, one iteration at a time
pub struct MctsSearch {
    tree: Tree,
    rng: ChaCha8Rng,
    exploration: f64,
    iterations: u64,
}

impl MctsSearch {
    pub fn new(board: &Board, player: Player, config: &MctsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            tree: Tree::new(Node::new_root(*board, player)),
            rng,
            exploration: config.exploration,
            iterations: 0,
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Runs one select / expand / simulate / backpropagate cycle
    ///
    /// Returns `false` without touching the tree when no node has an
    /// untried column left. A freshly expanded child on a full board still
    /// records its playout as a draw, so the root always holds one simulation
    /// per iteration.
    pub fn iterate(&mut self) -> Result<bool> {
        let leaf = match self.tree.select(self.exploration) {
            Some(leaf) => leaf,
            None => return Ok(false),
        };
        let child = self.expand(leaf)?;
        let playout = self.simulate(child)?;
        self.tree.backpropagate(child, playout);
        self.iterations += 1;
        Ok(true)
    }

    fn expand(&mut self, id: NodeId) -> Result<NodeId> {
        let node = self.tree.get(id);
        let column = policy_move(&node.board, node.player, node.untried, &mut self.rng)
            .ok_or(Error::NoLegalMove)?;
        let child = self.tree.add_child(id, column)?;
        trace!(parent = id.0, child = child.0, column, "expanded");
        Ok(child)
    }

    /// Plays the game out from `id` with the move policy on a scratch board
    fn simulate(&mut self, id: NodeId) -> Result<Playout> {
        let node = self.tree.get(id);
        let mover = node.mover();
        if let Some(column) = node.column {
            if node.board.four_in_a_row(mover, Some(column)) {
                return Ok(Playout::Win);
            }
        }

        let mut board = node.board;
        let mut player = node.player;
        loop {
            let column = match policy_move(&board, player, ALL_COLUMNS, &mut self.rng) {
                Some(column) => column,
                None => return Ok(Playout::Draw),
            };
            board.drop(column, player)?;
            if board.four_in_a_row(player, Some(column)) {
                return Ok(if player == mover {
                    Playout::Win
                } else {
                    Playout::Loss
                });
            }
            player = player.opponent();
        }
    }

    /// The root child picked by `policy`, lower columns win exact ties
    pub fn best_column(&self, policy: SelectionPolicy) -> Result<usize> {
        self.tree
            .children(NodeId::ROOT)
            .max_by(|a, b| compare_children(a, b, policy))
            .and_then(|node| node.column)
            .ok_or(Error::NoLegalMove)
    }
}

const ALL_COLUMNS: u8 = (1 << WIDTH) - 1;

fn compare_children(a: &Node, b: &Node, policy: SelectionPolicy) -> Ordering {
    let win_rate = a
        .win_rate()
        .partial_cmp(&b.win_rate())
        .unwrap_or(Ordering::Equal);
    let visits = a.simulations.cmp(&b.simulations);
    let first = match policy {
        SelectionPolicy::WinRate => win_rate.then(visits),
        SelectionPolicy::Visits => visits.then(win_rate),
    };
    first.then_with(|| b.column.cmp(&a.column))
}

/// Picks a move for `player` among the playable columns set in `allowed`
///
/// A winning drop is taken at once, otherwise the choice is uniform among the
/// columns sharing the best [`evaluate_bitboard`] score. `None` when no
/// allowed column is playable.
fn policy_move<R: Rng>(board: &Board, player: Player, allowed: u8, rng: &mut R) -> Option<usize> {
    let own = BitBoard::encode(board, player);
    let opponent = BitBoard::encode(board, player.opponent());

    let mut best_score = i32::MIN;
    let mut best = Vec::with_capacity(WIDTH);
    for column in (0..WIDTH).filter(|&column| allowed & (1 << column) != 0 && board.playable(column)) {
        let move_bit = own.move_bit(column);
        let score = evaluate_bitboard(&own.play(column), &opponent, move_bit);
        if score == TERMINAL_SCORE {
            return Some(column);
        }
        if score > best_score {
            best_score = score;
            best.clear();
        }
        if score == best_score {
            best.push(column);
        }
    }
    best.choose(rng).copied()
}
