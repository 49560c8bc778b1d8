//! MCTS tree node representation
//!
//! Each node is one ply of hypothetical play: the position reached by
//! dropping into `column` from the parent's position.

use crate::board::{Board, Player};
use crate::WIDTH;

/// Index into the node arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);

    pub fn is_root(self) -> bool {
        self == Self::ROOT
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    /// Position at this node
    pub board: Board,

    /// Column dropped into to reach this node, `None` for the root
    pub column: Option<usize>,

    /// Player about to move at this node
    pub player: Player,

    /// The root is its own parent
    pub parent: NodeId,

    pub children: Vec<NodeId>,

    /// Bit `c` is set while column `c` is playable and has no child yet
    pub untried: u8,

    /// Number of playouts that passed through this node
    pub simulations: u32,

    /// Playouts won by the player who moved into this node
    pub wins: u32,
}

impl Node {
    pub fn new_root(board: Board, player: Player) -> Self {
        Self {
            board,
            column: None,
            player,
            parent: NodeId::ROOT,
            children: Vec::new(),
            untried: playable_mask(&board),
            simulations: 0,
            wins: 0,
        }
    }

    /// A node for `board`, reached from `parent` by dropping into `column`
    pub fn new_child(parent: NodeId, board: Board, column: usize, player: Player) -> Self {
        // the game ends with the move into this node
        let finished = board.four_in_a_row(player.opponent(), Some(column));
        Self {
            board,
            column: Some(column),
            player,
            parent,
            children: Vec::new(),
            untried: if finished { 0 } else { playable_mask(&board) },
            simulations: 0,
            wins: 0,
        }
    }

    /// The player whose move produced this node
    pub fn mover(&self) -> Player {
        self.player.opponent()
    }

    /// No untried column is left, either all children exist or the game is over
    pub fn is_fully_expanded(&self) -> bool {
        self.untried == 0
    }

    pub fn untried_columns(&self) -> impl Iterator<Item = usize> {
        let untried = self.untried;
        (0..WIDTH).filter(move |&column| untried & (1 << column) != 0)
    }

    pub fn win_rate(&self) -> f64 {
        if self.simulations == 0 {
            0.0
        } else {
            self.wins as f64 / self.simulations as f64
        }
    }

    /// UCB1 score seen from the parent, `None` before the first playout
    pub fn ucb1(&self, parent_simulations: u32, exploration: f64) -> Option<f64> {
        if self.simulations == 0 {
            return None;
        }
        let simulations = self.simulations as f64;
        let explore = (f64::from(parent_simulations.max(1)).ln() / simulations).sqrt();
        Some(self.win_rate() + exploration * explore)
    }
}

fn playable_mask(board: &Board) -> u8 {
    board
        .legal_columns()
        .fold(0, |mask, column| mask | 1 << column)
}
