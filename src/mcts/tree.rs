//! MCTS tree structure with arena allocation
//!
//! Nodes live in one contiguous Vec and refer to each other by [`NodeId`],
//! so a tree is dropped in one go once the search call returns.

use crate::board::Player;
use crate::error::{Error, Result};
use crate::mcts::node::{Node, NodeId};
use crate::WIDTH;

/// Result of one playout, from the point of view of the player who moved
/// into the node the playout started from
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Playout {
    Win,
    Loss,
    Draw,
}

/// MCTS tree with arena-based node storage
#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Create a tree holding only `root`
    pub fn new(root: Node) -> Self {
        Self { nodes: vec![root] }
    }

    #[inline]
    pub fn root(&self) -> &Node {
        &self.nodes[NodeId::ROOT.index()]
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false, the root is allocated on construction
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The arena in allocation order, the root first
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> + '_ {
        self.get(id).children.iter().map(move |&child| self.get(child))
    }

    /// Expand `parent` with the position after a drop into `column`
    ///
    /// `column` must still be untried at `parent`.
    pub fn add_child(&mut self, parent: NodeId, column: usize) -> Result<NodeId> {
        if column >= WIDTH {
            return Err(Error::ColumnOutOfRange { column });
        }
        let parent_node = self.get(parent);
        if parent_node.untried & (1 << column) == 0 {
            return Err(Error::ColumnFull { column });
        }
        let mut board = parent_node.board;
        let player = parent_node.player;
        board.drop(column, player)?;

        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new_child(parent, board, column, player.opponent()));

        let parent_node = self.get_mut(parent);
        parent_node.untried &= !(1 << column);
        parent_node.children.push(id);
        Ok(id)
    }

    /// Record a playout started at `leaf` on the leaf and every ancestor up to the root
    ///
    /// A node's `wins` counts playouts won by the player who moved into it,
    /// players alternate by ply so the credit alternates along the path.
    pub fn backpropagate(&mut self, leaf: NodeId, playout: Playout) {
        let leaf_mover = self.get(leaf).mover();
        let winner: Option<Player> = match playout {
            Playout::Win => Some(leaf_mover),
            Playout::Loss => Some(leaf_mover.opponent()),
            Playout::Draw => None,
        };

        let mut id = leaf;
        loop {
            let node = self.get_mut(id);
            node.simulations += 1;
            if winner == Some(node.mover()) {
                node.wins += 1;
            }
            if id.is_root() {
                break;
            }
            id = node.parent;
        }
    }

    /// Pick the node to expand next
    ///
    /// The root is returned while it still has untried columns, so every first
    /// move is tried once. After that all nodes of the tree with untried
    /// columns compete on UCB1 in a flat scan, the first one wins ties.
    /// `None` means there is nothing left to expand.
    pub fn select(&self, exploration: f64) -> Option<NodeId> {
        if !self.root().is_fully_expanded() {
            return Some(NodeId::ROOT);
        }

        let mut best: Option<(NodeId, f64)> = None;
        for (index, node) in self.nodes.iter().enumerate().skip(1) {
            if node.is_fully_expanded() {
                continue;
            }
            let parent_simulations = self.get(node.parent).simulations;
            let score = match node.ucb1(parent_simulations, exploration) {
                Some(score) => score,
                None => continue,
            };
            match best {
                Some((_, best_score)) if best_score >= score => {}
                _ => best = Some((NodeId(index as u32), score)),
            }
        }
        best.map(|(id, _)| id)
    }
}
