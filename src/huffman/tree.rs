use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;

use super::{Symbol, SymbolFrequency};

/// One step down the tree, written as code unit `'0'` (left) or `'1'` (right).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Branch {
    Left,
    Right,
}

impl Branch {
    pub fn from_code_unit(unit: char) -> Option<Branch> {
        match unit {
            '0' => Some(Branch::Left),
            '1' => Some(Branch::Right),
            _ => None,
        }
    }

    pub fn code_unit(self) -> char {
        match self {
            Branch::Left => '0',
            Branch::Right => '1',
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum NodeKind {
    Leaf { symbol: Symbol },
    Inner { left: usize, right: usize },
}

#[derive(Clone, Copy, Debug)]
struct Node {
    frequency: usize,
    index: usize,
    kind: NodeKind,
}

// Nodes are merged by ascending frequency, equal frequencies by creation order.
impl Ord for Node {
    fn cmp(&self, other: &Self) -> Ordering {
        self.frequency
            .cmp(&other.frequency)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Node {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Node {}

/// Root to leaf path of a single symbol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeafPath {
    pub symbol: Symbol,
    pub frequency: usize,
    pub branches: Vec<Branch>,
}

/// Huffman tree stored as an arena, inner nodes own their children by index.
///
/// The leaves occupy the first indices in the order they were passed to
/// [`HuffmanTree::new`], inner nodes follow in the order they were merged.
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root_index: usize,
}

impl HuffmanTree {
    /// Builds the tree greedily, `None` if there is no symbol at all.
    ///
    /// The two least frequent nodes are merged repeatedly, the first one taken
    /// from the heap becomes the left child. Ties are resolved in favour of
    /// the node created earlier, so the order of `symbol_frequencies` decides
    /// the shape among equal weights. Merged weights saturate at
    /// `usize::MAX`; beyond that the tree stays prefix free and full but is
    /// no longer guaranteed optimal.
    pub fn new(symbol_frequencies: &[SymbolFrequency]) -> Option<HuffmanTree> {
        let mut heap = BinaryHeap::with_capacity(symbol_frequencies.len());
        let mut nodes: Vec<Node> =
            Vec::with_capacity((2 * symbol_frequencies.len()).saturating_sub(1));

        for sf in symbol_frequencies {
            let node = Node {
                frequency: sf.frequency,
                index: nodes.len(),
                kind: NodeKind::Leaf { symbol: sf.symbol },
            };
            heap.push(Reverse(node));
            nodes.push(node);
        }

        loop {
            let Reverse(left) = heap.pop()?;
            let Some(Reverse(right)) = heap.pop() else {
                return Some(HuffmanTree {
                    nodes,
                    root_index: left.index,
                });
            };
            let node = Node {
                frequency: left.frequency.saturating_add(right.frequency),
                index: nodes.len(),
                kind: NodeKind::Inner {
                    left: left.index,
                    right: right.index,
                },
            };
            heap.push(Reverse(node));
            nodes.push(node);
        }
    }

    pub fn root_index(&self) -> usize {
        self.root_index
    }

    /// Total weight of all symbols.
    pub fn frequency(&self) -> usize {
        self.nodes[self.root_index].frequency
    }

    /// A tree made from one distinct symbol has no edges at all.
    pub fn is_single_leaf(&self) -> bool {
        matches!(self.nodes[self.root_index].kind, NodeKind::Leaf { .. })
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::Leaf { .. }))
            .count()
    }

    /// Child of `node_index` in direction `branch`, `None` for a leaf.
    pub fn descend(&self, node_index: usize, branch: Branch) -> Option<usize> {
        match self.nodes.get(node_index)?.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Inner { left, right } => match branch {
                Branch::Left => Some(left),
                Branch::Right => Some(right),
            },
        }
    }

    pub fn symbol_at(&self, node_index: usize) -> Option<Symbol> {
        match self.nodes.get(node_index)?.kind {
            NodeKind::Leaf { symbol } => Some(symbol),
            NodeKind::Inner { .. } => None,
        }
    }

    /// Depth first, left before right.
    pub fn leaf_paths(&self) -> Vec<LeafPath> {
        let mut paths = Vec::with_capacity(self.leaf_count());
        let mut stack = vec![(self.root_index, Vec::new())];
        while let Some((index, branches)) = stack.pop() {
            let node = self.nodes[index];
            match node.kind {
                NodeKind::Leaf { symbol } => paths.push(LeafPath {
                    symbol,
                    frequency: node.frequency,
                    branches,
                }),
                NodeKind::Inner { left, right } => {
                    let mut right_branches = branches.clone();
                    right_branches.push(Branch::Right);
                    stack.push((right, right_branches));
                    let mut left_branches = branches;
                    left_branches.push(Branch::Left);
                    stack.push((left, left_branches));
                }
            }
        }
        paths
    }

    /// Sum of frequency times depth over all leaves, saturating at `usize::MAX`.
    pub fn weighted_path_length(&self) -> usize {
        self.leaf_paths()
            .iter()
            .map(|path| path.frequency.saturating_mul(path.branches.len()))
            .fold(0, usize::saturating_add)
    }
}

const BOX_DRAWINGS_DOUBLE_HORIZONTAL: &str = "═";
const SPACE: &str = " ";

/// Text block of a rendered subtree, `anchor` is the column its parent edge attaches to.
struct Sketch {
    lines: Vec<String>,
    width: usize,
    anchor: usize,
}

impl Sketch {
    fn leaf(symbol: Symbol, frequency: usize) -> Self {
        let label = format!("({}:{})", symbol, frequency);
        let width = label.chars().count();
        Sketch {
            lines: vec![label],
            width,
            anchor: width / 2,
        }
    }

    fn join(left: Sketch, right: Sketch) -> Self {
        let width = left.width + 1 + right.width;
        let mut lines = vec![
            format!("{}•{}", SPACE.repeat(left.width), SPACE.repeat(right.width)),
            format!("{}║{}", SPACE.repeat(left.width), SPACE.repeat(right.width)),
            format!(
                "{}╔{}╩{}╗{}",
                SPACE.repeat(left.anchor),
                BOX_DRAWINGS_DOUBLE_HORIZONTAL.repeat(left.width - left.anchor - 1),
                BOX_DRAWINGS_DOUBLE_HORIZONTAL.repeat(right.anchor),
                SPACE.repeat(right.width - right.anchor - 1)
            ),
        ];
        let rows = left.lines.len().max(right.lines.len());
        for row in 0..rows {
            let left_line = left
                .lines
                .get(row)
                .cloned()
                .unwrap_or_else(|| SPACE.repeat(left.width));
            let right_line = right
                .lines
                .get(row)
                .cloned()
                .unwrap_or_else(|| SPACE.repeat(right.width));
            lines.push(format!("{} {}", left_line, right_line));
        }
        Sketch {
            lines,
            width,
            anchor: left.width,
        }
    }
}

impl HuffmanTree {
    fn sketch(&self, node_index: usize) -> Sketch {
        let node = self.nodes[node_index];
        match node.kind {
            NodeKind::Leaf { symbol } => Sketch::leaf(symbol, node.frequency),
            NodeKind::Inner { left, right } => Sketch::join(self.sketch(left), self.sketch(right)),
        }
    }
}

impl fmt::Display for HuffmanTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.sketch(self.root_index).lines.iter() {
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
