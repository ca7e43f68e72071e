//! Adaptive Huffman trees for lh1 and lh2.
//!
//! The tree lives in flat arrays indexed by node id. Node 0 is the root and
//! nodes are kept in non-increasing frequency order, so a node's parent
//! always has a smaller index than the node. Nodes with equal frequency
//! share a *block*; `edge[block]` is the lowest index in that block, which
//! is the node an incremented member is swapped with to keep the order.
//!
//! `child[i]` is either `!symbol` for a leaf or the index `c` of a child
//! pair, where bit 0 selects `c` and bit 1 selects `c - 1`.

use lhadec_core::bitstream::BitReader;
use lhadec_core::error::Result;
use std::io::Read;
use tracing::trace;

/// Frequency at which the tree is rebuilt with halved weights.
pub const MAX_FREQ: u32 = 0x8000;

/// Frequency pinned on the root of a position tree.
const ROOT_FREQ: u32 = 0xFFFF;

/// Sibling-property tree arena shared by [`CodeTree`] and [`PositionTree`].
#[derive(Debug, Clone)]
pub struct AdaptiveTree {
    child: Vec<i32>,
    parent: Vec<usize>,
    block: Vec<usize>,
    edge: Vec<usize>,
    /// Free block ids; `stock[avail..]` are unused.
    stock: Vec<usize>,
    avail: usize,
    /// Symbol to leaf node.
    leaf: Vec<usize>,
    freq: Vec<u32>,
}

impl AdaptiveTree {
    fn with_capacity(nodes: usize, symbols: usize) -> Self {
        Self {
            child: vec![0; nodes],
            parent: vec![0; nodes],
            block: vec![0; nodes],
            edge: vec![0; nodes],
            stock: (0..nodes).collect(),
            avail: 1,
            leaf: vec![0; symbols],
            freq: vec![0; nodes],
        }
    }

    /// Frequency of a node.
    pub fn freq(&self, node: usize) -> u32 {
        self.freq[node]
    }

    /// Leaf node currently holding `symbol`.
    pub fn leaf(&self, symbol: usize) -> usize {
        self.leaf[symbol]
    }

    fn alloc_block(&mut self) -> usize {
        let block = self.stock[self.avail];
        self.avail += 1;
        block
    }

    fn release_block(&mut self, block: usize) {
        self.avail -= 1;
        self.stock[self.avail] = block;
    }

    /// Balanced start: `n` leaves of frequency 1 at the bottom of the arena.
    fn init_balanced(&mut self, n: usize) {
        let mut j = 2 * n as isize - 2;
        for symbol in 0..n {
            let node = j as usize;
            self.freq[node] = 1;
            self.child[node] = !(symbol as i32);
            self.leaf[symbol] = node;
            self.block[node] = 1;
            j -= 1;
        }
        self.avail = 2;
        self.edge[1] = n - 1;

        let mut i = 2 * n - 2;
        while j >= 0 {
            let node = j as usize;
            let f = self.freq[i] + self.freq[i - 1];
            self.freq[node] = f;
            self.child[node] = i as i32;
            self.parent[i] = node;
            self.parent[i - 1] = node;
            self.block[node] = if f == self.freq[node + 1] {
                self.block[node + 1]
            } else {
                self.alloc_block()
            };
            self.edge[self.block[node]] = node;
            i -= 2;
            j -= 1;
        }
    }

    /// A lone root leaf for symbol 0.
    fn init_single(&mut self) {
        self.freq[0] = 1;
        self.child[0] = !0;
        self.leaf[0] = 0;
        self.avail = 1;
        let block = self.alloc_block();
        self.block[0] = block;
        self.edge[block] = 0;
    }

    /// Halve every leaf weight over `begin..end` and rebuild the tree.
    fn reconstruct(&mut self, begin: usize, end: usize) {
        // Gather the leaves at the front of the range, releasing all blocks.
        let mut j = begin;
        for i in begin..end {
            let k = self.child[i];
            if k < 0 {
                self.freq[j] = self.freq[i].div_ceil(2);
                self.child[j] = k;
                j += 1;
            }
            let b = self.block[i];
            if self.edge[b] == i {
                self.release_block(b);
            }
        }

        // Re-pair from the bottom up, keeping frequencies sorted.
        let lower = begin as isize;
        let mut j = j as isize - 1;
        let mut l = end as isize - 2;
        let mut i = end as isize - 1;
        while i >= lower {
            while i >= l {
                self.freq[i as usize] = self.freq[j as usize];
                self.child[i as usize] = self.child[j as usize];
                i -= 1;
                j -= 1;
            }
            let f = self.freq[l as usize] + self.freq[(l + 1) as usize];
            let mut k = begin;
            while f < self.freq[k] {
                k += 1;
            }
            while j >= k as isize {
                self.freq[i as usize] = self.freq[j as usize];
                self.child[i as usize] = self.child[j as usize];
                i -= 1;
                j -= 1;
            }
            self.freq[i as usize] = f;
            self.child[i as usize] = (l + 1) as i32;
            i -= 1;
            l -= 2;
        }

        // Restore parent links, leaf map and blocks.
        let mut f = 0;
        let mut b = 0;
        for i in begin..end {
            self.relink(self.child[i], i);
            let g = self.freq[i];
            if i > begin && g == f {
                self.block[i] = b;
            } else {
                b = self.alloc_block();
                self.block[i] = b;
                self.edge[b] = i;
                f = g;
            }
        }
    }

    /// Point the children of `node` (or its symbol) back at it.
    fn relink(&mut self, child: i32, node: usize) {
        if child < 0 {
            self.leaf[!child as usize] = node;
        } else {
            let c = child as usize;
            self.parent[c] = node;
            self.parent[c - 1] = node;
        }
    }

    /// Give `p` its own block unless it now matches its left neighbour.
    fn join_or_split(&mut self, p: usize) {
        if self.freq[p] == self.freq[p - 1] {
            self.block[p] = self.block[p - 1];
        } else {
            let block = self.alloc_block();
            self.block[p] = block;
            self.edge[block] = p;
        }
    }

    /// Increment node `p`, swapping it to the front of its block first.
    ///
    /// Returns the parent of the incremented node.
    fn swap_inc(&mut self, p: usize) -> usize {
        let b = self.block[p];
        let q = self.edge[b];
        let mut p = p;
        if q != p {
            let r = self.child[p];
            let s = self.child[q];
            self.child[p] = s;
            self.child[q] = r;
            self.relink(r, q);
            self.relink(s, p);
            p = q;
            self.edge[b] += 1;
            self.freq[p] += 1;
            self.join_or_split(p);
        } else if b == self.block[p + 1] {
            self.edge[b] += 1;
            self.freq[p] += 1;
            self.join_or_split(p);
        } else {
            self.freq[p] += 1;
            if self.freq[p] == self.freq[p - 1] {
                self.release_block(b);
                self.block[p] = self.block[p - 1];
            }
        }
        self.parent[p]
    }

    /// Walk from the root to a leaf, one window bit per level.
    fn walk<R: Read>(&self, reader: &mut BitReader<R>) -> Result<u16> {
        let mut c = self.child[0];
        let mut window = reader.window();
        let mut count = 0u8;
        while c > 0 {
            c = if window & 0x8000 != 0 {
                self.child[c as usize - 1]
            } else {
                self.child[c as usize]
            };
            window <<= 1;
            count += 1;
            if count == 16 {
                reader.fill(16)?;
                window = reader.window();
                count = 0;
            }
        }
        reader.fill(count)?;
        Ok(!c as u16)
    }
}

/// Adaptive tree over the literal/length alphabet.
#[derive(Debug, Clone)]
pub struct CodeTree {
    tree: AdaptiveTree,
    symbols: usize,
    rebuilds: u64,
}

impl CodeTree {
    /// Create a balanced tree over `symbols` symbols, all with weight 1.
    pub fn new(symbols: usize) -> Self {
        let mut tree = AdaptiveTree::with_capacity(2 * symbols, symbols);
        tree.init_balanced(symbols);
        Self {
            tree,
            symbols,
            rebuilds: 0,
        }
    }

    /// Alphabet size.
    pub fn symbols(&self) -> usize {
        self.symbols
    }

    /// How many times weights have been halved.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// The underlying arena.
    pub fn tree(&self) -> &AdaptiveTree {
        &self.tree
    }

    /// Decode one symbol and update its weight.
    pub fn decode<R: Read>(&mut self, reader: &mut BitReader<R>) -> Result<u16> {
        let symbol = self.tree.walk(reader)?;
        self.update(usize::from(symbol));
        Ok(symbol)
    }

    /// Add one to the weight of `symbol`, keeping the sibling property.
    pub fn update(&mut self, symbol: usize) {
        if self.tree.freq[0] == MAX_FREQ {
            self.tree.reconstruct(0, 2 * self.symbols - 1);
            self.rebuilds += 1;
            trace!(rebuilds = self.rebuilds, "code tree weights halved");
        }
        self.tree.freq[0] += 1;
        let mut q = self.tree.leaf[symbol];
        loop {
            q = self.tree.swap_inc(q);
            if q == 0 {
                break;
            }
        }
    }
}

/// Adaptive position tree whose alphabet grows with the output (lh2).
///
/// Starts with the single position symbol 0. Each further 64 bytes of
/// output enable one more symbol until the dictionary is covered.
#[derive(Debug, Clone)]
pub struct PositionTree {
    tree: AdaptiveTree,
    /// Last node added; always a leaf with the lowest weight.
    most: usize,
    /// Updates since the last rebuild.
    total: u32,
    /// Output size after which the next symbol is added; `None` once the
    /// alphabet covers the dictionary.
    next_count: Option<u64>,
    /// Output size at which growth stops.
    limit: u64,
    rebuilds: u64,
}

impl PositionTree {
    /// Number of position symbols at full size.
    pub const SYMBOLS: usize = 128;

    /// Bytes of output per additional position symbol.
    pub const GROWTH_STEP: u64 = 64;

    /// Create a position tree for a `2^dictionary_bits` window.
    pub fn new(dictionary_bits: u8) -> Self {
        let mut tree = AdaptiveTree::with_capacity(2 * Self::SYMBOLS, Self::SYMBOLS);
        tree.init_single();
        Self {
            tree,
            most: 0,
            total: 0,
            next_count: Some(Self::GROWTH_STEP),
            limit: 1 << dictionary_bits,
            rebuilds: 0,
        }
    }

    /// Number of symbols currently in the tree.
    pub fn active_symbols(&self) -> usize {
        self.most / 2 + 1
    }

    /// How many times weights have been halved.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    /// The underlying arena.
    pub fn tree(&self) -> &AdaptiveTree {
        &self.tree
    }

    /// Node with the highest index in use.
    pub fn last_node(&self) -> usize {
        self.most
    }

    /// Decode one position symbol after `decoded` bytes of output.
    pub fn decode<R: Read>(&mut self, reader: &mut BitReader<R>, decoded: u64) -> Result<u16> {
        self.grow(decoded);
        let symbol = self.tree.walk(reader)?;
        self.update(usize::from(symbol));
        Ok(symbol)
    }

    /// Add every symbol that `decoded` bytes of output have enabled.
    pub fn grow(&mut self, decoded: u64) {
        while let Some(next) = self.next_count {
            if decoded <= next {
                break;
            }
            self.add_leaf((next / Self::GROWTH_STEP) as usize);
            let next = next + Self::GROWTH_STEP;
            self.next_count = (next < self.limit).then_some(next);
            if self.next_count.is_none() {
                trace!(symbols = self.active_symbols(), "position alphabet complete");
            }
        }
    }

    /// Add one to the weight of `symbol`.
    pub fn update(&mut self, symbol: usize) {
        if self.total == MAX_FREQ {
            self.tree.reconstruct(0, self.most + 1);
            self.total = self.tree.freq[0];
            self.tree.freq[0] = ROOT_FREQ;
            self.rebuilds += 1;
            trace!(rebuilds = self.rebuilds, "position tree weights halved");
        }
        let mut q = self.tree.leaf[symbol];
        while q != 0 {
            q = self.tree.swap_inc(q);
        }
        self.total += 1;
    }

    /// Split the last leaf into itself plus a new zero-weight leaf for `symbol`.
    fn add_leaf(&mut self, symbol: usize) {
        let t = &mut self.tree;
        let most = self.most;
        let r = most + 1;
        let q = r + 1;

        let moved = t.child[most];
        t.child[r] = moved;
        if moved < 0 {
            t.leaf[!moved as usize] = r;
        }
        t.child[q] = !(symbol as i32);
        t.child[most] = q as i32;
        t.freq[r] = t.freq[most];
        t.freq[q] = 0;
        t.block[r] = t.block[most];
        if most == 0 {
            t.freq[0] = ROOT_FREQ;
            let root_block = t.block[0];
            t.edge[root_block] += 1;
        }
        t.parent[r] = most;
        t.parent[q] = most;

        let block = t.alloc_block();
        t.block[q] = block;
        t.edge[block] = q;
        t.leaf[symbol] = q;
        self.most = q;

        self.update(symbol);
    }
}
