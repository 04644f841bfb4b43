// SymRib: Symbolic Network Reachability Analysis
// Copyright (C) 2026  The SymRib developers
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

//! # Decision Diagram Engine
//!
//! A compact, manager-centric binary decision diagram (BDD) implementation. All
//! nodes live inside a single [`Bdd`] manager and are hash-consed, so two
//! structurally equal functions are represented by the same [`Ref`] and compare
//! equal in `O(1)`. Negation is a complement edge (the sign of the handle), so
//! `NOT` is free.
//!
//! The manager is single-threaded by design (interior mutability via
//! `RefCell`); create one manager per analysis run and keep all handles local
//! to it. Handles from different managers must never be mixed.
//!
//! Variables are `u32` indices starting at 1 (0 is reserved for the terminal).
//! A smaller index is closer to the root of the diagram.

mod quant;
mod sat;

pub use quant::Renaming;

use log::trace;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::ops::Neg;

/// A handle to a node in a [`Bdd`] manager.
///
/// The sign encodes a complement edge: `-f` represents the negation of `f`.
/// Handles of the same manager compare equal if and only if they represent the
/// same boolean function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ref(i32);

impl Ref {
    pub(crate) const fn positive(index: u32) -> Self {
        Ref(index as i32)
    }

    /// The index of the referenced node, ignoring the complement bit.
    pub(crate) const fn index(self) -> usize {
        self.0.unsigned_abs() as usize
    }

    /// True if this handle carries a complement edge.
    pub(crate) const fn is_negated(self) -> bool {
        self.0 < 0
    }
}

impl Neg for Ref {
    type Output = Ref;

    fn neg(self) -> Ref {
        Ref(-self.0)
    }
}

impl fmt::Display for Ref {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", if self.is_negated() { "~" } else { "" }, self.index())
    }
}

/// A sorted set of BDD variable indices, used for existential quantification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VarSet {
    vars: Vec<u32>,
}

impl VarSet {
    /// Build a variable set from any iterator; duplicates collapse.
    pub fn new(vars: impl IntoIterator<Item = u32>) -> Self {
        let mut vars: Vec<u32> = vars.into_iter().collect();
        vars.sort_unstable();
        vars.dedup();
        Self { vars }
    }

    /// True if the set contains no variables.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Number of variables in the set.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// True if `v` is in the set.
    pub fn contains(&self, v: u32) -> bool {
        self.vars.binary_search(&v).is_ok()
    }

    /// The largest variable in the set, if any.
    pub fn max(&self) -> Option<u32> {
        self.vars.last().copied()
    }

    /// Iterate over the variables in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.vars.iter().copied()
    }

    /// The union of two sets.
    pub fn union(&self, other: &VarSet) -> VarSet {
        VarSet::new(self.iter().chain(other.iter()))
    }
}

impl FromIterator<u32> for VarSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        VarSet::new(iter)
    }
}

/// An internal diagram node. `var == 0` marks the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Node {
    var: u32,
    low: Ref,
    high: Ref,
}

/// The decision diagram manager.
///
/// Owns the node table, the hash-consing index and the operation cache. All
/// boolean operations go through the manager.
pub struct Bdd {
    nodes: RefCell<Vec<Node>>,
    index: RefCell<HashMap<Node, u32>>,
    ite_cache: RefCell<HashMap<(Ref, Ref, Ref), Ref>>,
}

impl Default for Bdd {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Bdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bdd").field("nodes", &self.nodes.borrow().len()).finish()
    }
}

impl Bdd {
    /// Create a fresh manager containing only the terminal node.
    pub fn new() -> Self {
        let terminal = Node { var: 0, low: Ref(-1), high: Ref(1) };
        Self {
            // index 0 is a dummy so that handle 0 never occurs
            nodes: RefCell::new(vec![terminal, terminal]),
            index: RefCell::new(HashMap::new()),
            ite_cache: RefCell::new(HashMap::new()),
        }
    }

    /// The constant true function.
    pub fn one(&self) -> Ref {
        Ref(1)
    }

    /// The constant false function.
    pub fn zero(&self) -> Ref {
        Ref(-1)
    }

    /// True if `f` is the constant false function.
    pub fn is_zero(&self, f: Ref) -> bool {
        f == self.zero()
    }

    /// True if `f` is the constant true function.
    pub fn is_one(&self, f: Ref) -> bool {
        f == self.one()
    }

    /// True if `f` is either constant.
    pub fn is_terminal(&self, f: Ref) -> bool {
        f.index() == 1
    }

    /// The decision variable of the root node of `f` (0 for a terminal).
    pub fn var_of(&self, f: Ref) -> u32 {
        self.nodes.borrow()[f.index()].var
    }

    /// The negative cofactor of the root of `f`, complement edge resolved.
    pub fn low_node(&self, f: Ref) -> Ref {
        let low = self.nodes.borrow()[f.index()].low;
        if f.is_negated() {
            -low
        } else {
            low
        }
    }

    /// The positive cofactor of the root of `f`, complement edge resolved.
    pub fn high_node(&self, f: Ref) -> Ref {
        let high = self.nodes.borrow()[f.index()].high;
        if f.is_negated() {
            -high
        } else {
            high
        }
    }

    /// Number of allocated nodes (terminal included).
    pub fn num_nodes(&self) -> usize {
        self.nodes.borrow().len() - 1
    }

    /// Create (or find) the node `(v, low, high)`.
    ///
    /// Maintains the canonical form: the high edge of a stored node is never
    /// complemented, and no node has two equal children.
    pub(crate) fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        debug_assert_ne!(v, 0, "variable 0 is reserved for the terminal");

        if low == high {
            return low;
        }
        // Push the complement bit of the high edge up to the result handle.
        if high.is_negated() {
            return -self.mk_node(v, -low, -high);
        }

        let node = Node { var: v, low, high };
        if let Some(&i) = self.index.borrow().get(&node) {
            return Ref::positive(i);
        }
        let mut nodes = self.nodes.borrow_mut();
        let i = nodes.len() as u32;
        nodes.push(node);
        self.index.borrow_mut().insert(node, i);
        Ref::positive(i)
    }

    /// The function of a single variable `v` (1-indexed).
    pub fn mk_var(&self, v: u32) -> Ref {
        self.mk_node(v, self.zero(), self.one())
    }

    /// A literal: `v` when `positive`, otherwise its negation.
    pub fn literal(&self, v: u32, positive: bool) -> Ref {
        let x = self.mk_var(v);
        if positive {
            x
        } else {
            -x
        }
    }

    /// Cofactors of `f` with respect to `v`, where `v` is no deeper than the
    /// root variable of `f`.
    pub(crate) fn cofactors(&self, f: Ref, v: u32) -> (Ref, Ref) {
        if self.is_terminal(f) || v < self.var_of(f) {
            (f, f)
        } else {
            debug_assert_eq!(v, self.var_of(f));
            (self.low_node(f), self.high_node(f))
        }
    }

    /// If-then-else: `(f ∧ g) ∨ (¬f ∧ h)`. All binary operations reduce to it.
    pub fn ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        // Terminal cases.
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }

        // Normalize so that f and g are positive; the cache then sees each
        // equivalence class of calls only once.
        let (mut f, mut g, mut h) = (f, g, h);
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }
        let negate = g.is_negated();
        if negate {
            g = -g;
            h = -h;
        }

        let key = (f, g, h);
        if let Some(&res) = self.ite_cache.borrow().get(&key) {
            return if negate { -res } else { res };
        }

        // Top variable among the non-terminal arguments.
        let mut m = self.var_of(f);
        for x in [g, h] {
            let v = self.var_of(x);
            if v != 0 {
                m = m.min(v);
            }
        }
        debug_assert_ne!(m, 0);

        let (f0, f1) = self.cofactors(f, m);
        let (g0, g1) = self.cofactors(g, m);
        let (h0, h1) = self.cofactors(h, m);

        let low = self.ite(f0, g0, h0);
        let high = self.ite(f1, g1, h1);
        let res = self.mk_node(m, low, high);
        trace!("ite({}, {}, {}) -> {}", f, g, h, res);

        self.ite_cache.borrow_mut().insert(key, res);
        if negate {
            -res
        } else {
            res
        }
    }

    /// Conjunction.
    pub fn and(&self, f: Ref, g: Ref) -> Ref {
        self.ite(f, g, self.zero())
    }

    /// Disjunction.
    pub fn or(&self, f: Ref, g: Ref) -> Ref {
        self.ite(f, self.one(), g)
    }

    /// Negation (free: flips the complement edge).
    pub fn not(&self, f: Ref) -> Ref {
        -f
    }

    /// Exclusive or.
    pub fn xor(&self, f: Ref, g: Ref) -> Ref {
        self.ite(f, -g, g)
    }

    /// Biconditional (`f ⟺ g`).
    pub fn iff(&self, f: Ref, g: Ref) -> Ref {
        self.ite(f, g, -g)
    }

    /// Set difference (`f ∧ ¬g`).
    pub fn diff(&self, f: Ref, g: Ref) -> Ref {
        self.ite(f, -g, self.zero())
    }

    /// Conjunction over an iterator, starting from true.
    pub fn and_all(&self, fs: impl IntoIterator<Item = Ref>) -> Ref {
        fs.into_iter().fold(self.one(), |acc, f| self.and(acc, f))
    }

    /// Disjunction over an iterator, starting from false.
    pub fn or_all(&self, fs: impl IntoIterator<Item = Ref>) -> Ref {
        fs.into_iter().fold(self.zero(), |acc, f| self.or(acc, f))
    }

    /// Evaluate `f` under a total assignment given as a predicate on
    /// variables.
    pub fn eval(&self, f: Ref, assignment: impl Fn(u32) -> bool) -> bool {
        let mut cur = f;
        while !self.is_terminal(cur) {
            let v = self.var_of(cur);
            cur = if assignment(v) { self.high_node(cur) } else { self.low_node(cur) };
        }
        self.is_one(cur)
    }
}
