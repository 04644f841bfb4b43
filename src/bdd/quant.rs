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

//! Existential quantification, variable renaming and support computation.

use super::{Bdd, Ref, VarSet};
use std::collections::{HashMap, HashSet};

impl Bdd {
    /// Existentially quantify all variables of `vars` out of `f`.
    pub fn exists(&self, f: Ref, vars: &VarSet) -> Ref {
        if vars.is_empty() {
            return f;
        }
        let mut cache = HashMap::new();
        self.exists_rec(f, vars, &mut cache)
    }

    fn exists_rec(&self, f: Ref, vars: &VarSet, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        let v = self.var_of(f);
        // Every variable below the root is larger; nothing left to quantify.
        if v > vars.max().unwrap() {
            return f;
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }
        let low = self.exists_rec(self.low_node(f), vars, cache);
        let high = self.exists_rec(self.high_node(f), vars, cache);
        let res = if vars.contains(v) { self.or(low, high) } else { self.mk_node(v, low, high) };
        cache.insert(f, res);
        res
    }

    /// The set of variables `f` depends on.
    pub fn support(&self, f: Ref) -> VarSet {
        let mut vars = HashSet::new();
        let mut seen = HashSet::new();
        let mut stack = vec![f];
        while let Some(x) = stack.pop() {
            if self.is_terminal(x) || !seen.insert(x.index()) {
                continue;
            }
            vars.insert(self.var_of(x));
            stack.push(self.low_node(x));
            stack.push(self.high_node(x));
        }
        VarSet::new(vars)
    }
}

/// A variable renaming, applied as one substitution step.
///
/// Built locally, configured, applied, and discarded; never shared between
/// calls. Each pair `(from, to)` replaces `from` by `to`; the target variable
/// must not occur in the support of the operand and the pairs must be
/// pairwise disjoint.
#[derive(Debug, Default)]
pub struct Renaming {
    pairs: Vec<(u32, u32)>,
}

impl Renaming {
    /// Create an empty renaming.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the pair `from -> to`.
    pub fn add(&mut self, from: u32, to: u32) {
        debug_assert!(self.pairs.iter().all(|&(f, t)| f != from && t != to));
        self.pairs.push((from, to));
    }

    /// True if no pairs were added.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Apply the renaming to `f`.
    ///
    /// Each pair is realized by conjoining `from ⟺ to` and quantifying `from`
    /// away, which is order-insensitive for disjoint pairs and correct for any
    /// variable ordering.
    pub fn apply(&self, bdd: &Bdd, f: Ref) -> Ref {
        let mut res = f;
        for &(from, to) in &self.pairs {
            let eq = bdd.iff(bdd.mk_var(from), bdd.mk_var(to));
            res = bdd.exists(bdd.and(res, eq), &VarSet::new([from]));
        }
        res
    }
}
