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

//! Satisfying-assignment enumeration.

use super::{Bdd, Ref};

impl Bdd {
    /// One satisfying assignment of `f` as `(variable, value)` pairs, or
    /// `None` if `f` is unsatisfiable. Variables not mentioned are free.
    pub fn one_sat(&self, f: Ref) -> Option<Vec<(u32, bool)>> {
        if self.is_zero(f) {
            return None;
        }
        let mut path = Vec::new();
        let mut cur = f;
        while !self.is_one(cur) {
            let v = self.var_of(cur);
            let high = self.high_node(cur);
            if !self.is_zero(high) {
                path.push((v, true));
                cur = high;
            } else {
                path.push((v, false));
                cur = self.low_node(cur);
            }
        }
        Some(path)
    }

    /// All satisfying cubes of `f`. Each cube lists the decided variables in
    /// root-to-leaf order; variables not mentioned are don't-cares. Intended
    /// for reporting on small results, the number of cubes can be exponential.
    pub fn all_sat(&self, f: Ref) -> Vec<Vec<(u32, bool)>> {
        let mut out = Vec::new();
        let mut path = Vec::new();
        self.all_sat_rec(f, &mut path, &mut out);
        out
    }

    fn all_sat_rec(&self, f: Ref, path: &mut Vec<(u32, bool)>, out: &mut Vec<Vec<(u32, bool)>>) {
        if self.is_zero(f) {
            return;
        }
        if self.is_one(f) {
            out.push(path.clone());
            return;
        }
        let v = self.var_of(f);
        path.push((v, false));
        self.all_sat_rec(self.low_node(f), path, out);
        path.pop();
        path.push((v, true));
        self.all_sat_rec(self.high_node(f), path, out);
        path.pop();
    }
}
