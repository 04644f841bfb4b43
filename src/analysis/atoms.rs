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

//! Atomic predicate partitioning.
//!
//! Given a set of predicates, the partition splits the route space into the
//! coarsest disjoint regions (atoms) such that every input predicate is a
//! union of atoms. The closed variant additionally refines under transformer
//! images, so applying a registered transfer function to an atom again yields
//! a union of atoms. Sets of atoms are represented as a fixed-width bitset,
//! which turns the expensive BDD operations of an analysis into cheap bit
//! arithmetic.

use crate::bdd::{Bdd, Ref};
use std::collections::HashMap;

use super::transfer::{apply_updates, TransferFunction};
use super::vars::RouteVars;

/// A fixed-length set of atom indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomBits {
    len: usize,
    words: Vec<u64>,
}

impl AtomBits {
    /// The empty set over `len` atoms.
    pub fn new(len: usize) -> Self {
        Self { len, words: vec![0; (len + 63) / 64] }
    }

    /// The full set over `len` atoms.
    pub fn all(len: usize) -> Self {
        let mut s = Self { len, words: vec![u64::MAX; (len + 63) / 64] };
        // Mask the tail so that equal sets compare equal.
        if len % 64 != 0 {
            if let Some(last) = s.words.last_mut() {
                *last &= (1u64 << (len % 64)) - 1;
            }
        }
        s
    }

    /// Number of atoms the set ranges over.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no atom is in the set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Insert atom `i`.
    pub fn set(&mut self, i: usize) {
        debug_assert!(i < self.len);
        self.words[i / 64] |= 1 << (i % 64);
    }

    /// True if atom `i` is in the set.
    pub fn get(&self, i: usize) -> bool {
        debug_assert!(i < self.len);
        self.words[i / 64] >> (i % 64) & 1 == 1
    }

    /// In-place union with `other`, which must range over the same atoms.
    pub fn union_with(&mut self, other: &AtomBits) {
        debug_assert_eq!(self.len, other.len);
        for (w, o) in self.words.iter_mut().zip(other.words.iter()) {
            *w |= o;
        }
    }

    /// Number of atoms in the set.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Iterate over the contained atom indices in ascending order.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.get(i))
    }
}

/// Split each region of `partition` along `p`. Returns `None` if no region
/// was split, so callers can keep the old partition untouched.
fn refine_with(bdd: &Bdd, partition: &[Ref], p: Ref) -> Option<Vec<Ref>> {
    let mut next = Vec::with_capacity(partition.len());
    let mut changed = false;
    for &region in partition {
        let inside = bdd.and(region, p);
        let outside = bdd.diff(region, p);
        if !bdd.is_zero(inside) && !bdd.is_zero(outside) {
            changed = true;
            next.push(inside);
            next.push(outside);
        } else {
            next.push(region);
        }
    }
    if changed {
        Some(next)
    } else {
        None
    }
}

/// Partition the full space into atoms of the given predicates.
///
/// Starts from the single region `true` and refines with every predicate;
/// empty intersections are discarded as they arise. The result is independent
/// of the order of `preds` up to reordering of the atoms, and constants among
/// the predicates are no-ops.
pub fn atomic_predicates(bdd: &Bdd, preds: &[Ref]) -> Vec<Ref> {
    let mut partition = vec![bdd.one()];
    for &p in preds {
        if let Some(next) = refine_with(bdd, &partition, p) {
            partition = next;
        }
    }
    partition
}

fn transfer_image(bdd: &Bdd, vars: &RouteVars, x: Ref, f: &TransferFunction) -> Ref {
    apply_updates(bdd, vars, bdd.and(x, f.filter), &f.updates)
}

/// Cover of `x`: the atoms with a non-empty intersection with `x`.
fn cover(bdd: &Bdd, atoms: &[Ref], x: Ref) -> AtomBits {
    let mut bits = AtomBits::new(atoms.len());
    for (i, &a) in atoms.iter().enumerate() {
        if !bdd.is_zero(bdd.and(a, x)) {
            bits.set(i);
        }
    }
    bits
}

/// An atomic-predicate partition closed under a set of transfer functions.
#[derive(Debug)]
pub struct AtomicPredicates {
    /// The disjoint atoms; their union is the full space.
    pub atoms: Vec<Ref>,
    /// For each input predicate, the atoms covering it.
    pub covers: HashMap<Ref, AtomBits>,
    /// For each transfer function id, the image of each atom as a set of
    /// atoms.
    pub images: HashMap<usize, Vec<AtomBits>>,
}

impl AtomicPredicates {
    /// The atoms covering `pred`. Panics if `pred` was not an input predicate
    /// of the partition.
    pub fn cover_of(&self, pred: Ref) -> &AtomBits {
        match self.covers.get(&pred) {
            Some(bits) => bits,
            None => panic!("predicate is not part of this partition"),
        }
    }

    /// The image of atom `i` under the function with the given id. Panics if
    /// the function was not part of the partition.
    pub fn image_of(&self, func_id: usize, i: usize) -> &AtomBits {
        match self.images.get(&func_id) {
            Some(imgs) => &imgs[i],
            None => panic!("transfer function is not part of this partition"),
        }
    }
}

/// Partition the space into atoms of `preds`, closed under the images of
/// `funcs`.
///
/// After the base partition, the images of the current atoms under every
/// function are used as additional refinement predicates until the partition
/// is stable. Termination follows from the refinement being monotone within a
/// finite space.
pub fn atomic_predicates_closed(
    bdd: &Bdd,
    vars: &RouteVars,
    preds: &[Ref],
    funcs: &[TransferFunction],
) -> AtomicPredicates {
    let mut atoms = atomic_predicates(bdd, preds);
    loop {
        let mut refined = atoms.clone();
        let mut changed = false;
        for f in funcs {
            for &a in &atoms {
                let img = transfer_image(bdd, vars, a, f);
                if bdd.is_zero(img) {
                    continue;
                }
                if let Some(next) = refine_with(bdd, &refined, img) {
                    refined = next;
                    changed = true;
                }
            }
        }
        if !changed {
            break;
        }
        atoms = refined;
    }

    let covers = preds.iter().map(|&p| (p, cover(bdd, &atoms, p))).collect();
    let images = funcs
        .iter()
        .map(|f| {
            let imgs = atoms
                .iter()
                .map(|&a| cover(bdd, &atoms, transfer_image(bdd, vars, a, f)))
                .collect();
            (f.id, imgs)
        })
        .collect();

    AtomicPredicates { atoms, covers, images }
}
