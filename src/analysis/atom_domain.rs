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

//! The atomized route domain.
//!
//! Represents a route set as the set of atoms of a precomputed
//! atomic-predicate partition. Transform and merge become pure bit
//! arithmetic; only the final projection back to a BDD touches the manager
//! again. The partition must be closed under every transfer function handed
//! to [`AtomDomain::transform`], which
//! [`atomic_predicates_closed`](super::atoms::atomic_predicates_closed)
//! guarantees for the registered policies.

use crate::bdd::{Bdd, Ref};
use crate::net::{Prefix, Protocol, RouterId};
use std::collections::BTreeSet;
use std::rc::Rc;

use super::atoms::{AtomBits, AtomicPredicates};
use super::domain::AbstractDomain;
use super::transfer::EdgeTransformer;

/// Route sets as bitsets over partition atoms.
#[derive(Debug)]
pub struct AtomDomain {
    bdd: Rc<Bdd>,
    partition: AtomicPredicates,
}

impl AtomDomain {
    /// Create the domain over a closed partition.
    pub fn new(bdd: Rc<Bdd>, partition: AtomicPredicates) -> Self {
        Self { bdd, partition }
    }

    /// The partition the domain operates on.
    pub fn partition(&self) -> &AtomicPredicates {
        &self.partition
    }
}

impl AbstractDomain for AtomDomain {
    type Value = AtomBits;

    fn bot(&self) -> AtomBits {
        AtomBits::new(self.partition.atoms.len())
    }

    /// Coarse origination: every atom. The partition is built from the
    /// predicates the analysis cares about, so anything outside them is
    /// indistinguishable anyway; refining origination would only matter for
    /// queries the partition cannot answer.
    // TODO: restrict to the atoms intersecting the originated prefixes once
    // the partition also tracks the origination predicates.
    fn value(&self, _router: RouterId, _proto: Protocol, _prefixes: &BTreeSet<Prefix>) -> AtomBits {
        AtomBits::all(self.partition.atoms.len())
    }

    fn transform(&self, v: &AtomBits, t: &EdgeTransformer<'_>) -> AtomBits {
        let mut out = self.bot();
        for i in v.ones() {
            out.union_with(self.partition.image_of(t.func.id, i));
        }
        out
    }

    fn merge(&self, x: &AtomBits, y: &AtomBits) -> AtomBits {
        let mut out = x.clone();
        out.union_with(y);
        out
    }

    fn to_bdd(&self, v: &AtomBits) -> Ref {
        self.bdd.or_all(v.ones().map(|i| self.partition.atoms[i]))
    }
}
