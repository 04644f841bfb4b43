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

//! The symbolic route variable space.
//!
//! [`RouteVars`] owns the BDD variable allocation for one analysis run: the
//! destination and source router (finite domains), the protocol tag, the
//! prefix and its length, and the community bits, together with the "primed"
//! partner variables used for field updates and relational composition.
//! Predicates that are rebuilt constantly (length equality, per-length
//! quantification sets) are cached here; the caches belong to the run and are
//! never shared between runs.

use crate::bdd::{Bdd, Ref, VarSet};
use crate::net::{Prefix, Protocol, RouterId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;

/// A bijection between a finite set of values and the indices `0..size`.
///
/// Indices are assigned in first-seen order; duplicates in the input collapse
/// onto the first occurrence. Lookup of an unknown value is a programming
/// error and panics.
#[derive(Debug, Clone)]
pub struct FiniteIndexMap<T> {
    values: Vec<T>,
    index: HashMap<T, usize>,
}

impl<T: Clone + Eq + Hash> FiniteIndexMap<T> {
    /// Build the map from an iterator of values.
    pub fn new(values: impl IntoIterator<Item = T>) -> Self {
        let mut vs = Vec::new();
        let mut index = HashMap::new();
        for v in values {
            if !index.contains_key(&v) {
                index.insert(v.clone(), vs.len());
                vs.push(v);
            }
        }
        Self { values: vs, index }
    }

    /// The index of `value`. Panics if the value was not part of the input.
    pub fn index(&self, value: &T) -> usize {
        match self.index.get(value) {
            Some(&i) => i,
            None => panic!("value not part of this finite domain"),
        }
    }

    /// The value at `index`. Panics if the index is out of range.
    pub fn value(&self, index: usize) -> &T {
        &self.values[index]
    }

    /// Number of distinct values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over the values in index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }
}

/// A finite set of values encoded into a fixed-width bit vector.
#[derive(Debug, Clone)]
pub struct FiniteDomain<T> {
    map: FiniteIndexMap<T>,
    bits: Vec<u32>,
}

fn bits_for(n: usize) -> usize {
    if n <= 1 {
        0
    } else {
        (usize::BITS - (n - 1).leading_zeros()) as usize
    }
}

impl<T: Clone + Eq + Hash> FiniteDomain<T> {
    fn new(values: impl IntoIterator<Item = T>, alloc: &mut impl FnMut(usize) -> Vec<u32>) -> Self {
        let map = FiniteIndexMap::new(values);
        let bits = alloc(bits_for(map.len()));
        Self { map, bits }
    }

    /// The predicate "this field equals `value`".
    pub fn value(&self, bdd: &Bdd, value: &T) -> Ref {
        let idx = self.map.index(value);
        bdd.and_all(
            self.bits.iter().enumerate().map(|(j, &b)| bdd.literal(b, (idx >> j) & 1 == 1)),
        )
    }

    /// Decode a value from a total assignment, or `None` if the encoded index
    /// falls outside the domain.
    pub fn decode(&self, get: impl Fn(u32) -> bool) -> Option<&T> {
        let mut idx = 0usize;
        for (j, &b) in self.bits.iter().enumerate() {
            if get(b) {
                idx |= 1 << j;
            }
        }
        if idx < self.map.len() {
            Some(self.map.value(idx))
        } else {
            None
        }
    }

    /// The bit variables of this field.
    pub fn var_set(&self) -> VarSet {
        VarSet::new(self.bits.iter().copied())
    }

    /// The index map underlying the encoding.
    pub fn index_map(&self) -> &FiniteIndexMap<T> {
        &self.map
    }
}

const LEN_BITS: usize = 6;

/// The BDD variables of one analysis run.
#[derive(Debug)]
pub struct RouteVars {
    bdd: Rc<Bdd>,
    src_router: FiniteDomain<RouterId>,
    temp_router: Vec<u32>,
    dst_router: FiniteDomain<RouterId>,
    protocol: FiniteDomain<Protocol>,
    prefix_len: Vec<u32>,
    communities: Vec<u32>,
    community_temps: Vec<u32>,
    prefix: Vec<u32>,
    length_cache: RefCell<HashMap<u8, Ref>>,
    dst_bits_cache: RefCell<HashMap<u8, VarSet>>,
}

impl RouteVars {
    /// Allocate the variable space for the given routers and community count.
    pub fn new(bdd: Rc<Bdd>, routers: &[RouterId], num_communities: usize) -> Self {
        let mut next: u32 = 1;
        let mut alloc = |n: usize| -> Vec<u32> {
            let vs: Vec<u32> = (0..n as u32).map(|i| next + i).collect();
            next += n as u32;
            vs
        };

        let src_router = FiniteDomain::new(routers.iter().copied(), &mut alloc);
        let temp_router = alloc(src_router.bits.len());
        let dst_router = FiniteDomain::new(routers.iter().copied(), &mut alloc);
        let protocol = FiniteDomain::new(Protocol::ALL, &mut alloc);
        let prefix_len = alloc(LEN_BITS);

        // Interleave each community bit with its primed partner.
        let mut communities = Vec::with_capacity(num_communities);
        let mut community_temps = Vec::with_capacity(num_communities);
        for _ in 0..num_communities {
            communities.push(alloc(1)[0]);
            community_temps.push(alloc(1)[0]);
        }

        let prefix = alloc(32);

        Self {
            bdd,
            src_router,
            temp_router,
            dst_router,
            protocol,
            prefix_len,
            communities,
            community_temps,
            prefix,
            length_cache: RefCell::new(HashMap::new()),
            dst_bits_cache: RefCell::new(HashMap::new()),
        }
    }

    /// The shared manager.
    pub fn bdd(&self) -> &Rc<Bdd> {
        &self.bdd
    }

    /// The destination-router finite domain.
    pub fn dst_router(&self) -> &FiniteDomain<RouterId> {
        &self.dst_router
    }

    /// The source-router finite domain.
    pub fn src_router(&self) -> &FiniteDomain<RouterId> {
        &self.src_router
    }

    /// The protocol-tag finite domain.
    pub fn protocol(&self) -> &FiniteDomain<Protocol> {
        &self.protocol
    }

    /// Number of community bits.
    pub fn num_communities(&self) -> usize {
        self.communities.len()
    }

    /// The variable of community bit `i`.
    pub fn community_var(&self, i: usize) -> u32 {
        self.communities[i]
    }

    /// The primed partner of community bit `i`.
    pub fn community_temp_var(&self, i: usize) -> u32 {
        self.community_temps[i]
    }

    /// The literal of community bit `i`.
    pub fn community(&self, i: usize) -> Ref {
        self.bdd.mk_var(self.communities[i])
    }

    /// The prefix-length bit variables.
    pub fn len_vars(&self) -> VarSet {
        VarSet::new(self.prefix_len.iter().copied())
    }

    /// The community and protocol-tag bits, quantified away when a route
    /// predicate is projected onto pure address space.
    pub fn transient_vars(&self) -> VarSet {
        self.protocol.var_set().union(&VarSet::new(self.communities.iter().copied()))
    }

    /// The destination-router bits.
    pub fn dst_router_vars(&self) -> VarSet {
        self.dst_router.var_set()
    }

    /// The temp-router bits used during relational composition.
    pub fn temp_router_vars(&self) -> VarSet {
        VarSet::new(self.temp_router.iter().copied())
    }

    /// Pairs renaming the source-router bits onto the temp-router bits.
    pub fn src_to_temp_pairs(&self) -> Vec<(u32, u32)> {
        self.src_router.bits.iter().copied().zip(self.temp_router.iter().copied()).collect()
    }

    /// Pairs renaming the destination-router bits onto the temp-router bits.
    pub fn dst_to_temp_pairs(&self) -> Vec<(u32, u32)> {
        self.dst_router.bits.iter().copied().zip(self.temp_router.iter().copied()).collect()
    }

    /// The predicate "prefix length equals `len`". Cached per length, since it
    /// is rebuilt for every projection otherwise.
    pub fn make_length(&self, len: u8) -> Ref {
        debug_assert!(len <= 32);
        if let Some(&r) = self.length_cache.borrow().get(&len) {
            return r;
        }
        let r = self.bdd.and_all(
            self.prefix_len
                .iter()
                .enumerate()
                .map(|(j, &b)| self.bdd.literal(b, (len >> j) & 1 == 1)),
        );
        self.length_cache.borrow_mut().insert(len, r);
        r
    }

    /// The address bits irrelevant below prefix length `len`: positions
    /// `len..32`. Cached per length.
    pub fn remove_bits(&self, len: u8) -> VarSet {
        debug_assert!(len <= 32);
        if let Some(s) = self.dst_bits_cache.borrow().get(&len) {
            return s.clone();
        }
        let s = VarSet::new(self.prefix[len as usize..].iter().copied());
        self.dst_bits_cache.borrow_mut().insert(len, s.clone());
        s
    }

    /// The address bits constrained by `prefix`, without the length tag: the
    /// set of destination addresses matched by the prefix.
    pub fn address_space(&self, prefix: &Prefix) -> Ref {
        self.bdd.and_all(
            (0..prefix.len).map(|i| self.bdd.literal(self.prefix[i as usize], prefix.bit(i))),
        )
    }

    /// The exact-prefix-match predicate: address bits up to the prefix length
    /// conjoined with the length-equality tag.
    pub fn prefix_to_bdd(&self, prefix: &Prefix) -> Ref {
        self.bdd.and(self.make_length(prefix.len), self.address_space(prefix))
    }

    /// The prefix bit variable at position `i` (0 = most significant).
    pub fn prefix_var(&self, i: u8) -> u32 {
        self.prefix[i as usize]
    }
}
