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

//! The abstract domain interface of the fixed-point solver.

use crate::bdd::Ref;
use crate::net::{Prefix, Protocol, RouterId};
use std::collections::BTreeSet;
use std::fmt;

use super::transfer::EdgeTransformer;

/// An abstract domain over route sets.
///
/// The solver is generic over the representation of a route set; it only
/// needs bottom, origination, policy application, merge, and a projection
/// back to a BDD for the headerspace computation. Implementations must form a
/// join-semilattice under [`merge`](AbstractDomain::merge) with
/// [`bot`](AbstractDomain::bot) as identity, otherwise the fixed point may
/// not exist.
pub trait AbstractDomain {
    /// The representation of a set of routes.
    type Value: Clone + PartialEq + fmt::Debug;

    /// The empty route set.
    fn bot(&self) -> Self::Value;

    /// The routes originated by `router` into `proto` for the given prefixes.
    fn value(&self, router: RouterId, proto: Protocol, prefixes: &BTreeSet<Prefix>) -> Self::Value;

    /// Apply an edge policy to a route set.
    fn transform(&self, v: &Self::Value, t: &EdgeTransformer<'_>) -> Self::Value;

    /// Join of two route sets.
    fn merge(&self, x: &Self::Value, y: &Self::Value) -> Self::Value;

    /// Project a route set back to a predicate over route variables.
    fn to_bdd(&self, v: &Self::Value) -> Ref;
}

/// The per-protocol and combined route sets of one router.
#[derive(Debug, Clone, PartialEq)]
pub struct AbstractRib<T> {
    /// Routes learned via BGP.
    pub bgp: T,
    /// Routes learned via OSPF.
    pub ospf: T,
    /// Statically configured routes.
    pub stat: T,
    /// Directly connected routes.
    pub conn: T,
    /// The combined main RIB.
    pub rib: T,
}

impl<T> AbstractRib<T> {
    /// Access the per-protocol route set.
    pub fn of_proto(&self, proto: Protocol) -> &T {
        match proto {
            Protocol::Bgp => &self.bgp,
            Protocol::Ospf => &self.ospf,
            Protocol::Static => &self.stat,
            Protocol::Connected => &self.conn,
        }
    }
}

/// The analysis result for one router: its RIB together with the headerspace
/// that can reach the router.
#[derive(Debug, Clone, PartialEq)]
pub struct AbstractFib<T> {
    /// The per-protocol and main route sets.
    pub rib: AbstractRib<T>,
    /// Predicate over address bits: the packets that reach this router from
    /// some origin.
    pub headerspace: Ref,
}
