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

//! The full symbolic route domain.
//!
//! Tracks route sets as BDDs over all route variables: destination router,
//! protocol, prefix, length and communities. The most precise domain, and the
//! baseline the cheaper domains are an abstraction of.

use crate::bdd::{Bdd, Ref};
use crate::net::{Prefix, Protocol, RouterId};
use std::collections::BTreeSet;
use std::rc::Rc;

use super::domain::AbstractDomain;
use super::transfer::{apply_updates, EdgeTransformer};
use super::vars::RouteVars;

/// Route sets as predicates over the full route variable space.
#[derive(Debug)]
pub struct RouteDomain {
    bdd: Rc<Bdd>,
    vars: Rc<RouteVars>,
}

impl RouteDomain {
    /// Create the domain over a shared manager and variable space.
    pub fn new(bdd: Rc<Bdd>, vars: Rc<RouteVars>) -> Self {
        Self { bdd, vars }
    }
}

impl AbstractDomain for RouteDomain {
    type Value = Ref;

    fn bot(&self) -> Ref {
        self.bdd.zero()
    }

    fn value(&self, router: RouterId, proto: Protocol, prefixes: &BTreeSet<Prefix>) -> Ref {
        if prefixes.is_empty() {
            return self.bdd.zero();
        }
        let dst = self.vars.dst_router().value(&self.bdd, &router);
        let tag = self.vars.protocol().value(&self.bdd, &proto);
        let nets = self.bdd.or_all(prefixes.iter().map(|p| self.vars.prefix_to_bdd(p)));
        self.bdd.and(self.bdd.and(dst, tag), nets)
    }

    fn transform(&self, v: &Ref, t: &EdgeTransformer<'_>) -> Ref {
        let allowed = self.bdd.and(*v, t.func.filter);
        apply_updates(&self.bdd, &self.vars, allowed, &t.func.updates)
    }

    fn merge(&self, x: &Ref, y: &Ref) -> Ref {
        self.bdd.or(*x, *y)
    }

    fn to_bdd(&self, v: &Ref) -> Ref {
        *v
    }
}
