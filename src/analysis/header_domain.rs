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

//! The header-only route domain.
//!
//! Projects the community and protocol bits out of every result, so route
//! sets only constrain the destination router, prefix and length. Cheaper
//! than the full domain and sound for reachability: a route survives the
//! projection if it passes a filter under some community assignment, and is
//! dropped only if the filter blocks it under every assignment.

use crate::bdd::{Bdd, Ref, VarSet};
use crate::net::{Prefix, Protocol, RouterId};
use std::collections::BTreeSet;
use std::rc::Rc;

use super::domain::AbstractDomain;
use super::transfer::{apply_updates, EdgeTransformer};
use super::vars::RouteVars;

/// Route sets with community and protocol bits abstracted away.
#[derive(Debug)]
pub struct HeaderDomain {
    bdd: Rc<Bdd>,
    vars: Rc<RouteVars>,
    transient: VarSet,
}

impl HeaderDomain {
    /// Create the domain over a shared manager and variable space.
    pub fn new(bdd: Rc<Bdd>, vars: Rc<RouteVars>) -> Self {
        let transient = vars.transient_vars();
        Self { bdd, vars, transient }
    }
}

impl AbstractDomain for HeaderDomain {
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
        self.bdd.exists(self.bdd.and(self.bdd.and(dst, tag), nets), &self.transient)
    }

    /// Split into passed and blocked routes first: a header is kept only if
    /// it passes under some transient assignment and is not blocked under
    /// another one that the projection would otherwise smuggle back in.
    fn transform(&self, v: &Ref, t: &EdgeTransformer<'_>) -> Ref {
        let allowed = self.bdd.and(*v, t.func.filter);
        let blocked = self.bdd.diff(*v, t.func.filter);
        let blocked_proj = self.bdd.exists(blocked, &self.transient);
        let updated = apply_updates(&self.bdd, &self.vars, allowed, &t.func.updates);
        let allowed_proj = self.bdd.exists(updated, &self.transient);
        self.bdd.diff(allowed_proj, blocked_proj)
    }

    fn merge(&self, x: &Ref, y: &Ref) -> Ref {
        self.bdd.or(*x, *y)
    }

    fn to_bdd(&self, v: &Ref) -> Ref {
        *v
    }
}
