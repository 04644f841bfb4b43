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

//! The concrete reference domain.
//!
//! Tracks explicit best routes per prefix instead of symbolic sets. Useful as
//! a differential baseline for the symbolic domains on small networks, and as
//! the place where best-route selection is spelled out.

use crate::bdd::{Bdd, Ref};
use crate::net::{Prefix, Protocol, RouterId};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::Rc;

use super::domain::AbstractDomain;
use super::transfer::EdgeTransformer;
use super::vars::RouteVars;

/// A fully concrete route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConcreteRoute {
    /// Destination prefix.
    pub prefix: Prefix,
    /// Protocol the route was learned via.
    pub protocol: Protocol,
    /// Administrative distance.
    pub admin_dist: u8,
    /// Protocol metric.
    pub metric: u32,
    /// The router that originated the route.
    pub dst_router: RouterId,
}

impl ConcreteRoute {
    fn new(prefix: Prefix, protocol: Protocol, dst_router: RouterId) -> Self {
        Self { prefix, protocol, admin_dist: protocol.admin_dist(), metric: 0, dst_router }
    }

    /// True if `self` is preferred over `other` for the same prefix: lower
    /// administrative distance, then lower metric, then the protocol name as
    /// a deterministic tie-breaker.
    fn better_than(&self, other: &ConcreteRoute) -> bool {
        (self.admin_dist, self.metric, self.protocol.name(), self.dst_router.index())
            < (other.admin_dist, other.metric, other.protocol.name(), other.dst_router.index())
    }
}

/// Best route per prefix.
pub type ConcreteRib = BTreeMap<Prefix, ConcreteRoute>;

/// The concrete domain: explicit routes, best-route merge.
#[derive(Debug)]
pub struct ExactDomain {
    bdd: Rc<Bdd>,
    vars: Rc<RouteVars>,
}

impl ExactDomain {
    /// Create the domain over a shared manager and variable space.
    pub fn new(bdd: Rc<Bdd>, vars: Rc<RouteVars>) -> Self {
        Self { bdd, vars }
    }

    /// The total variable assignment describing `route`, with all community
    /// bits clear.
    fn assignment(&self, route: &ConcreteRoute) -> HashMap<u32, bool> {
        let mut map = HashMap::new();
        let vars = &self.vars;
        let set_field = |map: &mut HashMap<u32, bool>, bits: &crate::bdd::VarSet, idx: usize| {
            for (j, b) in bits.iter().enumerate() {
                map.insert(b, (idx >> j) & 1 == 1);
            }
        };
        set_field(
            &mut map,
            &vars.dst_router().var_set(),
            vars.dst_router().index_map().index(&route.dst_router),
        );
        set_field(
            &mut map,
            &vars.protocol().var_set(),
            vars.protocol().index_map().index(&route.protocol),
        );
        set_field(&mut map, &vars.len_vars(), route.prefix.len as usize);
        for i in 0..32 {
            map.insert(vars.prefix_var(i), i < route.prefix.len && route.prefix.bit(i));
        }
        map
    }

    fn insert_best(rib: &mut ConcreteRib, route: ConcreteRoute) {
        match rib.get(&route.prefix) {
            Some(existing) if !route.better_than(existing) => {}
            _ => {
                rib.insert(route.prefix, route);
            }
        }
    }
}

impl AbstractDomain for ExactDomain {
    type Value = ConcreteRib;

    fn bot(&self) -> ConcreteRib {
        ConcreteRib::new()
    }

    fn value(&self, router: RouterId, proto: Protocol, prefixes: &BTreeSet<Prefix>) -> ConcreteRib {
        let mut rib = ConcreteRib::new();
        for &p in prefixes {
            Self::insert_best(&mut rib, ConcreteRoute::new(p, proto, router));
        }
        rib
    }

    /// Evaluate the symbolic filter on each concrete route; a route passes if
    /// the filter holds under its assignment. Community updates do not apply,
    /// concrete routes carry no communities.
    fn transform(&self, v: &ConcreteRib, t: &EdgeTransformer<'_>) -> ConcreteRib {
        let mut rib = ConcreteRib::new();
        for route in v.values() {
            let map = self.assignment(route);
            if !self.bdd.eval(t.func.filter, |var| map.get(&var).copied().unwrap_or(false)) {
                continue;
            }
            let mut out = *route;
            if let Some(proto) = t.func.updates.protocol {
                out.protocol = proto;
                out.admin_dist = proto.admin_dist();
            }
            Self::insert_best(&mut rib, out);
        }
        rib
    }

    fn merge(&self, x: &ConcreteRib, y: &ConcreteRib) -> ConcreteRib {
        let mut rib = x.clone();
        for route in y.values() {
            Self::insert_best(&mut rib, *route);
        }
        rib
    }

    fn to_bdd(&self, v: &ConcreteRib) -> Ref {
        self.bdd.or_all(v.values().map(|route| {
            let dst = self.vars.dst_router().value(&self.bdd, &route.dst_router);
            let tag = self.vars.protocol().value(&self.bdd, &route.protocol);
            self.bdd.and(self.bdd.and(dst, tag), self.vars.prefix_to_bdd(&route.prefix))
        }))
    }
}
