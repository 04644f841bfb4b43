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

//! The fixed-point solver.
//!
//! Propagates abstract route sets over the topology with a worklist until
//! nothing changes, then reports per router the final RIB and the headerspace
//! that can reach it. Generic over the [`AbstractDomain`]; the same loop runs
//! the full, header-only, atomized and concrete domains.

use crate::bdd::{Bdd, Ref, Renaming, VarSet};
use crate::net::{Network, Prefix, Protocol, RouterId};
use crate::Error;
use itertools::iproduct;
use log::{debug, info, trace};
use std::cell::Cell;
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use std::net::Ipv4Addr;
use std::rc::Rc;

use super::domain::{AbstractDomain, AbstractFib, AbstractRib};
use super::transfer::{Direction, EdgeTransformer, PolicyTable};
use super::vars::RouteVars;

/// One enumerated route, for reporting.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RibEntry {
    /// Router holding the route.
    pub router: String,
    /// Destination prefix.
    pub prefix: Prefix,
    /// Protocol the route was learned via.
    pub protocol: Protocol,
    /// Router the route points at.
    pub dst_router: String,
}

/// The reachability interpreter for one network and policy table.
pub struct Interpreter<'a> {
    net: &'a Network,
    policies: &'a PolicyTable,
    bdd: Rc<Bdd>,
    vars: Rc<RouteVars>,
    pops: Cell<usize>,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter over a shared manager and variable space. The
    /// policy filters must be built over the same `vars`.
    pub fn new(
        net: &'a Network,
        policies: &'a PolicyTable,
        bdd: Rc<Bdd>,
        vars: Rc<RouteVars>,
    ) -> Self {
        Self { net, policies, bdd, vars, pops: Cell::new(0) }
    }

    /// The variable space of this run.
    pub fn vars(&self) -> &RouteVars {
        &self.vars
    }

    /// Number of worklist pops of the most recent
    /// [`compute_fixed_point`](Self::compute_fixed_point) run.
    pub fn iterations(&self) -> usize {
        self.pops.get()
    }

    /// Run the worklist to the fixed point and return the per-router result,
    /// keyed by router name.
    ///
    /// The worklist starts with the routers that originate at least one
    /// prefix via OSPF or static routes; connected networks enter the RIBs
    /// but do not enqueue their router on their own.
    /// Each iteration pops a router and pushes its routes to every neighbor:
    /// OSPF route sets merge over links with OSPF enabled on both sides, the
    /// main RIB travels over BGP sessions through the export function of the
    /// sending side and the import function of the receiving side. The
    /// headerspace of a neighbor grows by the headers the sender can already
    /// reach, restricted to the routes that survived the transfer. A neighbor
    /// is re-enqueued when its RIB, its OSPF set or its headerspace changed.
    pub fn compute_fixed_point<D: AbstractDomain>(
        &self,
        domain: &D,
    ) -> Result<HashMap<String, AbstractFib<D::Value>>, Error> {
        let routers = self.net.routers();
        info!("Start the fixed-point computation on {} routers", routers.len());

        let mut state: HashMap<RouterId, AbstractFib<D::Value>> = HashMap::new();
        let mut queue: VecDeque<RouterId> = VecDeque::new();
        let mut in_queue: HashSet<RouterId> = HashSet::new();

        for &r in &routers {
            let conn = domain.value(
                r,
                Protocol::Connected,
                &self.net.originated_networks(r, Protocol::Connected),
            );
            let ospf_networks = self.net.originated_networks(r, Protocol::Ospf);
            let ospf = domain.value(r, Protocol::Ospf, &ospf_networks);
            // A static route points its traffic at the next hop; without one
            // it terminates at the router itself.
            let static_routes = self.net.static_routes_by_next_hop(r);
            let mut stat = domain.bot();
            for (&next_hop, prefixes) in &static_routes {
                let origin = next_hop.unwrap_or(r);
                stat = domain.merge(&stat, &domain.value(origin, Protocol::Static, prefixes));
            }
            let bgp = domain.bot();
            let rib = [&bgp, &ospf, &stat, &conn]
                .into_iter()
                .fold(domain.bot(), |acc, v| domain.merge(&acc, v));
            let headerspace = self.to_headerspace(domain.to_bdd(&rib));
            // Only OSPF and static originators start the propagation;
            // connected networks stay local until their router is enqueued
            // by an incoming update.
            if !ospf_networks.is_empty() || !static_routes.is_empty() {
                queue.push_back(r);
                in_queue.insert(r);
            }
            state.insert(r, AbstractFib { rib: AbstractRib { bgp, ospf, stat, conn, rib }, headerspace });
        }

        self.pops.set(0);
        let mut iterations = 0usize;
        while let Some(r) = queue.pop_front() {
            in_queue.remove(&r);
            iterations += 1;
            debug!("Process router {}", self.net.router_name(r)?);
            let current = state.get(&r).cloned().ok_or(Error::DeviceNotFound(r))?;

            for edge in self.net.edges_from(r) {
                let rev = match self.net.reverse_edge(&edge) {
                    Some(rev) => rev,
                    None => continue,
                };
                let n = edge.dst;
                let neighbor = state.get(&n).cloned().ok_or(Error::DeviceNotFound(n))?;

                let mut new_ospf = neighbor.rib.ospf.clone();
                let mut new_bgp = neighbor.rib.bgp.clone();
                let mut transferred = domain.bot();

                if self.net.is_edge_used(Protocol::Ospf, &edge)
                    && self.net.is_edge_used(Protocol::Ospf, &rev)
                {
                    new_ospf = domain.merge(&new_ospf, &current.rib.ospf);
                    transferred = domain.merge(&transferred, &current.rib.ospf);
                }

                if self.net.is_edge_used(Protocol::Bgp, &edge) {
                    let export = self.policies.export_bgp(self.net, &edge)?;
                    let import = self.policies.import_bgp(self.net, &rev)?;
                    let sent = domain.transform(
                        &current.rib.rib,
                        &EdgeTransformer { edge, direction: Direction::Export, func: export },
                    );
                    let received = domain.transform(
                        &sent,
                        &EdgeTransformer { edge: rev, direction: Direction::Import, func: import },
                    );
                    new_bgp = domain.merge(&new_bgp, &received);
                    transferred = domain.merge(&transferred, &received);
                }

                let new_rib = [&new_bgp, &new_ospf, &neighbor.rib.stat, &neighbor.rib.conn]
                    .into_iter()
                    .fold(domain.bot(), |acc, v| domain.merge(&acc, v));
                let delta = self.to_headerspace(domain.to_bdd(&transferred));
                let new_hs =
                    self.bdd.or(neighbor.headerspace, self.bdd.and(current.headerspace, delta));

                if new_rib != neighbor.rib.rib
                    || new_ospf != neighbor.rib.ospf
                    || new_hs != neighbor.headerspace
                {
                    trace!("Update router {} via {:?}", self.net.router_name(n)?, edge.id);
                    state.insert(
                        n,
                        AbstractFib {
                            rib: AbstractRib {
                                bgp: new_bgp,
                                ospf: new_ospf,
                                stat: neighbor.rib.stat,
                                conn: neighbor.rib.conn,
                                rib: new_rib,
                            },
                            headerspace: new_hs,
                        },
                    );
                    if in_queue.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
        }
        self.pops.set(iterations);
        info!("Fixed point reached after {} worklist iterations", iterations);

        routers
            .into_iter()
            .map(|r| {
                let name = self.net.router_name(r)?.to_string();
                let fib = state.remove(&r).ok_or(Error::DeviceNotFound(r))?;
                Ok((name, fib))
            })
            .collect()
    }

    /// Project a route set onto pure address space: quantify the community,
    /// protocol and destination-router bits, widen every prefix to the
    /// addresses it matches, and drop the length tag.
    pub fn to_headerspace(&self, routes: Ref) -> Ref {
        let drop = self.vars.transient_vars().union(&self.vars.dst_router_vars());
        self.project_lengths(self.bdd.exists(routes, &drop))
    }

    /// Like [`to_headerspace`](Self::to_headerspace), but keep the
    /// destination-router bits: the forwarding relation used for the
    /// transitive closure.
    pub fn to_fib(&self, routes: Ref) -> Ref {
        self.project_lengths(self.bdd.exists(routes, &self.vars.transient_vars()))
    }

    /// Widen prefixes to address sets. Per length, the address bits at and
    /// below it are free; lengths absent from the set are skipped without
    /// touching the manager. The length bits themselves are quantified once
    /// at the end, after all per-length slices are collected.
    fn project_lengths(&self, x: Ref) -> Ref {
        if self.bdd.is_zero(x) {
            return x;
        }
        let mut acc = self.bdd.zero();
        for len in (0..=32u8).rev() {
            let slice = self.bdd.and(x, self.vars.make_length(len));
            if self.bdd.is_zero(slice) {
                continue;
            }
            acc = self.bdd.or(acc, self.bdd.exists(slice, &self.vars.remove_bits(len)));
        }
        self.bdd.exists(acc, &self.vars.len_vars())
    }

    /// The multi-hop reachability relation over per-router forwarding
    /// relations (as produced by [`to_fib`](Self::to_fib)): pairs of source
    /// and destination router such that the destination is reached by
    /// repeatedly following the forwarding state.
    pub fn transitive_closure(&self, fibs: &HashMap<String, Ref>) -> Result<Ref, Error> {
        let mut all = self.bdd.zero();
        for (name, &fib) in fibs {
            let r = self.net.router_id(name)?;
            let src = self.vars.src_router().value(&self.bdd, &r);
            all = self.bdd.or(all, self.bdd.and(src, fib));
        }

        let mut src_to_temp = Renaming::new();
        for (from, to) in self.vars.src_to_temp_pairs() {
            src_to_temp.add(from, to);
        }
        let step = src_to_temp.apply(&self.bdd, all);
        let temp_vars = self.vars.temp_router_vars();

        let mut seen: HashSet<Ref> = HashSet::new();
        let mut closure = all;
        loop {
            seen.insert(closure);
            let mut dst_to_temp = Renaming::new();
            for (from, to) in self.vars.dst_to_temp_pairs() {
                dst_to_temp.add(from, to);
            }
            let moved = dst_to_temp.apply(&self.bdd, closure);
            closure = self.bdd.exists(self.bdd.and(moved, step), &temp_vars);
            if seen.contains(&closure) {
                break;
            }
        }
        Ok(closure)
    }

    /// Enumerate the concrete routes of a symbolic route set, sorted and
    /// deduplicated. The number of routes can be exponential in the free
    /// address bits; intended for reporting on small results.
    pub fn routes(&self, router: &str, routes: Ref) -> Result<Vec<RibEntry>, Error> {
        let mut out: BTreeSet<RibEntry> = BTreeSet::new();
        for (dst, proto) in iproduct!(self.net.routers(), Protocol::ALL) {
            let dst_name = self.net.router_name(dst)?.to_string();
            let dst_pred = self.vars.dst_router().value(&self.bdd, &dst);
            let tag = self.vars.protocol().value(&self.bdd, &proto);
            let base = self.bdd.and(routes, self.bdd.and(dst_pred, tag));
            if self.bdd.is_zero(base) {
                continue;
            }
            for len in 0..=32u8 {
                let slice = self.bdd.and(base, self.vars.make_length(len));
                if self.bdd.is_zero(slice) {
                    continue;
                }
                let cube = self.bdd.exists(slice, &self.drop_all_but_address(len));
                for assignment in self.bdd.all_sat(cube) {
                    let fixed: HashMap<u32, bool> = assignment.into_iter().collect();
                    self.expand_prefixes(&fixed, len, |prefix| {
                        out.insert(RibEntry {
                            router: router.to_string(),
                            prefix,
                            protocol: proto,
                            dst_router: dst_name.clone(),
                        });
                    });
                }
            }
        }
        Ok(out.into_iter().collect())
    }

    /// Every variable except the address bits above `len`.
    fn drop_all_but_address(&self, len: u8) -> VarSet {
        let comm_temps = (0..self.vars.num_communities()).map(|i| self.vars.community_temp_var(i));
        self.vars
            .transient_vars()
            .union(&self.vars.dst_router_vars())
            .union(&self.vars.src_router().var_set())
            .union(&self.vars.temp_router_vars())
            .union(&self.vars.len_vars())
            .union(&self.vars.remove_bits(len))
            .union(&VarSet::new(comm_temps))
    }

    /// Expand the don't-care address bits of a cube into concrete prefixes.
    fn expand_prefixes(&self, fixed: &HashMap<u32, bool>, len: u8, mut emit: impl FnMut(Prefix)) {
        let free: Vec<u8> =
            (0..len).filter(|&i| !fixed.contains_key(&self.vars.prefix_var(i))).collect();
        for choice in 0u64..(1u64 << free.len()) {
            let mut addr: u32 = 0;
            let mut free_pos = 0;
            for i in 0..len {
                let bit = match fixed.get(&self.vars.prefix_var(i)) {
                    Some(&b) => b,
                    None => {
                        let b = choice >> free_pos & 1 == 1;
                        free_pos += 1;
                        b
                    }
                };
                if bit {
                    addr |= 1 << (31 - i);
                }
            }
            emit(Prefix::new(Ipv4Addr::from(addr), len));
        }
    }
}
