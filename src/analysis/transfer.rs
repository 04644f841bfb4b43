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

//! Symbolic transfer functions.
//!
//! A [`TransferFunction`] models a BGP routing policy on one direction of a
//! session: a filter predicate over route variables, plus field updates for
//! the community bits and the protocol tag. The [`PolicyTable`] maps topology
//! edges to the registered export and import functions; an edge that carries
//! BGP but has no registered function is a configuration error, reported
//! eagerly by the solver.

use crate::bdd::{Bdd, Ref, Renaming, VarSet};
use crate::net::{GraphEdge, Network, Protocol};
use crate::Error;
use std::collections::HashMap;
use std::fmt;

use super::vars::RouteVars;

/// The direction a transfer function is applied in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Applied by the sending router before the route leaves it.
    Export,
    /// Applied by the receiving router when the route arrives.
    Import,
}

impl Direction {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Direction::Export => "export",
            Direction::Import => "import",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field updates performed by a transfer function after its filter.
#[derive(Debug, Clone)]
pub struct RouteUpdates {
    /// Per community bit, an optional new-value expression over the current
    /// (unprimed) route variables. `None` leaves the bit unchanged.
    pub communities: Vec<Option<Ref>>,
    /// Retag the route with a fixed protocol, if set.
    pub protocol: Option<Protocol>,
}

impl RouteUpdates {
    /// The identity update for `num_communities` community bits.
    pub fn none(num_communities: usize) -> Self {
        Self { communities: vec![None; num_communities], protocol: None }
    }

    /// Set community bit `i` to the constant `value`.
    pub fn set_community(mut self, bdd: &Bdd, i: usize, value: bool) -> Self {
        self.communities[i] = Some(if value { bdd.one() } else { bdd.zero() });
        self
    }

    /// Set community bit `i` to `expr`, evaluated over the pre-update route.
    pub fn set_community_expr(mut self, i: usize, expr: Ref) -> Self {
        self.communities[i] = Some(expr);
        self
    }

    /// Retag matched routes as `proto`.
    pub fn set_protocol(mut self, proto: Protocol) -> Self {
        self.protocol = Some(proto);
        self
    }

    /// True if the update changes nothing.
    pub fn is_identity(&self) -> bool {
        self.protocol.is_none() && self.communities.iter().all(|c| c.is_none())
    }
}

/// A routing policy in symbolic form: a filter and the updates applied to the
/// routes that pass it.
#[derive(Debug, Clone)]
pub struct TransferFunction {
    /// Identifier of this function, its position in the [`PolicyTable`].
    pub id: usize,
    /// Predicate selecting the routes that pass the policy.
    pub filter: Ref,
    /// Updates applied to passing routes.
    pub updates: RouteUpdates,
}

/// A transfer function attached to one direction of one edge, as handed to an
/// abstract domain by the solver.
#[derive(Debug, Clone, Copy)]
pub struct EdgeTransformer<'a> {
    /// The edge the routes travel over.
    pub edge: GraphEdge,
    /// Export or import side of the session.
    pub direction: Direction,
    /// The policy to apply.
    pub func: &'a TransferFunction,
}

/// The registered BGP policies of a network.
///
/// Export policies are keyed by the edge leaving the sending router; import
/// policies by the edge leaving the receiving router (its own side of the
/// link). Functions get sequential ids, which the atomic-predicate partition
/// uses as stable keys.
#[derive(Debug, Default)]
pub struct PolicyTable {
    functions: Vec<TransferFunction>,
    export_bgp: HashMap<GraphEdge, usize>,
    import_bgp: HashMap<GraphEdge, usize>,
}

impl PolicyTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, filter: Ref, updates: RouteUpdates) -> usize {
        let id = self.functions.len();
        self.functions.push(TransferFunction { id, filter, updates });
        id
    }

    /// Register the export policy of `edge` (applied by `edge.src` when
    /// sending to `edge.dst`). Returns the function id.
    pub fn add_export_bgp(&mut self, edge: GraphEdge, filter: Ref, updates: RouteUpdates) -> usize {
        let id = self.add(filter, updates);
        self.export_bgp.insert(edge, id);
        id
    }

    /// Register the import policy of `edge` (applied by `edge.src` to routes
    /// arriving over this link). Returns the function id.
    pub fn add_import_bgp(&mut self, edge: GraphEdge, filter: Ref, updates: RouteUpdates) -> usize {
        let id = self.add(filter, updates);
        self.import_bgp.insert(edge, id);
        id
    }

    /// The export policy of `edge`, or a [`Error::MissingPolicy`] naming both
    /// endpoints.
    pub fn export_bgp(&self, net: &Network, edge: &GraphEdge) -> Result<&TransferFunction, Error> {
        self.export_bgp
            .get(edge)
            .map(|&id| &self.functions[id])
            .ok_or_else(|| missing(net, Direction::Export, edge))
    }

    /// The import policy of `edge`, or a [`Error::MissingPolicy`].
    pub fn import_bgp(&self, net: &Network, edge: &GraphEdge) -> Result<&TransferFunction, Error> {
        self.import_bgp
            .get(edge)
            .map(|&id| &self.functions[id])
            .ok_or_else(|| missing(net, Direction::Import, edge))
    }

    /// All registered functions, in id order.
    pub fn functions(&self) -> &[TransferFunction] {
        &self.functions
    }
}

fn missing(net: &Network, direction: Direction, edge: &GraphEdge) -> Error {
    let name = |r| net.router_name(r).unwrap_or("?").to_string();
    Error::MissingPolicy { direction: direction.as_str(), src: name(edge.src), dst: name(edge.dst) }
}

/// Apply the field updates of a policy to the route set `x`.
///
/// All new values are evaluated over the pre-update route: each updated
/// community bit is first bound to its primed partner variable, then the old
/// bits are quantified away and the partners renamed back. This keeps
/// simultaneous updates consistent regardless of the variable ordering. The
/// protocol retag is a constant, so it needs no primed variables.
pub fn apply_updates(bdd: &Bdd, vars: &RouteVars, x: Ref, updates: &RouteUpdates) -> Ref {
    let mut res = x;

    let mut renaming = Renaming::new();
    let mut old_bits = Vec::new();
    for (i, update) in updates.communities.iter().enumerate() {
        if let Some(expr) = *update {
            let temp = bdd.mk_var(vars.community_temp_var(i));
            res = bdd.and(res, bdd.iff(temp, expr));
            old_bits.push(vars.community_var(i));
            renaming.add(vars.community_temp_var(i), vars.community_var(i));
        }
    }
    if !renaming.is_empty() {
        res = bdd.exists(res, &VarSet::new(old_bits));
        res = renaming.apply(bdd, res);
    }

    if let Some(proto) = updates.protocol {
        res = bdd.exists(res, &vars.protocol().var_set());
        res = bdd.and(res, vars.protocol().value(bdd, &proto));
    }

    res
}
