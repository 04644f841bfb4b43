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

//! The network topology and per-router configuration.

use super::{Prefix, Protocol, RouterId};
use crate::Error;
use log::debug;
use petgraph::prelude::*;
use petgraph::stable_graph::StableGraph;
use std::collections::{BTreeSet, HashMap, HashSet};

/// A router with its name and routing configuration.
#[derive(Debug, Clone, Default)]
pub struct Router {
    /// Unique router name.
    pub name: String,
    /// Routing configuration of the default VRF.
    pub config: RouterConfig,
}

/// Per-router routing configuration.
#[derive(Debug, Clone, Default)]
pub struct RouterConfig {
    /// OSPF process, if configured.
    pub ospf: Option<OspfConfig>,
    /// BGP process, if configured.
    pub bgp: Option<BgpConfig>,
    /// Static routes of the default VRF.
    pub static_routes: Vec<StaticRoute>,
    /// Directly connected networks.
    pub connected: BTreeSet<Prefix>,
}

/// An OSPF process: originated networks and the neighbors the process is
/// enabled towards.
#[derive(Debug, Clone, Default)]
pub struct OspfConfig {
    /// Networks advertised into OSPF.
    pub networks: BTreeSet<Prefix>,
    /// Neighbors reachable over OSPF-enabled interfaces.
    pub links: HashSet<RouterId>,
}

/// A BGP process: the set of session peers.
#[derive(Debug, Clone, Default)]
pub struct BgpConfig {
    /// Routers with which a BGP session is configured.
    pub neighbors: HashSet<RouterId>,
}

/// A static route: a prefix and an optional next-hop router. `None` means
/// the prefix is originated locally without a specific next hop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRoute {
    /// Destination prefix.
    pub prefix: Prefix,
    /// Next-hop router, if any.
    pub next_hop: Option<RouterId>,
}

/// One direction of a link in the topology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphEdge {
    /// Edge index in the topology graph.
    pub id: EdgeIndex<u32>,
    /// Sending router.
    pub src: RouterId,
    /// Receiving router (the peer).
    pub dst: RouterId,
}

/// The read-only network topology.
///
/// Built once before the analysis and never modified by it. Routers are graph
/// nodes, links are pairs of directed edges.
#[derive(Debug, Default)]
pub struct Network {
    graph: StableGraph<Router, (), Directed, u32>,
    names: HashMap<String, RouterId>,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a router with the given name and a default (empty) configuration.
    pub fn add_router(&mut self, name: impl Into<String>) -> RouterId {
        let name = name.into();
        let id = self.graph.add_node(Router { name: name.clone(), config: RouterConfig::default() });
        debug!("Add router {} as {:?}", name, id);
        self.names.insert(name, id);
        id
    }

    /// Add a bidirectional link between `a` and `b` (one edge per direction).
    pub fn add_link(&mut self, a: RouterId, b: RouterId) {
        debug!("Add link {:?} <-> {:?}", a, b);
        self.graph.add_edge(a, b, ());
        self.graph.add_edge(b, a, ());
    }

    /// All router ids, in insertion order.
    pub fn routers(&self) -> Vec<RouterId> {
        let mut ids: Vec<RouterId> = self.graph.node_indices().collect();
        ids.sort();
        ids
    }

    /// The name of a router.
    pub fn router_name(&self, r: RouterId) -> Result<&str, Error> {
        self.graph.node_weight(r).map(|x| x.name.as_str()).ok_or(Error::DeviceNotFound(r))
    }

    /// Look a router up by name.
    pub fn router_id(&self, name: &str) -> Result<RouterId, Error> {
        self.names.get(name).copied().ok_or_else(|| Error::DeviceNameNotFound(name.to_string()))
    }

    /// The configuration of a router.
    pub fn config(&self, r: RouterId) -> Result<&RouterConfig, Error> {
        self.graph.node_weight(r).map(|x| &x.config).ok_or(Error::DeviceNotFound(r))
    }

    /// Mutable access to a router configuration (topology construction only).
    pub fn config_mut(&mut self, r: RouterId) -> Result<&mut RouterConfig, Error> {
        self.graph.node_weight_mut(r).map(|x| &mut x.config).ok_or(Error::DeviceNotFound(r))
    }

    /// All edges leaving `r`.
    pub fn edges_from(&self, r: RouterId) -> Vec<GraphEdge> {
        let mut edges: Vec<GraphEdge> = self
            .graph
            .edges(r)
            .map(|e| GraphEdge { id: e.id(), src: e.source(), dst: e.target() })
            .collect();
        edges.sort_by_key(|e| e.id.index());
        edges
    }

    /// The reverse direction of `edge`, if the link is bidirectional.
    pub fn reverse_edge(&self, edge: &GraphEdge) -> Option<GraphEdge> {
        self.graph
            .find_edge(edge.dst, edge.src)
            .map(|id| GraphEdge { id, src: edge.dst, dst: edge.src })
    }

    /// True if `edge` carries routes of `proto` out of its source router.
    pub fn is_edge_used(&self, proto: Protocol, edge: &GraphEdge) -> bool {
        let config = match self.config(edge.src) {
            Ok(c) => c,
            Err(_) => return false,
        };
        match proto {
            Protocol::Ospf => {
                config.ospf.as_ref().map(|o| o.links.contains(&edge.dst)).unwrap_or(false)
            }
            Protocol::Bgp => {
                config.bgp.as_ref().map(|b| b.neighbors.contains(&edge.dst)).unwrap_or(false)
            }
            Protocol::Static => config
                .static_routes
                .iter()
                .any(|sr| sr.next_hop == Some(edge.dst)),
            Protocol::Connected => false,
        }
    }

    /// The networks a router originates into `proto`.
    pub fn originated_networks(&self, r: RouterId, proto: Protocol) -> BTreeSet<Prefix> {
        let config = match self.config(r) {
            Ok(c) => c,
            Err(_) => return BTreeSet::new(),
        };
        match proto {
            Protocol::Ospf => {
                config.ospf.as_ref().map(|o| o.networks.clone()).unwrap_or_default()
            }
            Protocol::Connected => config.connected.clone(),
            Protocol::Static | Protocol::Bgp => BTreeSet::new(),
        }
    }

    /// Static routes of `r`, grouped by next-hop router. A `None` key means
    /// the route is originated locally.
    pub fn static_routes_by_next_hop(&self, r: RouterId) -> HashMap<Option<RouterId>, BTreeSet<Prefix>> {
        let mut map: HashMap<Option<RouterId>, BTreeSet<Prefix>> = HashMap::new();
        if let Ok(config) = self.config(r) {
            for sr in &config.static_routes {
                map.entry(sr.next_hop).or_default().insert(sr.prefix);
            }
        }
        map
    }
}
