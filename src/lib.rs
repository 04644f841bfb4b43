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

#![deny(missing_docs)]

//! # SymRib: Symbolic Network Reachability Analysis
//!
//! A library for computing network reachability by abstract interpretation of
//! the routing control plane. Instead of simulating individual routes, the
//! analysis encodes whole route sets as binary decision diagrams and
//! propagates them over the topology to a fixed point, yielding for every
//! router the set of routes it learns and the headerspace that can reach it.
//!
//! ## Structure
//!
//! - **[`bdd`]**: The decision diagram engine. A single-manager BDD with
//!   complement edges, existential quantification, variable renaming and
//!   satisfying-assignment enumeration.
//!
//! - **[`net`]**: The network model. Routers, links and per-router OSPF, BGP,
//!   static and connected configuration, on top of a [`petgraph`] topology.
//!
//! - **[`analysis`]**: The interpreter. The route variable space
//!   ([`RouteVars`](analysis::RouteVars)), symbolic transfer functions
//!   ([`PolicyTable`](analysis::PolicyTable)), the atomic-predicate partition
//!   and the abstract domains, all driven by the worklist solver in
//!   [`Interpreter`](analysis::Interpreter).
//!
//! ## Example
//!
//! Two routers connected by a link, with `a` originating `10.0.0.0/8` into
//! OSPF. After the fixed point, packets for that network reach `b`:
//!
//! ```
//! use std::net::Ipv4Addr;
//! use std::rc::Rc;
//! use symrib::analysis::{Interpreter, PolicyTable, RouteDomain, RouteVars};
//! use symrib::bdd::Bdd;
//! use symrib::net::{Network, OspfConfig, Prefix};
//!
//! let mut net = Network::new();
//! let a = net.add_router("a");
//! let b = net.add_router("b");
//! net.add_link(a, b);
//!
//! let prefix = Prefix::new(Ipv4Addr::new(10, 0, 0, 0), 8);
//! net.config_mut(a)?.ospf = Some(OspfConfig {
//!     networks: std::iter::once(prefix).collect(),
//!     links: std::iter::once(b).collect(),
//! });
//! net.config_mut(b)?.ospf = Some(OspfConfig {
//!     networks: Default::default(),
//!     links: std::iter::once(a).collect(),
//! });
//!
//! let bdd = Rc::new(Bdd::new());
//! let vars = Rc::new(RouteVars::new(bdd.clone(), &net.routers(), 0));
//! let policies = PolicyTable::new();
//! let interpreter = Interpreter::new(&net, &policies, bdd.clone(), vars.clone());
//! let domain = RouteDomain::new(bdd.clone(), vars.clone());
//!
//! let result = interpreter.compute_fixed_point(&domain)?;
//! assert_eq!(result["b"].headerspace, vars.address_space(&prefix));
//! # Ok::<(), symrib::Error>(())
//! ```

pub mod analysis;
pub mod bdd;
mod error;
pub mod net;
mod test;

pub use error::Error;
