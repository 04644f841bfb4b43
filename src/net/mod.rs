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

//! # Network Model
//!
//! The read-only input to the analysis: routers, links, and per-router
//! routing configuration. The topology is a directed [`petgraph`] graph; a
//! physical link contributes one edge in each direction, and an edge is an
//! inter-router link exactly when its reverse edge exists.

mod network;

pub use network::{BgpConfig, GraphEdge, Network, OspfConfig, Router, RouterConfig, StaticRoute};

use petgraph::prelude::*;
use std::fmt;
use std::net::Ipv4Addr;

type IndexType = u32;

/// Router identification (an index into the topology graph).
pub type RouterId = NodeIndex<IndexType>;

/// An IPv4 prefix: address plus prefix length in `0..=32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Prefix {
    /// Network address.
    pub ip: Ipv4Addr,
    /// Prefix length.
    pub len: u8,
}

impl Prefix {
    /// Create a new prefix. The length must be at most 32.
    pub fn new(ip: Ipv4Addr, len: u8) -> Self {
        assert!(len <= 32, "prefix length {} out of range", len);
        Self { ip, len }
    }

    /// Bit `i` of the address, counting from the most significant bit.
    pub fn bit(&self, i: u8) -> bool {
        debug_assert!(i < 32);
        (u32::from(self.ip) >> (31 - i)) & 1 == 1
    }

    /// True if `ip` falls inside this prefix.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        if self.len == 0 {
            return true;
        }
        let mask = u32::MAX << (32 - self.len as u32);
        (u32::from(self.ip) & mask) == (u32::from(ip) & mask)
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.ip, self.len)
    }
}

/// The routing protocols tracked by the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Protocol {
    /// Border Gateway Protocol.
    Bgp,
    /// Open Shortest Path First.
    Ospf,
    /// Statically configured routes.
    Static,
    /// Directly connected networks.
    Connected,
}

impl Protocol {
    /// All protocols, in a fixed order used for bit encoding.
    pub const ALL: [Protocol; 4] = [Protocol::Bgp, Protocol::Ospf, Protocol::Static, Protocol::Connected];

    /// Default administrative distance of routes learned via this protocol.
    pub fn admin_dist(&self) -> u8 {
        match self {
            Protocol::Connected => 0,
            Protocol::Static => 1,
            Protocol::Bgp => 20,
            Protocol::Ospf => 110,
        }
    }

    /// Stable protocol name, also the deterministic tie-breaker for
    /// best-route selection.
    pub fn name(&self) -> &'static str {
        match self {
            Protocol::Bgp => "bgp",
            Protocol::Ospf => "ospf",
            Protocol::Static => "static",
            Protocol::Connected => "connected",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
