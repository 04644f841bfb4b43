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

//! # Reachability Analysis
//!
//! The abstract-interpretation machinery: the route variable space, symbolic
//! transfer functions, the atomic-predicate partition, the abstract domains
//! and the fixed-point interpreter tying them together.

mod atom_domain;
mod atoms;
mod domain;
mod exact;
mod header_domain;
mod interpreter;
mod route_domain;
mod transfer;
mod vars;

pub use atom_domain::AtomDomain;
pub use atoms::{atomic_predicates, atomic_predicates_closed, AtomBits, AtomicPredicates};
pub use domain::{AbstractDomain, AbstractFib, AbstractRib};
pub use exact::{ConcreteRib, ConcreteRoute, ExactDomain};
pub use header_domain::HeaderDomain;
pub use interpreter::{Interpreter, RibEntry};
pub use route_domain::RouteDomain;
pub use transfer::{
    apply_updates, Direction, EdgeTransformer, PolicyTable, RouteUpdates, TransferFunction,
};
pub use vars::{FiniteDomain, FiniteIndexMap, RouteVars};
