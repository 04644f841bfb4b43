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

//! Module containing all error types

use crate::net::RouterId;
use thiserror::Error;

/// Main error type
///
/// All variants are configuration-consistency violations in the input handed
/// to the analysis. An empty analysis result is never an error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Device is not present in the topology
    #[error("Network device was not found in topology: {0:?}")]
    DeviceNotFound(RouterId),
    /// Device name is not present in the topology
    #[error("Network device name was not found in topology: {0}")]
    DeviceNameNotFound(String),
    /// An edge claims to carry BGP traffic, but no transfer function was
    /// registered for it. Treating this as "no filtering" would silently
    /// over-permit, so the analysis refuses to continue.
    #[error("No {direction} BGP policy registered for edge {src} -> {dst}")]
    MissingPolicy {
        /// `"export"` or `"import"`.
        direction: &'static str,
        /// Name of the sending router.
        src: String,
        /// Name of the receiving router.
        dst: String,
    },
}
