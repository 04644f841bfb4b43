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

use crate::analysis::{
    apply_updates, atomic_predicates_closed, AbstractDomain, AtomDomain, Direction,
    EdgeTransformer, ExactDomain, HeaderDomain, RouteDomain, RouteUpdates, RouteVars,
    TransferFunction,
};
use crate::bdd::Bdd;
use crate::net::{GraphEdge, Prefix, Protocol, RouterId};
use maplit::btreeset;
use petgraph::graph::EdgeIndex;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::rc::Rc;

fn setup(num_communities: usize) -> (Rc<Bdd>, Rc<RouteVars>, Vec<RouterId>) {
    let bdd = Rc::new(Bdd::new());
    let routers = vec![RouterId::new(0), RouterId::new(1), RouterId::new(2)];
    let vars = Rc::new(RouteVars::new(bdd.clone(), &routers, num_communities));
    (bdd, vars, routers)
}

fn edge() -> GraphEdge {
    GraphEdge { id: EdgeIndex::new(0), src: RouterId::new(0), dst: RouterId::new(1) }
}

fn transformer(func: &TransferFunction) -> EdgeTransformer<'_> {
    EdgeTransformer { edge: edge(), direction: Direction::Export, func }
}

fn prefix(a: u8, len: u8) -> Prefix {
    Prefix::new(Ipv4Addr::new(a, 0, 0, 0), len)
}

#[test]
fn test_finite_domain_decode() {
    let (bdd, vars, _) = setup(0);

    let tag = vars.protocol().value(&bdd, &Protocol::Static);
    let assignment: HashMap<u32, bool> = bdd.one_sat(tag).unwrap().into_iter().collect();
    let decoded = vars.protocol().decode(|v| assignment.get(&v).copied().unwrap_or(false));
    assert_eq!(decoded, Some(&Protocol::Static));

    // Three routers fit in two bits; the spare index decodes to nothing.
    assert_eq!(vars.dst_router().decode(|_| true), None);
}

#[test]
fn test_address_space_matches_prefix() {
    let (bdd, vars, _) = setup(0);
    let p = Prefix::new(Ipv4Addr::new(10, 128, 0, 0), 9);
    let space = vars.address_space(&p);

    for ip in [
        Ipv4Addr::new(10, 128, 0, 1),
        Ipv4Addr::new(10, 255, 255, 255),
        Ipv4Addr::new(10, 127, 255, 255),
        Ipv4Addr::new(11, 128, 0, 0),
    ] {
        let addr = u32::from(ip);
        let member = bdd.eval(space, |v| {
            (0..32u8)
                .find(|&i| vars.prefix_var(i) == v)
                .map(|i| addr >> (31 - i) & 1 == 1)
                .unwrap_or(false)
        });
        assert_eq!(member, p.contains(ip), "{}", ip);
    }
}

#[test]
fn test_route_domain_value_and_merge() {
    let (bdd, vars, routers) = setup(0);
    let domain = RouteDomain::new(bdd.clone(), vars.clone());

    assert_eq!(domain.value(routers[0], Protocol::Ospf, &btreeset! {}), bdd.zero());

    let p1 = prefix(10, 8);
    let p2 = prefix(11, 8);
    let v = domain.value(routers[0], Protocol::Ospf, &btreeset! {p1, p2});
    let expected = bdd.and(
        bdd.and(
            vars.dst_router().value(&bdd, &routers[0]),
            vars.protocol().value(&bdd, &Protocol::Ospf),
        ),
        bdd.or(vars.prefix_to_bdd(&p1), vars.prefix_to_bdd(&p2)),
    );
    assert_eq!(v, expected);

    let single =
        |p| domain.value(routers[0], Protocol::Ospf, &btreeset! {p});
    assert_eq!(domain.merge(&single(p1), &single(p2)), v);
    assert_eq!(domain.merge(&v, &domain.bot()), v);
}

#[test]
fn test_route_domain_filter() {
    let (bdd, vars, routers) = setup(0);
    let domain = RouteDomain::new(bdd.clone(), vars.clone());

    let p1 = prefix(10, 8);
    let p2 = prefix(11, 8);
    let v = domain.value(routers[0], Protocol::Bgp, &btreeset! {p1, p2});

    let func = TransferFunction {
        id: 0,
        filter: vars.prefix_to_bdd(&p1),
        updates: RouteUpdates::none(0),
    };
    let out = domain.transform(&v, &transformer(&func));
    assert_eq!(out, domain.value(routers[0], Protocol::Bgp, &btreeset! {p1}));
}

#[test]
fn test_route_domain_community_update() {
    let (bdd, vars, routers) = setup(1);
    let domain = RouteDomain::new(bdd.clone(), vars.clone());

    let v = domain.value(routers[0], Protocol::Bgp, &btreeset! {prefix(10, 8)});
    let func = TransferFunction {
        id: 0,
        filter: bdd.one(),
        updates: RouteUpdates::none(1).set_community(&bdd, 0, true),
    };
    // The input does not constrain the community; the update pins it.
    let out = domain.transform(&v, &transformer(&func));
    assert_eq!(out, bdd.and(v, vars.community(0)));
}

#[test]
fn test_simultaneous_community_swap() {
    let (bdd, vars, _) = setup(2);
    let c0 = vars.community(0);
    let c1 = vars.community(1);

    // Swap both bits in one update; a sequential interpretation would lose
    // the original value of the first bit.
    let updates =
        RouteUpdates::none(2).set_community_expr(0, c1).set_community_expr(1, c0);
    let x = bdd.and(c0, bdd.not(c1));
    let out = apply_updates(&bdd, &vars, x, &updates);
    assert_eq!(out, bdd.and(bdd.not(c0), c1));
}

#[test]
fn test_protocol_retag() {
    let (bdd, vars, routers) = setup(0);
    let domain = RouteDomain::new(bdd.clone(), vars.clone());

    let v = domain.value(routers[0], Protocol::Connected, &btreeset! {prefix(10, 8)});
    let func = TransferFunction {
        id: 0,
        filter: bdd.one(),
        updates: RouteUpdates::none(0).set_protocol(Protocol::Bgp),
    };
    let out = domain.transform(&v, &transformer(&func));
    assert_eq!(out, domain.value(routers[0], Protocol::Bgp, &btreeset! {prefix(10, 8)}));
}

#[test]
fn test_header_domain_blocked_subtraction() {
    let (bdd, vars, _) = setup(1);
    let domain = HeaderDomain::new(bdd.clone(), vars.clone());
    let c0 = vars.community(0);

    let p1 = vars.prefix_to_bdd(&prefix(10, 8));
    let p2 = vars.prefix_to_bdd(&prefix(11, 8));
    let func =
        TransferFunction { id: 0, filter: c0, updates: RouteUpdates::none(1) };

    // Routes for p1 carry the community, routes for p2 do not: only p1
    // survives a filter on the community.
    let x = bdd.or(bdd.and(p1, c0), bdd.and(p2, bdd.not(c0)));
    assert_eq!(domain.transform(&x, &transformer(&func)), p1);

    // An unconstrained community bit is blocked under some assignment, so
    // the projection must not smuggle the routes through.
    assert_eq!(domain.transform(&p1, &transformer(&func)), bdd.zero());
}

#[test]
fn test_header_domain_value_is_projected() {
    let (bdd, vars, routers) = setup(1);
    let domain = HeaderDomain::new(bdd.clone(), vars.clone());

    let v = domain.value(routers[1], Protocol::Ospf, &btreeset! {prefix(10, 8)});
    let expected = bdd.and(
        vars.dst_router().value(&bdd, &routers[1]),
        vars.prefix_to_bdd(&prefix(10, 8)),
    );
    assert_eq!(v, expected);
}

#[test]
fn test_exact_domain_best_route() {
    let (bdd, vars, routers) = setup(0);
    let domain = ExactDomain::new(bdd.clone(), vars.clone());
    let p = prefix(10, 8);

    // Connected (admin distance 0) beats OSPF (110).
    let conn = domain.value(routers[0], Protocol::Connected, &btreeset! {p});
    let ospf = domain.value(routers[1], Protocol::Ospf, &btreeset! {p});
    let merged = domain.merge(&ospf, &conn);
    assert_eq!(merged.len(), 1);
    let best = merged.get(&p).unwrap();
    assert_eq!(best.protocol, Protocol::Connected);
    assert_eq!(best.dst_router, routers[0]);

    // Merging is insensitive to the argument order.
    assert_eq!(domain.merge(&conn, &ospf), merged);
}

#[test]
fn test_exact_domain_name_tie_break() {
    let (bdd, vars, routers) = setup(0);
    let domain = ExactDomain::new(bdd.clone(), vars.clone());
    let p = prefix(10, 8);

    // Same admin distance and metric; "bgp" < "ospf" decides.
    let mut bgp = domain.value(routers[0], Protocol::Bgp, &btreeset! {p});
    let mut ospf = domain.value(routers[1], Protocol::Ospf, &btreeset! {p});
    bgp.get_mut(&p).unwrap().admin_dist = 50;
    ospf.get_mut(&p).unwrap().admin_dist = 50;

    let merged = domain.merge(&ospf, &bgp);
    assert_eq!(merged.get(&p).unwrap().protocol, Protocol::Bgp);
}

#[test]
fn test_exact_domain_filter_and_projection() {
    let (bdd, vars, routers) = setup(0);
    let domain = ExactDomain::new(bdd.clone(), vars.clone());
    let p1 = prefix(10, 8);
    let p2 = prefix(11, 8);

    let v = domain.value(routers[0], Protocol::Connected, &btreeset! {p1, p2});
    let func = TransferFunction {
        id: 0,
        filter: vars.prefix_to_bdd(&p1),
        updates: RouteUpdates::none(0),
    };
    let out = domain.transform(&v, &transformer(&func));
    assert_eq!(out.len(), 1);
    assert!(out.contains_key(&p1));

    // The symbolic projection agrees with the full domain.
    let symbolic = RouteDomain::new(bdd.clone(), vars.clone());
    assert_eq!(
        domain.to_bdd(&v),
        symbolic.value(routers[0], Protocol::Connected, &btreeset! {p1, p2})
    );
}

#[test]
fn test_atom_domain() {
    let (bdd, vars, _) = setup(1);
    let c0 = vars.community(0);

    let func = TransferFunction {
        id: 0,
        filter: c0,
        updates: RouteUpdates::none(1).set_community(&bdd, 0, false),
    };
    let partition = atomic_predicates_closed(&bdd, &vars, &[c0], &[func.clone()]);
    let domain = AtomDomain::new(bdd.clone(), partition);

    let all = domain.value(RouterId::new(0), Protocol::Bgp, &btreeset! {});
    assert_eq!(all.count(), domain.partition().atoms.len());
    assert_eq!(domain.to_bdd(&all), bdd.one());
    assert_eq!(domain.to_bdd(&domain.bot()), bdd.zero());

    // Everything with the community passes the filter, which then clears the
    // bit: the image is exactly the atom without the community.
    let out = domain.transform(&all, &transformer(&func));
    assert_eq!(domain.to_bdd(&out), bdd.not(c0));

    let merged = domain.merge(&out, &domain.bot());
    assert_eq!(merged, out);
}
