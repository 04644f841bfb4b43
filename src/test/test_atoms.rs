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
    apply_updates, atomic_predicates, atomic_predicates_closed, AtomBits, RouteUpdates, RouteVars,
    TransferFunction,
};
use crate::bdd::{Bdd, Ref};
use crate::net::RouterId;
use std::collections::HashSet;
use std::rc::Rc;

#[test]
fn test_atom_bits() {
    let mut a = AtomBits::new(70);
    assert!(a.is_empty());
    a.set(0);
    a.set(69);
    assert!(a.get(0));
    assert!(!a.get(1));
    assert!(a.get(69));
    assert_eq!(a.count(), 2);
    assert_eq!(a.ones().collect::<Vec<_>>(), vec![0, 69]);

    let mut b = AtomBits::new(70);
    b.set(1);
    b.union_with(&a);
    assert_eq!(b.count(), 3);

    let full = AtomBits::all(70);
    assert_eq!(full.count(), 70);
    let mut built = AtomBits::new(70);
    for i in 0..70 {
        built.set(i);
    }
    assert_eq!(built, full);
}

#[test]
fn test_partition_disjoint_and_complete() {
    let bdd = Bdd::new();
    let x = bdd.mk_var(1);
    let y = bdd.mk_var(2);
    let z = bdd.mk_var(3);

    let preds = [x, bdd.and(x, y), bdd.or(y, z)];
    let atoms = atomic_predicates(&bdd, &preds);

    for (i, &a) in atoms.iter().enumerate() {
        assert!(!bdd.is_zero(a));
        for &b in &atoms[i + 1..] {
            assert_eq!(bdd.and(a, b), bdd.zero());
        }
    }
    assert_eq!(bdd.or_all(atoms.iter().copied()), bdd.one());

    // Every input predicate is a union of atoms.
    for &p in &preds {
        let covered = bdd.or_all(atoms.iter().copied().filter(|&a| !bdd.is_zero(bdd.and(a, p))));
        assert_eq!(covered, p);
    }
}

#[test]
fn test_partition_idempotent() {
    let bdd = Bdd::new();
    let x = bdd.mk_var(1);
    let y = bdd.mk_var(2);
    let z = bdd.mk_var(3);

    // Re-partitioning an already-disjoint partition is a no-op.
    let atoms = atomic_predicates(&bdd, &[x, bdd.and(x, y), bdd.or(y, z)]);
    let again = atomic_predicates(&bdd, &atoms);
    let a: HashSet<Ref> = atoms.into_iter().collect();
    let b: HashSet<Ref> = again.into_iter().collect();
    assert_eq!(a, b);
}

#[test]
fn test_partition_order_independent() {
    let bdd = Bdd::new();
    let x = bdd.mk_var(1);
    let y = bdd.mk_var(2);
    let z = bdd.mk_var(3);

    let preds = [x, bdd.and(x, y), bdd.or(y, z)];
    let permuted = [bdd.or(y, z), x, bdd.and(x, y)];

    let a: HashSet<Ref> = atomic_predicates(&bdd, &preds).into_iter().collect();
    let b: HashSet<Ref> = atomic_predicates(&bdd, &permuted).into_iter().collect();
    assert_eq!(a, b);
}

#[test]
fn test_partition_constants_are_noops() {
    let bdd = Bdd::new();
    let x = bdd.mk_var(1);

    let with_constants = atomic_predicates(&bdd, &[bdd.zero(), x, bdd.one()]);
    let without = atomic_predicates(&bdd, &[x]);
    let a: HashSet<Ref> = with_constants.into_iter().collect();
    let b: HashSet<Ref> = without.into_iter().collect();
    assert_eq!(a, b);

    assert_eq!(atomic_predicates(&bdd, &[]), vec![bdd.one()]);
}

#[test]
fn test_partition_closure_under_images() {
    let bdd = Rc::new(Bdd::new());
    let routers = [RouterId::new(0), RouterId::new(1)];
    let vars = RouteVars::new(bdd.clone(), &routers, 2);
    let c0 = vars.community(0);
    let c1 = vars.community(1);

    // The policy copies community 1 into community 0, which the base
    // partition of [c1] cannot express.
    let func = TransferFunction {
        id: 0,
        filter: bdd.one(),
        updates: RouteUpdates::none(2).set_community_expr(0, c1),
    };
    let partition = atomic_predicates_closed(&bdd, &vars, &[c1], &[func.clone()]);

    assert_eq!(partition.atoms.len(), 4);
    let expected: HashSet<Ref> = [
        bdd.and(c1, c0),
        bdd.and(c1, bdd.not(c0)),
        bdd.and(bdd.not(c1), c0),
        bdd.and(bdd.not(c1), bdd.not(c0)),
    ]
    .into_iter()
    .collect();
    let got: HashSet<Ref> = partition.atoms.iter().copied().collect();
    assert_eq!(got, expected);

    // The image of every atom is exactly the union of its covering atoms.
    for (i, &atom) in partition.atoms.iter().enumerate() {
        let img = apply_updates(&bdd, &vars, bdd.and(atom, func.filter), &func.updates);
        let cover = partition.image_of(func.id, i);
        let union = bdd.or_all(cover.ones().map(|j| partition.atoms[j]));
        assert_eq!(union, img);
    }

    // The input predicate is covered exactly.
    let cover = partition.cover_of(c1);
    assert_eq!(bdd.or_all(cover.ones().map(|j| partition.atoms[j])), c1);
}
