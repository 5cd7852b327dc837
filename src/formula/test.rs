//! Tests over the formula algebra.

use crate::prelude::{formula::*, *};

#[test]
fn sentinels() {
    let fs = Formulas::new();
    assert_eq!(fs.tru().to_string(), "(1 ⋁ (¬1))");
    assert_eq!(fs.fls().to_string(), "(1 ⋀ (¬1))");
    assert!(Rc::ptr_eq(&fs.not(fs.tru()), &fs.fls()));
    assert!(Rc::ptr_eq(&fs.not(fs.fls()), &fs.tru()));
    // Sentinels are compared by identity, not structure.
    let lit_1 = fs.lit(1);
    let lookalike = Rc::new(Formula::Or(lit_1.clone(), Rc::new(Formula::Not(lit_1))));
    assert_eq!(*lookalike, *fs.tru());
    assert!(!fs.is_tru(&lookalike));
}

#[test]
fn and_identities() {
    let fs = Formulas::new();
    let a = fs.lit(2);
    assert!(Rc::ptr_eq(&fs.and(fs.tru(), a.clone()), &a));
    assert!(Rc::ptr_eq(&fs.and(a.clone(), fs.tru()), &a));
    assert!(Rc::ptr_eq(&fs.and(fs.fls(), a.clone()), &fs.fls()));
    assert!(Rc::ptr_eq(&fs.and(a.clone(), fs.fls()), &fs.fls()));
    assert!(Rc::ptr_eq(&fs.and(a.clone(), a.clone()), &a));
}

#[test]
fn or_identities() {
    let fs = Formulas::new();
    let a = fs.lit(2);
    assert!(Rc::ptr_eq(&fs.or(fs.fls(), a.clone()), &a));
    assert!(Rc::ptr_eq(&fs.or(a.clone(), fs.fls()), &a));
    assert!(Rc::ptr_eq(&fs.or(fs.tru(), a.clone()), &fs.tru()));
    assert!(Rc::ptr_eq(&fs.or(a.clone(), fs.tru()), &fs.tru()));
    assert!(Rc::ptr_eq(&fs.or(a.clone(), a.clone()), &a));
}

#[test]
fn equal_operand_asymmetry() {
    let fs = Formulas::new();
    // Two distinct but structurally equal conjunctions.
    let c_1 = fs.and(fs.lit(2), fs.lit(3));
    let c_2 = fs.and(fs.lit(2), fs.lit(3));
    assert!(!Rc::ptr_eq(&c_1, &c_2));
    assert_eq!(*c_1, *c_2);
    // `and` collapses them, `or` does not.
    assert!(Rc::ptr_eq(&fs.and(c_1.clone(), c_2.clone()), &c_1));
    let or = fs.or(c_1, c_2);
    assert!(matches!(*or, Formula::Or(_, _)));
}

#[test]
fn no_reassociation() {
    let fs = Formulas::new();
    let (a, b, c) = (fs.lit(2), fs.lit(3), fs.lit(4));
    let left = fs.or(fs.or(a.clone(), b.clone()), c.clone());
    let right = fs.or(a, fs.or(b, c));
    assert_eq!(left.to_string(), "((2 ⋁ 3) ⋁ 4)");
    assert_eq!(right.to_string(), "(2 ⋁ (3 ⋁ 4))");
    assert_ne!(*left, *right);
}

#[test]
fn max_var() {
    let fs = Formulas::new();
    let f = fs.and(fs.or(fs.lit(3), fs.not(fs.lit(17))), fs.lit(5));
    assert_eq!(f.max_var(), 17);
    assert_eq!(fs.lit(1).max_var(), 1);
}
