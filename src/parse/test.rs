//! Parser tests.

use crate::prelude::{cfg::*, parse::*, *};

/// Rendered error of an input that must fail parsing.
fn parse_err(input: &str) -> String {
    match parse(input) {
        Ok(_) => panic!("parsing `{}` did not fail", input),
        Err(e) => e.to_string(),
    }
}

#[test]
fn branch_cfg() {
    let cfg = parse(
        "grid g[2]\n\
        function is_sat {\n\
            if g[0] {\n\
                return g[1]\n\
            }\n\
            return g[0]\n\
        }",
    )
    .unwrap();
    assert_eq!(cfg.blocks.len(), 3);
    assert_eq!(
        cfg.to_string(),
        "digraph {\n\
        \x20 0 [shape=record,label=\"bb0\\nbr g0[0]\"]\n\
        \x20 0->1 [label=\"1\"]\n\
        \x20 0->2\n\
        \x20 2 [shape=record,label=\"bb2\\nreturn g0[0]\"]\n\
        \x20 1 [shape=record,label=\"bb1\\nreturn g0[1]\"]\n\
        }\n",
    );
}

#[test]
fn loop_cfg() {
    let cfg = parse("grid g[3] function is_sat { for i in 3 { x = g[i] } return x }").unwrap();
    assert_eq!(
        cfg.to_string(),
        "digraph {\n\
        \x20 0 [shape=record,label=\"bb0\\nfor i0 in 3\\nreturn lv0\"]\n\
        \x20 0->1 [color=red,label=\"i0\"]\n\
        \x20 1 [shape=record,label=\"bb1\\nlv0 = g0[i0]\"]\n\
        }\n",
    );
}

#[test]
fn arm_without_return_jumps_to_exit() {
    let cfg = parse(
        "grid g[2] function is_sat { if g[0] { x = g[1] } else { x = g[0] } return x }",
    )
    .unwrap();
    // Entry, two arms, exit.
    assert_eq!(cfg.blocks.len(), 4);
    let exit = match cfg.block(cfg.entry).terminator {
        Some(Terminator::Branch { thn, els, .. }) => {
            assert!(matches!(
                cfg.block(thn).terminator,
                Some(Terminator::Goto(tgt)) if tgt == els + 1
            ));
            assert!(matches!(
                cfg.block(els).terminator,
                Some(Terminator::Goto(tgt)) if tgt == els + 1
            ));
            els + 1
        }
        ref t => panic!("expected a branch terminator, got {:?}", t),
    };
    assert!(matches!(
        cfg.block(exit).terminator,
        Some(Terminator::Return(_))
    ));
}

#[test]
fn local_ids_are_reused() {
    let cfg = parse("function is_sat { x = true y = x x = y return x }").unwrap();
    let insts = &cfg.block(cfg.entry).insts;
    assert_eq!(insts.len(), 3);
    assert!(matches!(
        insts[0],
        Instruction::Assign { lvar: 0, rhs: Expression::True }
    ));
    assert!(matches!(
        insts[1],
        Instruction::Assign { lvar: 1, rhs: Expression::LVar(0) }
    ));
    assert!(matches!(
        insts[2],
        Instruction::Assign { lvar: 0, rhs: Expression::LVar(1) }
    ));
}

#[test]
fn grid_allocation() {
    let mut parser = Parser::new(
        "grid a[2][3] grid b[4] property p { u v } grid c[p][p] function is_sat { return a[0][0] }",
    )
    .unwrap();
    let _cfg = parser.file().unwrap();

    // Variable blocks are contiguous, in declaration order, and disjoint.
    let a = &parser.grids()["a"];
    assert_eq!((a.start, a.size()), (0, 6));
    let b = &parser.grids()["b"];
    assert_eq!((b.start, b.size()), (6, 4));
    let c = &parser.grids()["c"];
    assert_eq!(c.dims, vec![2, 2]);
    assert_eq!((c.start, c.size()), (10, 4));
    assert_eq!(parser.var_count(), 14);

    let p = parser.property("p").unwrap();
    assert_eq!(p.values, vec!["u".to_string(), "v".to_string()]);
}

#[test]
fn declaration_errors() {
    assert_eq!(
        parse_err("property p { a } property p { b } function is_sat { return true }"),
        "line 1: duplicate property `p`",
    );
    assert_eq!(
        parse_err("grid g[2] grid g[3] function is_sat { return true }"),
        "line 1: duplicate grid `g`",
    );
    assert_eq!(
        parse_err("grid g function is_sat { return true }"),
        "line 1: expected at least one dimension for grid `g`",
    );
    assert_eq!(
        parse_err("grid g[0] function is_sat { return true }"),
        "line 1: grid dimensions must be positive",
    );
    assert_eq!(
        parse_err("grid g[q] function is_sat { return true }"),
        "line 1: unknown property `q`",
    );
    assert_eq!(parse_err("grid g[2]"), "line 1: expected a `function is_sat` declaration");
    assert_eq!(
        parse_err("function is_sat { return true } function is_sat { return true }"),
        "line 1: expected one function but found another",
    );
    assert_eq!(
        parse_err("function main { return true }"),
        "line 1: expected function name to be `is_sat`",
    );
}

#[test]
fn statement_errors() {
    assert_eq!(
        parse_err("function is_sat { }"),
        "line 1: expected function return at end as safeguard",
    );
    assert_eq!(
        parse_err("function is_sat { x = true }"),
        "line 1: expected function return at end as safeguard",
    );
    assert_eq!(
        parse_err("function is_sat { return true x = true }"),
        "line 1: statement after `return`",
    );
    assert_eq!(
        parse_err("function is_sat { x true return x }"),
        "line 1: expected `=` after identifier, found `true`",
    );
    assert_eq!(
        parse_err("function is_sat { for i in n { } return true }"),
        "line 1: expected a literal loop length, found 'identifier'",
    );
    assert_eq!(
        parse_err("function is_sat { for i in 0 { } return true }"),
        "line 1: loop length must be positive",
    );
}

#[test]
fn expression_errors() {
    assert_eq!(
        parse_err("function is_sat { return g[0] }"),
        "line 1: unknown grid `g`",
    );
    assert_eq!(
        parse_err("function is_sat { return x }"),
        "line 1: unknown local variable `x`",
    );
    assert_eq!(
        parse_err("grid g[2][2]\nfunction is_sat { return g[0] }"),
        "line 2: grid `g` has 2 dimension(s) but only 1 are indexed",
    );
    assert_eq!(
        parse_err("grid g[2]\nfunction is_sat { return g[0][0] }"),
        "line 2: grid `g` has only 1 dimension(s)",
    );
    assert_eq!(
        parse_err("grid g[2]\nfunction is_sat { return g[7] }"),
        "line 2: index 7 is out of bounds for a dimension of size 2",
    );
    assert_eq!(
        parse_err("grid g[2] function is_sat { return g[i] }"),
        "line 1: unknown index variable `i`",
    );
    assert_eq!(
        parse_err("grid g[2] function is_sat { for i in 2 { x = g[i] } return g[i] }"),
        "line 1: index variable `i` is not bound by an enclosing `for`",
    );
    assert_eq!(
        parse_err("property p { a } grid g[2][p] function is_sat { return g[0][p.c] }"),
        "line 1: unknown value `c` for property `p`",
    );
    assert_eq!(
        parse_err("property p { a } grid g[2] function is_sat { return g[q.a] }"),
        "line 1: unknown property `q`",
    );
    assert_eq!(
        parse_err("function is_sat { return && }"),
        "line 1: expected an expression, found `&&`",
    );
}

#[test]
fn pretty_errors() {
    let err = parse("grid board[2]\nfunction is_sat { return board[7] }").unwrap_err();
    let pretty = err.source.pretty();
    println!("{}", pretty);
    assert!(pretty.contains("parse error at 2:"));
    assert!(pretty.contains("^~~~ index 7 is out of bounds for a dimension of size 2"));
    assert!(pretty.contains("function is_sat { return board[7] }"));
}
