//! Tseitin and end-to-end pipeline tests.

use crate::prelude::{formula::Formulas, tseitin::*, *};

/// Runs the full pipeline on a program, returns the DIMACS rendering.
fn compile(input: &str) -> String {
    let cfg = parse::parse(input).unwrap();
    let fs = Formulas::new();
    let formula = eval::formula_of(&cfg, &fs).unwrap();
    let cnf = transform(&fs, &formula);
    dimacs::to_string(&cnf)
}

/// Brute-force satisfiability of a CNF conjoined with some extra clauses.
fn sat(cnf: &Cnf, extra: &[Clause]) -> bool {
    let mut clauses: Vec<&Clause> = cnf.clauses.iter().collect();
    clauses.extend(extra.iter());
    let extra_max = extra
        .iter()
        .flat_map(|clause| clause.iter())
        .map(|lit| lit.unsigned_abs() as usize)
        .max()
        .unwrap_or(0);
    let n = cnf.num_vars().max(extra_max);
    assert!(n <= 16, "brute-force check is limited to 16 variables");

    'assignments: for bits in 0u32..(1 << n) {
        let value = |lit: i64| {
            let var = lit.unsigned_abs() as usize;
            let val = bits & (1 << (var - 1)) != 0;
            if lit > 0 {
                val
            } else {
                !val
            }
        };
        for clause in &clauses {
            if !clause.iter().any(|&lit| value(lit)) {
                continue 'assignments;
            }
        }
        return true;
    }
    false
}

#[test]
fn trivial_truth() {
    // ⊤ short-circuits to a single clause over the reserved variable 1.
    assert_eq!(
        compile("function is_sat { x = true return x }"),
        "p cnf 1 1\n1 -1 0\n",
    );
}

#[test]
fn trivial_falsity() {
    assert_eq!(
        compile("function is_sat { return false }"),
        "p cnf 1 2\n1 0\n-1 0\n",
    );
}

#[test]
fn single_variable() {
    assert_eq!(
        compile("grid g[2] function is_sat { return g[0] }"),
        "p cnf 1 1\n1 0\n",
    );
}

#[test]
fn conjunction() {
    assert_eq!(
        compile("grid g[2] function is_sat { return g[0] && g[1] }"),
        "p cnf 3 4\n3 0\n3 -1 -2 0\n-3 1 0\n-3 2 0\n",
    );
}

#[test]
fn negation() {
    assert_eq!(
        compile("grid g[2] function is_sat { return !g[0] }"),
        "p cnf 2 3\n2 0\n2 1 0\n-2 -1 0\n",
    );
}

#[test]
fn loop_collapses_to_last_binding() {
    // The loop's own iterations are all ⊤; `x` resolves to `g[2]`.
    assert_eq!(
        compile("grid g[3] function is_sat { for i in 3 { x = g[i] } return x }"),
        "p cnf 3 1\n3 0\n",
    );
}

#[test]
fn property_index() {
    // `g[0][color.blue]` is the flat variable 2, hence the literal 3.
    assert_eq!(
        compile(
            "property color { red blue } grid g[2][color] \
            function is_sat { return g[0][color.blue] }"
        ),
        "p cnf 3 1\n3 0\n",
    );
}

#[test]
fn shared_subformulas_are_defined_once() {
    // Both conjunctions map to the same definitional variable 3; only the disjunction is new.
    assert_eq!(
        compile("grid g[2] function is_sat { return (g[0] && g[1]) || (g[0] && g[1]) }"),
        "p cnf 4 7\n4 0\n3 -1 -2 0\n-3 1 0\n-3 2 0\n-4 3 3 0\n4 -3 0\n4 -3 0\n",
    );
}

#[test]
fn branch_is_equisatisfiable_with_conjunction() {
    let cfg =
        parse::parse("grid g[2] function is_sat { if g[0] { return g[1] } return g[0] }").unwrap();
    let fs = Formulas::new();
    let formula = eval::formula_of(&cfg, &fs).unwrap();
    let cnf = transform(&fs, &formula);

    // The program means `g[0] && g[1]`: satisfiable, forced to the all-true assignment.
    assert!(sat(&cnf, &[]));
    assert!(sat(&cnf, &[vec![1], vec![2]]));
    assert!(!sat(&cnf, &[vec![-1]]));
    assert!(!sat(&cnf, &[vec![-2]]));
}

#[test]
fn demo_header_is_consistent() {
    let out = compile(crate::DEMO);
    let mut lines = out.lines();

    let header = lines.next().unwrap();
    let mut parts = header.split_whitespace();
    assert_eq!(parts.next(), Some("p"));
    assert_eq!(parts.next(), Some("cnf"));
    let vars: usize = parts.next().unwrap().parse().unwrap();
    let clauses: usize = parts.next().unwrap().parse().unwrap();

    let (mut max, mut count) = (0, 0);
    for line in lines {
        let lits: Vec<i64> = line
            .split_whitespace()
            .map(|s| s.parse().unwrap())
            .collect();
        // Clauses end with the `0` terminator, and `0` never appears as a literal.
        assert_eq!(*lits.last().unwrap(), 0);
        let lits = &lits[..lits.len() - 1];
        assert!(lits.iter().all(|&lit| lit != 0));
        let clause_max = lits.iter().map(|lit| lit.unsigned_abs() as usize).max();
        max = max.max(clause_max.unwrap_or(0));
        count += 1;
    }
    assert_eq!(vars, max);
    assert_eq!(clauses, count);
}

#[test]
fn empty_clauses_render_as_bare_terminators() {
    let cnf = Cnf {
        clauses: vec![vec![2], vec![]],
    };
    assert_eq!(dimacs::to_string(&cnf), "p cnf 2 2\n2 0\n0\n");
}
