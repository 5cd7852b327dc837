//! Compiler front-end for `slang`, a small language for Boolean constraint problems over grids.
//!
//! A slang program declares finite-domain *properties* and n-dimensional *grids* of Boolean
//! variables, then constrains them in a single `is_sat` function written with assignments,
//! `if`/`else`, bounded `for` loops and `return`. The pipeline lowers a source file to DIMACS
//! CNF:
//!
//! 1. [`lexer`] and [`parse`] produce a control-flow graph of basic blocks ([`cfg`]) along with
//!    the symbol tables of the compilation unit;
//! 2. [`eval`] unrolls the loops and resolves local bindings, folding the CFG into one
//!    propositional [`formula`];
//! 3. [`tseitin`] turns the formula into an equisatisfiable CNF, which [`dimacs`] emits.
//!
//! The companion binary runs the whole pipeline: it prints the CFG (as GraphViz) and the formula
//! to stdout and writes the CNF to `output.dimacs`.

#![forbid(missing_docs)]

#[macro_use]
mod macros;

pub mod prelude;

pub mod cfg;
pub mod dimacs;
pub mod err;
pub mod eval;
pub mod formula;
pub mod lexer;
pub mod parse;
pub mod tseitin;

/// String representation of a simple demo problem.
///
/// Looks for a cell that is `red` and constrains it not to be `blue` as well.
///
/// # Examples
///
/// ```rust
/// let cfg = slang::parse::parse(slang::DEMO).unwrap();
/// let fs = slang::formula::Formulas::new();
/// let formula = slang::eval::formula_of(&cfg, &fs).unwrap();
/// let cnf = slang::tseitin::transform(&fs, &formula);
/// assert!(cnf.num_vars() >= 12);
/// ```
pub const DEMO: &str = r#"property color { red blue }

grid cell[2][3][color]

function is_sat {
    for row in 3 {
        for col in 2 {
            if cell[col][row][color.red] {
                return !cell[col][row][color.blue]
            }
        }
    }
    return true
}
"#;
