//! Slang driver: compiles a slang file to `output.dimacs`.
//!
//! Prints the CFG (as a GraphViz digraph) and the evaluated formula to stdout; errors go to
//! stderr as `err: ...` lines and exit with code `1`.

use clap::Parser;

use slang::{
    dimacs,
    err::{ChainExt, Res},
    eval,
    formula::Formulas,
    parse, tseitin,
};

/// Compiles a slang constraint program to DIMACS CNF.
#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Input slang file.
    input: std::path::PathBuf,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        for err in e.iter() {
            eprintln!("err: {}", err);
        }
        std::process::exit(1)
    }
}

/// Runs the pipeline on the input file.
fn run(args: &Args) -> Res<()> {
    let txt = std::fs::read_to_string(&args.input)
        .chain_err(|| format!("could not open file `{}`", args.input.display()))?;

    let cfg = parse::parse(&txt)?;
    print!("{}", cfg);

    let fs = Formulas::new();
    let formula = eval::formula_of(&cfg, &fs)?;
    println!("{}", formula);

    let cnf = tseitin::transform(&fs, &formula);
    dimacs::write_file(dimacs::OUT_FILE, &cnf)
}
