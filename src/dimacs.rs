//! DIMACS emission.
//!
//! Header `p cnf V C` where `V` is the largest variable mentioned anywhere in the body and `C`
//! the clause count; then one clause per line, literals space-separated and terminated by `0`.
//! An empty clause is the line `0` alone.

prelude!();

use std::{fs::File, io::BufWriter, path::Path};

use tseitin::Cnf;

/// Output path the driver writes to.
pub const OUT_FILE: &str = "output.dimacs";

/// Writes a CNF in DIMACS format.
pub fn write<W: Write>(w: &mut W, cnf: &Cnf) -> Res<()> {
    writeln!(w, "p cnf {} {}", cnf.num_vars(), cnf.len())?;
    for clause in &cnf.clauses {
        for lit in clause {
            write!(w, "{} ", lit)?;
        }
        writeln!(w, "0")?;
    }
    Ok(())
}

/// Renders a CNF to a DIMACS string.
///
/// # Examples
///
/// ```rust
/// # use slang::{dimacs, tseitin::Cnf};
/// let cnf = Cnf { clauses: vec![vec![3], vec![3, -1, -2], vec![-3, 1], vec![-3, 2]] };
/// assert_eq!(
///     dimacs::to_string(&cnf),
///     "p cnf 3 4\n3 0\n3 -1 -2 0\n-3 1 0\n-3 2 0\n",
/// );
/// ```
pub fn to_string(cnf: &Cnf) -> String {
    let mut buf = vec![];
    write(&mut buf, cnf).expect("writing to a buffer cannot fail");
    String::from_utf8(buf).expect("DIMACS output is ASCII")
}

/// Writes a CNF to a file, in one pass.
pub fn write_file(path: impl AsRef<Path>, cnf: &Cnf) -> Res<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .chain_err(|| format!("could not open file `{}`", path.display()))?;
    let mut writer = BufWriter::new(file);
    write(&mut writer, cnf)
}
