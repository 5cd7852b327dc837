//! Tseitin transformation: arbitrary formulas to equisatisfiable CNF.
//!
//! Every non-literal subformula gets a fresh propositional variable defined by biconditional
//! clauses; the CNF opens with a unit clause asserting the root's variable. Subformulas are
//! hash-consed by their operator and the variables already assigned to their children, so a
//! repeated subformula is defined once and reuses its variable. Definitions are emitted in
//! first-assignment order, which makes the clause list deterministic.

prelude!();

use formula::{Formula, Formulas};
use fxhash::FxHashMap;

#[cfg(test)]
mod test;

/// A clause: a disjunction of signed literals.
///
/// A positive integer is a propositional variable, a negative one its negation; `0` never
/// appears.
pub type Clause = Vec<i64>;

/// A CNF: a conjunction of clauses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cnf {
    /// The clauses.
    pub clauses: Vec<Clause>,
}
impl Cnf {
    /// Largest variable mentioned by any clause.
    pub fn num_vars(&self) -> usize {
        let mut max = 0;
        for clause in &self.clauses {
            for lit in clause {
                let var = lit.unsigned_abs() as usize;
                debug_assert!(var != 0, "0 is not a valid variable");
                if var > max {
                    max = var
                }
            }
        }
        max
    }

    /// Number of clauses.
    pub fn len(&self) -> usize {
        self.clauses.len()
    }
    /// True if there are no clauses.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }
}

/// A definitional gate, keyed by the variables assigned to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Gate {
    /// `p ↔ a ⋀ b`.
    And(usize, usize),
    /// `p ↔ a ⋁ b`.
    Or(usize, usize),
    /// `p ↔ ¬b`.
    Not(usize),
}

/// Transforms a formula into an equisatisfiable CNF.
///
/// The ⊤ and ⊥ sentinels short-circuit to their direct encodings over the reserved variable `1`:
/// `(1 ⋁ ¬1)` and `(1) ⋀ (¬1)` respectively.
///
/// # Examples
///
/// ```rust
/// # use slang::{formula::Formulas, tseitin};
/// let fs = Formulas::new();
/// // 1 ⋀ 2, with 3 the fresh variable defining the conjunction.
/// let cnf = tseitin::transform(&fs, &fs.and(fs.lit(1), fs.lit(2)));
/// assert_eq!(
///     cnf.clauses,
///     vec![vec![3], vec![3, -1, -2], vec![-3, 1], vec![-3, 2]],
/// );
/// assert_eq!(cnf.num_vars(), 3);
/// ```
pub fn transform(fs: &Formulas, root: &Rc<Formula>) -> Cnf {
    if fs.is_tru(root) {
        return Cnf {
            clauses: vec![vec![1, -1]],
        };
    }
    if fs.is_fls(root) {
        return Cnf {
            clauses: vec![vec![1], vec![-1]],
        };
    }

    let mut tseitin = Tseitin::new(root.max_var());
    let root_id = tseitin.assign(root);

    let mut clauses = vec![vec![root_id as i64]];
    for (gate, p) in &tseitin.defs {
        let p = *p as i64;
        match *gate {
            Gate::And(a, b) => {
                let (a, b) = (a as i64, b as i64);
                clauses.push(vec![p, -a, -b]);
                clauses.push(vec![-p, a]);
                clauses.push(vec![-p, b]);
            }
            Gate::Or(a, b) => {
                let (a, b) = (a as i64, b as i64);
                clauses.push(vec![-p, a, b]);
                clauses.push(vec![p, -a]);
                clauses.push(vec![p, -b]);
            }
            Gate::Not(b) => {
                let b = b as i64;
                clauses.push(vec![p, b]);
                clauses.push(vec![-p, -b]);
            }
        }
    }

    let cnf = Cnf { clauses };
    debug!(
        "tseitin produced {} clauses over {} variables",
        cnf.len(),
        cnf.num_vars()
    );
    cnf
}

/// Transformation state: the fresh-variable counter and the hash-cons tables.
struct Tseitin {
    /// Next fresh variable.
    next_fresh: usize,
    /// Gate → assigned variable.
    map: FxHashMap<Gate, usize>,
    /// Same associations, in first-assignment order.
    defs: Vec<(Gate, usize)>,
}
impl Tseitin {
    /// Constructor; fresh variables start right after the formula's own.
    fn new(max_var: usize) -> Self {
        Self {
            next_fresh: max_var + 1,
            map: FxHashMap::default(),
            defs: Vec::new(),
        }
    }

    /// The variable standing for a formula, allocating definitions bottom-up.
    fn assign(&mut self, f: &Formula) -> usize {
        match f {
            Formula::Lit(v) => *v,
            Formula::Not(inner) => {
                let b = self.assign(inner);
                self.gate(Gate::Not(b))
            }
            Formula::And(left, right) => {
                let a = self.assign(left);
                let b = self.assign(right);
                self.gate(Gate::And(a, b))
            }
            Formula::Or(left, right) => {
                let a = self.assign(left);
                let b = self.assign(right);
                self.gate(Gate::Or(a, b))
            }
        }
    }

    /// The variable of a gate: the hash-consed one if the gate is known, a fresh one otherwise.
    fn gate(&mut self, gate: Gate) -> usize {
        if let Some(&p) = self.map.get(&gate) {
            return p;
        }
        let p = self.next_fresh;
        self.next_fresh += 1;
        trace!("fresh variable {} for {:?}", p, gate);
        self.map.insert(gate, p);
        self.defs.push((gate, p));
        p
    }
}
