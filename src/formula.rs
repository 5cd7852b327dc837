//! SAT formula trees and the algebra that builds them.
//!
//! Formulas are shared [`Rc`] trees over one-based propositional literals. A [`Formulas`] factory
//! owns the two sentinel nodes ⊤ and ⊥ for a run; its smart constructors apply the identity laws
//! by comparing operands against the sentinels *by pointer*, so the sentinels never end up inside
//! a bigger formula.
//!
//! Structural equality on formulas is plain recursive equality: `(a ⋁ b) ⋁ c` is distinct from
//! `a ⋁ (b ⋁ c)`, and no commutativity is applied. The derived hash mirrors this, which is what
//! the Tseitin step's hash-consing relies on.

prelude!();

#[cfg(test)]
mod test;

/// A SAT formula node.
///
/// Literals are one-based so that `0` never exists and can serve as the DIMACS clause terminator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    /// A propositional literal, `≥ 1`.
    Lit(usize),
    /// Negation.
    Not(Rc<Formula>),
    /// Conjunction.
    And(Rc<Formula>, Rc<Formula>),
    /// Disjunction.
    Or(Rc<Formula>, Rc<Formula>),
}
impl Formula {
    /// Largest literal occurring in the formula, `0` if there is none.
    pub fn max_var(&self) -> usize {
        match self {
            Self::Lit(v) => *v,
            Self::Not(inner) => inner.max_var(),
            Self::And(left, right) | Self::Or(left, right) => {
                left.max_var().max(right.max_var())
            }
        }
    }
}
impl fmt::Display for Formula {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lit(v) => v.fmt(fmt),
            Self::Not(inner) => write!(fmt, "(¬{})", inner),
            Self::And(left, right) => write!(fmt, "({} ⋀ {})", left, right),
            Self::Or(left, right) => write!(fmt, "({} ⋁ {})", left, right),
        }
    }
}

/// Formula factory owning the ⊤/⊥ sentinels of a run.
///
/// The sentinels are built over the reserved literal `1`: ⊤ is `(1 ⋁ ¬1)` and ⊥ is `(1 ⋀ ¬1)`.
/// They are compared by identity, not structure: a user-built `(1 ⋁ ¬1)` is *not* ⊤.
///
/// # Examples
///
/// ```rust
/// # use std::rc::Rc;
/// # use slang::formula::Formulas;
/// let fs = Formulas::new();
/// let (a, b) = (fs.lit(2), fs.lit(3));
/// // Identity laws.
/// assert!(Rc::ptr_eq(&fs.and(fs.tru(), a.clone()), &a));
/// assert!(Rc::ptr_eq(&fs.or(a.clone(), fs.fls()), &a));
/// assert!(Rc::ptr_eq(&fs.and(fs.fls(), b.clone()), &fs.fls()));
/// assert!(Rc::ptr_eq(&fs.or(b.clone(), fs.tru()), &fs.tru()));
/// assert!(Rc::ptr_eq(&fs.not(fs.tru()), &fs.fls()));
/// // Anything else allocates.
/// assert_eq!(fs.and(a, b).to_string(), "(2 ⋀ 3)");
/// ```
pub struct Formulas {
    /// The ⊤ sentinel.
    tru: Rc<Formula>,
    /// The ⊥ sentinel.
    fls: Rc<Formula>,
}
impl Default for Formulas {
    fn default() -> Self {
        Self::new()
    }
}
impl Formulas {
    /// Constructor, allocates the sentinels.
    pub fn new() -> Self {
        let lit_1 = Rc::new(Formula::Lit(1));
        let not_lit_1 = Rc::new(Formula::Not(lit_1.clone()));
        Self {
            tru: Rc::new(Formula::Or(lit_1.clone(), not_lit_1.clone())),
            fls: Rc::new(Formula::And(lit_1, not_lit_1)),
        }
    }

    /// The ⊤ sentinel.
    pub fn tru(&self) -> Rc<Formula> {
        self.tru.clone()
    }
    /// The ⊥ sentinel.
    pub fn fls(&self) -> Rc<Formula> {
        self.fls.clone()
    }
    /// True if the formula *is* the ⊤ sentinel.
    pub fn is_tru(&self, f: &Rc<Formula>) -> bool {
        Rc::ptr_eq(f, &self.tru)
    }
    /// True if the formula *is* the ⊥ sentinel.
    pub fn is_fls(&self, f: &Rc<Formula>) -> bool {
        Rc::ptr_eq(f, &self.fls)
    }

    /// A literal, `v ≥ 1`.
    pub fn lit(&self, v: usize) -> Rc<Formula> {
        debug_assert!(v >= 1);
        Rc::new(Formula::Lit(v))
    }

    /// Negation: `¬⊥ = ⊤` and `¬⊤ = ⊥`, otherwise allocates.
    pub fn not(&self, inner: Rc<Formula>) -> Rc<Formula> {
        if self.is_fls(&inner) {
            self.tru()
        } else if self.is_tru(&inner) {
            self.fls()
        } else {
            Rc::new(Formula::Not(inner))
        }
    }

    /// Conjunction.
    ///
    /// `⊥` absorbs, `⊤` is neutral, and equal operands collapse — by pointer, or by structure.
    pub fn and(&self, left: Rc<Formula>, right: Rc<Formula>) -> Rc<Formula> {
        if self.is_fls(&left) || self.is_fls(&right) {
            self.fls()
        } else if self.is_tru(&left) {
            right
        } else if self.is_tru(&right) {
            left
        } else if Rc::ptr_eq(&left, &right) {
            left
        } else if *left == *right {
            left
        } else {
            Rc::new(Formula::And(left, right))
        }
    }

    /// Disjunction.
    ///
    /// `⊤` absorbs, `⊥` is neutral, and pointer-equal operands collapse. Unlike [`Self::and`],
    /// structurally equal but distinct operands do *not* collapse.
    pub fn or(&self, left: Rc<Formula>, right: Rc<Formula>) -> Rc<Formula> {
        if self.is_tru(&left) || self.is_tru(&right) {
            self.tru()
        } else if self.is_fls(&left) {
            right
        } else if self.is_fls(&right) {
            left
        } else if Rc::ptr_eq(&left, &right) {
            left
        } else {
            Rc::new(Formula::Or(left, right))
        }
    }
}
