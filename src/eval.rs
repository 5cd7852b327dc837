//! Symbolic evaluator: folds a CFG into a single formula.
//!
//! Evaluation walks the blocks under a stack of lexical frames. Assignments bind their
//! right-hand side *expression* (not its value) in the current frame; a local-variable reference
//! re-translates the bound expression wherever it is used, so grid addresses inside it see the
//! index values live at the use site. While a binding is being unfolded, lookups of its own
//! variable only see strictly older bindings, so `x = !x && g[0]` reads the previous `x`.
//!
//! A `for` loop denotes existential choice over its index: the unrolled iterations are OR-joined
//! ("there is an `i` for which the body holds") and the result is AND-joined with the rest of the
//! block's constraints. Iterations run in ascending index order, mutating the index binding in
//! its owning frame.
//!
//! Branches translate to `(c ⋀ then) ⋁ (¬c ⋀ else)`. Each branch arm is evaluated in a fresh
//! frame, so bindings made in one arm are invisible to the other; loop bodies and `goto` targets
//! share the current frame, which is how a binding made inside a loop survives to the code after
//! it.

prelude!();

use cfg::{Cfg, Expression, Idx, Instruction, Terminator};
use formula::{Formula, Formulas};


/// Evaluates a CFG into one formula over its grid variables.
///
/// Grid addresses become one-based literals: the flat zero-based variable plus one, so that `0`
/// never appears as a literal downstream.
///
/// # Examples
///
/// ```rust
/// # use slang::{eval, formula::Formulas, parse};
/// let cfg = parse::parse("grid g[2] function is_sat { return g[0] && g[1] }").unwrap();
/// let fs = Formulas::new();
/// let formula = eval::formula_of(&cfg, &fs).unwrap();
/// assert_eq!(formula.to_string(), "(1 ⋀ 2)");
/// ```
pub fn formula_of(cfg: &Cfg, fs: &Formulas) -> Res<Rc<Formula>> {
    let mut eval = Eval {
        cfg,
        fs,
        scope: Scope::new(),
        unfolding: vec![],
    };
    let res = eval.block(cfg.entry)?;
    debug!("evaluated formula: {}", res);
    Ok(res)
}

/// One lexical frame.
#[derive(Default)]
struct Frame<'cfg> {
    /// Local bindings, later entries shadow earlier ones.
    locals: Vec<(LocalVar, &'cfg Expression)>,
    /// Index-variable values, mutated in place while unrolling.
    indices: Vec<(IndexVar, usize)>,
}

/// The evaluator's scope: a stack of owned frames.
///
/// Lookups walk the frames top-down and each frame's entries tail-first, so the freshest binding
/// wins. Index increments mutate the binding where it lives instead of shadowing it.
struct Scope<'cfg> {
    /// Frame stack, never empty.
    frames: Vec<Frame<'cfg>>,
}
impl<'cfg> Scope<'cfg> {
    /// Constructor: a single root frame.
    fn new() -> Self {
        Self {
            frames: vec![Frame::default()],
        }
    }

    /// Pushes a fresh frame.
    fn push(&mut self) {
        self.frames.push(Frame::default())
    }
    /// Pops the top frame.
    fn pop(&mut self) {
        self.frames.pop();
        debug_assert!(!self.frames.is_empty());
    }

    /// The current frame.
    fn top(&mut self) -> &mut Frame<'cfg> {
        self.frames.last_mut().expect("the scope stack is never empty")
    }

    /// Binds a local in the current frame.
    fn bind_local(&mut self, lvar: LocalVar, rhs: &'cfg Expression) {
        self.top().locals.push((lvar, rhs))
    }
    /// Binds an index variable in the current frame.
    fn bind_index(&mut self, idx_var: IndexVar, val: usize) {
        self.top().indices.push((idx_var, val))
    }

    /// The freshest binding of a local older than `cap`, with its position.
    ///
    /// A position is `(frame, entry)`; since new bindings always go to the top frame, positions
    /// order bindings chronologically. The evaluator passes the position of the binding it is
    /// currently unfolding as `cap`, so a right-hand side mentioning its own variable resolves to
    /// the previous binding instead of looping back into itself.
    fn local(
        &self,
        lvar: LocalVar,
        cap: Option<(usize, usize)>,
    ) -> Option<((usize, usize), &'cfg Expression)> {
        for (f, frame) in self.frames.iter().enumerate().rev() {
            for (e, (bound, rhs)) in frame.locals.iter().enumerate().rev() {
                if let Some(cap) = cap {
                    if (f, e) >= cap {
                        continue;
                    }
                }
                if *bound == lvar {
                    return Some(((f, e), rhs));
                }
            }
        }
        None
    }

    /// The current value of an index variable, if bound.
    fn index(&self, idx_var: IndexVar) -> Option<usize> {
        for frame in self.frames.iter().rev() {
            for (bound, val) in frame.indices.iter().rev() {
                if *bound == idx_var {
                    return Some(*val);
                }
            }
        }
        None
    }

    /// Increments an index variable in the frame owning its freshest binding.
    ///
    /// False if the variable is not bound anywhere.
    fn bump_index(&mut self, idx_var: IndexVar) -> bool {
        for frame in self.frames.iter_mut().rev() {
            for (bound, val) in frame.indices.iter_mut().rev() {
                if *bound == idx_var {
                    *val += 1;
                    return true;
                }
            }
        }
        false
    }
}

/// Evaluation state: the CFG, the formula factory, and the scope.
struct Eval<'a, 'txt> {
    /// CFG under evaluation.
    cfg: &'a Cfg<'txt>,
    /// Formula factory.
    fs: &'a Formulas,
    /// Scope stack.
    scope: Scope<'a>,
    /// Local bindings currently being unfolded, with their positions.
    unfolding: Vec<(LocalVar, (usize, usize))>,
}

impl<'a, 'txt> Eval<'a, 'txt> {
    /// Folds a block's instructions and terminator into one formula.
    fn block(&mut self, idx: BlockIdx) -> Res<Rc<Formula>> {
        let cfg = self.cfg;
        let bb = cfg.block(idx);

        let mut insts_res = self.fs.tru();
        for inst in &bb.insts {
            match inst {
                Instruction::Assign { lvar, rhs } => self.scope.bind_local(*lvar, rhs),
                Instruction::Loop { idx_var, len, body } => {
                    trace!("unrolling loop over i{}, {} iterations", idx_var, len);
                    self.scope.bind_index(*idx_var, 0);
                    let mut unrolled = self.block(*body)?;
                    for _ in 1..*len {
                        if !self.scope.bump_index(*idx_var) {
                            bail!("[internal] index variable i{} lost its binding", idx_var)
                        }
                        unrolled = self.fs.or(unrolled, self.block(*body)?);
                    }
                    insts_res = self.fs.and(insts_res, unrolled);
                }
            }
        }

        let term = match &bb.terminator {
            Some(term) => term,
            None => bail!("[internal] block bb{} has no terminator", idx),
        };
        let term_res = match term {
            Terminator::Goto(tgt) => self.block(*tgt)?,
            Terminator::Branch { cnd, thn, els } => {
                let cnd = self.expression(cnd)?;
                let not_cnd = self.fs.not(cnd.clone());
                self.scope.push();
                let thn_res = self.block(*thn);
                self.scope.pop();
                self.scope.push();
                let els_res = self.block(*els);
                self.scope.pop();
                let thn_res = self.fs.and(cnd, thn_res?);
                let els_res = self.fs.and(not_cnd, els_res?);
                self.fs.or(thn_res, els_res)
            }
            Terminator::Return(expr) => self.expression(expr)?,
            Terminator::End => self.fs.tru(),
        };

        Ok(self.fs.and(insts_res, term_res))
    }

    /// Translates an expression under the current scope.
    fn expression(&mut self, expr: &'a Expression) -> Res<Rc<Formula>> {
        match expr {
            Expression::False => Ok(self.fs.fls()),
            Expression::True => Ok(self.fs.tru()),
            Expression::LVar(lvar) => {
                let cap = self
                    .unfolding
                    .iter()
                    .rev()
                    .find_map(|(v, pos)| if v == lvar { Some(*pos) } else { None });
                let (pos, bound) = match self.scope.local(*lvar, cap) {
                    Some(found) => found,
                    None => bail!("local variable lv{} is unbound on this path", lvar),
                };
                self.unfolding.push((*lvar, pos));
                let res = self.expression(bound);
                self.unfolding.pop();
                res
            }
            Expression::Not(inner) => {
                let inner = self.expression(inner)?;
                Ok(self.fs.not(inner))
            }
            Expression::And(left, right) => {
                let left = self.expression(left)?;
                let right = self.expression(right)?;
                Ok(self.fs.and(left, right))
            }
            Expression::Or(left, right) => {
                let left = self.expression(left)?;
                let right = self.expression(right)?;
                Ok(self.fs.or(left, right))
            }
            Expression::Index { .. } => {
                let flat = self.flat_var(expr)?;
                Ok(self.fs.lit(flat + 1))
            }
            Expression::GridRef(_) => {
                bail!("[internal] cannot translate a bare grid reference")
            }
        }
    }

    /// Flat zero-based variable of a grid address.
    ///
    /// Walks the index chain down to its grid, accumulating `index * stride` onto the grid's
    /// start variable. Index-variable values come from the scope.
    fn flat_var(&self, expr: &Expression) -> Res<usize> {
        match expr {
            Expression::GridRef(start) => Ok(*start),
            Expression::Index { inner, stride, idx } => {
                let val = match idx {
                    Idx::Const(n) => *n,
                    Idx::Var(idx_var) => match self.scope.index(*idx_var) {
                        Some(val) => val,
                        None => bail!("[internal] index variable i{} is unbound", idx_var),
                    },
                };
                Ok(val * stride + self.flat_var(inner)?)
            }
            _ => bail!("[internal] expression is not a grid address"),
        }
    }
}
