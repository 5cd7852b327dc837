//! Control-flow graph: expressions, instructions, terminators and basic blocks.
//!
//! Blocks live in an arena owned by the [`Cfg`] and refer to each other through [`BlockIdx`]es.
//! The parser only ever produces structured control flow, so the block graph is a DAG rooted at
//! the entry block.

prelude!();

/// One step of a grid address: either a constant or a loop index variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Idx {
    /// Constant index, from an integer literal or a property value.
    Const(usize),
    /// Reference to a loop index variable.
    Var(IndexVar),
}
impl fmt::Display for Idx {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Const(n) => write!(fmt, "{}", n),
            Self::Var(id) => write!(fmt, "i{}", id),
        }
    }
}

/// Boolean expressions over grid variables and local bindings.
///
/// A grid reference is an [`Index`][Self::Index] chain bottoming out at a
/// [`GridRef`][Self::GridRef]; the chain's depth equals the grid's dimension count. Each `Index`
/// node carries the `stride` of its dimension, *i.e.* the product of the sizes of the dimensions
/// before it, so that the flat variable is the sum of `index * stride` over the chain plus the
/// grid's start variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// The `false` constant.
    False,
    /// The `true` constant.
    True,
    /// Reference to a local assignment.
    LVar(LocalVar),
    /// Root of a grid address: the grid's first variable.
    GridRef(GridVar),
    /// One dimension step of a grid address.
    Index {
        /// Rest of the address, ending in a [`Self::GridRef`].
        inner: Box<Expression>,
        /// Product of the dimension sizes before this one.
        stride: usize,
        /// The index itself.
        idx: Idx,
    },
    /// Negation.
    Not(Box<Expression>),
    /// Conjunction.
    And(Box<Expression>, Box<Expression>),
    /// Disjunction.
    Or(Box<Expression>, Box<Expression>),
}
impl fmt::Display for Expression {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::False => "false".fmt(fmt),
            Self::True => "true".fmt(fmt),
            Self::LVar(id) => write!(fmt, "lv{}", id),
            Self::GridRef(start) => write!(fmt, "g{}", start),
            Self::Index { inner, idx, .. } => write!(fmt, "{}[{}]", inner, idx),
            Self::Not(inner) => write!(fmt, "!{}", inner),
            Self::And(left, right) => write!(fmt, "({} ^ {})", left, right),
            Self::Or(left, right) => write!(fmt, "({} v {})", left, right),
        }
    }
}

/// Instructions of a basic block.
#[derive(Debug, Clone)]
pub enum Instruction {
    /// Binds a local variable to an expression.
    Assign {
        /// Local bound.
        lvar: LocalVar,
        /// Expression bound to it.
        rhs: Expression,
    },
    /// A bounded loop over an inner block.
    Loop {
        /// Index variable bound by the loop.
        idx_var: IndexVar,
        /// Literal iteration count.
        len: usize,
        /// Body block.
        body: BlockIdx,
    },
}

/// Terminators of a basic block.
#[derive(Debug, Clone)]
pub enum Terminator {
    /// Unconditional jump.
    Goto(BlockIdx),
    /// Two-way branch on a condition.
    Branch {
        /// Branch condition.
        cnd: Expression,
        /// Block taken when the condition holds.
        thn: BlockIdx,
        /// Block taken otherwise.
        els: BlockIdx,
    },
    /// Function result.
    Return(Expression),
    /// Fall-off at the end of a loop body.
    End,
}

/// A basic block: instructions in order, and at most one terminator.
///
/// The terminator is only `None` while the parser is still wiring the block; every block reachable
/// from the entry is terminated once parsing succeeds.
#[derive(Debug, Clone)]
pub struct BasicBlock {
    /// Index of the block in the arena.
    pub id: BlockIdx,
    /// Instructions, in order.
    pub insts: Vec<Instruction>,
    /// Terminator, `None` only during construction.
    pub terminator: Option<Terminator>,
}
impl BasicBlock {
    /// Constructor for an empty, unterminated block.
    pub fn new(id: BlockIdx) -> Self {
        Self {
            id,
            insts: vec![],
            terminator: None,
        }
    }
}

/// A control-flow graph: the block arena, the entry block, and the source it was parsed from.
#[derive(Debug)]
pub struct Cfg<'txt> {
    /// Block arena, indexed by [`BlockIdx`].
    pub blocks: Vec<BasicBlock>,
    /// Entry block.
    pub entry: BlockIdx,
    /// Source text the CFG was parsed from, for diagnostics.
    pub txt: &'txt str,
}
impl<'txt> Cfg<'txt> {
    /// Block accessor.
    pub fn block(&self, idx: BlockIdx) -> &BasicBlock {
        &self.blocks[idx]
    }
}

/// GraphViz rendering of the blocks reachable from the entry.
///
/// Record-shaped nodes list each block's instructions and terminator; branch-taken edges are
/// labelled `1`, and loop-body edges are red and labelled with the loop's index variable.
impl<'txt> fmt::Display for Cfg<'txt> {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut visited = vec![false; self.blocks.len()];
        let mut worklist = vec![self.entry];

        writeln!(fmt, "digraph {{")?;

        while let Some(idx) = worklist.pop() {
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            let bb = self.block(idx);

            let mut loop_targets = vec![];
            write!(fmt, "  {} [shape=record,label=\"bb{}", bb.id, bb.id)?;
            for inst in &bb.insts {
                match inst {
                    Instruction::Assign { lvar, rhs } => write!(fmt, "\\nlv{} = {}", lvar, rhs)?,
                    Instruction::Loop { idx_var, len, body } => {
                        write!(fmt, "\\nfor i{} in {}", idx_var, len)?;
                        worklist.push(*body);
                        loop_targets.push((*body, *idx_var));
                    }
                }
            }

            match &bb.terminator {
                Some(Terminator::Goto(tgt)) => {
                    writeln!(fmt, "\"]")?;
                    worklist.push(*tgt);
                    writeln!(fmt, "  {}->{}", bb.id, tgt)?;
                }
                Some(Terminator::Branch { cnd, thn, els }) => {
                    writeln!(fmt, "\\nbr {}\"]", cnd)?;
                    worklist.push(*thn);
                    worklist.push(*els);
                    writeln!(fmt, "  {}->{} [label=\"1\"]", bb.id, thn)?;
                    writeln!(fmt, "  {}->{}", bb.id, els)?;
                }
                Some(Terminator::Return(expr)) => writeln!(fmt, "\\nreturn {}\"]", expr)?,
                Some(Terminator::End) | None => writeln!(fmt, "\"]")?,
            }
            for (body, idx_var) in loop_targets {
                writeln!(fmt, "  {}->{} [color=red,label=\"i{}\"]", bb.id, body, idx_var)?;
            }
        }

        writeln!(fmt, "}}")
    }
}
