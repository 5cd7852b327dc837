//! Parser: declarations, statements, and CFG construction.
//!
//! Recursive descent with one token of lookahead. The [`Parser`] owns the symbol tables of a
//! single compilation unit: the property and grid tables, the local- and index-variable maps,
//! and the running grid-variable counter. [`parse`] is the all-in-one entry point.
//!
//! Control flow is structured: `if` terminates the current block with a branch and continues in a
//! fresh exit block, `for` appends a loop instruction referencing a fresh body block, `return`
//! terminates the current block. Every block reachable from the entry is terminated by the time
//! the function closes, and the function's outer block must end in a `return`.

prelude!();

use cfg::{BasicBlock, Cfg, Expression, Idx, Instruction, Terminator};
use lexer::{Lexer, Span, Spn, Token, TokenKind};

pub mod kw;

#[cfg(test)]
mod test;

/// A named finite domain: an ordered list of value names.
#[derive(Debug, Clone)]
pub struct Property {
    /// Name of the property.
    pub name: String,
    /// Value names, in declaration order.
    pub values: Vec<String>,
}

/// A declared grid: its dimension sizes and its first variable.
///
/// The grid contributes `dims.iter().product()` variables, allocated contiguously from `start`.
/// Dimension `0` is the fastest-varying index.
#[derive(Debug, Clone)]
pub struct Grid {
    /// Dimension sizes, all positive.
    pub dims: Vec<usize>,
    /// First variable of the grid's block.
    pub start: GridVar,
}
impl Grid {
    /// Total number of variables the grid contributes.
    pub fn size(&self) -> usize {
        self.dims.iter().product()
    }
}

/// Parses a full slang file into its CFG.
///
/// # Examples
///
/// ```rust
/// let cfg = slang::parse::parse(
///     "grid board[2] function is_sat { return board[0] && !board[1] }"
/// ).unwrap();
/// assert_eq!(cfg.blocks.len(), 1);
/// ```
///
/// Errors know the line they come from:
///
/// ```rust
/// let err = slang::parse::parse(
///     "grid board[2]\nfunction is_sat { return board[7] }"
/// ).unwrap_err();
/// assert_eq!(
///     err.to_string(),
///     "line 2: index 7 is out of bounds for a dimension of size 2",
/// );
/// ```
pub fn parse(txt: &str) -> Res<Cfg> {
    let mut parser = Parser::new(txt).map_err(|e| e.into_error(txt))?;
    parser.file().map_err(|e| e.into_error(txt))
}

/// Parses its input text.
///
/// Produces the CFG with [`Self::file`]; the symbol tables remain accessible on the parser
/// afterwards.
pub struct Parser<'txt> {
    /// Token stream.
    lexer: Lexer<'txt>,
    /// Property name → index in [`Self::prop_list`].
    props: Map<String, usize>,
    /// Properties, in declaration order.
    prop_list: Vec<Property>,
    /// Grid table.
    grids: Map<String, Grid>,
    /// Local-variable ids, assigned monotonically at first assignment.
    locals: Map<String, LocalVar>,
    /// Index-variable ids, one per name for the whole function.
    idx_vars: Map<String, IndexVar>,
    /// Index variables bound by the `for`s enclosing the current parse position.
    live_idx: Vec<IndexVar>,
    /// Running grid-variable counter.
    var_count: usize,
    /// Block arena under construction.
    blocks: Vec<BasicBlock>,
}

impl<'txt> Parser<'txt> {
    /// Constructor, scans the first token.
    pub fn new(txt: &'txt str) -> PRes<Self> {
        Ok(Self {
            lexer: Lexer::new(txt)?,
            props: Map::new(),
            prop_list: vec![],
            grids: Map::new(),
            locals: Map::new(),
            idx_vars: Map::new(),
            live_idx: vec![],
            var_count: 0,
            blocks: vec![],
        })
    }

    /// Grid table accessor.
    pub fn grids(&self) -> &Map<String, Grid> {
        &self.grids
    }
    /// Property accessor.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.props.get(name).map(|idx| &self.prop_list[*idx])
    }
    /// Total number of grid variables declared so far.
    pub fn var_count(&self) -> usize {
        self.var_count
    }

    /// Parses the whole file: declarations in any order, exactly one `function is_sat`.
    pub fn file(&mut self) -> PRes<Cfg<'txt>> {
        let mut entry = None;
        loop {
            let tok = self.peek();
            match tok.kind {
                TokenKind::Eof => break,
                TokenKind::Property => self.property_decl()?,
                TokenKind::Grid => self.grid_decl()?,
                TokenKind::Function => {
                    if entry.is_some() {
                        bail!(self.fail(tok.span, "expected one function but found another"))
                    }
                    entry = Some(self.function()?)
                }
                _ => bail!(self.fail(
                    tok.span,
                    format!("expected a declaration, found {}", tok.kind)
                )),
            }
        }
        let entry = match entry {
            Some(entry) => entry,
            None => bail!(self.fail(self.peek().span, "expected a `function is_sat` declaration")),
        };
        Ok(Cfg {
            blocks: std::mem::take(&mut self.blocks),
            entry,
            txt: self.lexer.txt(),
        })
    }

    /// The lookahead token.
    fn peek(&self) -> Token {
        self.lexer.peek()
    }
    /// Scans past the lookahead token.
    fn next(&mut self) -> PRes<Token> {
        self.lexer.next()
    }
    /// The lexeme of a span in the input.
    fn lexeme(&self, span: Span) -> &'txt str {
        self.lexer.lexeme(span)
    }

    /// Fails at a span.
    fn fail(&self, span: Span, msg: impl Into<String>) -> PError {
        PError::new(msg.into(), span)
    }

    /// Consumes a token of the given kind, or fails with `msg`.
    fn expect(&mut self, kind: TokenKind, msg: &str) -> PRes<Token> {
        let tok = self.peek();
        if tok.kind == kind {
            self.next()?;
            Ok(tok)
        } else {
            bail!(self.fail(tok.span, format!("{}, found {}", msg, tok.kind)))
        }
    }

    /// Consumes an identifier, or fails with `msg`.
    fn expect_ident(&mut self, msg: &str) -> PRes<Spn<&'txt str>> {
        let tok = self.peek();
        if tok.kind == TokenKind::Ident {
            self.next()?;
            Ok(Spn::new(self.lexeme(tok.span), tok.span))
        } else {
            bail!(self.fail(tok.span, format!("{}, found {}", msg, tok.kind)))
        }
    }

    /// Parses a `property NAME { v0 v1 ... }` declaration, `property` still in the lookahead.
    fn property_decl(&mut self) -> PRes<()> {
        self.next()?;
        let name = self.expect_ident("expected a name for the property")?;
        if self.props.contains_key(name.inner) {
            bail!(self.fail(name.span, format!("duplicate property `{}`", name.inner)))
        }
        self.expect(TokenKind::LCurl, "expected `{` after the property name")?;
        let mut values = vec![];
        while self.peek().kind != TokenKind::RCurl {
            let value = self.expect_ident("expected a value name in the property")?;
            values.push(value.inner.to_string());
        }
        self.next()?;
        debug!("property `{}` with {} values", name.inner, values.len());
        self.props.insert(name.inner.to_string(), self.prop_list.len());
        self.prop_list.push(Property {
            name: name.inner.to_string(),
            values,
        });
        Ok(())
    }

    /// Parses a `grid NAME [d0][d1]...` declaration, `grid` still in the lookahead.
    ///
    /// A dimension is a positive integer literal or a property name, which sizes the dimension by
    /// its value count. The grid's variable block is allocated here, at declaration order.
    fn grid_decl(&mut self) -> PRes<()> {
        self.next()?;
        let name = self.expect_ident("expected a name for the grid")?;
        if self.grids.contains_key(name.inner) {
            bail!(self.fail(name.span, format!("duplicate grid `{}`", name.inner)))
        }
        let mut dims = vec![];
        while self.peek().kind == TokenKind::LSquare {
            self.next()?;
            let tok = self.peek();
            let dim = match tok.kind {
                TokenKind::Int(n) => {
                    self.next()?;
                    n
                }
                TokenKind::Ident => {
                    let pname = self.lexeme(tok.span);
                    self.next()?;
                    match self.props.get(pname) {
                        Some(idx) => self.prop_list[*idx].values.len(),
                        None => {
                            bail!(self.fail(tok.span, format!("unknown property `{}`", pname)))
                        }
                    }
                }
                _ => bail!(self.fail(
                    tok.span,
                    format!(
                        "expected an integer or property name as dimension, found {}",
                        tok.kind
                    )
                )),
            };
            if dim == 0 {
                bail!(self.fail(tok.span, "grid dimensions must be positive"))
            }
            self.expect(TokenKind::RSquare, "expected `]` after the dimension")?;
            dims.push(dim);
        }
        if dims.is_empty() {
            bail!(self.fail(
                self.peek().span,
                format!("expected at least one dimension for grid `{}`", name.inner)
            ))
        }
        let grid = Grid {
            dims,
            start: self.var_count,
        };
        self.var_count += grid.size();
        debug!("created grid `{}` with {} variables", name.inner, grid.size());
        self.grids.insert(name.inner.to_string(), grid);
        Ok(())
    }

    /// Allocates a fresh, unterminated block.
    fn new_block(&mut self) -> BlockIdx {
        let id = self.blocks.len();
        self.blocks.push(BasicBlock::new(id));
        id
    }

    /// Parses `function is_sat { ... }`, `function` still in the lookahead.
    ///
    /// Returns the entry block. Fails if the function is not named `is_sat` or if its outer block
    /// does not terminate in a `return`.
    fn function(&mut self) -> PRes<BlockIdx> {
        self.next()?;
        let name = self.expect_ident("expected a function name")?;
        if name.inner != "is_sat" {
            bail!(self.fail(name.span, "expected function name to be `is_sat`"))
        }
        self.expect(TokenKind::LCurl, "expected `{` to open the function body")?;
        let entry = self.new_block();
        let last = self.stmts(entry)?;
        let close = self.expect(TokenKind::RCurl, "expected `}` to close the function body")?;
        match self.blocks[last].terminator {
            Some(Terminator::Return(_)) => (),
            _ => bail!(self.fail(close.span, "expected function return at end as safeguard")),
        }
        Ok(entry)
    }

    /// Parses a `{ ... }` statement block into `into`, returns the block parsing ended in.
    fn braced(&mut self, into: BlockIdx) -> PRes<BlockIdx> {
        self.expect(TokenKind::LCurl, "expected `{` to open the block")?;
        let last = self.stmts(into)?;
        self.expect(TokenKind::RCurl, "expected `}` to close the block")?;
        Ok(last)
    }

    /// Parses statements until `}` or end of input.
    ///
    /// The current block changes when an `if` is parsed: statements after it go to the branch's
    /// exit block, which is returned.
    fn stmts(&mut self, mut current: BlockIdx) -> PRes<BlockIdx> {
        loop {
            let tok = self.peek();
            if matches!(tok.kind, TokenKind::RCurl | TokenKind::Eof) {
                break;
            }
            if self.blocks[current].terminator.is_some() {
                bail!(self.fail(tok.span, "statement after `return`"))
            }
            match tok.kind {
                TokenKind::Ident => {
                    let name = self.lexeme(tok.span);
                    self.next()?;
                    self.expect(TokenKind::Assign, "expected `=` after identifier")?;
                    let rhs = self.expression()?;
                    let fresh = self.locals.len();
                    let lvar = *self.locals.entry(name.to_string()).or_insert(fresh);
                    self.blocks[current].insts.push(Instruction::Assign { lvar, rhs });
                }
                TokenKind::If => {
                    self.next()?;
                    let cnd = self.expression()?;
                    let thn = self.new_block();
                    let thn_last = self.braced(thn)?;
                    let els_arm = if self.peek().kind == TokenKind::Else {
                        self.next()?;
                        let els = self.new_block();
                        let els_last = self.braced(els)?;
                        Some((els, els_last))
                    } else {
                        None
                    };
                    let exit = self.new_block();
                    let els = els_arm.map(|(els, _)| els).unwrap_or(exit);
                    self.blocks[current].terminator = Some(Terminator::Branch { cnd, thn, els });
                    let arm_lasts = Some(thn_last).into_iter().chain(els_arm.map(|(_, l)| l));
                    for last in arm_lasts {
                        if self.blocks[last].terminator.is_none() {
                            self.blocks[last].terminator = Some(Terminator::Goto(exit));
                        }
                    }
                    current = exit;
                }
                TokenKind::For => {
                    self.next()?;
                    let name = self.expect_ident("expected a name for the loop index")?;
                    let fresh = self.idx_vars.len();
                    let idx_var = *self.idx_vars.entry(name.inner.to_string()).or_insert(fresh);
                    self.expect(TokenKind::In, "expected `in` after the loop index")?;
                    let len_tok = self.peek();
                    let len = match len_tok.kind {
                        TokenKind::Int(n) => {
                            self.next()?;
                            n
                        }
                        _ => bail!(self.fail(
                            len_tok.span,
                            format!("expected a literal loop length, found {}", len_tok.kind)
                        )),
                    };
                    if len == 0 {
                        bail!(self.fail(len_tok.span, "loop length must be positive"))
                    }
                    let body = self.new_block();
                    self.blocks[current].insts.push(Instruction::Loop { idx_var, len, body });
                    self.live_idx.push(idx_var);
                    let body_last = self.braced(body)?;
                    self.live_idx.pop();
                    if self.blocks[body_last].terminator.is_none() {
                        self.blocks[body_last].terminator = Some(Terminator::End);
                    }
                }
                TokenKind::Return => {
                    self.next()?;
                    let expr = self.expression()?;
                    self.blocks[current].terminator = Some(Terminator::Return(expr));
                }
                _ => bail!(self.fail(
                    tok.span,
                    format!("expected a statement, found {}", tok.kind)
                )),
            }
        }
        Ok(current)
    }

    /// Parses an expression.
    fn expression(&mut self) -> PRes<Expression> {
        let lhs = self.operand()?;
        self.operator(lhs, 0)
    }

    /// Pratt loop: consumes binary operators binding tighter than `prec`.
    ///
    /// `&&` and `||` share precedence `1` and are left-associative.
    fn operator(&mut self, mut lhs: Expression, prec: u32) -> PRes<Expression> {
        loop {
            let (right_prec, is_and) = match self.peek().kind {
                TokenKind::And => (1, true),
                TokenKind::Or => (1, false),
                _ => break,
            };
            if prec >= right_prec {
                break;
            }
            self.next()?;
            let rhs = self.operand()?;
            let rhs = self.operator(rhs, right_prec)?;
            lhs = if is_and {
                Expression::And(Box::new(lhs), Box::new(rhs))
            } else {
                Expression::Or(Box::new(lhs), Box::new(rhs))
            };
        }
        Ok(lhs)
    }

    /// Parses a primary expression: a constant, a negation, a parenthesized expression, or an
    /// identifier.
    ///
    /// An identifier is a grid reference iff it is followed by `[`; otherwise it refers to a
    /// local variable, which must have been assigned already.
    fn operand(&mut self) -> PRes<Expression> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::False => {
                self.next()?;
                Ok(Expression::False)
            }
            TokenKind::True => {
                self.next()?;
                Ok(Expression::True)
            }
            TokenKind::Not => {
                self.next()?;
                let inner = self.operand()?;
                Ok(Expression::Not(Box::new(inner)))
            }
            TokenKind::LParen => {
                self.next()?;
                let expr = self.expression()?;
                self.expect(TokenKind::RParen, "expected `)` to close the expression")?;
                Ok(expr)
            }
            TokenKind::Ident => {
                let name = self.lexeme(tok.span);
                self.next()?;
                if self.peek().kind == TokenKind::LSquare {
                    self.grid_ref(name, tok.span)
                } else {
                    match self.locals.get(name) {
                        Some(lvar) => Ok(Expression::LVar(*lvar)),
                        None => bail!(self.fail(
                            tok.span,
                            format!("unknown local variable `{}`", name)
                        )),
                    }
                }
            }
            _ => bail!(self.fail(
                tok.span,
                format!("expected an expression, found {}", tok.kind)
            )),
        }
    }

    /// Parses the `[idx]...` chain of a grid reference, one `[idx]` per grid dimension.
    fn grid_ref(&mut self, name: &str, span: Span) -> PRes<Expression> {
        let grid = match self.grids.get(name) {
            Some(grid) => grid.clone(),
            None => bail!(self.fail(span, format!("unknown grid `{}`", name))),
        };
        let mut expr = Expression::GridRef(grid.start);
        let mut stride = 1;
        for (dim, &size) in grid.dims.iter().enumerate() {
            if self.peek().kind != TokenKind::LSquare {
                bail!(self.fail(
                    self.peek().span,
                    format!(
                        "grid `{}` has {} dimension(s) but only {} are indexed",
                        name,
                        grid.dims.len(),
                        dim
                    )
                ))
            }
            self.next()?;
            let idx = self.index(size)?;
            self.expect(TokenKind::RSquare, "expected `]` after the index")?;
            expr = Expression::Index {
                inner: Box::new(expr),
                stride,
                idx,
            };
            stride *= size;
        }
        if self.peek().kind == TokenKind::LSquare {
            bail!(self.fail(
                self.peek().span,
                format!("grid `{}` has only {} dimension(s)", name, grid.dims.len())
            ))
        }
        Ok(expr)
    }

    /// Parses one index of a grid reference, for a dimension of the given size.
    ///
    /// An index is an integer literal (bounds-checked), a `property.value` pair (resolved to the
    /// value's position, bounds-checked), or an index variable bound by an enclosing `for`.
    fn index(&mut self, size: usize) -> PRes<Idx> {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Int(n) => {
                self.next()?;
                if n >= size {
                    bail!(self.fail(
                        tok.span,
                        format!("index {} is out of bounds for a dimension of size {}", n, size)
                    ))
                }
                Ok(Idx::Const(n))
            }
            TokenKind::Ident => {
                let name = self.lexeme(tok.span);
                self.next()?;
                if self.peek().kind == TokenKind::Dot {
                    self.next()?;
                    let value = self.expect_ident("expected a property value after `.`")?;
                    let prop = match self.props.get(name) {
                        Some(idx) => &self.prop_list[*idx],
                        None => bail!(self.fail(tok.span, format!("unknown property `{}`", name))),
                    };
                    let pos = match prop.values.iter().position(|v| v == value.inner) {
                        Some(pos) => pos,
                        None => bail!(self.fail(
                            value.span,
                            format!("unknown value `{}` for property `{}`", value.inner, name)
                        )),
                    };
                    if pos >= size {
                        bail!(self.fail(
                            value.span,
                            format!(
                                "index {} is out of bounds for a dimension of size {}",
                                pos, size
                            )
                        ))
                    }
                    Ok(Idx::Const(pos))
                } else {
                    match self.idx_vars.get(name) {
                        Some(&idx_var) if self.live_idx.contains(&idx_var) => Ok(Idx::Var(idx_var)),
                        Some(_) => bail!(self.fail(
                            tok.span,
                            format!("index variable `{}` is not bound by an enclosing `for`", name)
                        )),
                        None => bail!(self.fail(
                            tok.span,
                            format!("unknown index variable `{}`", name)
                        )),
                    }
                }
            }
            _ => bail!(self.fail(
                tok.span,
                format!("expected an index, found {}", tok.kind)
            )),
        }
    }
}
