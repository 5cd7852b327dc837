//! Common imports throughout this project.

pub use std::{
    collections::{BTreeMap as Map, BTreeSet as Set},
    fmt,
    io::Write,
    ops::{Deref, DerefMut},
    rc::Rc,
};

pub use log::{debug, trace};

pub use crate::bail;
pub use crate::{
    cfg, dimacs,
    err::{ChainExt, Error, ErrorChain, PError, PRes, Res},
    eval, formula, lexer, parse, tseitin,
};

/// Identifier of a local variable, assigned by the parser in order of first assignment.
pub type LocalVar = usize;

/// Identifier of a loop index variable.
///
/// A given source name keeps its identifier for the whole function, however many `for`s bind it.
pub type IndexVar = usize;

/// Zero-based identifier of a grid variable.
///
/// The DIMACS emitter shifts these by `+1` so that `0` never appears as a literal.
pub type GridVar = usize;

/// Index of a basic block in its CFG's arena.
pub type BlockIdx = usize;
