//! Slang's macros.

/// Imports slang's prelude.
#[macro_export]
macro_rules! prelude {
    {} => { use $crate::prelude::*; };
    { pub } => { pub use $crate::prelude::*; };
}

/// Returns an error from the current function.
///
/// The argument is turned into the function's error type with `into`, so this works for both
/// [`Res`][crate::err::Res]- and [`PRes`][crate::err::PRes]-producing functions.
#[macro_export]
macro_rules! bail {
    ($e:expr) => {
        return Err($e.into())
    };
    ($($fmt:tt)*) => {
        return Err(format!($($fmt)*).into())
    };
}
