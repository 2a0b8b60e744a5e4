//! Command implementations, one module per subcommand.

pub mod check;
pub mod history;
pub mod keygen;
pub mod migrate;
