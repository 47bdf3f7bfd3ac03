//! Domain types shared by every slippage model.

pub mod bar;
pub mod side;

pub use bar::Bar;
pub use side::Side;
