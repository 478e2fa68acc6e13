//! Pure data structures shared by the ledger, the order log and the simulator.

pub mod order;
pub mod product;

pub use order::*;
pub use product::*;
