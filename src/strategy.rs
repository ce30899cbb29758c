pub mod control;
pub mod filter;
