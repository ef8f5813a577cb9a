pub mod ai;
pub mod locks;
pub mod persistence;
