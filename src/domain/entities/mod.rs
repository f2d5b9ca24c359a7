pub mod identity;
pub mod navigation;
pub mod steps;
