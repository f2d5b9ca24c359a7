pub mod backend;
pub mod identity;
pub mod storage;
