pub mod base;
pub mod entsoe;
pub mod query;
