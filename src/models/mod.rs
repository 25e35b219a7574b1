pub mod country;
pub mod resolution;
pub mod series;
