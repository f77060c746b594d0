pub mod capture;
pub mod placement;
pub mod shared;
