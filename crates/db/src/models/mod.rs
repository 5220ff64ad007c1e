//! Row structs for the correlation table.

pub mod correlation;
