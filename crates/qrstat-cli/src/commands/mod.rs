//! Command implementations

pub(crate) mod factor;
pub(crate) mod serve;
pub(crate) mod token;
