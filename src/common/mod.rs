//! Common code used by the ippool binary

pub mod error;
pub mod logging;
pub mod profiler;
pub mod summary;
