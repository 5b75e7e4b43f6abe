//! RIPS API model types.
//!
//! Resource documents stay loosely typed; only the shapes the client itself
//! interprets are modelled here.

mod scan;
mod status;
mod token;

pub use scan::*;
pub use status::*;
pub use token::*;
