mod error;
mod lang;

pub use error::*;
pub use lang::*;
