mod challenge;
mod dispatch;
mod form;
mod gate;
mod types;

pub use challenge::*;
pub use dispatch::*;
pub use form::*;
pub use gate::*;
pub use types::*;
