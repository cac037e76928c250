mod storage;
mod store;
mod types;

pub use storage::*;
pub use store::*;
pub use types::*;
