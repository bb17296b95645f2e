pub mod archive;
pub mod batch;
pub mod category;
pub mod classify;
pub mod error;
pub mod header;
pub mod source;
pub mod verdict;

pub use batch::*;
pub use category::*;
pub use classify::*;
pub use error::*;
pub use header::{CartridgeHeader, Header};
pub use source::*;
pub use verdict::*;
