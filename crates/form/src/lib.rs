pub mod links;
pub mod paths;
pub mod protocol;
pub mod submit;

pub use links::*;
pub use paths::*;
pub use protocol::*;
pub use submit::*;
