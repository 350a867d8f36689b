mod generate;
mod init;
mod tree;

pub use generate::*;
pub use init::*;
pub use tree::*;
