mod interface;
mod system;
mod timer;

pub use interface::*;
pub use system::*;
pub use timer::*;
