mod atomic;
mod interface;
mod lock;
mod mutex;
mod slice;

pub use atomic::*;
pub use interface::*;
pub use lock::*;
pub use mutex::*;
