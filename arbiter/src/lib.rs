mod session;
mod setup;
pub use session::*;
pub use setup::*;
