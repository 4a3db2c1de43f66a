// Public handlers: no token required

pub mod drinks;
pub mod system;

pub use system::{health, method_not_allowed, not_found, root};
