mod core;
pub use core::{ChatMessage, Role, completion};
mod policy;
pub use policy::ModelPolicy;
