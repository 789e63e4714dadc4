mod commands;
mod interactive;
mod session;

pub use commands::{ReplCommand, ReplResult};
pub use interactive::InteractiveRepl;
pub use session::ReplSession;
