mod client;
mod error;
mod exchange;
pub mod format;
mod history;
pub mod types;
mod view;

pub use client::*;
pub use error::ChatError;
pub use exchange::*;
pub use history::*;
pub use types::*;
pub use view::*;

#[cfg(test)]
pub(crate) use error::{CONNECT_ERROR_MESSAGE, ChatErrorKind};
#[cfg(test)]
pub(crate) use exchange::testing;
