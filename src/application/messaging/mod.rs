//! Message handling - admission filtering and reply dispatch

pub mod dispatcher;
pub mod filter;

pub use dispatcher::{Dispatched, MessageDispatcher};
pub use filter::{CentralizedMessageFilter, FilterConfig};
