//! OS action execution for the remote PC control server.

pub mod executor;
pub mod os;
pub mod result;

pub use executor::{
    ActionExecutor, Backends, KeyTiming, MediaKind, StepDirection, PROCESS_LIST_LIMIT,
};
pub use os::{OsError, OsResult, Platform};
pub use result::ActionResult;
