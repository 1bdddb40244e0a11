//! Access Control Adapters

mod session_access_control;

pub use session_access_control::SessionAccessControl;
