//! Auth-domain role sets, credential claims, and credential storage.

pub mod claims;
pub mod credential;
pub mod role;
pub mod session;

pub use claims::*;
pub use credential::*;
pub use role::*;
pub use session::*;
