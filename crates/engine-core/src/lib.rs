pub mod error;
pub mod notify;
pub mod preview;
pub mod report;
pub mod session;
pub mod submit;
pub mod validate;
