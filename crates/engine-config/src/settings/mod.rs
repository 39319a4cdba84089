pub mod error;
pub mod import;
pub mod validator;

pub use import::ImportSettings;
