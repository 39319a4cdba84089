pub mod parser;
pub mod settings;
