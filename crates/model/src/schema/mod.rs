pub mod field;
pub mod resource;
