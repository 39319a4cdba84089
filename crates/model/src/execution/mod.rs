pub mod batch_result;
pub mod rejected_row;
pub mod strategy;
