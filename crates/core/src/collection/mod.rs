pub mod board;
pub mod editable;
pub mod entry;
