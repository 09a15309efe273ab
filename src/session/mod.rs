pub mod raw;
pub mod summary;
