pub mod dictionary;
pub mod weighted;
