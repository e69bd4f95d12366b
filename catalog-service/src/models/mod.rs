pub mod catalog;
pub mod responses;
