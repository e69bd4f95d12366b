pub mod carousel;
pub mod catalog;
pub mod chart;
pub mod frontend;

#[cfg(test)]
pub mod testing;
