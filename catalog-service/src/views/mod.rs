pub mod cards;
pub mod carousel;
pub mod modal;
pub mod page;
