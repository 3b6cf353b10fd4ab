pub mod book;
pub mod deal;
pub mod regions;
