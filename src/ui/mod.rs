pub mod dashboard;
pub mod panels;
pub mod pie;
pub mod plot;
pub mod table;
