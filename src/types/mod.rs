pub mod category;
pub mod error;
pub mod filter;
pub mod table;
pub mod value;
