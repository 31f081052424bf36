pub mod category;
pub mod convert;
