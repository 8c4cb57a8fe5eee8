//! Data collectors
//!
//! Each collector queries one Graph dataset and reduces it to a tabular
//! report [`Section`](crate::report::Section). Collectors are independent of
//! each other and run strictly sequentially.

pub mod drives;
pub mod employees;
pub mod groups;
pub mod sites;
