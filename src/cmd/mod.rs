pub mod report;
pub mod tenant;
