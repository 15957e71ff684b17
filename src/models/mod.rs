pub mod report;
pub mod review;
pub mod user;
