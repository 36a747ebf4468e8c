pub mod auth;
pub mod dashboard;
pub mod probes;
pub mod ui;
