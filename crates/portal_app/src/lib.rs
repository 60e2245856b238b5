//! Terminal front end for the news portal.
pub mod cli;
pub mod platform;
