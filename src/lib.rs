//! Validation of CloudFormation and SAM templates from the command line.

pub mod commands;
pub mod config;
pub mod diagnostics;
