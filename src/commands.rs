//! Implementation of `cfn-check` CLI commands.

pub mod check;
