//! CLI subcommand modules.
//!
//! This module contains the implementations for all apogee CLI subcommands.

pub(crate) mod backtest;
pub(crate) mod signals;
pub(crate) mod strategies;
