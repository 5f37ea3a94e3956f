//! Printmux Core Library
//!
//! This crate provides the core functionality for printmux, a set of wrapper
//! commands for sites running a mix of CUPS and LPRng printing. It decides
//! which subsystem an invocation's arguments were written for, normalizes
//! queue selection and notification options, resolves queue names through
//! the site directory, and dispatches to the subsystem-specific command.
//!
//! # Key Features
//!
//! - **Option Grammars**: getopt-style short-option parsing with multiple
//!   candidate grammars tried in preference order
//! - **Argument Translation**: table-driven mapping of LPRng `lpr` options
//!   to their CUPS equivalents
//! - **Queue Resolution**: canonicalization of local bounce queues and
//!   directory lookups for the backing print server
//! - **Dispatch Plans**: assembled invocations carrying the target command,
//!   argument list, and child environment adjustments
//!
//! # Architecture
//!
//! - [`options`]: the `Opt` pair, grammar compilation, and parsing
//! - [`translate`]: the LPRng-to-CUPS option mapping table
//! - [`config`]: environment snapshot and the optional site config file
//! - [`directory`]: the lookup seam between the resolver and the site
//! - [`resolver`]: default queue, canonicalization, and server discovery
//! - [`execution`]: running the assembled invocation

pub mod config;
pub mod directory;
pub mod error;
pub mod execution;
pub mod options;
pub mod resolver;
pub mod system;
pub mod translate;
