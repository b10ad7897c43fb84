//! # CLI Module
//!
//! Command-line front end over the sample controllers in
//! [`controllers`](crate::controllers).
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print the routing table:
//!
//! ```bash
//! htf-router routes
//! ```
//!
//! ### `resolve`
//!
//! Resolve one or more `METHOD PATH` pairs without running anything:
//!
//! ```bash
//! htf-router resolve GET /user/get/abc-123 POST /user/list
//! ```
//!
//! ### `dispatch`
//!
//! Run one request end to end and print the JSON response:
//!
//! ```bash
//! htf-router dispatch POST /pet --body '{"name": "Rex"}'
//! ```
//!
//! Global options:
//! - `--config <FILE>` - YAML router configuration (also `HTF_ROUTER_CONFIG`)
//! - `--log-format <json|pretty>` - overrides `HTF_LOG_FORMAT`

mod commands;


pub use commands::{run, run_cli, Cli, Commands, LogFormatArg};
