//! CLI command implementations.
//!
//! Each submodule owns one or more related `Commands` variants:
//!
//! | Module      | Commands handled         |
//! |-------------|--------------------------|
//! | `phases`    | `Phases`                 |
//! | `text`      | `Sanitize`, `Validate`   |
//! | `export`    | `Export`                 |
//! | `session`   | `Session`                |
//! | `config`    | `Config`                 |

pub mod config;
pub mod export;
pub mod phases;
pub mod session;
pub mod text;

pub use config::{cmd_config, cmd_config_init};
pub use export::cmd_export;
pub use phases::cmd_phases;
pub use session::cmd_session;
pub use text::{RuleArgs, cmd_sanitize, cmd_validate};
