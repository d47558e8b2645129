//! Core of annomap: reads hashtag-structured reference annotations into a
//! mind map.
//!
//! ```text
//! fetch (reference + notes)
//!     │
//!     └──> assemble
//!            ├─ skeleton (root + ten sections)
//!            ├─ root label from reference metadata
//!            ├─ hierarchy: merge each annotation's tokens
//!            ├─ color by level
//!            └─ prune empty sections
//!                 │
//!                 └──> report (text, json, html, markdown)
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod fetch;
pub mod hierarchy;
pub mod locate;
pub mod model;
pub mod report;
pub mod skeleton;
pub mod wrap;

use colored::Colorize;

pub use assemble::{RenderOptions, ReportAssembler};
pub use error::ReportError;
pub use hierarchy::{HierarchyBuilder, IdGenerator, RandomIds, SequentialIds};
pub use model::{Edge, MindMap, Node};

pub fn print_banner() {
    let banner = r#"
   __ _ _ __  _ __   ___  _ __ ___   __ _ _ __
  / _` | '_ \| '_ \ / _ \| '_ ` _ \ / _` | '_ \
 | (_| | | | | | | | (_) | | | | | | (_| | |_) |
  \__,_|_| |_|_| |_|\___/|_| |_| |_|\__,_| .__/
                                         |_|
"#;
    eprintln!("{}", banner.bright_cyan());
    eprintln!(
        "  {} {}\n",
        "annotations to mind maps".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
