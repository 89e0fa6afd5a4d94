// model = "claude-opus-4-5"
// created = "2026-10-16"
// modified = "2026-10-16"
// driver = "Isaac Clayton"

//! Splay list - an ordered key index that reshapes itself by access frequency.
//!
//! A skip list whose tower heights are not random: each access counts
//! traffic along its search path, hot keys are promoted to taller towers,
//! and cold keys are demoted toward the floor level, so the shape drifts
//! toward the optimal skip list for the observed workload.
//!
//! # Quick Start
//!
//! ```
//! use splaylist::SplayList;
//!
//! let mut list = SplayList::new(0u32, 100).unwrap();
//! list.insert_if_absent(10).unwrap();
//! list.insert_if_absent(20).unwrap();
//! list.insert_if_absent(30).unwrap();
//!
//! assert!(list.contains(&20));
//! assert!(!list.contains(&25));
//! assert_eq!(list.len(), 3);
//!
//! list.remove_if_present(&20);
//! assert!(!list.contains(&20));
//! ```

mod guard;
mod node;
mod reshape;
mod trace;

pub mod config;
pub mod dump;
pub mod error;
pub mod list;

pub use config::Config;
pub use dump::Dump;
pub use dump::DumpEntry;
pub use error::Error;
pub use error::Result;
pub use list::Keys;
pub use list::Level;
pub use list::SplayList;
