//! Base types and functions.

pub use std::collections::{HashMap, HashSet};
pub use std::io::{Read, Write};

pub use either::Either;
pub use hashconsing::HashConsign;

pub use crate::errors::*;

#[macro_use]
pub mod macros;
mod wrappers;
pub mod config;
pub mod profiling;
mod revision;

pub use self::config::*;
pub use self::profiling::Profiler;
#[cfg(not(feature = "bench"))]
pub use self::profiling::{DurationExt, Stats};
pub use self::wrappers::*;

lazy_static! {
    /// Configuration from clap.
    pub static ref conf: Config = Config::clap();
    static ref version_string: String = match revision::REVISION {
        Some(rev) => format!("{} ({})", clap::crate_version!(), rev),
        None => clap::crate_version!().to_string(),
    };
    /// Version with revision info.
    pub static ref version: &'static str = &version_string;
}

// |===| Helpers.

/// Prints the stats if asked. Does nothing in bench mode.
#[cfg(feature = "bench")]
pub fn print_stats(_: &'static str, _: &Profiler) {}
/// Prints the stats if asked. Does nothing in bench mode.
#[cfg(not(feature = "bench"))]
pub fn print_stats(name: &str, profiler: &Profiler) {
    if conf.stats {
        println!();
        profiler.print(name);
        println!()
    }
}

// |===| Type and trait aliases.

/// Integer attribute code carried by a record cell.
pub type Val = i64;

/// Decision attribute code.
pub type Dec = Val;
