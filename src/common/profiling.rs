//! Profiling stuff.
//!
//! In `bench` mode, `Profiler` is a unit structure and the `profile!` macro
//! compiles to nothing, so all profiling is completely removed.

#[cfg(not(feature = "bench"))]
use std::time::{Duration, Instant};

#[cfg(not(feature = "bench"))]
use crate::common::*;

/// Extends duration with a pretty printing.
#[cfg(not(feature = "bench"))]
pub trait DurationExt {
    /// Nice string representation.
    fn to_str(&self) -> String;
}
#[cfg(not(feature = "bench"))]
impl DurationExt for Duration {
    fn to_str(&self) -> String {
        format!("{}.{:0>9}", self.as_secs(), self.subsec_nanos())
    }
}

/// Maps strings to counters.
#[cfg(not(feature = "bench"))]
pub type Stats = std::collections::HashMap<String, usize>;

/// Profiling structure, only in `not(bench)`.
///
/// Maintains scoped durations and statistics, both string-indexed.
///
/// Internally, the structures are wrapped in `RefCell`s so that mutation
/// does not require `&mut self`.
#[cfg(not(feature = "bench"))]
pub struct Profiler {
    /// Scope-indexed durations, with the live tick if any.
    map: std::cell::RefCell<std::collections::HashMap<Vec<&'static str>, (Option<Instant>, Duration)>>,
    /// Starting tick, for total time.
    start: Instant,
    /// Other statistics.
    stats: std::cell::RefCell<Stats>,
}
#[cfg(feature = "bench")]
pub struct Profiler;

#[cfg(not(feature = "bench"))]
impl Profiler {
    /// Constructor.
    pub fn new() -> Self {
        use std::cell::RefCell;
        Profiler {
            map: RefCell::new(std::collections::HashMap::new()),
            start: Instant::now(),
            stats: RefCell::new(Stats::new()),
        }
    }

    /// Acts on a statistic.
    pub fn stat_do<F, S>(&self, stat: S, f: F)
    where
        F: Fn(usize) -> usize,
        S: Into<String>,
    {
        let stat = stat.into();
        let mut map = self.stats.borrow_mut();
        let val = map.get(&stat).cloned().unwrap_or(0);
        let _ = map.insert(stat, f(val));
    }

    /// Ticks.
    pub fn tick(&self, scope: Vec<&'static str>) {
        if scope.is_empty() {
            panic!("Profiler: can't use the empty scope")
        }
        let mut map = self.map.borrow_mut();
        let time = map
            .entry(scope)
            .or_insert_with(|| (None, Duration::from_secs(0)));
        time.0 = Some(Instant::now())
    }

    /// Registers the time since the last tick.
    ///
    /// Panics if there was no tick since the last time registration.
    pub fn mark(&self, scope: Vec<&'static str>) {
        let mut map = self.map.borrow_mut();
        if let Some(&mut (ref mut tick, ref mut sum)) = map.get_mut(&scope) {
            let mut instant = None;
            std::mem::swap(&mut instant, tick);
            if let Some(instant) = instant {
                *sum += Instant::now().duration_since(instant);
                *tick = None
            }
        } else {
            panic!("profiling: trying to mark the time without ticking first")
        }
    }

    /// Prints the durations and statistics gathered so far.
    pub fn print(&self, name: &str) {
        println!("; {} {}", conf.emph(name), conf.emph("profiling:"));
        println!(";   total {}s", Instant::now().duration_since(self.start).to_str());
        let map = self.map.borrow();
        let mut scopes: Vec<_> = map.iter().collect();
        scopes.sort_by(|(l, _), (r, _)| l.cmp(r));
        for (scope, &(ref tick, ref time)) in scopes {
            debug_assert!(tick.is_none());
            println!(";   |- {}s {}", time.to_str(), scope.join("/"))
        }
        let stats = self.stats.borrow();
        if !stats.is_empty() {
            println!("; {}", conf.emph("stats:"));
            let mut stats: Vec<_> = stats.iter().collect();
            stats.sort();
            for (stat, count) in stats {
                println!(";   {}: {}", conf.emph(stat), count)
            }
        }
    }
}
#[cfg(feature = "bench")]
impl Profiler {
    /// Constructor.
    pub fn new() -> Self {
        Profiler
    }
    /// Does nothing in bench mode.
    pub fn print(&self, _: &str) {}
}

impl Default for Profiler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::Profiler;

    struct Host<'a> {
        _profiler: &'a Profiler,
    }

    // Wrapped blocks can start with a keyword (`match`, `if`, a loop),
    // which must not be mistaken for an expression fragment by the other
    // macro arms.
    #[test]
    fn wrap_accepts_keyword_blocks() {
        let profiler = Profiler::new();
        let choice = Some(3usize);
        let res = profile! {
            |profiler| wrap {
                match choice {
                    Some(n) => n + 1,
                    None => 0,
                }
            } "outer", "inner"
        };
        assert_eq!(res, 4);
        profile! { |profiler| "count" => add res }

        let host = Host {
            _profiler: &profiler,
        };
        let res = profile! {
            host wrap {
                if res > 0 {
                    res
                } else {
                    0
                }
            } "outer"
        };
        assert_eq!(res, 4);
        profile! { host "count" => add 1 }
    }
}
