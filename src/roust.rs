//! Attribute-reduct engine for rough-set feature selection.
//!
//! The input is a decision table: records made of an integer decision
//! value followed by integer conditional attribute values. The engine
//! partitions the records into equivalence classes, scores attribute
//! subsets with a significance measure, and searches for a reduct, a
//! minimal attribute subset scoring as well as the full attribute list.
//!
//! Module breakdown:
//!
//! - [`instance`]: decision tables and their parser,
//! - [`part`]: equivalence-class partitioning, three interchangeable
//!   strategies, incremental refinement, rough and nested regroupings,
//! - [`sig`]: significance measures, positive-region and entropy based,
//! - [`reduct`]: core extraction, greedy growth and inspection.
//!
//! Attributes are one-based, slot `0` of a record is the decision.
//!
//! The entry point for the binary is [`work`], which reads the table from
//! the configured input, runs the search with the configured measure and
//! prints the outcome.

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate lazy_static;

pub mod errors;
#[macro_use]
pub mod common;
pub mod instance;
pub mod part;
pub mod reduct;
pub mod sig;

#[cfg(test)]
mod tests;

use crate::common::*;
use crate::instance::Instance;
use crate::reduct::Engine;
use crate::sig::Measure;

/// Parses the configured input and runs the reduct search.
pub fn work() -> Res<()> {
    let profiler = Profiler::new();
    match conf.in_file() {
        Some(file_path) => {
            log! { @info "loading `{}`", conf.emph(file_path) }
            let mut file = std::fs::File::open(file_path)
                .chain_err(|| format!("while opening input file `{}`", conf.emph(file_path)))?;
            read_and_work(&mut file, &profiler)
        }
        None => {
            log! { @info "reading from stdin" }
            let stdin = std::io::stdin();
            let mut stdin = stdin.lock();
            read_and_work(&mut stdin, &profiler)
        }
    }
}

/// Parses a decision table from a reader and runs the reduct search.
pub fn read_and_work<R: Read>(reader: &mut R, profiler: &Profiler) -> Res<()> {
    let instance = profile! {
        |profiler| wrap {
            instance::parse::instance(reader)?
        } "parsing"
    };
    log! { @info
        "parsed {} records over {} attributes", instance.len(), instance.att_count()
    }
    run(&instance, profiler)?;
    print_stats("roust", profiler);
    Ok(())
}

/// Runs the reduct search with the configured measure.
pub fn run(instance: &Instance, profiler: &Profiler) -> Res<()> {
    match conf.sig.measure {
        MeasureKind::PosRegion => run_measure::<sig::PosRegion>(instance, profiler),
        MeasureKind::Dependency => run_measure::<sig::Dependency>(instance, profiler),
        MeasureKind::Discernibility => run_measure::<sig::Discernibility>(instance, profiler),
        MeasureKind::Shannon => run_measure::<sig::Shannon>(instance, profiler),
        MeasureKind::Liang => run_measure::<sig::Liang>(instance, profiler),
        MeasureKind::Combination => run_measure::<sig::Combination>(instance, profiler),
    }
}

/// Monomorphic search runner.
fn run_measure<M: Measure>(instance: &Instance, profiler: &Profiler) -> Res<()> {
    let mut engine = Engine::<M>::new(instance, profiler)?;
    let outcome = profile! {
        |profiler| wrap {
            engine.reduce()?
        } "search"
    };
    if outcome.complete {
        log! { @info "{}", conf.happy("reduct matches the full attribute list") }
    } else {
        log! { @info "{}", conf.sad("search stalled below the full-list significance") }
    }
    println!("{}", outcome);
    Ok(())
}
