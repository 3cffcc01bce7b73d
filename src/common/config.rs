//! Global configuration.

use std::time::{Duration, Instant};

use ansi_term::{Colour, Style};
use clap::Arg;

use crate::errors::*;

/// Clap `App`.
pub type App = clap::App<'static>;
/// Clap `ArgMatches`.
pub type Matches = clap::ArgMatches;

/// Functions all sub-configurations must have.
pub trait SubConf {
    /// Adds clap options to a clap `App`.
    fn add_args(app: App, order: usize) -> App;
}

/// Partitioning strategy, one of the three interchangeable algorithms.
///
/// All three produce the same classes for the same input, they only differ
/// in time/space trade-offs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PartStrategy {
    /// Hash-keyed grouping on attribute-value vectors.
    Hashed,
    /// Sort by attribute values, then single sequential scan.
    Sorted,
    /// Ordinal-ordered scan, classes as ordinal lists.
    IdSeq,
}
impl PartStrategy {
    /// Parses a strategy name.
    pub fn of_str(s: &str) -> Option<Self> {
        match s {
            "hash" => Some(PartStrategy::Hashed),
            "sort" => Some(PartStrategy::Sorted),
            "seq" => Some(PartStrategy::IdSeq),
            _ => None,
        }
    }
}

/// Capacity policy: how many attributes the incremental-partition cursor
/// yields per refinement step, as a pure function of the remaining count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CapacityPolicy {
    /// Everything at once, degenerates to one full partition computation.
    All,
    /// Fixed batch size, must be positive.
    Fixed(usize),
    /// `ceil(sqrt(remaining))` attributes per step.
    Sqrt,
}
impl CapacityPolicy {
    /// Batch size for some remaining attribute count.
    ///
    /// Never returns `0` unless `remaining` is `0`.
    pub fn capacity(self, remaining: usize) -> usize {
        if remaining == 0 {
            return 0;
        }
        match self {
            CapacityPolicy::All => remaining,
            CapacityPolicy::Fixed(k) => k.min(remaining),
            CapacityPolicy::Sqrt => {
                let sqrt = (remaining as f64).sqrt().ceil() as usize;
                sqrt.max(1).min(remaining)
            }
        }
    }

    /// Parses a capacity spec: `all`, `sqrt`, or a positive integer.
    pub fn of_str(s: &str) -> Option<Self> {
        match s {
            "all" => Some(CapacityPolicy::All),
            "sqrt" => Some(CapacityPolicy::Sqrt),
            _ => match s.parse::<usize>() {
                Ok(n) if n > 0 => Some(CapacityPolicy::Fixed(n)),
                _ => None,
            },
        }
    }
}

/// Significance measure selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MeasureKind {
    /// Positive region cardinality.
    PosRegion,
    /// Positive region over universe size.
    Dependency,
    /// Discernible record pair count.
    Discernibility,
    /// Shannon conditional entropy.
    Shannon,
    /// Liang conditional entropy.
    Liang,
    /// Combination conditional entropy.
    Combination,
}
impl MeasureKind {
    /// Parses a measure name.
    pub fn of_str(s: &str) -> Option<Self> {
        match s {
            "pos" => Some(MeasureKind::PosRegion),
            "dep" => Some(MeasureKind::Dependency),
            "disc" => Some(MeasureKind::Discernibility),
            "shannon" => Some(MeasureKind::Shannon),
            "liang" => Some(MeasureKind::Liang),
            "comb" => Some(MeasureKind::Combination),
            _ => None,
        }
    }
}

/// Partitioning configuration.
pub struct PartConf {
    /// Partitioning strategy.
    pub strategy: PartStrategy,
    /// Capacity policy for incremental refinement.
    pub capacity: CapacityPolicy,
    /// Initial capacity of the class vector of a partition.
    pub cls_capa: usize,
    /// Initial capacity of the key factory.
    pub key_capa: usize,
}
impl SubConf for PartConf {
    fn add_args(app: App, mut order: usize) -> App {
        let mut order = || {
            order += 1;
            order
        };

        app.arg(
            Arg::new("strategy")
                .long("strategy")
                .help("sets the partitioning strategy")
                .validator(|s| {
                    PartStrategy::of_str(s)
                        .map(|_| ())
                        .ok_or_else(|| format!("expected `hash`, `sort` or `seq`, got `{}`", s))
                })
                .value_name("hash|sort|seq")
                .default_value("hash")
                .takes_value(true)
                .number_of_values(1)
                .display_order(order()),
        )
        .arg(
            Arg::new("capacity")
                .long("capacity")
                .help("attributes folded in per incremental refinement step")
                .validator(|s| {
                    CapacityPolicy::of_str(s).map(|_| ()).ok_or_else(|| {
                        format!("expected `all`, `sqrt` or a positive integer, got `{}`", s)
                    })
                })
                .value_name("all|sqrt|int")
                .default_value("all")
                .takes_value(true)
                .number_of_values(1)
                .display_order(order()),
        )
    }
}
impl PartConf {
    /// Creates itself from some matches.
    pub fn new(matches: &Matches) -> Self {
        let strategy = matches
            .value_of("strategy")
            .and_then(PartStrategy::of_str)
            .expect("unreachable(strategy): default is provided");
        let capacity = matches
            .value_of("capacity")
            .and_then(CapacityPolicy::of_str)
            .expect("unreachable(capacity): default is provided");
        PartConf {
            strategy,
            capacity,
            cls_capa: 107,
            key_capa: 3_000,
        }
    }
}

/// Significance configuration.
pub struct SigConf {
    /// Measure to drive the reduct search with.
    pub measure: MeasureKind,
    /// Acceptable numeric deviation on all significance comparisons.
    pub deviation: f64,
}
impl SubConf for SigConf {
    fn add_args(app: App, mut order: usize) -> App {
        let mut order = || {
            order += 1;
            order
        };

        app.arg(
            Arg::new("measure")
                .long("measure")
                .help("sets the significance measure")
                .validator(|s| {
                    MeasureKind::of_str(s).map(|_| ()).ok_or_else(|| {
                        format!(
                            "expected `pos`, `dep`, `disc`, `shannon`, `liang` \
                             or `comb`, got `{}`",
                            s
                        )
                    })
                })
                .value_name("pos|dep|disc|shannon|liang|comb")
                .default_value("dep")
                .takes_value(true)
                .number_of_values(1)
                .display_order(order()),
        )
        .arg(
            Arg::new("deviation")
                .long("deviation")
                .help("acceptable numeric deviation on significance comparisons")
                .validator(float_validator)
                .value_name("float")
                .default_value("1e-9")
                .takes_value(true)
                .number_of_values(1)
                .display_order(order()),
        )
    }
}
impl SigConf {
    /// Creates itself from some matches.
    pub fn new(matches: &Matches) -> Self {
        let measure = matches
            .value_of("measure")
            .and_then(MeasureKind::of_str)
            .expect("unreachable(measure): default is provided");
        let deviation = matches
            .value_of("deviation")
            .map(|s| s.parse::<f64>())
            .expect("unreachable(deviation): default is provided")
            .expect("unreachable(deviation): validated");
        SigConf { measure, deviation }
    }
}

/// Global configuration.
pub struct Config {
    /// Input file.
    file: Option<String>,
    /// Verbosity.
    pub verb: usize,
    /// Statistics flag.
    pub stats: bool,
    /// Instant at which we'll timeout.
    timeout: Option<Instant>,
    /// Styles, for coloring.
    styles: Styles,

    /// Partitioning configuration.
    pub part: PartConf,
    /// Significance configuration.
    pub sig: SigConf,
}
impl ColorExt for Config {
    fn styles(&self) -> &Styles {
        &self.styles
    }
}
impl Config {
    /// Input file.
    #[inline]
    pub fn in_file(&self) -> Option<&String> {
        self.file.as_ref()
    }

    /// Checks if we're out of time.
    #[inline]
    pub fn check_timeout(&self) -> Res<()> {
        if let Some(max) = self.timeout.as_ref() {
            if &Instant::now() > max {
                bail!(ErrorKind::Timeout)
            }
        }
        Ok(())
    }

    /// Parses command-line arguments and generates the configuration.
    pub fn clap() -> Self {
        let mut app = App::new(clap::crate_name!());
        app = Self::add_args(app, 0);
        app = PartConf::add_args(app, 100);
        app = SigConf::add_args(app, 200);

        let matches = app.get_matches();

        // Input file.
        let file = matches.value_of("input file").map(|s| s.to_string());

        // Verbosity.
        let mut verb = 0;
        for _ in 0..matches.occurrences_of("verb") {
            verb += 1
        }
        for _ in 0..matches.occurrences_of("quiet") {
            if verb > 0 {
                verb -= 1
            }
        }

        // Colors.
        let color = atty::is(atty::Stream::Stdout) && bool_of_matches(&matches, "color");
        let styles = Styles::new(color);

        // Profiling.
        let stats = bool_of_matches(&matches, "stats");

        // Timeout.
        let timeout = match int_of_matches(&matches, "timeout") {
            0 => None,
            n => Some(Instant::now() + Duration::new(n as u64, 0)),
        };

        let part = PartConf::new(&matches);
        let sig = SigConf::new(&matches);

        Config {
            file,
            verb,
            stats,
            timeout,
            styles,
            part,
            sig,
        }
    }

    /// Adds clap options to a clap `App`.
    pub fn add_args(app: App, mut order: usize) -> App {
        let mut order = || {
            order += 1;
            order
        };

        app.author(clap::crate_authors!())
            .version(*crate::common::version)
            .about("Attribute-reduct engine for rough-set feature selection.")
            .arg(
                Arg::new("input file")
                    .help("sets the input decision table to use")
                    .index(1)
                    .display_order(order()),
            )
            .arg(
                Arg::new("verb")
                    .short('v')
                    .help("increases verbosity")
                    .takes_value(false)
                    .multiple_occurrences(true)
                    .display_order(order()),
            )
            .arg(
                Arg::new("quiet")
                    .short('q')
                    .help("decreases verbosity")
                    .takes_value(false)
                    .multiple_occurrences(true)
                    .display_order(order()),
            )
            .arg(
                Arg::new("color")
                    .long("color")
                    .short('c')
                    .help("(de)activates coloring (off if output is not a tty)")
                    .validator(bool_validator)
                    .value_name(bool_format)
                    .default_value("on")
                    .takes_value(true)
                    .number_of_values(1)
                    .display_order(order()),
            )
            .arg(
                Arg::new("stats")
                    .long("stats")
                    .short('s')
                    .help("reports some statistics at the end of the run")
                    .validator(bool_validator)
                    .value_name(bool_format)
                    .default_value("no")
                    .takes_value(true)
                    .number_of_values(1)
                    .display_order(order()),
            )
            .arg(
                Arg::new("timeout")
                    .long("timeout")
                    .short('t')
                    .help("sets a timeout in seconds, `0` for none")
                    .validator(int_validator)
                    .value_name("int")
                    .default_value("0")
                    .takes_value(true)
                    .number_of_values(1)
                    .display_order(order()),
            )
    }
}

/// Contains some styles for coloring.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Emphasis style.
    emph: Style,
    /// Happy style.
    hap: Style,
    /// Sad style.
    sad: Style,
    /// Bad style.
    bad: Style,
}
impl Default for Styles {
    fn default() -> Self {
        Styles::new(true)
    }
}
impl ColorExt for Styles {
    fn styles(&self) -> &Styles {
        self
    }
}
impl Styles {
    /// Creates some styles.
    pub fn new(colored: bool) -> Self {
        Styles {
            emph: if colored {
                Style::new().bold()
            } else {
                Style::new()
            },
            hap: if colored {
                Colour::Green.normal().bold()
            } else {
                Style::new()
            },
            sad: if colored {
                Colour::Yellow.normal().bold()
            } else {
                Style::new()
            },
            bad: if colored {
                Colour::Red.normal().bold()
            } else {
                Style::new()
            },
        }
    }
}

/// Can color things.
pub trait ColorExt {
    /// The styles in the colorizer: emph, happy, sad, and bad.
    fn styles(&self) -> &Styles;
    /// String emphasis.
    #[inline]
    fn emph<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().emph.paint(s.as_ref()))
    }
    /// Happy string.
    #[inline]
    fn happy<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().hap.paint(s.as_ref()))
    }
    /// Sad string.
    #[inline]
    fn sad<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().sad.paint(s.as_ref()))
    }
    /// Bad string.
    #[inline]
    fn bad<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().bad.paint(s.as_ref()))
    }
}

/// Format of boolean options.
#[allow(non_upper_case_globals)]
pub static bool_format: &str = "on/true|no/off/false";

/// Boolean of a string.
pub fn bool_of_str(s: &str) -> Option<bool> {
    match s {
        "on" | "true" => Some(true),
        "no" | "off" | "false" => Some(false),
        _ => None,
    }
}

/// Boolean of some matches, assumes a default is provided and `bool_validator`
/// was used.
pub fn bool_of_matches(matches: &Matches, key: &str) -> bool {
    matches
        .value_of(key)
        .and_then(bool_of_str)
        .expect("failed to retrieve boolean argument")
}

/// Integer of some matches, assumes a default is provided and `int_validator`
/// was used.
pub fn int_of_matches(matches: &Matches, key: &str) -> usize {
    matches
        .value_of(key)
        .map(|s| s.parse::<usize>())
        .expect("failed to retrieve integer argument")
        .expect("failed to retrieve integer argument")
}

/// Validates integer input.
pub fn int_validator(s: &str) -> Result<(), String> {
    match s.parse::<usize>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!("expected an integer, got `{}`", s)),
    }
}

/// Validates float input.
pub fn float_validator(s: &str) -> Result<(), String> {
    match s.parse::<f64>() {
        Ok(_) => Ok(()),
        Err(_) => Err(format!("expected a float, got `{}`", s)),
    }
}

/// Validates boolean input.
pub fn bool_validator(s: &str) -> Result<(), String> {
    if bool_of_str(s).is_some() {
        Ok(())
    } else {
        Err(format!("expected `on/true` or `off/false`, got `{}`", s))
    }
}
