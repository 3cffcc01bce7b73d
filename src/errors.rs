//! Error types.
//!
//! One specific event is handled as an error so that it propagates upwards
//! naturally although technically it is not really one: [`ErrorKind::Timeout`],
//! raised by the configuration's timeout check between pipeline phases.
//!
//! Partitioning and significance computations are deterministic given
//! identical inputs, so none of the errors here are ever retried: they
//! surface to the caller as-is.

use crate::common::AttIdx;

error_chain! {
    types {
        Error, ErrorKind, ResultExt, Res;
    }

    foreign_links {
        Io(::std::io::Error) #[doc = "IO error."];
    }

    errors {
        #[doc = "Illegal attribute index in a partition request."]
        BadAtt(att: AttIdx, max: usize) {
            description("illegal attribute index")
            display(
                "illegal attribute index {} (conditional attributes range over [1, {}])",
                att, max
            )
        }
        #[doc = "Decision-table parse error."]
        Parse(line: usize, msg: String) {
            description("parse error")
            display("parse error at line {}: {}", line, msg)
        }
        #[doc = "Fatal strategy misconfiguration, raised at construction time."]
        Misconfig(msg: String) {
            description("misconfiguration")
            display("misconfiguration: {}", msg)
        }
        #[doc = "Not really an error, timeout early return."]
        Timeout {
            description("timeout")
            display("timeout")
        }
    }
}

impl Error {
    /// True if the kind of the error is [`ErrorKind::Timeout`].
    pub fn is_timeout(&self) -> bool {
        matches!(*self.kind(), ErrorKind::Timeout)
    }
}

/// Prints an error.
pub fn print_err(errs: &Error) {
    use crate::common::{conf, ColorExt};
    println!("({} \"", conf.bad("error"));
    for err in errs.iter() {
        for line in format!("{}", err).lines() {
            println!("  {}", line)
        }
    }
    println!("\")")
}
