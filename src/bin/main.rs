//! Entry point.

use roust::errors::*;

fn main() {
    // Work and report any error.
    if let Err(errs) = roust::work() {
        if errs.is_timeout() {
            println!("(timeout)");
            std::process::exit(0)
        }
        print_err(&errs);
        std::process::exit(2)
    }
    std::process::exit(0)
}
