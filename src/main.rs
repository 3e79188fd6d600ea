use std::io::{self, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    match hookwarden::run() {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            let _ = writeln!(io::stderr(), "{}", err);
            ExitCode::from(1)
        }
    }
}
