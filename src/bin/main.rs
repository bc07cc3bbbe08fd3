use std::{error::Error, process::ExitCode};

use deslang::driver::{self, DriverError, Options};
use log::LevelFilter;
use simple_logger::SimpleLogger;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    SimpleLogger::new()
        .with_level(LevelFilter::Warn)
        .env()
        .init()?;

    let paths: Vec<String> = std::env::args().skip(1).collect();
    let options = Options::default();

    match driver::compile_files(&paths, &options) {
        Ok(compilation) => {
            let entry = compilation.entry_class().unwrap_or_default();
            println!("ok: {} units, entry class {entry}", compilation.units.len());
            Ok(())
        }
        Err(error @ (DriverError::Syntax(_) | DriverError::Fatal(_) | DriverError::Semantic(_))) => {
            for diagnostic in error.diagnostics() {
                println!("{diagnostic}");
            }
            Err(error.into())
        }
        Err(error) => Err(error.into()),
    }
}
