use std::io::BufRead;
use std::process::ExitCode;

use httphelper::{ExecutorConfig, RequestExecutor};
use log::error;

const DEFAULT_URL: &str = "http://www.google.com";

fn main() -> ExitCode {
    env_logger::init();

    let url = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string());
    let config = match ExecutorConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut executor = RequestExecutor::with_config(&url, config);
    let mut response = executor.get();
    println!("{}", response.summary());

    let failed = response.error.is_some();
    if let Some(reader) = response.take_reader() {
        let mut data = String::new();
        for line in reader.lines() {
            match line {
                Ok(line) => data.push_str(&line),
                Err(e) => {
                    error!("reading body from {url}: {e}");
                    break;
                }
            }
        }
        println!("{data}");
    }
    drop(response);
    executor.close();

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
