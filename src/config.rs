use std::fmt;
use std::time::Duration;

use clap::ValueEnum;

/// Request methods the benchmark can issue. None of them carry a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HttpMethod {
    Get,
    Head,
    Options,
    Trace,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Proxy {
    pub host: String,
    pub port: u16,
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Validated benchmark parameters. Built once from the CLI and read-only
/// for the rest of the run; workers see it through an `Arc`.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    pub method: HttpMethod,
    pub proxy: Option<Proxy>,
    pub clients: usize,
    pub duration: Duration,
    pub force: bool,
    pub reload: bool,
}

impl BenchmarkConfig {
    pub fn duration_secs(&self) -> u64 {
        self.duration.as_secs()
    }
}
