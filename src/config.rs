/// Server configuration

use log::LevelFilter;
use std::path::{Path, PathBuf};

/// Where the client link comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transport {
    /// A serial device (or any character device) opened read/write.
    /// Line settings such as speed and raw mode are applied outside the server.
    Device(PathBuf),
    /// Standard input and output
    Stdio,
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Transport::Device(path) => write!(f, "{}", path.display()),
            Transport::Stdio => write!(f, "stdio"),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Client link
    pub transport: Transport,
    /// Image mounted at startup
    pub image: PathBuf,
    /// Nominal line speed, for the log only
    pub baud: Option<u32>,
    /// Log every request and reply
    pub verbose: bool,
}

impl ServerConfig {
    /// Start building a configuration serving `image`
    pub fn builder<P: AsRef<Path>>(image: P) -> ServerConfigBuilder {
        ServerConfigBuilder::new(image)
    }

    /// Default log level for the verbosity setting
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        }
    }
}

/// Builder for [`ServerConfig`]
#[derive(Debug, Clone)]
pub struct ServerConfigBuilder {
    config: ServerConfig,
}

impl ServerConfigBuilder {
    /// Create a builder serving `image` over stdio
    pub fn new<P: AsRef<Path>>(image: P) -> Self {
        Self {
            config: ServerConfig {
                transport: Transport::Stdio,
                image: image.as_ref().to_path_buf(),
                baud: None,
                verbose: false,
            },
        }
    }

    /// Serve over a device
    pub fn device<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config.transport = Transport::Device(path.as_ref().to_path_buf());
        self
    }

    /// Serve over stdin/stdout
    pub fn stdio(mut self) -> Self {
        self.config.transport = Transport::Stdio;
        self
    }

    /// Record the nominal line speed
    pub fn baud(mut self, baud: Option<u32>) -> Self {
        self.config.baud = baud;
        self
    }

    /// Set verbosity
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    /// Finish the configuration
    pub fn build(self) -> ServerConfig {
        self.config
    }
}
