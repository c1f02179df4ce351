/// NetPC server for Flex systems

use clap::Parser;
use flexnet::*;
use log::{error, info};
use std::fs::OpenOptions;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    name = "flexnet",
    version,
    about = "Serve Flex disk images to a 6800/6809 system over a serial line (NetPC protocol)"
)]
struct Args {
    /// Serial line to use (must already be set up, e.g. with stty)
    #[arg(short = 'd', long, value_name = "DEVICE", required_unless_present = "stdio")]
    device: Option<PathBuf>,

    /// Serve over stdin/stdout instead of a serial line
    #[arg(long, conflicts_with = "device")]
    stdio: bool,

    /// Baud rate of the line (informational)
    #[arg(short = 's', long, value_name = "SPEED")]
    speed: Option<u32>,

    /// Print requests to the server and replies
    #[arg(short, long)]
    verbose: bool,

    /// Disk image mounted at startup
    image: PathBuf,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        let builder = ServerConfig::builder(&self.image)
            .baud(self.speed)
            .verbose(self.verbose);
        let builder = match self.device {
            Some(device) if !self.stdio => builder.device(device),
            _ => builder.stdio(),
        };
        builder.build()
    }
}

fn main() -> ExitCode {
    let config = Args::parse().into_config();

    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .init();

    match config.transport.clone() {
        Transport::Device(path) => {
            let line = match OpenOptions::new().read(true).write(true).open(&path) {
                Ok(line) => line,
                Err(e) => {
                    error!("{}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            };
            let reader = match line.try_clone() {
                Ok(reader) => reader,
                Err(e) => {
                    error!("{}: {}", path.display(), e);
                    return ExitCode::FAILURE;
                }
            };
            run(&config, reader, line)
        }
        Transport::Stdio => run(&config, io::stdin(), io::stdout()),
    }
}

fn run<R: Read, W: Write>(config: &ServerConfig, reader: R, writer: W) -> ExitCode {
    match config.baud {
        Some(baud) => info!("Link on {}, speed is {} bauds", config.transport, baud),
        None => info!("Link on {}", config.transport),
    }

    let fs = match LocalFs::from_process_dir() {
        Ok(fs) => fs,
        Err(e) => {
            error!("Cannot read current directory: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(fs);
    match session.load(&config.image) {
        Ok(image) if image.is_read_only() => {
            error!("Flexnet can't start with a read-only file");
            return ExitCode::FAILURE;
        }
        Ok(_) => {}
        Err(e) => {
            error!("{}: {}", config.image.display(), e);
            return ExitCode::FAILURE;
        }
    }

    let mut server = Server::new(session, Channel::new(reader, writer));
    let result = server.serve();
    drop(server);

    match result {
        Ok(shutdown) => ExitCode::from(shutdown.exit_code()),
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
