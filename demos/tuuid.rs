//! Simple command that prints one or '-n count' UUID strings, translates a UUID between formats,
//! or describes the generator state

use std::{env, io, io::Write, process::ExitCode};

use tuuid::{node::FixedNode, Config, Format, Generator};

const USAGE: &str = "[-n count] [-f format] | -t from:to value | -i";

#[derive(Debug, Default, PartialEq)]
enum Command {
    #[default]
    Generate,
    Translate(Format, Format, String),
    Info,
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    command: Command,
    count: Option<usize>,
    format: Option<Format>,
}

fn main() -> io::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let opts = {
        let mut args = env::args();
        let program = args.next();
        match parse_args(args) {
            Ok(opts) => opts,
            Err(message) => {
                eprintln!("Error: {}", message);
                eprintln!("Usage: {} {}", program.as_deref().unwrap_or("tuuid"), USAGE);
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    if let Command::Translate(from, to, value) = &opts.command {
        return match tuuid::translate(value, *from, *to) {
            Ok(e) => {
                println!("{}", e);
                Ok(ExitCode::SUCCESS)
            }
            Err(err) => {
                eprintln!("Error: {}", err);
                Ok(ExitCode::FAILURE)
            }
        };
    }

    let g = match new_generator() {
        Ok(g) => g,
        Err(err) => {
            eprintln!("Error: {}", err);
            return Ok(ExitCode::FAILURE);
        }
    };

    if opts.command == Command::Info {
        println!("{}", g);
        if let Some(path) = g.state_file() {
            println!("State file: {}", path.display());
        }
        return Ok(ExitCode::SUCCESS);
    }

    let format = opts.format.unwrap_or_default();
    let mut buf = io::BufWriter::new(io::stdout());
    for _ in 0..opts.count.unwrap_or(1) {
        writeln!(buf, "{}", g.generate(format))?;
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(feature = "mac_address")]
fn new_generator() -> tuuid::Result<Generator> {
    Generator::with_config(Config::from_env(), tuuid::node::HardwareNode).or_else(|err| {
        tracing::warn!("{err}; falling back to a random node identifier");
        Generator::with_config(Config::from_env(), random_node())
    })
}

#[cfg(not(feature = "mac_address"))]
fn new_generator() -> tuuid::Result<Generator> {
    Generator::with_config(Config::from_env(), random_node())
}

/// Returns a random node identifier with the multicast bit set, so that it cannot collide with a
/// real MAC address.
fn random_node() -> FixedNode {
    FixedNode(rand::random::<u64>() | (1 << 40))
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Options, String> {
    let mut opts = Options::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-n" => {
                if opts.count.is_some() {
                    return Err("option 'n' given more than once".to_owned());
                }
                let n_arg = args.next().ok_or("argument to option 'n' missing")?;
                let Ok(c) = n_arg.parse() else {
                    return Err(format!("invalid argument to option 'n': '{}'", n_arg));
                };
                opts.count.replace(c);
            }
            "-f" => {
                if opts.format.is_some() {
                    return Err("option 'f' given more than once".to_owned());
                }
                let f_arg = args.next().ok_or("argument to option 'f' missing")?;
                let format = f_arg.parse().map_err(|err| format!("{}", err))?;
                opts.format.replace(format);
            }
            "-t" => {
                if opts.command != Command::Generate {
                    return Err("option 't' conflicts with another command".to_owned());
                }
                let t_arg = args.next().ok_or("argument to option 't' missing")?;
                let Some((from, to)) = t_arg.split_once(':') else {
                    return Err(format!("invalid argument to option 't': '{}'", t_arg));
                };
                let from = from.parse().map_err(|err| format!("{}", err))?;
                let to = to.parse().map_err(|err| format!("{}", err))?;
                let value = args.next().ok_or("value to translate missing")?;
                opts.command = Command::Translate(from, to, value);
            }
            "-i" => {
                if opts.command != Command::Generate {
                    return Err("option 'i' conflicts with another command".to_owned());
                }
                opts.command = Command::Info;
            }
            _ => return Err(format!("unrecognized argument '{}'", arg)),
        }
    }

    if opts.command != Command::Generate && (opts.count.is_some() || opts.format.is_some()) {
        return Err("options 'n' and 'f' apply to generation only".to_owned());
    }
    Ok(opts)
}
