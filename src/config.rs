//! Command-line configuration for the `genealogy` binary.
//!
//! Arguments are read from `std::env::args`; `GENEALOGY_MODE` and
//! `GENEALOGY_FORMAT` supply defaults that flags override.

use crate::error::{NetworkError, Result};
use crate::mode::Mode;
use std::path::PathBuf;
use std::str::FromStr;

pub const MODE_VAR: &str = "GENEALOGY_MODE";
pub const FORMAT_VAR: &str = "GENEALOGY_FORMAT";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Tree,
    Pyramid,
    Summary,
    Csv,
    Json,
}

impl FromStr for OutputFormat {
    type Err = NetworkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tree" => Ok(OutputFormat::Tree),
            "pyramid" => Ok(OutputFormat::Pyramid),
            "summary" => Ok(OutputFormat::Summary),
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            other => Err(NetworkError::invalid_argument(format!(
                "unknown format '{}', expected tree, pyramid, summary, csv or json",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub input: PathBuf,
    pub cells: Option<PathBuf>,
    pub mode: Mode,
    pub format: OutputFormat,
    pub expand_all: bool,
    pub expand: Vec<String>,
    pub cache: Option<PathBuf>,
    pub top: usize,
    pub verbose: bool,
}

impl Config {
    /// Parses the arguments after the program name, with environment defaults.
    pub fn from_args<I>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        Self::from_args_with_env(args, |key| std::env::var(key).ok())
    }

    pub fn from_args_with_env<I, E>(args: I, env: E) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
        E: Fn(&str) -> Option<String>,
    {
        let mut mode = match env(MODE_VAR) {
            Some(raw) => raw.parse()?,
            None => Mode::default(),
        };
        let mut format = match env(FORMAT_VAR) {
            Some(raw) => raw.parse()?,
            None => OutputFormat::default(),
        };
        let mut input = None;
        let mut cells = None;
        let mut expand_all = false;
        let mut expand = Vec::new();
        let mut cache = None;
        let mut top = 10;
        let mut verbose = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--mode" | "-m" => mode = value_for(&arg, args.next())?.parse()?,
                "--format" | "-f" => format = value_for(&arg, args.next())?.parse()?,
                "--cells" => cells = Some(PathBuf::from(value_for(&arg, args.next())?)),
                "--cache" => cache = Some(PathBuf::from(value_for(&arg, args.next())?)),
                "--expand" => expand.push(value_for(&arg, args.next())?),
                "--expand-all" => expand_all = true,
                "--top" => {
                    let raw = value_for(&arg, args.next())?;
                    top = raw.parse().map_err(|_| {
                        NetworkError::invalid_argument(format!(
                            "--top expects a number, got '{}'",
                            raw
                        ))
                    })?;
                }
                "-v" | "--verbose" => verbose = true,
                flag if flag.starts_with('-') => {
                    return Err(NetworkError::invalid_argument(format!(
                        "unknown option '{}'",
                        flag
                    )));
                }
                _ if input.is_none() => input = Some(PathBuf::from(&arg)),
                _ => {
                    return Err(NetworkError::invalid_argument(format!(
                        "unexpected argument '{}'",
                        arg
                    )));
                }
            }
        }

        let Some(input) = input else {
            return Err(NetworkError::invalid_argument("missing input file"));
        };

        Ok(Config {
            input,
            cells,
            mode,
            format,
            expand_all,
            expand,
            cache,
            top,
            verbose,
        })
    }

    pub fn usage(program: &str) -> String {
        format!(
            "Usage: {} <people.json|people.csv|snapshot.gz> [options]\n\
             Options:\n  \
             -m, --mode <evangelism|discipleship>   parent reference to follow\n  \
             -f, --format <tree|pyramid|summary|csv|json>\n  \
             --cells <cells.csv|cells.json>       cell names and leaders\n  \
             --expand <id>                        expand one node (repeatable)\n  \
             --expand-all                         expand every node\n  \
             --top <n>                            multipliers listed in the summary\n  \
             --cache <snapshot.gz>                also write a compressed snapshot\n  \
             -v, --verbose                        debug logging\n\
             Environment: {} and {} set the default mode and format.",
            program, MODE_VAR, FORMAT_VAR
        )
    }
}

fn value_for(flag: &str, value: Option<String>) -> Result<String> {
    value.ok_or_else(|| NetworkError::invalid_argument(format!("{} expects a value", flag)))
}
