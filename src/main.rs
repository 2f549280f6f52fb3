use clap::{Args, Parser, Subcommand};
use pqdate::{Date, DateError, NullDate};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    LibraryError(#[from] DateError),
}

#[derive(Args, Debug)]
#[group(required = false, multiple = false)]
struct ClockArg {
    /// Use the current UTC date. This is the default.
    #[arg(long)]
    utc: bool,

    /// Use the current date in the system's local timezone.
    #[arg(long)]
    local: bool,
}

impl ClockArg {
    fn today(&self) -> Date {
        if self.local {
            Date::local_now()
        } else {
            Date::utc_now()
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log decoding details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
#[command(arg_required_else_help(true))]
enum Commands {
    /// Adds a signed number of months to a date, carrying into the year
    AddMonths {
        /// The date, in format `YYYY-MM-DD`
        date: String,

        /// The number of months to add. May be negative.
        #[arg(allow_negative_numbers = true)]
        months: i32,
    },

    /// Decodes a JSON date string or `null`, and prints it re-encoded
    Json {
        /// The JSON input, e.g. `"2023-12-25"` (with quotes), `""` or `null`
        input: String,
    },

    /// Decodes a plain `YYYY-MM-DD` date, and prints it. Null dates print as an empty line.
    Text {
        /// The text input. An empty string is null.
        input: String,
    },

    /// Prints today's date
    Today {
        #[command(flatten)]
        clock: ClockArg,
    },
}

type Output = (String, i32);

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pqdate=trace"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pqdate=warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    debug!(?cli, "parsed arguments");

    match do_work(cli) {
        Ok((output, exit_code)) => {
            println!("{output}");
            std::process::exit(exit_code);
        }
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn do_work(cli: Cli) -> Result<Output, CliError> {
    match cli.command {
        Some(Commands::AddMonths { date, months }) => {
            let mut date: Date = date.parse()?;
            date.add_months(months);
            Ok((date.to_string(), 0))
        }
        Some(Commands::Json { input }) => {
            let mut date = NullDate::null();
            date.unmarshal_json(input.as_bytes())?;
            Ok((String::from_utf8_lossy(&date.marshal_json()).into_owned(), 0))
        }
        Some(Commands::Text { input }) => {
            let mut date = NullDate::null();
            date.unmarshal_text(input.as_bytes())?;
            Ok((date.to_string(), 0))
        }
        Some(Commands::Today { clock }) => Ok((clock.today().to_string(), 0)),
        None => unreachable!("clap should catch this no-subcommand case"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    fn run(args: &[&str]) -> Result<Output, CliError> {
        let cli = Cli::try_parse_from(std::iter::once("pqdate").chain(args.iter().copied())).unwrap();
        do_work(cli)
    }

    #[rstest]
    #[case(&["add-months", "2000-01-01", "5"], "2000-06-01")]
    #[case(&["add-months", "2000-01-01", "-14"], "1998-11-01")]
    #[case(&["json", "\"2023-12-25\""], "\"2023-12-25\"")]
    #[case(&["json", "\"\""], "null")]
    #[case(&["json", "null"], "null")]
    #[case(&["json", ""], "null")]
    #[case(&["text", "2023-12-25"], "2023-12-25")]
    #[case(&["text", ""], "")]
    fn test_commands(#[case] args: &[&str], #[case] expected: &str) {
        assert_eq!((expected.to_string(), 0), run(args).unwrap());
    }

    #[rstest]
    #[case(&["add-months", "2000-02-30", "1"])]
    #[case(&["json", "invalid-json"])]
    #[case(&["json", "\"invalid-date\""])]
    #[case(&["text", "12/25/2023"])]
    fn test_command_errors(#[case] args: &[&str]) {
        assert!(matches!(run(args), Err(CliError::LibraryError(_))));
    }

    #[test]
    fn test_today() {
        let (output, code) = run(&["today", "--local"]).unwrap();
        assert_eq!(0, code);
        assert!(output.parse::<Date>().is_ok());
    }

    #[test]
    fn test_clock_flags_are_exclusive() {
        assert!(Cli::try_parse_from(["pqdate", "today", "--utc", "--local"]).is_err());
    }
}
