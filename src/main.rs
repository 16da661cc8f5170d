use clap::{Parser as ClapParser, Subcommand};
use match_jsonpath::cli::{self, CheckOptions, CheckResult, CliError};
use std::io::{self, Read};

#[derive(ClapParser)]
#[command(name = "jsonpath")]
#[command(about = "Run JSONPath queries against JSON documents")]
#[command(version)]
struct Cli {
    /// Log parse and evaluation errors to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and execute a query
    Check {
        /// The query to execute
        query: String,

        /// JSON input (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<String>,

        /// Pretty-print the output
        #[arg(short, long)]
        pretty: bool,

        /// Only validate syntax, don't execute
        #[arg(long)]
        syntax_only: bool,

        /// Treat evaluation errors as an empty result
        #[arg(short, long)]
        silent: bool,
    },

    /// Print a query in canonical form
    Canonical {
        /// The query to print
        query: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let result = match cli.command {
        Commands::Check {
            query,
            input,
            pretty,
            syntax_only,
            silent,
        } => run_check(query, input, pretty, syntax_only, silent),
        Commands::Canonical { query } => cli::execute_canonical(&query).map(|text| {
            println!("{text}");
        }),
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn run_check(
    query: String,
    input: Option<String>,
    pretty: bool,
    syntax_only: bool,
    silent: bool,
) -> Result<(), CliError> {
    let input = match input {
        Some(s) => Some(s),
        None if !syntax_only && !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Some(buffer)
        }
        None => None,
    };

    let options = CheckOptions {
        query,
        input,
        pretty,
        syntax_only,
        silent,
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Success(output) => println!("{}", output),
        CheckResult::NotFound => log::info!("no nodes matched"),
    }
    Ok(())
}
