use clap::Parser;
use std::env;
use std::fs;
use std::io::{self, Write};
use tape_bf::cli_util::{print_load_error, print_run_error};
use tape_bf::config::Settings;
use tape_bf::{EofPolicy, Program};

fn print_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] <PATH>   # Load the program at PATH and run it on stdin/stdout

Options:
  --tape-size <N>        Number of tape cells (fallback BF_TAPE_SIZE; default 65535)
  --eof <POLICY>         Cell value stored by ',' at end of input: zero, unchanged or max
                         (fallback BF_EOF; default zero)
  --help, -h             Show this help

Notes:
- Any characters outside of Brainfuck's ><+-.,[] are ignored as comments.
- Moving the pointer off either end of the tape is a runtime error.
- The tape holds 65535 cells unless --tape-size, BF_TAPE_SIZE or bf.toml overrides it.
- Settings may also be placed under [interpreter] in <config home>/bf.toml.
- Set RUST_LOG=debug (or trace) for diagnostics on stderr.

Examples:
- Run a program, feeding a file to `,`:
    {0} ./cat.bf < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    /// Number of tape cells
    #[arg(long = "tape-size", value_name = "N")]
    tape_size: Option<usize>,

    /// End-of-input policy for ','
    #[arg(long = "eof", value_name = "POLICY")]
    eof: Option<EofPolicy>,

    /// Path to the program source
    #[arg(value_name = "PATH")]
    path: Option<String>,
}

fn init_logger() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .try_init();
}

fn run(program: &str, cli: Cli) -> i32 {
    let Cli { tape_size, eof, path, .. } = cli;
    let Some(path) = path else {
        print_usage_and_exit(program, 2);
    };

    let source = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("{program}: Load error: failed to read {path}: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    let code = match Program::from_bytes(&source) {
        Ok(code) => code,
        Err(err) => {
            print_load_error(Some(program), &source, &err);
            return 1;
        }
    };

    let settings = Settings::resolve(tape_size, eof);
    log::info!("running {path} ({} instructions, {} cells)", code.len(), settings.tape_size);

    if let Err(err) = settings.interpreter().run_stdio(&code) {
        // Anything the program printed before failing should come before the error.
        let _ = io::stdout().flush();
        print_run_error(Some(program), &source, &code, &err);
        return 1;
    }

    0
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    init_logger();
    let cli = Cli::parse();

    if cli.help {
        print_usage_and_exit(&program, 0);
    }

    let code = run(&program, cli);
    std::process::exit(code);
}
