//! Command-line argument parsing (manual implementation)

use std::env;
use std::path::PathBuf;
use std::process;

use crate::codegen::RegenConfig;
use crate::constants::{APP_NAME, APP_VERSION, DEFAULT_ACCESS_MASK, DEFAULT_REGEN_FILE};
use crate::system::{parse_integer, DataType, Value};

/// Which process and address a memory command targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    /// Target process identifier
    pub pid: u32,
    /// Address inside the target process
    pub address: usize,
    /// Access mask requested when opening the process
    pub access: u32,
}

/// The action selected on the command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Read one value and print it
    Read { target: Target, data_type: DataType },
    /// Write one value
    Write { target: Target, value: Value },
    /// Read a double, then write a float, reporting each result
    Demo { target: Target },
    /// List the supported data types
    Types,
    /// Regenerate instruction-name tables
    Regen { files: Vec<PathBuf>, config: RegenConfig },
    Help,
    Version,
}

/// Parsed command-line arguments
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub command: Command,
    /// Number of -v flags
    pub verbosity: u8,
    /// Only log errors
    pub quiet: bool,
}

/// Option values as given, before they are checked against the command
#[derive(Debug, Default)]
struct RawOptions {
    pid: Option<String>,
    address: Option<String>,
    data_type: Option<String>,
    value: Option<String>,
    access: Option<String>,
    table: Option<String>,
    blob: Option<String>,
    prefix: Option<String>,
    suffix: Option<String>,
    begin: Option<String>,
    end: Option<String>,
    positional: Vec<String>,
}

/// Help text
pub fn help_text() -> String {
    format!(
        "{name} {version}
Typed access to another Windows process's memory, and an instruction-name
table regenerator for assembler sources.

USAGE:
    {name} [OPTIONS] <COMMAND> [ARGS]

COMMANDS:
    read      Read one value:   -p <PID> -a <ADDR> -t <TYPE>
    write     Write one value:  -p <PID> -a <ADDR> -t <TYPE> -w <VALUE>
    demo      Read a double at ADDR, then write the float 1.5 there
    types     List the supported data types
    regen     Regenerate instruction-name tables in FILE... [default: {regen_file}]

MEMORY OPTIONS:
    -p, --pid <PID>        Target process id (decimal or 0x hex)
    -a, --address <ADDR>   Address in the target process
    -t, --type <TYPE>      Data type name, alias or tag (see 'types')
    -w, --value <VALUE>    Value to write
        --access <MASK>    Access mask for OpenProcess [default: 0x{access:08X}]

REGEN OPTIONS:
        --table <IDENT>    Table identifier   [default: instructionDescription]
        --blob <NAME>      Emitted constant   [default: instructionName]
        --prefix <P>       Symbol prefix      [default: INST_]
        --suffix <S>       Symbol suffix      [default: _INDEX]
        --begin <MARKER>   Begin marker line  [default: // ${{INSTRUCTION_DATA_BEGIN}}]
        --end <MARKER>     End marker line    [default: // ${{INSTRUCTION_DATA_END}}]

GLOBAL OPTIONS:
    -v, --verbose          More log output (repeat for more)
    -q, --quiet            Only log errors
    -h, --help             Print help information
    -V, --version          Print version information

EXAMPLES:
    {name} read -p 4284 -a 0x63DE0C -t double
    {name} write -p 4284 -a 0x63DE0C -t float -w 1.5
    {name} demo --pid=4284 --address=0x63DE0C
    {name} regen contrib/AsmJit/DefsX86X64.cpp",
        name = APP_NAME,
        version = APP_VERSION,
        regen_file = DEFAULT_REGEN_FILE,
        access = DEFAULT_ACCESS_MASK,
    )
}

/// Print help message and exit
fn print_help() -> ! {
    println!("{}", help_text());
    process::exit(0);
}

/// Print version and exit
fn print_version() -> ! {
    println!("{} {}", APP_NAME, APP_VERSION);
    process::exit(0);
}

/// Print error message and exit
fn print_error(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    eprintln!("For more information, try '--help'");
    process::exit(1);
}

/// Parse command-line arguments, exiting on help, version or bad input
pub fn parse_args() -> Args {
    let argv: Vec<String> = env::args().skip(1).collect();

    match parse_from(argv) {
        Ok(args) => match args.command {
            Command::Help => print_help(),
            Command::Version => print_version(),
            _ => args,
        },
        Err(msg) => print_error(&msg),
    }
}

/// Parse an argument list (without the program name)
pub fn parse_from(mut argv: Vec<String>) -> Result<Args, String> {
    let mut verbosity = 0u8;
    let mut quiet = false;
    let mut help = false;
    let mut version = false;
    let mut command: Option<String> = None;
    let mut raw = RawOptions::default();

    while !argv.is_empty() {
        let arg = argv.remove(0);

        match arg.as_str() {
            "-h" | "--help" => help = true,
            "-V" | "--version" => version = true,
            "-v" | "--verbose" => verbosity = verbosity.saturating_add(1),
            "-q" | "--quiet" => quiet = true,

            "-p" | "--pid" => raw.pid = Some(take_value(&mut argv, "--pid")?),
            "-a" | "--address" => raw.address = Some(take_value(&mut argv, "--address")?),
            "-t" | "--type" => raw.data_type = Some(take_value(&mut argv, "--type")?),
            "-w" | "--value" => raw.value = Some(take_value(&mut argv, "--value")?),
            "--access" => raw.access = Some(take_value(&mut argv, "--access")?),
            "--table" => raw.table = Some(take_value(&mut argv, "--table")?),
            "--blob" => raw.blob = Some(take_value(&mut argv, "--blob")?),
            "--prefix" => raw.prefix = Some(take_value(&mut argv, "--prefix")?),
            "--suffix" => raw.suffix = Some(take_value(&mut argv, "--suffix")?),
            "--begin" => raw.begin = Some(take_value(&mut argv, "--begin")?),
            "--end" => raw.end = Some(take_value(&mut argv, "--end")?),

            // Handle combined short flags like -vv or -vq
            s if s.starts_with('-')
                && !s.starts_with("--")
                && s.len() > 2
                && s[1..].chars().all(|c| matches!(c, 'v' | 'q' | 'h' | 'V')) =>
            {
                // Split into individual flags and re-queue
                for c in s[1..].chars() {
                    argv.insert(0, format!("-{}", c));
                }
            }

            // Handle --key=value syntax
            s if s.starts_with("--") && s.contains('=') => {
                let (key, value) = s.split_once('=').unwrap_or((s, ""));
                argv.insert(0, value.to_string());
                argv.insert(0, key.to_string());
                if !takes_value(key) {
                    return Err(format!("option '{}' does not take a value", key));
                }
            }

            s if s.starts_with('-') && s.len() > 1 => {
                return Err(format!("unknown option '{}'", s));
            }

            s => {
                if command.is_none() {
                    command = Some(s.to_string());
                } else {
                    raw.positional.push(s.to_string());
                }
            }
        }
    }

    let command = if help {
        Command::Help
    } else if version {
        Command::Version
    } else {
        match command {
            Some(name) => build_command(&name, raw)?,
            None => return Err("no command given".to_string()),
        }
    };

    Ok(Args {
        command,
        verbosity,
        quiet,
    })
}

fn takes_value(key: &str) -> bool {
    matches!(
        key,
        "--pid"
            | "--address"
            | "--type"
            | "--value"
            | "--access"
            | "--table"
            | "--blob"
            | "--prefix"
            | "--suffix"
            | "--begin"
            | "--end"
    )
}

fn take_value(argv: &mut Vec<String>, option: &str) -> Result<String, String> {
    if argv.is_empty() {
        return Err(format!("{} requires a value", option));
    }
    Ok(argv.remove(0))
}

/// Resolve a command name and its options into a `Command`
fn build_command(name: &str, raw: RawOptions) -> Result<Command, String> {
    match name {
        "read" => {
            reject_regen_options(name, &raw)?;
            reject_positional(name, &raw)?;
            if raw.value.is_some() {
                return Err("--value is only valid for 'write'".to_string());
            }
            let target = parse_target(&raw)?;
            let data_type = parse_type(&raw)?;
            Ok(Command::Read { target, data_type })
        }
        "write" => {
            reject_regen_options(name, &raw)?;
            reject_positional(name, &raw)?;
            let target = parse_target(&raw)?;
            let data_type = parse_type(&raw)?;
            let text = raw.value.as_deref().ok_or("write requires --value")?;
            let value = data_type.parse_value(text)?;
            Ok(Command::Write { target, value })
        }
        "demo" => {
            reject_regen_options(name, &raw)?;
            reject_positional(name, &raw)?;
            if raw.data_type.is_some() || raw.value.is_some() {
                return Err("'demo' always reads a double and writes a float".to_string());
            }
            Ok(Command::Demo {
                target: parse_target(&raw)?,
            })
        }
        "types" => {
            reject_regen_options(name, &raw)?;
            reject_memory_options(name, &raw)?;
            reject_positional(name, &raw)?;
            Ok(Command::Types)
        }
        "regen" => {
            reject_memory_options(name, &raw)?;
            Ok(build_regen(raw))
        }
        other => Err(format!(
            "unknown command '{}'. Valid commands: read, write, demo, types, regen",
            other
        )),
    }
}

fn build_regen(raw: RawOptions) -> Command {
    let mut config = RegenConfig::default();
    if let Some(table) = raw.table {
        config.table_ident = table;
    }
    if let Some(blob) = raw.blob {
        config.blob_name = blob;
    }
    if let Some(prefix) = raw.prefix {
        config.symbol_prefix = prefix;
    }
    if let Some(suffix) = raw.suffix {
        config.symbol_suffix = suffix;
    }
    if let Some(begin) = raw.begin {
        config.begin_marker = begin;
    }
    if let Some(end) = raw.end {
        config.end_marker = end;
    }

    let files = if raw.positional.is_empty() {
        vec![PathBuf::from(DEFAULT_REGEN_FILE)]
    } else {
        raw.positional.into_iter().map(PathBuf::from).collect()
    };

    Command::Regen { files, config }
}

fn reject_positional(command: &str, raw: &RawOptions) -> Result<(), String> {
    match raw.positional.first() {
        Some(arg) => Err(format!("unexpected argument '{}' for '{}'", arg, command)),
        None => Ok(()),
    }
}

fn reject_regen_options(command: &str, raw: &RawOptions) -> Result<(), String> {
    let given = [&raw.table, &raw.blob, &raw.prefix, &raw.suffix, &raw.begin, &raw.end];
    if given.iter().any(|opt| opt.is_some()) {
        return Err(format!("regen options are not valid for '{}'", command));
    }
    Ok(())
}

fn reject_memory_options(command: &str, raw: &RawOptions) -> Result<(), String> {
    let given = [&raw.pid, &raw.address, &raw.data_type, &raw.value, &raw.access];
    if given.iter().any(|opt| opt.is_some()) {
        return Err(format!("memory options are not valid for '{}'", command));
    }
    Ok(())
}

/// Parse pid, address and access mask
fn parse_target(raw: &RawOptions) -> Result<Target, String> {
    let pid = raw.pid.as_deref().ok_or("--pid is required")?;
    let address = raw.address.as_deref().ok_or("--address is required")?;

    let access = match raw.access.as_deref() {
        Some(mask) => parse_number(mask, "access mask")?,
        None => DEFAULT_ACCESS_MASK,
    };

    Ok(Target {
        pid: parse_number(pid, "pid")?,
        address: parse_number(address, "address")?,
        access,
    })
}

fn parse_type(raw: &RawOptions) -> Result<DataType, String> {
    let name = raw.data_type.as_deref().ok_or("--type is required")?;
    Ok(DataType::from_name(name)?)
}

/// Parse a non-negative decimal or hex number that fits in `T`
fn parse_number<T: TryFrom<i128>>(s: &str, what: &str) -> Result<T, String> {
    let wide = parse_integer(s).ok_or_else(|| format!("invalid {} '{}'. Must be a number", what, s))?;
    T::try_from(wide).map_err(|_| format!("{} '{}' is out of range", what, s))
}
