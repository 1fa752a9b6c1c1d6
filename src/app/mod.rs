//! Command dispatch

pub mod cli;
mod memory_ops;

use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::codegen::{self, RegenConfig};
use crate::constants::{APP_NAME, APP_VERSION};
use crate::ui;

pub use cli::{Args, Command, Target};

/// Runs one parsed command, printing its results to stdout.
///
/// # Returns
/// * `Ok(())` - The command completed
/// * `Err(String)` - The first failure, ready to print
pub fn run(command: Command) -> Result<(), String> {
    debug!(?command, "running");
    match command {
        Command::Read { target, data_type } => memory_ops::read(target, data_type),
        Command::Write { target, value } => memory_ops::write(target, value),
        Command::Demo { target } => memory_ops::demo(target),
        Command::Types => ui::types_table(&mut io::stdout()).map_err(|e| e.to_string()),
        Command::Regen { files, config } => regen(&files, &config),
        Command::Help => {
            print!("{}", cli::help_text());
            Ok(())
        }
        Command::Version => {
            println!("{} {}", APP_NAME, APP_VERSION);
            Ok(())
        }
    }
}

fn regen(files: &[PathBuf], config: &RegenConfig) -> Result<(), String> {
    let mut stdout = io::stdout();
    let mut output = Ok(());

    let result = codegen::regenerate_all(files, config, |report| {
        if output.is_ok() {
            output = ui::regen_line(&mut stdout, report);
        }
    });

    result?;
    output.map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_run_types() {
        assert!(run(Command::Types).is_ok());
    }

    #[test]
    fn test_run_regen_missing_file() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let command = Command::Regen {
            files: vec![dir.path().join("missing.cpp")],
            config: RegenConfig::default(),
        };
        let err = run(command).expect_err("Missing file should fail");
        assert!(err.contains("missing.cpp"));
    }

    #[test]
    fn test_run_regen_updates_file() {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let path = dir.path().join("Defs.cpp");
        fs::write(
            &path,
            "// ${INSTRUCTION_DATA_BEGIN}\n// ${INSTRUCTION_DATA_END}\n\
             const InstructionDescription instructionDescription[] = {\n  { \"mov\" },\n};\n",
        )
        .expect("Should write source");

        let command = Command::Regen { files: vec![path.clone()], config: RegenConfig::default() };
        assert!(run(command).is_ok());

        let text = fs::read_to_string(&path).expect("Should read result");
        assert!(text.contains("#define INST_MOV_INDEX 0\n"));
    }
}
