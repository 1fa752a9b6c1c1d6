//! Instruction-table regenerator
//!
//! Rewrites the generated region of an assembler source file so that
//! instruction names live in one packed string constant addressed by
//! offset symbols, instead of one relocated pointer per table entry.
//!
//! Every check runs before anything is written, and the new contents are
//! persisted through a temporary file in the same directory, so a file is
//! either fully regenerated or left exactly as it was.

mod config;
mod scan;
mod splice;
mod table;

pub use config::RegenConfig;
pub use scan::{extract_names, find_table};
pub use splice::{find_region, splice, Region};
pub use table::InstructionTable;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{RegenError, RegenResult};

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// New contents were written
    Updated,
    /// The generated region was already current; nothing was written
    Unchanged,
}

/// Result of regenerating one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub path: PathBuf,
    pub outcome: Outcome,
    /// Unique instruction names emitted
    pub names: usize,
    /// Size of the packed blob in bytes
    pub packed_len: usize,
}

/// Regenerates the source text in memory.
///
/// Returns the new contents and the table they were built from.
/// `path` is only used for error messages.
pub fn regenerate_source(
    source: &[u8],
    config: &RegenConfig,
    path: &Path,
) -> RegenResult<(Vec<u8>, InstructionTable)> {
    let body = find_table(source, &config.table_ident).ok_or_else(|| RegenError::TableNotFound {
        path: path.to_path_buf(),
        ident: config.table_ident.clone(),
    })?;

    let names = extract_names(body);
    let table = InstructionTable::from_names(&names);
    debug!(
        path = %path.display(),
        found = names.len(),
        unique = table.len(),
        "scanned instruction table"
    );

    if table.is_empty() {
        return Err(RegenError::EmptyTable {
            path: path.to_path_buf(),
        });
    }

    let region = find_region(source, config, path)?;
    let generated = table.render(config, region.newline);
    Ok((splice(source, region, &generated), table))
}

/// Regenerates one file in place.
pub fn regenerate_file(path: &Path, config: &RegenConfig) -> RegenResult<Report> {
    let io_error = |source: io::Error| RegenError::Io {
        path: path.to_path_buf(),
        source,
    };

    let source = fs::read(path).map_err(io_error)?;
    let (output, table) = regenerate_source(&source, config, path)?;

    let outcome = if output == source {
        Outcome::Unchanged
    } else {
        write_atomic(path, &output).map_err(io_error)?;
        Outcome::Updated
    };

    info!(
        path = %path.display(),
        ?outcome,
        names = table.len(),
        bytes = table.packed_len(),
        "regenerated"
    );

    Ok(Report {
        path: path.to_path_buf(),
        outcome,
        names: table.len(),
        packed_len: table.packed_len(),
    })
}

/// Regenerates each file in order, stopping at the first failure.
///
/// `on_report` sees each successful file as soon as it is done. Files after
/// a failing one are not touched.
pub fn regenerate_all<P, F>(paths: &[P], config: &RegenConfig, mut on_report: F) -> RegenResult<Vec<Report>>
where
    P: AsRef<Path>,
    F: FnMut(&Report),
{
    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        let report = regenerate_file(path.as_ref(), config)?;
        on_report(&report);
        reports.push(report);
    }
    Ok(reports)
}

/// Replaces `path` with `data` without ever truncating the original.
fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFS: &str = "\
// [AsmJit::Instruction Name]

// ${INSTRUCTION_DATA_BEGIN}
stale generated text
// ${INSTRUCTION_DATA_END}

const InstructionDescription instructionDescription[] =
{
  MAKE_INST(INST_MOV , \"MOV\" , G(MOV)),
  MAKE_INST(INST_MOV2, \"MOV\" , G(MOV)),
  MAKE_INST(INST_ADD , \"ADD\" , G(ALU)),
};
";

    const EXPECTED: &str = "\
// [AsmJit::Instruction Name]

// ${INSTRUCTION_DATA_BEGIN}
const char instructionName[] =
  \"MOV\\0\"
  \"ADD\\0\"
  ;

#define INST_MOV_INDEX 0
#define INST_ADD_INDEX 4
// ${INSTRUCTION_DATA_END}

const InstructionDescription instructionDescription[] =
{
  MAKE_INST(INST_MOV , \"MOV\" , G(MOV)),
  MAKE_INST(INST_MOV2, \"MOV\" , G(MOV)),
  MAKE_INST(INST_ADD , \"ADD\" , G(ALU)),
};
";

    fn write_temp(dir: &tempfile::TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("Should write fixture");
        path
    }

    #[test]
    fn test_regenerate_source() {
        let (output, table) =
            regenerate_source(DEFS.as_bytes(), &RegenConfig::default(), Path::new("Defs.cpp"))
                .expect("Should regenerate");

        assert_eq!(String::from_utf8(output).expect("utf8"), EXPECTED);
        assert_eq!(table.packed(), "MOV\0ADD\0");
    }

    #[test]
    fn test_regenerate_file_then_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_temp(&dir, "DefsX86X64.cpp", DEFS);
        let config = RegenConfig::default();

        let report = regenerate_file(&path, &config).expect("Should regenerate");
        assert_eq!(report.outcome, Outcome::Updated);
        assert_eq!(report.names, 2);
        assert_eq!(report.packed_len, 8);
        assert_eq!(fs::read_to_string(&path).expect("read"), EXPECTED);

        let report = regenerate_file(&path, &config).expect("Should regenerate again");
        assert_eq!(report.outcome, Outcome::Unchanged);
        assert_eq!(fs::read_to_string(&path).expect("read"), EXPECTED);

        // Only the target remains; the temporary file was persisted over it
        assert_eq!(fs::read_dir(dir.path()).expect("read_dir").count(), 1);
    }

    #[test]
    fn test_crlf_preserved() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_temp(&dir, "Defs.cpp", &DEFS.replace('\n', "\r\n"));

        regenerate_file(&path, &RegenConfig::default()).expect("Should regenerate");
        let written = fs::read_to_string(&path).expect("read");

        assert_eq!(written, EXPECTED.replace('\n', "\r\n"));
    }

    #[test]
    fn test_missing_markers_leave_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let contents = DEFS
            .replace("// ${INSTRUCTION_DATA_BEGIN}\n", "")
            .replace("// ${INSTRUCTION_DATA_END}\n", "");
        let path = write_temp(&dir, "Defs.cpp", &contents);

        let err = regenerate_file(&path, &RegenConfig::default()).expect_err("Should fail");
        assert!(matches!(err, RegenError::MarkerNotFound { .. }));
        assert_eq!(fs::read_to_string(&path).expect("read"), contents);
    }

    #[test]
    fn test_missing_table_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let contents = DEFS.replace("instructionDescription[]", "operandDescription[]");
        let path = write_temp(&dir, "Defs.cpp", &contents);

        let err = regenerate_file(&path, &RegenConfig::default()).expect_err("Should fail");
        assert!(matches!(err, RegenError::TableNotFound { .. }));
        assert_eq!(fs::read_to_string(&path).expect("read"), contents);
    }

    #[test]
    fn test_empty_table_is_rejected() {
        let contents = "// ${INSTRUCTION_DATA_BEGIN}\n// ${INSTRUCTION_DATA_END}\n\
                        const X instructionDescription[] = { 0, 1 };\n";
        let err = regenerate_source(contents.as_bytes(), &RegenConfig::default(), Path::new("a.cpp"))
            .expect_err("Should fail");
        assert!(matches!(err, RegenError::EmptyTable { .. }));
    }

    #[test]
    fn test_run_halts_at_first_failure() {
        let dir = tempfile::tempdir().expect("tempdir");
        let good = write_temp(&dir, "a.cpp", DEFS);
        let bad = write_temp(&dir, "b.cpp", "no table here\n");
        let later = write_temp(&dir, "c.cpp", DEFS);

        let mut seen = Vec::new();
        let result = regenerate_all(&[&good, &bad, &later], &RegenConfig::default(), |report| {
            seen.push(report.path.clone())
        });

        assert!(matches!(result, Err(RegenError::TableNotFound { .. })));
        assert_eq!(seen, vec![good.clone()]);
        assert_eq!(fs::read_to_string(&good).expect("read"), EXPECTED);
        assert_eq!(fs::read_to_string(&later).expect("read"), DEFS);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = regenerate_file(&dir.path().join("absent.cpp"), &RegenConfig::default())
            .expect_err("Should fail");
        assert!(matches!(err, RegenError::Io { .. }));
    }
}
