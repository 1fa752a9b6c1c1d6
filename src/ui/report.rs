//! Status lines and tables printed for command results

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use crate::codegen::{Outcome, Report};
use crate::system::DataType;

/// Prints `[ OK ]` or `[FAIL]` followed by `message`.
pub fn status_line<W: Write>(out: &mut W, ok: bool, message: &str) -> io::Result<()> {
    let (tag, color) = if ok {
        ("[ OK ]", Color::Green)
    } else {
        ("[FAIL]", Color::Red)
    };

    queue!(
        out,
        SetForegroundColor(color),
        Print(tag),
        ResetColor,
        Print(format!(" {}\n", message))
    )?;
    out.flush()
}

/// Prints an aligned `label: value` line.
pub fn field_line<W: Write>(out: &mut W, label: &str, value: &str) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(Color::Cyan),
        Print(format!("  {:<8}", label)),
        ResetColor,
        Print(format!(" {}\n", value))
    )?;
    out.flush()
}

/// Prints `error: message` in red.
pub fn error_line<W: Write>(out: &mut W, message: &str) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(Color::Red),
        Print("error:"),
        ResetColor,
        Print(format!(" {}\n", message))
    )?;
    out.flush()
}

/// Prints the supported data types with their tags, C names and sizes.
pub fn types_table<W: Write>(out: &mut W) -> io::Result<()> {
    queue!(
        out,
        SetForegroundColor(Color::White),
        Print(format!("{:>3}  {:<8} {:<20} {:>4}\n", "TAG", "NAME", "C TYPE", "SIZE")),
        ResetColor
    )?;

    for data_type in DataType::ALL {
        queue!(
            out,
            Print(format!(
                "{:>3}  {:<8} {:<20} {:>4}\n",
                data_type.tag(),
                data_type.name(),
                data_type.c_name(),
                data_type.size()
            ))
        )?;
    }
    out.flush()
}

/// Prints one regenerated file.
pub fn regen_line<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    let state = match report.outcome {
        Outcome::Updated => "updated",
        Outcome::Unchanged => "unchanged",
    };
    status_line(
        out,
        true,
        &format!(
            "{} {} ({} names, {} bytes)",
            report.path.display(),
            state,
            report.names,
            report.packed_len
        ),
    )
}
