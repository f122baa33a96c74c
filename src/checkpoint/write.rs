use std::io::Write;

use crate::checkpoint::Checkpoint;

/// Indent of continuation lines of the individuals section.
const INDIVIDUALS_INDENT: &str = "                ";

/// Indent of continuation lines of the markers section.
const MARKERS_INDENT: &str = "            ";

impl Checkpoint {
    /// Writes the checkpoint as text.
    ///
    /// Fixes, equalities, and bounds follow the last completed cut.
    pub fn write(&self, writer: &mut impl Write, pattern_size: usize) -> std::io::Result<()> {
        let mut cut_number = 0;

        writeln!(writer, "START_COMPLETED_CUTS:\n")?;

        for cut in &self.completed {
            write_cut(writer, cut_number, cut, pattern_size)?;
            cut_number += 1;
        }

        let individual_lines = self
            .individual_fixes
            .iter()
            .map(|(individual, value)| format!("i({individual}) = {}", *value as u8))
            .chain(self.equalities.iter().map(|(x, y)| format!("i({x}) = i({y})")))
            .collect::<Vec<_>>();
        write_section(writer, "Individuals_Set:", INDIVIDUALS_INDENT, &individual_lines)?;

        let marker_lines = self
            .marker_fixes
            .iter()
            .map(|(marker, value)| format!("m({marker}) = {}", *value as u8))
            .collect::<Vec<_>>();
        write_section(writer, "Markers_Set:", MARKERS_INDENT, &marker_lines)?;

        if let Some(ub) = self.ub {
            writeln!(writer, "Upper_Bound: {ub}")?;
        }
        if let Some(lb) = self.lb {
            writeln!(writer, "Lower_Bound: {lb}")?;
        }

        writeln!(writer, "\nSTART_UNCOMPLETED_CUTS:\n")?;

        for cut in &self.uncompleted {
            write_cut(writer, cut_number, cut, pattern_size)?;
            cut_number += 1;
        }

        writer.flush()
    }
}

fn write_cut(
    writer: &mut impl Write,
    cut_number: usize,
    cut: &[usize],
    pattern_size: usize,
) -> std::io::Result<()> {
    write!(writer, "Cut_{cut_number}:")?;
    if !cut.is_empty() {
        let sum = cut
            .iter()
            .map(|marker| format!("m({marker})"))
            .collect::<Vec<_>>()
            .join(" + ");
        write!(writer, " {sum} <= {}", pattern_size.saturating_sub(1))?;
    }
    writeln!(writer)
}

fn write_section(
    writer: &mut impl Write,
    heading: &str,
    indent: &str,
    lines: &[String],
) -> std::io::Result<()> {
    for (index, line) in lines.iter().enumerate() {
        match index {
            0 => writeln!(writer, "{heading} {line}")?,
            _ => writeln!(writer, "{indent} {line}")?,
        }
    }
    Ok(())
}
