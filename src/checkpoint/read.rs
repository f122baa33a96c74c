use std::io::BufRead;

use crate::{
    checkpoint::Checkpoint,
    types::err::{self, ErrorKind, IoError, ParseError},
};

/// The part of a checkpoint a line belongs to.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pending,
    Completed,
    Uncompleted,
}

/// The section continued by an indented line.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Continued {
    Nothing,
    Individuals,
    Markers,
}

impl Checkpoint {
    /// Reads a checkpoint for a dataset with `num_states` states and `num_individuals` individuals.
    pub fn read(
        reader: impl BufRead,
        num_states: usize,
        num_individuals: usize,
    ) -> Result<Checkpoint, ErrorKind> {
        let mut checkpoint = Checkpoint::default();
        let mut phase = Phase::Pending;
        let mut continued = Continued::Nothing;

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line.map_err(|e| IoError::new("checkpoint", &e))?;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }

            if trimmed.starts_with("START_COMPLETED_CUTS:") {
                phase = Phase::Completed;
                continued = Continued::Nothing;
                continue;
            }
            if trimmed.starts_with("START_UNCOMPLETED_CUTS:") {
                phase = Phase::Uncompleted;
                continued = Continued::Nothing;
                continue;
            }

            if phase == Phase::Pending {
                return Err(err::ErrorKind::from(ParseError::NoSection(line_number)));
            }

            if let Some(rest) = trimmed.strip_prefix("Cut_") {
                let cut = read_cut(rest, num_states, line_number)?;
                match phase {
                    Phase::Uncompleted => checkpoint.uncompleted.push(cut),
                    _ => checkpoint.completed.push(cut),
                }
                continued = Continued::Nothing;
            } else if let Some(rest) = trimmed.strip_prefix("Individuals_Set:") {
                read_individual_item(&mut checkpoint, rest, num_individuals, line_number)?;
                continued = Continued::Individuals;
            } else if let Some(rest) = trimmed.strip_prefix("Markers_Set:") {
                read_marker_item(&mut checkpoint, rest, num_states, line_number)?;
                continued = Continued::Markers;
            } else if let Some(rest) = trimmed.strip_prefix("Upper_Bound:") {
                checkpoint.ub = Some(read_bound(rest, line_number)?);
                continued = Continued::Nothing;
            } else if let Some(rest) = trimmed.strip_prefix("Lower_Bound:") {
                checkpoint.lb = Some(read_bound(rest, line_number)?);
                continued = Continued::Nothing;
            } else if line.starts_with(char::is_whitespace) {
                match continued {
                    Continued::Individuals => {
                        read_individual_item(&mut checkpoint, trimmed, num_individuals, line_number)?
                    }
                    Continued::Markers => {
                        read_marker_item(&mut checkpoint, trimmed, num_states, line_number)?
                    }
                    Continued::Nothing => {
                        return Err(err::ErrorKind::from(ParseError::Line(line_number)))
                    }
                }
            } else {
                return Err(err::ErrorKind::from(ParseError::Line(line_number)));
            }
        }

        Ok(checkpoint)
    }
}

/// The index within `token`, of the form `prefix(index)`.
fn index_of(token: &str, prefix: &str, bound: usize, line_number: usize) -> Result<usize, ParseError> {
    let index = token
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_suffix(')'))
        .and_then(|digits| digits.parse::<usize>().ok())
        .ok_or(ParseError::Line(line_number))?;

    match index < bound {
        true => Ok(index),
        false => Err(ParseError::Index(line_number)),
    }
}

fn read_value(token: &str, line_number: usize) -> Result<bool, ParseError> {
    match token {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(ParseError::Line(line_number)),
    }
}

/// Reads a cut from `rest`, of the form `n: m(a) + m(b) <= k`.
fn read_cut(rest: &str, num_states: usize, line_number: usize) -> Result<Vec<usize>, ParseError> {
    let Some((_, sum)) = rest.split_once(':') else {
        return Err(ParseError::Line(line_number));
    };

    let mut cut = sum
        .split_whitespace()
        .filter(|token| token.starts_with("m("))
        .map(|token| index_of(token, "m(", num_states, line_number))
        .collect::<Result<Vec<_>, _>>()?;

    cut.sort_unstable();
    cut.dedup();
    Ok(cut)
}

/// Reads `i(a) = 0`, `i(a) = 1`, or `i(a) = i(b)`.
fn read_individual_item(
    checkpoint: &mut Checkpoint,
    item: &str,
    num_individuals: usize,
    line_number: usize,
) -> Result<(), ParseError> {
    let tokens = item.split_whitespace().collect::<Vec<_>>();
    let [left, "=", right] = tokens.as_slice() else {
        return Err(ParseError::Line(line_number));
    };

    let x = index_of(left, "i(", num_individuals, line_number)?;
    match right.starts_with("i(") {
        true => {
            let y = index_of(right, "i(", num_individuals, line_number)?;
            checkpoint.equalities.push((x, y));
        }
        false => {
            let value = read_value(right, line_number)?;
            checkpoint.individual_fixes.push((x, value));
        }
    }
    Ok(())
}

/// Reads `m(a) = 0` or `m(a) = 1`.
fn read_marker_item(
    checkpoint: &mut Checkpoint,
    item: &str,
    num_states: usize,
    line_number: usize,
) -> Result<(), ParseError> {
    let tokens = item.split_whitespace().collect::<Vec<_>>();
    let [left, "=", right] = tokens.as_slice() else {
        return Err(ParseError::Line(line_number));
    };

    let marker = index_of(left, "m(", num_states, line_number)?;
    let value = read_value(right, line_number)?;
    checkpoint.marker_fixes.push((marker, value));
    Ok(())
}

fn read_bound(rest: &str, line_number: usize) -> Result<f64, ParseError> {
    rest.trim()
        .parse::<f64>()
        .map_err(|_| ParseError::Line(line_number))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "START_COMPLETED_CUTS:

Cut_0: m(1) + m(3) <= 1
Individuals_Set: i(3) = 0
                 i(2) = i(5)
Markers_Set: m(0) = 0
Upper_Bound: 0.5
Lower_Bound: 0.25

START_UNCOMPLETED_CUTS:

Cut_1: m(2) + m(4) <= 1
";

    #[test]
    fn reads_sections() {
        let checkpoint = Checkpoint::read(TEXT.as_bytes(), 6, 6).expect("readable");

        assert_eq!(checkpoint.completed, vec![vec![1, 3]]);
        assert_eq!(checkpoint.uncompleted, vec![vec![2, 4]]);
        assert_eq!(checkpoint.individual_fixes, vec![(3, false)]);
        assert_eq!(checkpoint.equalities, vec![(2, 5)]);
        assert_eq!(checkpoint.marker_fixes, vec![(0, false)]);
        assert_eq!(checkpoint.ub, Some(0.5));
        assert_eq!(checkpoint.lb, Some(0.25));
    }

    #[test]
    fn written_text_reads_back() {
        let checkpoint = Checkpoint::read(TEXT.as_bytes(), 6, 6).expect("readable");

        let mut buffer = Vec::default();
        checkpoint.write(&mut buffer, 2).expect("written");
        let text = String::from_utf8(buffer).expect("utf8");
        assert_eq!(text, TEXT);
    }

    #[test]
    fn malformed() {
        let bad_line = "START_COMPLETED_CUTS:\nCut_0: m(1) + m(3) <= 1\nUpper_Bond: 0.5\n";
        assert_eq!(
            Checkpoint::read(bad_line.as_bytes(), 6, 6).err(),
            Some(ErrorKind::Parse(ParseError::Line(3)))
        );

        let out_of_range = "START_COMPLETED_CUTS:\nCut_0: m(1) + m(9) <= 1\n";
        assert_eq!(
            Checkpoint::read(out_of_range.as_bytes(), 6, 6).err(),
            Some(ErrorKind::Parse(ParseError::Index(2)))
        );

        let no_section = "Cut_0: m(1) + m(3) <= 1\n";
        assert_eq!(
            Checkpoint::read(no_section.as_bytes(), 6, 6).err(),
            Some(ErrorKind::Parse(ParseError::NoSection(1)))
        );
    }
}
