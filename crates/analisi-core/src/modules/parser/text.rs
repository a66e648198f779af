use crate::common::{NumericArray, ShapeError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextTableError {
    #[error("line {line}: '{token}' is not a number")]
    InvalidNumber { line: usize, token: String },
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

fn is_comment(trimmed: &str) -> bool {
    trimmed.starts_with('#')
}

fn parse_row(line: usize, trimmed: &str) -> Result<Vec<f64>, TextTableError> {
    trimmed
        .split_whitespace()
        .map(|token| {
            token
                .parse::<f64>()
                .map_err(|_| TextTableError::InvalidNumber {
                    line,
                    token: token.to_string(),
                })
        })
        .collect()
}

/// Whole-file numeric table: one row per non-blank, non-`#` line.
pub fn load_table(content: &str) -> Result<NumericArray, TextTableError> {
    let rows = content
        .lines()
        .enumerate()
        .map(|(index, line)| (index + 1, line.trim()))
        .filter(|(_, trimmed)| !trimmed.is_empty() && !is_comment(trimmed))
        .map(|(line, trimmed)| parse_row(line, trimmed))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(NumericArray::from_rows(rows)?)
}

/// Blank-line separated tables stacked into `[block, row, column]`.
///
/// Consecutive blank lines form a single separator. Every block must have
/// the same shape.
pub fn load_blocks(content: &str) -> Result<NumericArray, TextTableError> {
    let mut blocks: Vec<Vec<Vec<f64>>> = Vec::new();
    let mut at_boundary = true;

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            at_boundary = true;
            continue;
        }
        if is_comment(trimmed) {
            continue;
        }

        let row = parse_row(index + 1, trimmed)?;
        if at_boundary {
            blocks.push(Vec::new());
            at_boundary = false;
        }
        if let Some(block) = blocks.last_mut() {
            block.push(row);
        }
    }

    let arrays = blocks
        .into_iter()
        .map(NumericArray::from_rows)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(NumericArray::stack(arrays)?)
}
