//! The line-oriented command interpreter.
//!
//! Glue between standard input and the table: tokenizes one command per
//! line, validates it, and dispatches to the core. Everything the user
//! sees is printed here; the core only ever receives well-formed rows.

use crate::row::Row;
use crate::storage::StorageError;
use crate::table::Table;
use anyhow::Result;
use std::io::{BufRead, Write};
use thiserror::Error;

/// Longest username `insert` accepts.
const MAX_USERNAME_LEN: usize = 12;
/// Longest email `insert` accepts.
const MAX_EMAIL_LEN: usize = 255;

/// A statement that passed validation and is ready to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

/// Rejections produced while preparing a statement. The display strings
/// are the exact messages shown to the user.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PrepareError {
    #[error("ID must be positive.")]
    NegativeId,
    #[error("String is too long.")]
    StringTooLong,
    #[error("Syntax error. Could not parse statement.")]
    SyntaxError,
    #[error("Unrecognised keyword at start of '{0}'.")]
    Unrecognised(String),
}

/// Tokenize and validate one input line.
pub fn prepare_statement(line: &str) -> Result<Statement, PrepareError> {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("insert") => {
            let id_token = parts.next().ok_or(PrepareError::SyntaxError)?;
            let username = parts.next().ok_or(PrepareError::SyntaxError)?;
            let email = parts.next().ok_or(PrepareError::SyntaxError)?;

            let id: i64 = id_token.parse().map_err(|_| PrepareError::SyntaxError)?;
            if id < 0 {
                return Err(PrepareError::NegativeId);
            }
            let id = u32::try_from(id).map_err(|_| PrepareError::SyntaxError)?;

            if username.len() > MAX_USERNAME_LEN || email.len() > MAX_EMAIL_LEN {
                return Err(PrepareError::StringTooLong);
            }

            Ok(Statement::Insert(Row {
                id,
                username: username.to_string(),
                email: email.to_string(),
            }))
        }
        Some("select") => Ok(Statement::Select),
        _ => Err(PrepareError::Unrecognised(line.to_string())),
    }
}

/// Drive the interpreter until `.exit` or end of input, then close the
/// table. This is the one place the table's orderly shutdown happens.
pub fn run<R: BufRead, W: Write>(mut table: Table, mut input: R, mut output: W) -> Result<()> {
    let mut buf = String::new();
    loop {
        write!(output, "db > ")?;
        output.flush()?;

        buf.clear();
        if input.read_line(&mut buf)? == 0 {
            break; // EOF behaves like .exit
        }
        let line = buf.trim_end_matches(['\r', '\n']);

        if line.starts_with('.') {
            match line {
                ".exit" => break,
                ".btree" => {
                    writeln!(output, "Tree:")?;
                    write!(output, "{}", table.dump_tree()?)?;
                }
                ".constants" => print_constants(&mut output)?,
                _ => writeln!(output, "Unrecognised command '{}'.", line)?,
            }
            continue;
        }

        match prepare_statement(line) {
            Ok(statement) => execute_statement(&mut table, &statement, &mut output)?,
            Err(err) => writeln!(output, "{}", err)?,
        }
    }

    table.close()?;
    Ok(())
}

fn execute_statement<W: Write>(
    table: &mut Table,
    statement: &Statement,
    output: &mut W,
) -> Result<()> {
    match statement {
        Statement::Insert(row) => match table.insert(row) {
            Ok(()) => writeln!(output, "Executed.")?,
            Err(StorageError::TableFull) => writeln!(output, "Error: Table full.")?,
            Err(err) => return Err(err.into()),
        },
        Statement::Select => {
            for row in table.select()? {
                let row = row?;
                writeln!(output, "({}, {}, {})", row.id, row.username, row.email)?;
            }
            writeln!(output, "Executed.")?;
        }
    }
    Ok(())
}

fn print_constants<W: Write>(output: &mut W) -> Result<()> {
    let layout = Table::layout();
    writeln!(output, "Constants:")?;
    writeln!(output, "ROW_SIZE: {}", layout.row_size)?;
    writeln!(
        output,
        "COMMON_NODE_HEADER_SIZE: {}",
        layout.common_node_header_size
    )?;
    writeln!(output, "LEAF_NODE_HEADER_SIZE: {}", layout.leaf_node_header_size)?;
    writeln!(output, "LEAF_NODE_CELL_SIZE: {}", layout.leaf_node_cell_size)?;
    writeln!(
        output,
        "LEAF_NODE_SPACE_FOR_CELLS: {}",
        layout.leaf_node_space_for_cells
    )?;
    writeln!(output, "LEAF_NODE_MAX_CELLS: {}", layout.leaf_node_max_cells)?;
    Ok(())
}
