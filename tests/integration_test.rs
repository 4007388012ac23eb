use anyhow::Result;
use minidb::repl;
use minidb::row::Row;
use minidb::storage::{StorageError, PAGE_SIZE};
use minidb::table::Table;
use std::path::Path;
use tempfile::tempdir;

const MAX_ROWS: u32 = 13;

fn sample_row(id: u32) -> Row {
    Row {
        id,
        username: format!("user{}", id),
        email: format!("person{}@example.com", id),
    }
}

/// Feed a script of commands through the interpreter against the table
/// stored at `path`, returning everything it printed.
fn run_script(path: &Path, commands: &[&str]) -> Result<String> {
    let table = Table::open(path)?;
    let input = commands
        .iter()
        .map(|c| format!("{}\n", c))
        .collect::<String>();
    let mut output = Vec::new();
    repl::run(table, input.as_bytes(), &mut output)?;
    Ok(String::from_utf8(output)?)
}

#[test]
fn insert_then_select_preserves_order() -> Result<()> {
    let dir = tempdir()?;
    let mut table = Table::open(&dir.path().join("test.db"))?;

    let rows: Vec<Row> = (1..=5).map(sample_row).collect();
    for row in &rows {
        table.insert(row)?;
    }

    let scanned: Vec<Row> = table.select()?.collect::<Result<_, _>>()?;
    assert_eq!(scanned, rows);

    Ok(())
}

#[test]
fn table_full_on_the_fourteenth_insert() -> Result<()> {
    let dir = tempdir()?;
    let mut table = Table::open(&dir.path().join("test.db"))?;

    for id in 1..=MAX_ROWS {
        table.insert(&sample_row(id))?;
    }

    let result = table.insert(&sample_row(MAX_ROWS + 1));
    assert!(matches!(result, Err(StorageError::TableFull)));

    let scanned: Vec<Row> = table.select()?.collect::<Result<_, _>>()?;
    assert_eq!(scanned.len(), MAX_ROWS as usize);
    assert_eq!(scanned.last().unwrap().id, MAX_ROWS);

    Ok(())
}

#[test]
fn rows_survive_close_and_reopen() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("test.db");

    {
        let mut table = Table::open(&file_path)?;
        for id in 1..=3 {
            table.insert(&sample_row(id))?;
        }
        table.close()?;
    }

    let mut table = Table::open(&file_path)?;
    let scanned: Vec<Row> = table.select()?.collect::<Result<_, _>>()?;
    assert_eq!(scanned, (1..=3).map(sample_row).collect::<Vec<_>>());

    Ok(())
}

#[test]
fn open_rejects_a_file_with_a_partial_page() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("test.db");
    std::fs::write(&file_path, vec![0u8; PAGE_SIZE / 2])?;

    let result = Table::open(&file_path);
    assert!(matches!(result, Err(StorageError::Corrupt { .. })));

    Ok(())
}

#[test]
fn repl_inserts_and_selects_a_row() -> Result<()> {
    let dir = tempdir()?;
    let output = run_script(
        &dir.path().join("test.db"),
        &["insert 1 user1 person1@example.com", "select", ".exit"],
    )?;

    assert_eq!(
        output,
        "db > Executed.\n\
         db > (1, user1, person1@example.com)\n\
         Executed.\n\
         db > "
    );

    Ok(())
}

#[test]
fn repl_keeps_rows_across_sessions() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("test.db");

    let output = run_script(&file_path, &["insert 1 user1 person1@example.com", ".exit"])?;
    assert_eq!(output, "db > Executed.\ndb > ");

    let output = run_script(&file_path, &["select", ".exit"])?;
    assert_eq!(
        output,
        "db > (1, user1, person1@example.com)\nExecuted.\ndb > "
    );

    Ok(())
}

#[test]
fn repl_prints_the_storage_constants() -> Result<()> {
    let dir = tempdir()?;
    let output = run_script(&dir.path().join("test.db"), &[".constants", ".exit"])?;

    assert_eq!(
        output,
        "db > Constants:\n\
         ROW_SIZE: 293\n\
         COMMON_NODE_HEADER_SIZE: 6\n\
         LEAF_NODE_HEADER_SIZE: 10\n\
         LEAF_NODE_CELL_SIZE: 297\n\
         LEAF_NODE_SPACE_FOR_CELLS: 4086\n\
         LEAF_NODE_MAX_CELLS: 13\n\
         db > "
    );

    Ok(())
}

#[test]
fn repl_btree_shows_cells_in_insertion_order() -> Result<()> {
    let dir = tempdir()?;
    let output = run_script(
        &dir.path().join("test.db"),
        &[
            "insert 3 user3 person3@example.com",
            "insert 1 user1 person1@example.com",
            "insert 2 user2 person2@example.com",
            ".btree",
            ".exit",
        ],
    )?;

    assert_eq!(
        output,
        "db > Executed.\n\
         db > Executed.\n\
         db > Executed.\n\
         db > Tree:\n\
         leaf (size 3)\n\
         \u{20}- 0 : 3\n\
         \u{20}- 1 : 1\n\
         \u{20}- 2 : 2\n\
         db > "
    );

    Ok(())
}

#[test]
fn repl_reports_a_full_table() -> Result<()> {
    let dir = tempdir()?;

    let mut commands: Vec<String> = (1..=MAX_ROWS + 1)
        .map(|id| format!("insert {} user{} person{}@example.com", id, id, id))
        .collect();
    commands.push(".exit".to_string());
    let commands: Vec<&str> = commands.iter().map(String::as_str).collect();

    let output = run_script(&dir.path().join("test.db"), &commands)?;

    let executed = output.matches("Executed.").count();
    assert_eq!(executed, MAX_ROWS as usize);
    assert!(output.ends_with("db > Error: Table full.\ndb > "));

    Ok(())
}

#[test]
fn repl_rejects_invalid_statements() -> Result<()> {
    let dir = tempdir()?;
    let output = run_script(
        &dir.path().join("test.db"),
        &[
            "insert -1 user1 person1@example.com",
            "insert 1 averyveryverylongusername person1@example.com",
            "insert 1 user1",
            "delete 1",
            ".unknown",
            ".exit",
        ],
    )?;

    assert_eq!(
        output,
        "db > ID must be positive.\n\
         db > String is too long.\n\
         db > Syntax error. Could not parse statement.\n\
         db > Unrecognised keyword at start of 'delete 1'.\n\
         db > Unrecognised command '.unknown'.\n\
         db > "
    );

    Ok(())
}

#[test]
fn repl_select_on_an_empty_table_prints_nothing() -> Result<()> {
    let dir = tempdir()?;
    let output = run_script(&dir.path().join("test.db"), &["select", ".exit"])?;

    assert_eq!(output, "db > Executed.\ndb > ");

    Ok(())
}

#[test]
fn eof_closes_the_table_like_exit() -> Result<()> {
    let dir = tempdir()?;
    let file_path = dir.path().join("test.db");

    // No .exit: input just ends.
    let output = run_script(&file_path, &["insert 1 user1 person1@example.com"])?;
    assert_eq!(output, "db > Executed.\ndb > ");

    let output = run_script(&file_path, &["select", ".exit"])?;
    assert_eq!(
        output,
        "db > (1, user1, person1@example.com)\nExecuted.\ndb > "
    );

    Ok(())
}
