use anyhow::{bail, Result};
use game_core::board::SIZE;

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Cell(usize),
    Restart,
    Quit,
}

/// Reads one line of player input: a cell number 1-9, `row col` with both
/// in 1-3, `r` to restart or `q` to quit.
pub fn parse(line: &str) -> Result<Command> {
    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        ["q" | "quit"] => Ok(Command::Quit),
        ["r" | "restart"] => Ok(Command::Restart),
        [cell] => {
            let n = number(cell, SIZE * SIZE)?;
            Ok(Command::Cell(n - 1))
        }
        [row, col] => {
            let r = number(row, SIZE)?;
            let c = number(col, SIZE)?;
            Ok(Command::Cell((r - 1) * SIZE + (c - 1)))
        }
        [] => bail!("please, type a move"),
        _ => bail!("unrecognised input '{}'", line.trim()),
    }
}

fn number(word: &str, max: usize) -> Result<usize> {
    match word.parse::<usize>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => bail!("'{word}' is not a number from 1 to {max}"),
    }
}
