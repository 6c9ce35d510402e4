use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::local::sites::{Site, render_site_list};

#[derive(Debug, PartialEq)]
pub enum Selection<'a> {
    Picked(&'a Site),
    /// Blank line or end of input.
    Cancelled,
    /// Not a number in range; `Invalid selection.` was already printed.
    Invalid,
}

/// Show the numbered site list and read a choice from `input`.
pub fn pick_site<'a, R: BufRead, W: Write>(
    sites: &'a [Site],
    input: &mut R,
    output: &mut W,
) -> Result<Selection<'a>> {
    write!(output, "{}", render_site_list(sites)).context("printing site list")?;
    write!(output, "\nSelect site number: ").context("printing prompt")?;
    output.flush().context("flushing prompt")?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .context("reading site selection")?;
    let choice = line.trim();
    if choice.is_empty() {
        return Ok(Selection::Cancelled);
    }

    match choice.parse::<usize>() {
        Ok(n) if (1..=sites.len()).contains(&n) => Ok(Selection::Picked(&sites[n - 1])),
        _ => {
            writeln!(output, "Invalid selection.").context("printing selection error")?;
            Ok(Selection::Invalid)
        }
    }
}
