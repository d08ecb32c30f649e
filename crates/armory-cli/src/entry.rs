//! Interactive entry of a procurement data bundle.

use std::io::{self, BufRead, Write};

use armory_core::{FormulationError, ProcurementData};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EntryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Input ended before all data was entered")]
    Eof,
    #[error("Invalid data: {0}")]
    Invalid(#[from] FormulationError),
}

/// Line-oriented prompts that re-ask until the answer parses.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, EntryError> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(EntryError::Eof);
        }
        Ok(line.trim().to_string())
    }

    /// Whitespace-separated non-negative numbers, optionally exactly `length` of them.
    pub fn ask_numbers(&mut self, prompt: &str, length: Option<usize>) -> Result<Vec<f64>, EntryError> {
        loop {
            let line = self.read_line(prompt)?;
            let parsed: Result<Vec<f64>, _> = line.split_whitespace().map(str::parse::<f64>).collect();

            match parsed {
                Ok(values) if values.is_empty() => {
                    writeln!(self.output, "Error: enter at least one value.")?;
                }
                Ok(values) if length.is_some_and(|n| values.len() != n) => {
                    writeln!(
                        self.output,
                        "Error: enter exactly {} values.",
                        length.unwrap_or_default()
                    )?;
                }
                Ok(values) if values.iter().any(|v| !v.is_finite() || *v < 0.0) => {
                    writeln!(self.output, "Error: values must be non-negative numbers.")?;
                }
                Ok(values) => return Ok(values),
                Err(_) => {
                    writeln!(self.output, "Error: enter numbers separated by spaces.")?;
                }
            }
        }
    }

    pub fn ask_count(&mut self, prompt: &str) -> Result<usize, EntryError> {
        loop {
            match self.read_line(prompt)?.parse::<usize>() {
                Ok(n) if n > 0 => return Ok(n),
                _ => writeln!(self.output, "Error: enter a positive whole number.")?,
            }
        }
    }

    pub fn ask_text(&mut self, prompt: &str) -> Result<String, EntryError> {
        self.read_line(prompt)
    }
}

/// Ask for costs, lot compositions, requirements and weapon names.
pub fn enter_data<R: BufRead, W: Write>(input: R, output: W) -> Result<ProcurementData, EntryError> {
    let mut prompter = Prompter::new(input, output);

    let costs = prompter.ask_numbers("Lot costs (e.g. 10 12 15): ", None)?;
    let lots = costs.len();
    let weapons = prompter.ask_count("Number of weapon types: ")?;

    let mut constraints = Vec::with_capacity(weapons);
    for i in 1..=weapons {
        let prompt = format!("  Weapon type #{} quantity in each of the {} lots: ", i, lots);
        constraints.push(prompter.ask_numbers(&prompt, Some(lots))?);
    }

    let requirements = prompter.ask_numbers("Minimum requirement per weapon type: ", Some(weapons))?;

    let mut names = Vec::with_capacity(weapons);
    for i in 1..=weapons {
        let name = prompter.ask_text(&format!("  Name of weapon type #{}: ", i))?;
        names.push(if name.is_empty() { format!("weapon {}", i) } else { name });
    }

    Ok(ProcurementData::new(costs, constraints, requirements, names)?)
}
