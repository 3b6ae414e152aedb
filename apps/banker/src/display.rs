//! Output rendering and formatting

use banker_types::{
    AllocationSnapshot, ColorChoice, OutputFormat, ProcessId, RequestOutcome, SafetyReport,
};
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::{Style, Term};
use std::fmt::Write as _;
use std::io::{self, Write};

use crate::ops::{OperationResult, Verification};

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Plain, table or JSON output
    format: OutputFormat,
    /// Color configuration
    color_choice: ColorChoice,
    /// Terminal instance
    term: Term,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(format: OutputFormat, color_choice: ColorChoice) -> Self {
        Self {
            format,
            color_choice,
            term: Term::stdout(),
        }
    }

    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.render_json(result),
            OutputFormat::Tty | OutputFormat::Plain => self.render_text(result),
        }
    }

    /// Print an interactive prompt without a trailing newline
    pub fn prompt(&self, text: &str) -> io::Result<()> {
        if self.is_json() {
            return Ok(());
        }
        let mut stdout = io::stdout().lock();
        write!(stdout, "{text}")?;
        stdout.flush()
    }

    /// Print a message block in the menu's format; suppressed in JSON mode
    pub fn notice(&self, text: &str) {
        if !self.is_json() {
            println!("{text}\n");
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    fn render_text(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::State(snapshot) => self.render_state(snapshot),
            OperationResult::Safety(report) => {
                self.render_safety(report);
                Ok(())
            }
            OperationResult::Request {
                process,
                outcome,
                state,
                ..
            } => self.render_request(*process, outcome, state),
            OperationResult::Verification(verification) => {
                self.render_verification(verification);
                Ok(())
            }
            // Interactive output has already been written
            OperationResult::Session(_) => Ok(()),
        }
    }

    fn render_state(&self, snapshot: &AllocationSnapshot) -> io::Result<()> {
        if self.format == OutputFormat::Plain {
            print!("{}", format_state_block(snapshot));
            return Ok(());
        }

        println!(
            "{} processes, {} resource classes",
            self.style_heading(&snapshot.process_count().to_string()),
            self.style_heading(&snapshot.resource_count().to_string()),
        );
        println!("Available: {}", format_vector(&snapshot.available));
        println!();

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Process").add_attribute(Attribute::Bold),
            Cell::new("Maximum").add_attribute(Attribute::Bold),
            Cell::new("Allocation").add_attribute(Attribute::Bold),
            Cell::new("Need").add_attribute(Attribute::Bold),
        ]);

        for (i, ((max, alloc), need)) in snapshot
            .maximum
            .iter()
            .zip(&snapshot.allocation)
            .zip(&snapshot.need)
            .enumerate()
        {
            table.add_row(vec![
                Cell::new(ProcessId(i)),
                Cell::new(format_vector(max)),
                Cell::new(format_vector(alloc)),
                self.format_need_cell(need, &snapshot.available),
            ]);
        }

        println!("{table}");
        println!();
        self.term.flush()
    }

    fn render_safety(&self, report: &SafetyReport) {
        match report {
            SafetyReport::Safe { sequence } => {
                println!("System is in a {} state.", self.style_safe("SAFE"));
                println!("Safe Sequence: {}\n", format_sequence(sequence));
            }
            SafetyReport::Unsafe { finished, blocked } => {
                println!("System is in an {} state.", self.style_unsafe("UNSAFE"));
                if self.format == OutputFormat::Tty {
                    if !finished.is_empty() {
                        println!("  Can finish: {}", format_sequence(finished));
                    }
                    println!("  Blocked:    {}", format_sequence(blocked));
                }
                println!();
            }
        }
    }

    fn render_request(
        &self,
        process: ProcessId,
        outcome: &RequestOutcome,
        state: &AllocationSnapshot,
    ) -> io::Result<()> {
        match outcome {
            RequestOutcome::Granted { sequence } => {
                println!("{}", self.style_safe("Request granted."));
                println!("Safe Sequence: {}\n", format_sequence(sequence));
                self.render_state(state)
            }
            denied => {
                println!("{}", self.style_unsafe(&outcome_message(process, denied)));
                if self.format == OutputFormat::Tty {
                    if let Some(detail) = outcome_detail(denied) {
                        println!("  {detail}");
                    }
                }
                println!();
                Ok(())
            }
        }
    }

    fn render_verification(&self, verification: &Verification) {
        let order = format_sequence(&verification.sequence);
        if verification.valid {
            println!("{} {order} is a safe sequence.\n", self.style_safe("[OK]"));
        } else {
            println!(
                "{} {order} is not a safe sequence.",
                self.style_unsafe("[ERROR]")
            );
            if let Some(violation) = &verification.violation {
                println!("  {violation}");
            }
            println!();
        }
    }

    /// Need cell, green when the process could finish with what is free now
    fn format_need_cell(&self, need: &[u32], available: &[u32]) -> Cell {
        let cell = Cell::new(format_vector(need));
        if !self.supports_color() {
            return cell;
        }
        if need.iter().zip(available).all(|(n, a)| n <= a) {
            cell.fg(Color::Green)
        } else {
            cell
        }
    }

    fn style_heading(&self, text: &str) -> String {
        self.styled(text, Style::new().bold())
    }

    fn style_safe(&self, text: &str) -> String {
        self.styled(text, Style::new().green().bold())
    }

    fn style_unsafe(&self, text: &str) -> String {
        self.styled(text, Style::new().red().bold())
    }

    fn styled(&self, text: &str, style: Style) -> String {
        if self.supports_color() {
            style.apply_to(text).to_string()
        } else {
            text.to_string()
        }
    }

    /// Check if colors are supported
    fn supports_color(&self) -> bool {
        match self.color_choice {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.term.features().colors_supported(),
        }
    }
}

/// Message shown for a request outcome
pub fn outcome_message(process: ProcessId, outcome: &RequestOutcome) -> String {
    match outcome {
        RequestOutcome::Granted { .. } => "Request granted.".to_string(),
        RequestOutcome::ExceedsNeed { .. } => {
            format!("Error: Request exceeds remaining need for {process}.")
        }
        RequestOutcome::NotAvailable { .. } => {
            format!("Resources not available. Process {process} must wait.")
        }
        RequestOutcome::Unsafe => "Error: Request would lead to an unsafe state.".to_string(),
    }
}

fn outcome_detail(outcome: &RequestOutcome) -> Option<String> {
    match outcome {
        RequestOutcome::ExceedsNeed {
            resource,
            requested,
            need,
        } => Some(format!(
            "resource {resource}: requested {requested}, remaining need {need}"
        )),
        RequestOutcome::NotAvailable {
            resource,
            requested,
            available,
        } => Some(format!(
            "resource {resource}: requested {requested}, available {available}"
        )),
        RequestOutcome::Granted { .. } | RequestOutcome::Unsafe => None,
    }
}

/// `[a, b, c]`
pub fn format_vector(values: &[u32]) -> String {
    let items: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Process indices as `[1, 3, 4, 0, 2]`
pub fn format_sequence(sequence: &[ProcessId]) -> String {
    let items: Vec<String> = sequence.iter().map(|p| p.index().to_string()).collect();
    format!("[{}]", items.join(", "))
}

fn format_matrix(rows: &[Vec<u32>]) -> String {
    let rows: Vec<String> = rows.iter().map(|row| format_vector(row)).collect();
    format!("[{}]", rows.join(",\n "))
}

/// The full state in labelled blocks, each followed by a blank line
pub fn format_state_block(snapshot: &AllocationSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "n = {} # Number of processes", snapshot.process_count());
    let _ = writeln!(
        out,
        "m = {} # Number of resources types\n",
        snapshot.resource_count()
    );
    for (label, body) in [
        (
            "Available Vector (initially total resources available)",
            format_vector(&snapshot.available),
        ),
        ("Maximum Matrix", format_matrix(&snapshot.maximum)),
        ("Allocation Matrix", format_matrix(&snapshot.allocation)),
        ("Need Matrix (Max - Allocation)", format_matrix(&snapshot.need)),
    ] {
        let _ = writeln!(out, "# {label}\n{body}\n");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical() -> AllocationSnapshot {
        AllocationSnapshot {
            available: vec![3, 3, 2],
            maximum: vec![
                vec![7, 5, 3],
                vec![3, 2, 2],
                vec![9, 0, 2],
                vec![2, 2, 2],
                vec![4, 3, 3],
            ],
            allocation: vec![
                vec![0, 1, 0],
                vec![2, 0, 0],
                vec![3, 0, 2],
                vec![2, 1, 1],
                vec![0, 0, 2],
            ],
            need: vec![
                vec![7, 4, 3],
                vec![1, 2, 2],
                vec![6, 0, 0],
                vec![0, 1, 1],
                vec![4, 3, 1],
            ],
        }
    }

    #[test]
    fn state_block_matches_menu_layout() {
        let expected = "\
n = 5 # Number of processes
m = 3 # Number of resources types

# Available Vector (initially total resources available)
[3, 3, 2]

# Maximum Matrix
[[7, 5, 3],
 [3, 2, 2],
 [9, 0, 2],
 [2, 2, 2],
 [4, 3, 3]]

# Allocation Matrix
[[0, 1, 0],
 [2, 0, 0],
 [3, 0, 2],
 [2, 1, 1],
 [0, 0, 2]]

# Need Matrix (Max - Allocation)
[[7, 4, 3],
 [1, 2, 2],
 [6, 0, 0],
 [0, 1, 1],
 [4, 3, 1]]

";
        assert_eq!(format_state_block(&canonical()), expected);
    }

    #[test]
    fn sequences_print_bare_indices() {
        let sequence = [1, 3, 4, 0, 2].map(ProcessId);
        assert_eq!(format_sequence(&sequence), "[1, 3, 4, 0, 2]");
        assert_eq!(format_sequence(&[]), "[]");
    }

    #[test]
    fn single_row_matrix_has_no_continuation() {
        assert_eq!(format_matrix(&[vec![1, 2]]), "[[1, 2]]");
    }

    #[test]
    fn outcome_messages_name_the_process() {
        let p = ProcessId(4);
        assert_eq!(
            outcome_message(
                p,
                &RequestOutcome::NotAvailable {
                    resource: 0,
                    requested: 4,
                    available: 3
                }
            ),
            "Resources not available. Process P4 must wait."
        );
        assert_eq!(
            outcome_message(
                ProcessId(1),
                &RequestOutcome::ExceedsNeed {
                    resource: 0,
                    requested: 4,
                    need: 1
                }
            ),
            "Error: Request exceeds remaining need for P1."
        );
        assert_eq!(
            outcome_message(p, &RequestOutcome::Unsafe),
            "Error: Request would lead to an unsafe state."
        );
    }

    #[test]
    fn denied_outcomes_explain_the_failing_resource() {
        let detail = outcome_detail(&RequestOutcome::NotAvailable {
            resource: 2,
            requested: 5,
            available: 1,
        });
        assert_eq!(
            detail.as_deref(),
            Some("resource 2: requested 5, available 1")
        );
        assert_eq!(outcome_detail(&RequestOutcome::Unsafe), None);
    }
}
