//! The interactive session: a thin binder between the terminal and the
//! calculation client + history cache.
//!
//! The binder owns no persistence and no business rules - it parses
//! commands, forwards them, and renders what comes back. Cache mutation
//! always completes before the result render, so the history on screen is
//! never staler than the result above it.

use std::io::{self, Write};

use thiserror::Error;

use offcut_client::{CalculationClient, CalculationSource, ClientError};
use offcut_history::{HistoryCache, HistoryEntry};
use offcut_types::{
    CalculationResult, RunSuggestion, WasteSeverity, suggest_larger_run, waste_percentage,
};

/// One parsed line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `calc TYPE RUN` - submit a calculation.
    Calculate { print_type: String, print_run: u32 },
    /// `apply` - resubmit with the last suggested run.
    ApplySuggestion,
    /// `history` - render the current history.
    History,
    /// `view N` - re-display a stored calculation (1-based).
    View(usize),
    /// `delete N` - remove a stored calculation (1-based).
    Delete(usize),
    /// `clear` - drop the whole history.
    Clear,
    /// `types` - list available print types.
    Types,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandParseError {
    #[error("empty input, try \"help\"")]
    Empty,
    #[error("unknown command {0:?}, try \"help\"")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("print run must be a positive integer")]
    InvalidRun,
    #[error("history positions start at 1")]
    InvalidIndex,
}

/// Parse one input line into a command.
pub fn parse_command(input: &str) -> Result<Command, CommandParseError> {
    let mut words = input.split_whitespace();
    let Some(head) = words.next() else {
        return Err(CommandParseError::Empty);
    };
    let rest: Vec<&str> = words.collect();

    match head {
        "calc" => match rest.as_slice() {
            [print_type, run] => {
                let print_run: u32 = run.parse().map_err(|_| CommandParseError::InvalidRun)?;
                Ok(Command::Calculate {
                    print_type: (*print_type).to_string(),
                    print_run,
                })
            }
            _ => Err(CommandParseError::Usage("calc TYPE RUN (e.g. calc 4/4 2000)")),
        },
        "apply" => Ok(Command::ApplySuggestion),
        "history" => Ok(Command::History),
        "view" | "delete" => {
            let [position] = rest.as_slice() else {
                return Err(CommandParseError::Usage("view N / delete N"));
            };
            let position: usize = position
                .parse()
                .map_err(|_| CommandParseError::InvalidIndex)?;
            if position == 0 {
                return Err(CommandParseError::InvalidIndex);
            }
            if head == "view" {
                Ok(Command::View(position))
            } else {
                Ok(Command::Delete(position))
            }
        }
        "clear" => Ok(Command::Clear),
        "types" => Ok(Command::Types),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandParseError::Unknown(other.to_string())),
    }
}

/// Thousands separator formatting, `.`-separated (1234567 -> "1.234.567").
#[must_use]
pub fn format_thousands(n: u32) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// Render one calculation result as a block of lines.
#[must_use]
pub fn render_result(result: &CalculationResult, source: CalculationSource) -> String {
    let pct = waste_percentage(result.waste_amount, result.print_run);
    let severity = WasteSeverity::from_percentage(pct);

    let mut out = String::new();
    out.push_str(&format!("  Print type:  {}\n", result.print_type));
    out.push_str(&format!(
        "  Print run:   {}\n",
        format_thousands(result.print_run)
    ));
    out.push_str(&format!(
        "  Waste:       {} sheets ({pct:.1}%, {})\n",
        format_thousands(result.waste_amount),
        severity.label()
    ));
    out.push_str(&format!("  Adjustment:  {}\n", result.adjustment));
    if result.is_special_case {
        out.push_str("  Note: this combination falls outside standard waste assumptions.\n");
    }
    if source == CalculationSource::LocalEstimate {
        out.push_str("  (endpoint unavailable - locally estimated)\n");
    }
    out
}

/// Render the suggestion line, if one applies.
#[must_use]
pub fn render_suggestion(suggestion: &RunSuggestion) -> String {
    format!(
        "  Suggestion: raising the run to {} would cut relative waste by about {}% \
         per unit (type \"apply\" to resubmit).\n",
        format_thousands(suggestion.suggested_run),
        suggestion.reduction_pct
    )
}

/// Render the history as a numbered table, most recent first.
#[must_use]
pub fn render_history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "  History is empty.\n".to_string();
    }

    let mut out = format!("  History ({} entries):\n", entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let marker = if entry.is_special_case { " *" } else { "" };
        out.push_str(&format!(
            "  {:>2}. {:<6} run {:>9}  waste {:>7}  {}{marker}\n",
            i + 1,
            entry.print_type,
            format_thousands(entry.print_run),
            format_thousands(entry.waste_amount),
            entry.timestamp.format("%Y-%m-%d %H:%M"),
        ));
    }
    out
}

const HELP_TEXT: &str = "\
  calc TYPE RUN   submit a waste calculation (e.g. calc 4/4 2000)
  apply           resubmit with the last suggested run size
  history         show stored calculations, most recent first
  view N          re-display stored calculation N
  delete N        remove stored calculation N
  clear           drop the whole history
  types           list available print types
  quit            leave
";

/// The interactive binder over the client and the cache.
pub struct Session {
    client: CalculationClient,
    cache: HistoryCache,
    /// Last offered suggestion, consumed by `apply`.
    pending: Option<(String, RunSuggestion)>,
}

impl Session {
    #[must_use]
    pub fn new(client: CalculationClient, cache: HistoryCache) -> Self {
        Self {
            client,
            cache,
            pending: None,
        }
    }

    /// Run the session loop until `quit` or end of input.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let entries = self.cache.initialize();
        println!("{}", render_history(entries));
        println!("{HELP_TEXT}");

        let stdin = io::stdin();
        loop {
            print!("offcut> ");
            io::stdout().flush()?;

            let mut line = String::new();
            if stdin.read_line(&mut line)? == 0 {
                return Ok(()); // end of input
            }

            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(CommandParseError::Empty) => continue,
                Err(e) => {
                    println!("  {e}");
                    continue;
                }
            };

            if command == Command::Quit {
                return Ok(());
            }
            self.execute(command).await;
        }
    }

    async fn execute(&mut self, command: Command) {
        match command {
            Command::Calculate {
                print_type,
                print_run,
            } => self.submit(&print_type, print_run).await,
            Command::ApplySuggestion => match self.pending.take() {
                Some((print_type, suggestion)) => {
                    self.submit(&print_type, suggestion.suggested_run).await;
                }
                None => println!("  No suggestion to apply."),
            },
            Command::History => println!("{}", render_history(self.cache.entries())),
            Command::View(position) => self.view(position),
            Command::Delete(position) => match self.cache.remove_at(position - 1) {
                Ok(entries) => {
                    println!("  Removed entry {position}.");
                    println!("{}", render_history(entries));
                }
                Err(e) => println!("  {e}"),
            },
            Command::Clear => {
                self.cache.clear();
                println!("  History cleared.");
            }
            Command::Types => {
                let types = self.client.print_types().await;
                println!("  Available print types: {}", types.join(", "));
            }
            Command::Help => println!("{HELP_TEXT}"),
            Command::Quit => {}
        }
    }

    /// Submit a calculation and render it, inserting into history unless
    /// the same (type, run) is already stored.
    async fn submit(&mut self, print_type: &str, print_run: u32) {
        let calculation = match self.client.calculate_with_policy(print_type, print_run).await {
            Ok(calculation) => calculation,
            Err(e @ ClientError::InvalidInput(_)) => {
                println!("  {e}");
                return;
            }
            Err(e) => {
                tracing::warn!("Calculation failed: {e}");
                println!("  {e}");
                return;
            }
        };

        // Mutate the cache before rendering anything.
        let duplicate = self
            .cache
            .contains(&calculation.result.print_type, calculation.result.print_run);
        if !duplicate {
            self.cache.insert(&calculation.result);
        }

        print!("{}", render_result(&calculation.result, calculation.source));
        if duplicate {
            println!("  (already in history - not re-added)");
        }

        self.pending = suggest_larger_run(&calculation.result).map(|suggestion| {
            print!("{}", render_suggestion(&suggestion));
            (calculation.result.print_type.clone(), suggestion)
        });
    }

    /// Re-display a stored calculation without recalculating or re-adding.
    fn view(&mut self, position: usize) {
        let Some(entry) = self.cache.get(position - 1) else {
            println!(
                "  history index {} out of range for length {}",
                position - 1,
                self.cache.len()
            );
            return;
        };

        match CalculationResult::new(
            entry.print_type.clone(),
            entry.print_run,
            entry.waste_amount,
            None,
            entry.is_special_case,
        ) {
            Ok(result) => {
                print!("{}", render_result(&result, CalculationSource::Server));
                self.pending = suggest_larger_run(&result).map(|suggestion| {
                    print!("{}", render_suggestion(&suggestion));
                    (result.print_type.clone(), suggestion)
                });
            }
            Err(e) => println!("  stored entry is invalid: {e}"),
        }
    }
}
