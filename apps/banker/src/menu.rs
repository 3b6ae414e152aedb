//! Interactive menu over stdin

use std::collections::VecDeque;

use banker_events::{AppEvent, EventEmitter, EventSender, GeneralEvent};
use banker_service::AllocatorHandle;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};

use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::ops::{self, OperationResult, SessionSummary};

const MENU: &str = "Banker's Algorithm Test Menu:
1. Check for safe sequence
2. User-defined resource request
3. Exit
Enter your choice (1-3): ";

/// Whitespace-separated tokens read lazily from a line-oriented source
pub struct TokenReader<R> {
    lines: Lines<BufReader<R>>,
    pending: VecDeque<String>,
}

impl<R: AsyncRead + Unpin> TokenReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: BufReader::new(reader).lines(),
            pending: VecDeque::new(),
        }
    }

    /// Next token, or `None` at end of input
    pub async fn next_token(&mut self) -> std::io::Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }
            match self.lines.next_line().await? {
                Some(line) => self
                    .pending
                    .extend(line.split_whitespace().map(str::to_string)),
                None => return Ok(None),
            }
        }
    }

    /// Drop whatever is left of the current line
    pub fn discard_pending(&mut self) {
        self.pending.clear();
    }
}

/// What the user typed where a request vector was expected
enum RequestInput {
    Units(Vec<u32>),
    Invalid(String),
    Eof,
}

struct Menu<'a, R> {
    handle: &'a AllocatorHandle,
    renderer: &'a OutputRenderer,
    events: &'a EventSender,
    input: TokenReader<R>,
    summary: SessionSummary,
}

impl<R> EventEmitter for Menu<'_, R> {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self.events)
    }

    fn correlation_id(&self) -> Option<&str> {
        Some("menu")
    }
}

/// Run the menu loop until the user picks exit or input ends
pub async fn run<R: AsyncRead + Unpin>(
    handle: &AllocatorHandle,
    renderer: &OutputRenderer,
    events: &EventSender,
    input: R,
) -> Result<OperationResult, CliError> {
    let mut menu = Menu {
        handle,
        renderer,
        events,
        input: TokenReader::new(input),
        summary: SessionSummary::default(),
    };
    renderer.render_result(&ops::show(handle).await?)?;
    menu.run_loop().await?;
    Ok(OperationResult::Session(menu.summary))
}

impl<R: AsyncRead + Unpin> Menu<'_, R> {
    async fn run_loop(&mut self) -> Result<(), CliError> {
        loop {
            self.renderer.prompt(MENU)?;
            let Some(choice) = self.input.next_token().await? else {
                return Ok(());
            };

            match choice.parse::<u32>() {
                Ok(1) => {
                    self.summary.checks += 1;
                    let result = ops::check(self.handle).await?;
                    self.renderer.render_result(&result)?;
                }
                Ok(2) => {
                    if !self.request_round().await? {
                        return Ok(());
                    }
                }
                Ok(3) => return Ok(()),
                _ => {
                    self.input.discard_pending();
                    self.renderer.notice("Invalid choice.");
                }
            }
        }
    }

    /// One pid + request exchange; `false` once input has ended
    async fn request_round(&mut self) -> Result<bool, CliError> {
        let processes = self.handle.process_count();
        let resources = self.handle.resource_count();

        self.renderer
            .prompt(&format!("Enter process ID (0-{}): ", processes - 1))?;
        let Some(token) = self.input.next_token().await? else {
            return Ok(false);
        };
        let pid = match token.parse::<usize>() {
            Ok(pid) if pid < processes => pid,
            _ => {
                self.input.discard_pending();
                self.renderer.notice("Invalid PID.");
                return Ok(true);
            }
        };

        self.renderer.prompt(&format!(
            "Enter request for P{pid} ({resources} integers): "
        ))?;
        let units = match self.read_units(resources).await? {
            RequestInput::Units(units) => units,
            RequestInput::Invalid(token) => {
                self.input.discard_pending();
                self.emit(AppEvent::General(GeneralEvent::warning_with_context(
                    "rejected request input",
                    format!("token '{token}'"),
                )));
                self.renderer.notice(&format!(
                    "Invalid request: expected {resources} non-negative integers."
                ));
                return Ok(true);
            }
            RequestInput::Eof => return Ok(false),
        };

        self.summary.requests += 1;
        let result = ops::request(self.handle, pid, units).await?;
        if let OperationResult::Request { outcome, .. } = &result {
            if outcome.is_granted() {
                self.summary.granted += 1;
            }
        }
        self.renderer.render_result(&result)?;
        Ok(true)
    }

    async fn read_units(&mut self, resources: usize) -> Result<RequestInput, CliError> {
        let mut units = Vec::with_capacity(resources);
        while units.len() < resources {
            let Some(token) = self.input.next_token().await? else {
                return Ok(RequestInput::Eof);
            };
            match token.parse::<u32>() {
                Ok(value) => units.push(value),
                Err(_) => return Ok(RequestInput::Invalid(token)),
            }
        }
        Ok(RequestInput::Units(units))
    }
}
