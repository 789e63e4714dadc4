use super::commands::ReplResult;
use super::session::ReplSession;
use crate::error::Result;
use colored::Colorize;
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{
    Cmd, CompletionType, ConditionalEventHandler, Config, EditMode, Editor, Event, EventContext,
    EventHandler, Helper, KeyCode, KeyEvent, Modifiers, RepeatCount,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

const PROMPT: &str = "sql> ";
const INDENT: &str = "  ";

/// Line-editor helper: a statement is complete once it ends with `;`, unless
/// the submit key forced it through.
struct ReplHelper {
    force_submit: Arc<AtomicBool>,
}

impl Completer for ReplHelper {
    type Candidate = String;
}

impl Hinter for ReplHelper {
    type Hint = String;
}

impl Highlighter for ReplHelper {}

impl ReplHelper {
    /// Reads and clears the force flag; it applies to one submission only.
    fn take_forced(&self) -> bool {
        self.force_submit.swap(false, Ordering::SeqCst)
    }
}

impl Validator for ReplHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        if statement_complete(ctx.input(), self.take_forced()) {
            Ok(ValidationResult::Valid(None))
        } else {
            Ok(ValidationResult::Incomplete)
        }
    }
}

/// Enter submits empty input, backslash commands and `;`-terminated SQL;
/// anything else continues on a new line unless the submit key forced it.
fn statement_complete(input: &str, forced: bool) -> bool {
    let trimmed = input.trim();
    forced || trimmed.is_empty() || trimmed.starts_with('\\') || trimmed.ends_with(';')
}

impl Helper for ReplHelper {}

/// Ctrl+Enter: accept the buffer whether or not it ends with `;`.
struct ForceSubmit(Arc<AtomicBool>);

impl ForceSubmit {
    fn arm(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

impl ConditionalEventHandler for ForceSubmit {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        _ctx: &EventContext,
    ) -> Option<Cmd> {
        self.arm();
        Some(Cmd::AcceptLine)
    }
}

pub struct InteractiveRepl {
    session: ReplSession,
    editor: Editor<ReplHelper, DefaultHistory>,
    history_file: Option<PathBuf>,
}

impl InteractiveRepl {
    pub fn new(session: ReplSession) -> Result<Self> {
        let config = Config::builder()
            .history_ignore_space(true)
            .completion_type(CompletionType::List)
            .edit_mode(EditMode::Emacs)
            .max_history_size(1000)?
            .build();

        let force_submit = Arc::new(AtomicBool::new(false));
        let mut editor: Editor<ReplHelper, DefaultHistory> = Editor::with_config(config)?;
        editor.set_helper(Some(ReplHelper {
            force_submit: force_submit.clone(),
        }));

        let submit = || EventHandler::Conditional(Box::new(ForceSubmit(force_submit.clone())));
        editor.bind_sequence(KeyEvent(KeyCode::Enter, Modifiers::CTRL), submit());
        editor.bind_sequence(KeyEvent(KeyCode::Enter, Modifiers::ALT), submit());
        editor.bind_sequence(
            KeyEvent(KeyCode::Tab, Modifiers::NONE),
            Cmd::Insert(1, INDENT.to_string()),
        );

        let history_file = history_file();
        if let Some(path) = history_file.as_ref().filter(|p| p.exists()) {
            if let Err(e) = editor.load_history(path) {
                debug!(error = %e, "Failed to load history");
            }
        }

        Ok(Self {
            session,
            editor,
            history_file,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.print_banner();

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if let Err(e) = self.editor.add_history_entry(line) {
                        debug!(error = %e, "Failed to record history");
                    }

                    match self.session.handle_line(line) {
                        ReplResult::Output(out) => println!("{}", out),
                        ReplResult::Error(msg) => eprintln!("{} {}", "Error:".red().bold(), msg),
                        ReplResult::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(e) => {
                    self.save_history();
                    return Err(e.into());
                }
            }
        }

        self.save_history();
        println!("Goodbye!");
        Ok(())
    }

    fn print_banner(&self) {
        println!(
            "{} v{}",
            "sqlplay".green().bold(),
            env!("CARGO_PKG_VERSION")
        );
        let tables = self.session.session().schema().len();
        println!("{} tables loaded. Type \\? for help, \\q to quit.\n", tables);
    }

    fn save_history(&mut self) {
        if let Some(ref path) = self.history_file {
            if let Some(parent) = path.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    debug!(error = %e, "Failed to create history directory");
                    return;
                }
            }
            if let Err(e) = self.editor.save_history(path) {
                debug!(error = %e, "Failed to save history");
            }
        }
    }
}

fn history_file() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join("sqlplay").join("history"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_file_location() {
        if let Some(path) = history_file() {
            assert!(path.ends_with("sqlplay/history"));
        }
    }

    #[test]
    fn test_statement_complete_requires_semicolon() {
        assert!(!statement_complete("SELECT 1", false));
        assert!(!statement_complete("SELECT *\nFROM employees", false));
        assert!(statement_complete("SELECT 1;", false));
        assert!(statement_complete("SELECT 1;  \n", false));
    }

    #[test]
    fn test_statement_complete_commands_and_empty_lines() {
        assert!(statement_complete("\\dt", false));
        assert!(statement_complete("  \\browse products", false));
        assert!(statement_complete("", false));
        assert!(statement_complete("   ", false));
    }

    #[test]
    fn test_forced_submit_skips_semicolon_rule() {
        assert!(statement_complete("SELECT 1", true));
    }

    #[test]
    fn test_force_flag_is_cleared_after_one_use() {
        let flag = Arc::new(AtomicBool::new(false));
        let helper = ReplHelper {
            force_submit: flag.clone(),
        };
        assert!(!helper.take_forced());

        ForceSubmit(flag.clone()).arm();
        assert!(statement_complete("SELECT 1", helper.take_forced()));
        assert!(!statement_complete("SELECT 1", helper.take_forced()));
        assert!(!flag.load(Ordering::SeqCst));
    }
}
