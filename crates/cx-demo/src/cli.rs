//! CLI (Command Line Interface) mode
//!
//! Interactive REPL running the demo scenarios as `/`-commands.

use cx_contacts::ContactsClient;
use nu_ansi_term::{Color, Style};
use reedline::{
    ColumnarMenu, Completer, DefaultHinter, Emacs, KeyCode, KeyModifiers, Keybindings,
    MenuBuilder, Prompt, Reedline, ReedlineEvent, ReedlineMenu, Signal, Suggestion,
};
use std::borrow::Cow;
use tracing::info;

use crate::demo::{self, Command};

/// Available commands for autocomplete display
const COMMANDS: &[(&str, &str)] = &[
    ("/save", "Save \"Cordova Contact\""),
    ("/find", "Count contacts with a phone number: /find [filter]"),
    ("/delete", "Remove the first match: /delete [filter]"),
    ("/list", "List contacts: /list [filter]"),
    ("/show", "Contacts as JSON: /show [filter]"),
    ("/pick", "Choose a contact"),
    ("/add", "Add \"Dooney Evans\""),
    ("/add-nameless", "Add a contact without a name"),
    ("/add-unicode", "Add a contact with a Cyrillic name"),
    ("/rename", "Rename \"Dooney Evans\""),
    ("/cleanup", "Remove every sample contact"),
    ("/help", "Show help"),
    ("/exit", "Exit"),
    ("/quit", "Exit"),
];

/// Command completer for reedline
#[derive(Clone)]
pub struct CommandCompleter {
    commands: Vec<(&'static str, &'static str)>,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self {
            commands: COMMANDS.to_vec(),
        }
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for CommandCompleter {
    fn complete(&mut self, line: &str, pos: usize) -> Vec<Suggestion> {
        if !line.starts_with('/') || line.contains(' ') {
            return Vec::new();
        }

        self.commands
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(line))
            .map(|(cmd, desc)| Suggestion {
                value: cmd.to_string(),
                description: Some(desc.to_string()),
                extra: None,
                span: reedline::Span::new(0, pos),
                append_whitespace: true,
                style: None,
            })
            .collect()
    }
}

/// Prompt with colored styling
struct ColoredPrompt {
    style: Style,
}

impl ColoredPrompt {
    fn new() -> Self {
        Self {
            style: Color::Cyan.bold(),
        }
    }
}

impl Prompt for ColoredPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(self.style.paint("contacts> ").to_string())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _prompt_mode: reedline::PromptEditMode) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: reedline::PromptHistorySearch,
    ) -> Cow<'_, str> {
        Cow::Borrowed("")
    }
}

/// What the REPL should do with a line of input
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Run(Command),
    Help,
    Exit,
    Unknown(String),
}

fn parse_line(input: &str) -> Action {
    let Some(rest) = input.strip_prefix('/') else {
        return Action::Unknown(input.to_string());
    };
    let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));

    match name.to_lowercase().as_str() {
        "exit" | "quit" | "q" => Action::Exit,
        "help" | "?" => Action::Help,
        _ => match Command::parse(name, arg) {
            Some(command) => Action::Run(command),
            None => Action::Unknown(input.to_string()),
        },
    }
}

/// Run CLI interactive mode
pub async fn run_cli(client: ContactsClient) -> anyhow::Result<()> {
    info!("Starting CLI mode on {} store", client.store().name());

    print_welcome();

    let mut keybindings = default_keybindings();

    // Trigger completion on '/' key
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Char('/'),
        ReedlineEvent::Edit(vec![reedline::EditCommand::Complete]),
    );

    let menu = Box::new(
        ColumnarMenu::default()
            .with_name("command_menu")
            .with_columns(1)
            .with_column_width(Some(40))
            .with_only_buffer_difference(false),
    );

    let hinter = DefaultHinter::default().with_style(Style::new().dimmed());

    let mut line_editor = Reedline::create()
        .with_completer(Box::new(CommandCompleter::new()))
        .with_menu(ReedlineMenu::EngineCompleter(menu))
        .with_hinter(Box::new(hinter))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    let prompt = ColoredPrompt::new();

    loop {
        match line_editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }

                match parse_line(input) {
                    Action::Run(command) => {
                        println!("\n{}\n", demo::run(&client, command).await);
                    }
                    Action::Help => print_help(),
                    Action::Exit => {
                        println!("\nBye!\n");
                        break;
                    }
                    Action::Unknown(text) => {
                        eprintln!("\nUnknown command: {}. Type /help for the command list.\n", text);
                    }
                }
            }
            Ok(Signal::CtrlC) => {
                println!("^C");
                continue;
            }
            Ok(Signal::CtrlD) => {
                println!("\nBye!\n");
                break;
            }
            Err(err) => {
                eprintln!("\nError: {}\n", err);
                break;
            }
        }
    }

    Ok(())
}

/// Default keybindings for reedline
fn default_keybindings() -> Keybindings {
    let mut keybindings = Keybindings::new();
    keybindings.add_binding(
        KeyModifiers::NONE,
        KeyCode::Tab,
        ReedlineEvent::Edit(vec![reedline::EditCommand::Complete]),
    );
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Enter, ReedlineEvent::Submit);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Esc, ReedlineEvent::Esc);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('c'), ReedlineEvent::CtrlC);
    keybindings.add_binding(KeyModifiers::CONTROL, KeyCode::Char('d'), ReedlineEvent::CtrlD);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Up, ReedlineEvent::Up);
    keybindings.add_binding(KeyModifiers::NONE, KeyCode::Down, ReedlineEvent::Down);
    keybindings
}

fn print_welcome() {
    println!();
    println!("cx-demo interactive mode");
    println!("Commands start with '/', e.g. /save, /find, /list. Type /help for all of them.");
    println!();
}

fn print_help() {
    println!();
    println!("Available commands:");
    for (cmd, desc) in COMMANDS {
        println!("  {:<14} {}", cmd, desc);
    }
    println!();
}
