//! Line-oriented console host.
//!
//! Stands in for a UI: commands drive the workspace, dialogs become stdin
//! prompts, and workspace events are echoed after every command.

use futures_util::future::BoxFuture;
use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::TryRecvError};

use tabspace_core::services::{ConfirmRequest, ConfirmResponder, ModalService, Notice};
use tabspace_core::{
    Navigation, TabKey, TabMenuAction, UnsavedWork, Workspace, WorkspaceError, WorkspaceEvent,
};

const HELP: &str = "\
commands:
  open <path>          open a page or switch to it
  switch <path>        switch to an open tab
  close [path]         close a tab (default: active)
  others <path>        close every other unpinned tab
  right <path>         close unpinned tabs to the right
  all                  close every unpinned tab
  pin <path>           pin or unpin a tab
  move <from> <to>     drag a tab onto another
  menu <path>          show the context menu for a tab
  do <path> <action>   run a context menu action (toggle-pin, close, ...)
  dirty [save]         mark the active page as having unsaved work
  clean                mark the active page as saved
  reload               remount every tab
  list                 show open tabs
  quit                 exit";

// ============================================================================
// ConsoleModal
// ============================================================================

/// Modal service that asks on stdin and prints notices.
#[derive(Default)]
pub struct ConsoleModal;

impl ConsoleModal {
    pub fn new() -> Self {
        Self
    }
}

impl ModalService for ConsoleModal {
    fn confirm(&self, request: ConfirmRequest, responder: ConfirmResponder) {
        println!("! {}: {}", request.title, request.content);
        print!("  [y] {} / [n] {} > ", request.confirm_label, request.cancel_label);
        let _ = io::stdout().flush();

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => responder.respond(parse_yes(&answer)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read confirmation");
                responder.cancel();
            }
        }
    }

    fn inform(&self, notice: Notice) {
        println!("! {}: {}", notice.title, notice.content);
    }
}

fn parse_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

// ============================================================================
// ConsolePage
// ============================================================================

/// Unsaved-work handle for a page "mounted" in the console.
struct ConsolePage {
    dirty: AtomicBool,
    can_save: bool,
}

impl UnsavedWork for ConsolePage {
    fn has_unsaved_changes(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    fn can_save(&self) -> bool {
        self.can_save
    }

    fn save_and_continue(&self) -> BoxFuture<'_, Result<(), WorkspaceError>> {
        Box::pin(async move {
            println!("  (saved)");
            self.dirty.store(false, Ordering::SeqCst);
            Ok(())
        })
    }
}

// ============================================================================
// Console
// ============================================================================

enum Command {
    Open(TabKey),
    Switch(TabKey),
    Close(Option<TabKey>),
    Others(TabKey),
    Right(TabKey),
    All,
    Pin(TabKey),
    Move(TabKey, TabKey),
    Menu(TabKey),
    Do(TabKey, TabMenuAction),
    Dirty { can_save: bool },
    Clean,
    Reload,
    List,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Command, String> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let key = |index: usize| -> Result<TabKey, String> {
        let word = words.get(index).ok_or_else(|| "missing path".to_string())?;
        TabKey::parse(word).map_err(|e| e.to_string())
    };

    let command = match words.first().copied().unwrap_or_default() {
        "open" => Command::Open(key(1)?),
        "switch" => Command::Switch(key(1)?),
        "close" if words.len() == 1 => Command::Close(None),
        "close" => Command::Close(Some(key(1)?)),
        "others" => Command::Others(key(1)?),
        "right" => Command::Right(key(1)?),
        "all" => Command::All,
        "pin" => Command::Pin(key(1)?),
        "move" => Command::Move(key(1)?, key(2)?),
        "menu" => Command::Menu(key(1)?),
        "do" => {
            let id = words.get(2).ok_or_else(|| "missing action".to_string())?;
            let action = menu_action(id).ok_or_else(|| format!("unknown action '{id}'"))?;
            Command::Do(key(1)?, action)
        }
        "dirty" => Command::Dirty { can_save: words.get(1) == Some(&"save") },
        "clean" => Command::Clean,
        "reload" => Command::Reload,
        "list" | "ls" => Command::List,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command '{other}', try 'help'")),
    };
    Ok(command)
}

fn menu_action(id: &str) -> Option<TabMenuAction> {
    [
        TabMenuAction::TogglePin,
        TabMenuAction::Close,
        TabMenuAction::CloseOthers,
        TabMenuAction::CloseRight,
        TabMenuAction::CloseAll,
    ]
    .into_iter()
    .find(|action| action.id() == id)
}

/// Console session over one workspace.
pub struct Console {
    workspace: Workspace,
    events: broadcast::Receiver<WorkspaceEvent>,
    pages: HashMap<TabKey, Arc<ConsolePage>>,
}

impl Console {
    pub fn new(workspace: Workspace) -> Self {
        let events = workspace.subscribe();
        Self { workspace, events, pages: HashMap::new() }
    }

    /// Read commands from stdin until `quit` or end of input.
    pub async fn run(mut self) {
        println!("Tabspace {} - type 'help' for commands", env!("CARGO_PKG_VERSION"));
        self.print_tabs();

        loop {
            print!("> ");
            let _ = io::stdout().flush();

            let mut line = String::new();
            match io::stdin().lock().read_line(&mut line) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "Failed to read command");
                    break;
                }
            }
            if line.trim().is_empty() {
                continue;
            }

            match parse_command(&line) {
                Ok(Command::Quit) => break,
                Ok(command) => self.execute(command).await,
                Err(message) => println!("{message}"),
            }
            self.drain_events();
        }

        tracing::info!("Console closed");
    }

    async fn execute(&mut self, command: Command) {
        let ws = &self.workspace;
        match command {
            Command::Open(key) => report(ws.open(&key).await),
            Command::Switch(key) => report(ws.activate(&key).await),
            Command::Close(key) => {
                let key = key.unwrap_or_else(|| ws.active_key());
                report(ws.close(&key).await);
            }
            Command::Others(key) => report(ws.close_others(&key).await),
            Command::Right(key) => report(ws.close_right(&key).await),
            Command::All => report(ws.close_all().await),
            Command::Pin(key) => {
                if ws.toggle_pin(&key).is_none() {
                    println!("{key} cannot be pinned or unpinned");
                }
            }
            Command::Move(from, to) => {
                if ws.begin_drag(&from) {
                    ws.drag_over(&to);
                }
                if ws.drop_drag().is_none() {
                    println!("{from} cannot be moved onto {to}");
                }
            }
            Command::Menu(key) => {
                let menu = ws.context_menu(&key);
                if menu.is_empty() {
                    println!("{key} is not open");
                }
                for entry in menu {
                    let state = if entry.disabled { " (disabled)" } else { "" };
                    println!("  {:<14} {}{state}", entry.action.id(), entry.label);
                }
            }
            Command::Do(key, action) => report(ws.run_menu_action(&key, action).await),
            Command::Dirty { can_save } => {
                let key = ws.active_key();
                let page = Arc::new(ConsolePage { dirty: AtomicBool::new(true), can_save });
                ws.register_tab_handle(key.clone(), page.clone());
                self.pages.insert(key, page);
            }
            Command::Clean => {
                if let Some(page) = self.pages.get(&ws.active_key()) {
                    page.dirty.store(false, Ordering::SeqCst);
                }
            }
            Command::Reload => {
                if let Navigation::Declined = ws.reload_all().await {
                    println!("stayed");
                }
            }
            Command::List => self.print_tabs(),
            Command::Help => println!("{HELP}"),
            Command::Quit => {}
        }
    }

    fn drain_events(&mut self) {
        loop {
            match self.events.try_recv() {
                Ok(event) => self.on_event(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Console missed workspace events");
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    fn on_event(&mut self, event: WorkspaceEvent) {
        match event {
            WorkspaceEvent::TabOpened { key } => println!("  + {key}"),
            WorkspaceEvent::TabClosed { key } => {
                // The page unmounts with its tab
                self.workspace.unregister_tab_handle(&key);
                self.pages.remove(&key);
                println!("  - {key}");
            }
            WorkspaceEvent::ActiveTabChanged { key } => {
                let component = self
                    .workspace
                    .document(&key)
                    .map(|route| route.document.component_id().to_string())
                    .unwrap_or_default();
                println!("  -> {key} [{component}]");
            }
            WorkspaceEvent::TabMoved { key, from, to } => println!("  ~ {key} {from} -> {to}"),
            WorkspaceEvent::PinChanged { key, pinned } => {
                println!("  {} {key}", if pinned { "pinned" } else { "unpinned" });
            }
            WorkspaceEvent::Reloaded { keys } => {
                for key in keys {
                    self.pages.remove(&key);
                    self.workspace.unregister_tab_handle(&key);
                }
                println!("  reloaded");
            }
        }
    }

    fn print_tabs(&self) {
        let active = self.workspace.active_key();
        for (index, tab) in self.workspace.tabs().iter().enumerate() {
            let marker = if *tab.key() == active { '*' } else { ' ' };
            let pin = if self.workspace.is_pinned(tab.key()) { " [pinned]" } else { "" };
            let dirty = if self.workspace.registry().has_unsaved_changes(tab.key()) {
                " [unsaved]"
            } else {
                ""
            };
            println!("{marker}{index} {:<24} {}{pin}{dirty}", tab.key().as_str(), tab.label());
        }
    }
}

fn report<T>(outcome: Navigation<T>) {
    match outcome {
        Navigation::Declined => println!("stayed"),
        // Rejections were already shown by the modal
        Navigation::Completed(_) | Navigation::Rejected(_) => {}
    }
}
