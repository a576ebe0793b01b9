use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use botlogs_types::ExportFormat;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    LogTable,
    Detail,
    Input,
    Confirm,
    Help,
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Esc), Action::Back);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        bindings.insert(KeyContext::Global, global);

        let mut table = HashMap::new();
        // Row and page navigation
        table.insert(KeyBinding::new(KeyCode::Char('j')), Action::RowDown);
        table.insert(KeyBinding::new(KeyCode::Down), Action::RowDown);
        table.insert(KeyBinding::new(KeyCode::Char('k')), Action::RowUp);
        table.insert(KeyBinding::new(KeyCode::Up), Action::RowUp);
        table.insert(KeyBinding::new(KeyCode::Enter), Action::OpenDetail);
        table.insert(KeyBinding::new(KeyCode::Left), Action::PrevPage);
        table.insert(KeyBinding::new(KeyCode::Char('h')), Action::PrevPage);
        table.insert(KeyBinding::new(KeyCode::PageUp), Action::PrevPage);
        table.insert(KeyBinding::new(KeyCode::Right), Action::NextPage);
        table.insert(KeyBinding::new(KeyCode::Char('l')), Action::NextPage);
        table.insert(KeyBinding::new(KeyCode::PageDown), Action::NextPage);
        // Filters
        table.insert(KeyBinding::new(KeyCode::Char('/')), Action::OpenSearch);
        table.insert(KeyBinding::new(KeyCode::Char('v')), Action::CycleLevel);
        table.insert(KeyBinding::new(KeyCode::Char('s')), Action::CycleSource);
        table.insert(KeyBinding::new(KeyCode::Char('[')), Action::OpenDateFrom);
        table.insert(KeyBinding::new(KeyCode::Char(']')), Action::OpenDateTo);
        table.insert(KeyBinding::new(KeyCode::Char('n')), Action::ResetFilters);
        // Server actions
        table.insert(KeyBinding::new(KeyCode::Char('r')), Action::Refresh);
        table.insert(KeyBinding::shift(KeyCode::Char('C')), Action::ClearLogs);
        table.insert(
            KeyBinding::new(KeyCode::Char('e')),
            Action::Export(ExportFormat::Csv),
        );
        table.insert(
            KeyBinding::shift(KeyCode::Char('E')),
            Action::Export(ExportFormat::Json),
        );
        table.insert(KeyBinding::shift(KeyCode::Char('H')), Action::Snapshot);
        table.insert(KeyBinding::new(KeyCode::Char('x')), Action::DismissNotifications);
        bindings.insert(KeyContext::LogTable, table);

        let mut detail = HashMap::new();
        detail.insert(KeyBinding::new(KeyCode::Esc), Action::CloseDetail);
        detail.insert(KeyBinding::new(KeyCode::Enter), Action::CloseDetail);
        detail.insert(KeyBinding::new(KeyCode::Char('q')), Action::CloseDetail);
        bindings.insert(KeyContext::Detail, detail);

        // Text input bindings (search and date fields)
        let mut input = HashMap::new();
        input.insert(KeyBinding::new(KeyCode::Enter), Action::InputSubmit);
        input.insert(KeyBinding::new(KeyCode::Esc), Action::InputCancel);
        input.insert(KeyBinding::new(KeyCode::Backspace), Action::InputBackspace);
        input.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::InputClear);
        input.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::InputCancel);
        bindings.insert(KeyContext::Input, input);

        let mut confirm = HashMap::new();
        confirm.insert(KeyBinding::new(KeyCode::Char('y')), Action::Confirm);
        confirm.insert(KeyBinding::shift(KeyCode::Char('Y')), Action::Confirm);
        confirm.insert(KeyBinding::new(KeyCode::Enter), Action::Confirm);
        confirm.insert(KeyBinding::new(KeyCode::Char('n')), Action::CancelConfirm);
        confirm.insert(KeyBinding::new(KeyCode::Esc), Action::CancelConfirm);
        bindings.insert(KeyContext::Confirm, confirm);

        let mut help = HashMap::new();
        help.insert(KeyBinding::new(KeyCode::Esc), Action::ToggleHelp);
        bindings.insert(KeyContext::Help, help);

        Self { bindings }
    }

    /// Look up action for key event in given context
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        if let Some(action) = self
            .bindings
            .get(&context)
            .and_then(|bindings| bindings.get(&binding))
        {
            return Some(action.clone());
        }

        match context {
            // Regular characters are typed into the field
            KeyContext::Input => Self::char_input(key),
            // A dialog swallows every other key
            KeyContext::Confirm => None,
            _ => self
                .bindings
                .get(&KeyContext::Global)?
                .get(&binding)
                .cloned(),
        }
    }

    fn char_input(key: &KeyEvent) -> Option<Action> {
        if let KeyCode::Char(c) = key.code {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                return Some(Action::InputChar(c));
            }
        }
        None
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}
