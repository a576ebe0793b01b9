use botlogs_types::{FilterUpdate, LogEntry, next_level, next_source};
use botlogs_view::{LogView, ViewEvent};

use super::Action;
use crate::config::KeyContext;

/// Filter field edited through the input line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputField {
    Search,
    DateFrom,
    DateTo,
}

impl InputField {
    /// Filter key understood by [`FilterUpdate::parse`]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::DateFrom => "from",
            Self::DateTo => "to",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::DateFrom => "From (YYYY-MM-DD)",
            Self::DateTo => "To (YYYY-MM-DD)",
        }
    }
}

/// Active text input
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputMode {
    pub field: InputField,
    pub buffer: String,
}

/// UI-only state
#[derive(Debug, Default)]
pub struct UiState {
    /// Highlighted row of the table
    pub selected: usize,
    pub input: Option<InputMode>,
    pub help_visible: bool,
}

/// Main application state
pub struct AppState {
    pub view: LogView,
    pub ui: UiState,
    pub should_quit: bool,
}

impl AppState {
    pub fn new(view: LogView) -> Self {
        Self {
            view,
            ui: UiState::default(),
            should_quit: false,
        }
    }

    /// Which keybinding table applies right now
    pub fn key_context(&self) -> KeyContext {
        if self.view.confirmation().is_some() {
            KeyContext::Confirm
        } else if self.ui.input.is_some() {
            KeyContext::Input
        } else if self.ui.help_visible {
            KeyContext::Help
        } else if self.view.detail().is_some() {
            KeyContext::Detail
        } else {
            KeyContext::LogTable
        }
    }

    pub fn selected_entry(&self) -> Option<&LogEntry> {
        self.view.logs().get(self.ui.selected)
    }

    /// Feed a background result into the view
    pub fn handle_view_event(&mut self, event: ViewEvent) {
        self.view.handle(event);
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.view.logs().len();
        if self.ui.selected >= len {
            self.ui.selected = len.saturating_sub(1);
        }
    }

    pub fn update(&mut self, action: Action) {
        match action {
            Action::Quit => {
                self.view.destroy();
                self.should_quit = true;
            }
            Action::ToggleHelp => {
                self.ui.help_visible = !self.ui.help_visible;
            }
            Action::Back => {
                if self.ui.help_visible {
                    self.ui.help_visible = false;
                } else if self.view.detail().is_some() {
                    self.view.hide_detail();
                }
            }

            Action::RowUp => {
                self.ui.selected = self.ui.selected.saturating_sub(1);
            }
            Action::RowDown => {
                self.ui.selected = self.ui.selected.saturating_add(1);
                self.clamp_selection();
            }
            Action::OpenDetail => {
                if let Some(id) = self.selected_entry().map(|e| e.id.clone()) {
                    self.view.show_detail(&id);
                }
            }
            Action::CloseDetail => self.view.hide_detail(),
            Action::PrevPage => {
                if self.view.go_to_page(-1) {
                    self.ui.selected = 0;
                }
            }
            Action::NextPage => {
                if self.view.go_to_page(1) {
                    self.ui.selected = 0;
                }
            }

            Action::OpenSearch => {
                let current = self
                    .view
                    .pending_search()
                    .unwrap_or(&self.view.filters().search)
                    .to_string();
                self.open_input(InputField::Search, current);
            }
            Action::OpenDateFrom => {
                let current = format_date(self.view.filters().date_from);
                self.open_input(InputField::DateFrom, current);
            }
            Action::OpenDateTo => {
                let current = format_date(self.view.filters().date_to);
                self.open_input(InputField::DateTo, current);
            }
            Action::CycleLevel => {
                let level = next_level(self.view.filters().level);
                self.set_filter(FilterUpdate::Level(level));
            }
            Action::CycleSource => {
                let source = next_source(self.view.filters().source.as_deref());
                self.set_filter(FilterUpdate::Source(source));
            }
            Action::ResetFilters => {
                self.view.reset_filters();
                self.ui.selected = 0;
            }

            Action::InputChar(c) => self.edit_input(|buffer| buffer.push(c)),
            Action::InputBackspace => self.edit_input(|buffer| {
                buffer.pop();
            }),
            Action::InputClear => self.edit_input(String::clear),
            Action::InputSubmit => self.submit_input(),
            Action::InputCancel => {
                self.ui.input = None;
            }

            Action::Refresh => {
                self.view.refresh();
            }
            Action::ClearLogs => self.view.clear_all(),
            Action::Confirm => {
                self.view.confirm();
            }
            Action::CancelConfirm => self.view.cancel_confirmation(),
            Action::Export(format) => {
                self.view.export_current(format);
            }
            Action::Snapshot => self.view.save_snapshot(),
            Action::DismissNotifications => self.view.notifications_mut().dismiss_all(),

            Action::Tick => {
                self.view.tick();
            }
        }
    }

    fn set_filter(&mut self, update: FilterUpdate) {
        self.view.set_filter(update);
        self.ui.selected = 0;
    }

    fn open_input(&mut self, field: InputField, buffer: String) {
        self.ui.input = Some(InputMode { field, buffer });
    }

    /// Search edits go out on every keystroke and are debounced by the view
    fn edit_input(&mut self, edit: impl FnOnce(&mut String)) {
        let Some(input) = self.ui.input.as_mut() else {
            return;
        };
        let before = input.buffer.clone();
        edit(&mut input.buffer);
        if input.buffer == before {
            return;
        }

        if input.field == InputField::Search {
            let text = input.buffer.clone();
            self.set_filter(FilterUpdate::Search(text));
        }
    }

    fn submit_input(&mut self) {
        let Some(input) = self.ui.input.take() else {
            return;
        };
        if input.field == InputField::Search {
            return;
        }

        match FilterUpdate::parse(input.field.key(), &input.buffer) {
            Ok(update) => self.set_filter(update),
            Err(e) => self.view.notifications_mut().error("Invalid filter", e),
        }
    }
}

fn format_date(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}
