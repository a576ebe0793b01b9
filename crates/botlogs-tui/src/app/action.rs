use botlogs_types::ExportFormat;

/// All possible actions in the application (command pattern)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    ToggleHelp,
    /// Close the topmost overlay
    Back,

    // Table navigation
    RowUp,
    RowDown,
    OpenDetail,
    CloseDetail,
    PrevPage,
    NextPage,

    // Filters
    OpenSearch,
    OpenDateFrom,
    OpenDateTo,
    CycleLevel,
    CycleSource,
    ResetFilters,

    // Text input
    InputChar(char),
    InputBackspace,
    InputClear,
    InputSubmit,
    InputCancel,

    // Server actions
    Refresh,
    ClearLogs,
    Confirm,
    CancelConfirm,
    Export(ExportFormat),
    Snapshot,

    DismissNotifications,

    // Tick (for periodic updates)
    Tick,
}
