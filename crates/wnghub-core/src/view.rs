use comfy_table::{presets, ContentArrangement, Table};

use crate::{models::Notification, Error, Result};

pub const NO_NOTIFICATIONS_MSG: &str = "No new matching notifications!";
pub const EXPAND_TERMINAL_MSG: &str = "*** Expand your terminal for more information ***";

/// A notification attribute that can be shown as a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    AbbrevTitle,
    Title,
    HtmlUrl,
    Repository,
    Org,
    Reason,
    Kind,
    UpdatedAt,
}

impl Field {
    pub fn value(&self, n: &Notification) -> String {
        match self {
            Field::AbbrevTitle => n.abbrev_title(),
            Field::Title => n.title.clone(),
            Field::HtmlUrl => n.html_url.clone(),
            Field::Repository => n.repository.clone(),
            Field::Org => n.org.clone(),
            Field::Reason => n.reason.clone(),
            Field::Kind => n.kind().to_string(),
            Field::UpdatedAt => n.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Column in the output table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub field: Field,
    pub header: String,
    /// Only shown when the terminal is at least this wide
    pub min_width: Option<u16>,
}

impl Column {
    pub fn new(field: Field, header: &str) -> Self {
        Self {
            field,
            header: header.to_string(),
            min_width: None,
        }
    }

    pub fn min_width(mut self, width: u16) -> Self {
        self.min_width = Some(width);
        self
    }
}

pub fn default_columns() -> Vec<Column> {
    vec![
        Column::new(Field::AbbrevTitle, "Title"),
        Column::new(Field::HtmlUrl, "url"),
        Column::new(Field::Repository, "Repo").min_width(114),
        Column::new(Field::Kind, "Type").min_width(121),
    ]
}

/// Drop columns the terminal is too narrow for
///
/// Returns the kept columns and whether anything was dropped.
pub fn select_columns(terminal_width: u16, candidates: &[Column]) -> (Vec<Column>, bool) {
    let (kept, dropped): (Vec<Column>, Vec<Column>) = candidates
        .iter()
        .cloned()
        .partition(|c| c.min_width.map_or(true, |min| terminal_width >= min));

    (kept, !dropped.is_empty())
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Turns a result list into text for the terminal
pub trait Renderer {
    fn render(&self, notifications: &[Notification], columns: &[Column]) -> Result<String>;
}

/// Table renderer; suppresses columns that won't fit the terminal
pub struct TableRenderer {
    terminal_width: u16,
}

impl TableRenderer {
    pub fn new(terminal_width: u16) -> Self {
        Self { terminal_width }
    }
}

impl Renderer for TableRenderer {
    fn render(&self, notifications: &[Notification], columns: &[Column]) -> Result<String> {
        if notifications.is_empty() {
            return Ok(NO_NOTIFICATIONS_MSG.to_string());
        }

        let (columns, suppressed) = select_columns(self.terminal_width, columns);

        let mut table = Table::new();
        table
            .load_preset(presets::ASCII_FULL)
            .set_content_arrangement(ContentArrangement::Disabled)
            .set_header(columns.iter().map(|c| c.header.as_str()));

        for n in notifications {
            table.add_row(columns.iter().map(|c| c.field.value(n)));
        }

        let mut output = table.to_string();
        if suppressed {
            output.push('\n');
            output.push_str(EXPAND_TERMINAL_MSG);
        }
        Ok(output)
    }
}

/// JSON renderer; columns are ignored, every field is written
///
/// Scripts don't care how wide your terminal is.
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, notifications: &[Notification], _columns: &[Column]) -> Result<String> {
        serde_json::to_string_pretty(notifications)
            .map_err(|e| Error::SerializationError(e.to_string()))
    }
}
