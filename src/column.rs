//! Table column schema
//!
//! Includes the fluent TableBuilder, column definitions, render variants and
//! the presentation-neutral Cell they produce.

use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GridConfig;
use crate::record::{Record, display_string, is_blank};

// ============================================================================
// Cells
// ============================================================================

/// Category attached to a badge cell; color and shape belong to the renderer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    #[default]
    Default,
    Success,
    Warning,
    Danger,
    Info,
    Outline,
}

/// Rendered content of one column for one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    Text(String),
    Badge { label: String, tone: BadgeTone },
    Image { url: String, alt: String },
    Composite(Vec<Cell>),
}

impl Cell {
    pub fn text(text: impl Into<String>) -> Self {
        Cell::Text(text.into())
    }

    /// Plain text content, flattening composites with spaces
    pub fn to_plain_text(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Badge { label, .. } => label.clone(),
            Cell::Image { url, .. } => url.clone(),
            Cell::Composite(cells) => cells
                .iter()
                .map(Cell::to_plain_text)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

// ============================================================================
// Formats
// ============================================================================

/// en-US style number formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberFormat {
    #[serde(rename = "minimumFractionDigits")]
    pub minimum_fraction_digits: usize,
    #[serde(rename = "maximumFractionDigits")]
    pub maximum_fraction_digits: usize,
    #[serde(rename = "useGrouping")]
    pub use_grouping: bool,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            minimum_fraction_digits: 0,
            maximum_fraction_digits: 3,
            use_grouping: true,
        }
    }
}

impl NumberFormat {
    /// Fixed number of fraction digits, e.g. `fixed(2)` for currency
    pub fn fixed(digits: usize) -> Self {
        Self {
            minimum_fraction_digits: digits,
            maximum_fraction_digits: digits,
            use_grouping: true,
        }
    }

    pub fn without_grouping(mut self) -> Self {
        self.use_grouping = false;
        self
    }

    pub fn format(&self, value: f64) -> String {
        if value.is_nan() {
            return "NaN".to_string();
        }
        if value.is_infinite() {
            return if value > 0.0 { "∞" } else { "-∞" }.to_string();
        }

        let max = self.maximum_fraction_digits.max(self.minimum_fraction_digits);
        let rounded = format!("{:.*}", max, value.abs());
        let (int_part, frac_part) = match rounded.split_once('.') {
            Some((i, f)) => (i.to_string(), f.to_string()),
            None => (rounded.clone(), String::new()),
        };

        let mut frac = frac_part.trim_end_matches('0').to_string();
        while frac.len() < self.minimum_fraction_digits {
            frac.push('0');
        }

        let int_part = if self.use_grouping {
            group_thousands(&int_part)
        } else {
            int_part
        };

        // -0.0 and values that round to zero print without a sign
        let nonzero = int_part.chars().any(|c| c.is_ascii_digit() && c != '0')
            || frac.chars().any(|c| c != '0');
        let negative = value < 0.0 && nonzero;
        let mut out = String::new();
        if negative {
            out.push('-');
        }
        out.push_str(&int_part);
        if !frac.is_empty() {
            out.push('.');
            out.push_str(&frac);
        }
        out
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Date rendering with a chrono format string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFormat {
    /// chrono strftime pattern (default: "%b %-d, %Y", e.g. "Jan 15, 2024")
    pub pattern: String,
    /// Text for missing or empty values (default: "-")
    pub placeholder: String,
}

/// Text rendered for a date value that cannot be parsed
pub const INVALID_DATE: &str = "Invalid Date";

impl Default for DateFormat {
    fn default() -> Self {
        Self {
            pattern: "%b %-d, %Y".to_string(),
            placeholder: "-".to_string(),
        }
    }
}

impl DateFormat {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            ..Self::default()
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Render an attribute value as a date
    pub fn format(&self, value: Option<&Value>) -> String {
        if is_blank(value) || value == Some(&Value::from(0)) {
            return self.placeholder.clone();
        }
        let Some(Value::String(raw)) = value else {
            return INVALID_DATE.to_string();
        };
        match parse_date(raw) {
            Some(date) => {
                let mut out = String::new();
                match write!(out, "{}", date.format(&self.pattern)) {
                    Ok(()) => out,
                    Err(_) => INVALID_DATE.to_string(),
                }
            }
            None => INVALID_DATE.to_string(),
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

// ============================================================================
// Column Definitions
// ============================================================================

/// Row-to-cell transform for custom columns
pub type CellRenderer<R> = Arc<dyn Fn(&R) -> Cell + Send + Sync>;

/// How a column turns an attribute into a cell
pub enum RenderVariant<R> {
    /// Raw value as text
    Plain,
    /// Numeric formatting, string coercion for non-numbers
    Number(NumberFormat),
    /// Value mapped to a tone; unmapped values use the default tone
    Badge { variants: HashMap<String, BadgeTone> },
    /// Date formatting
    Date(DateFormat),
    /// Image URL, rendered by the UI layer
    Image,
    /// Caller-supplied transform over the whole row
    Custom(CellRenderer<R>),
}

impl<R> Clone for RenderVariant<R> {
    fn clone(&self) -> Self {
        match self {
            RenderVariant::Plain => RenderVariant::Plain,
            RenderVariant::Number(format) => RenderVariant::Number(format.clone()),
            RenderVariant::Badge { variants } => RenderVariant::Badge {
                variants: variants.clone(),
            },
            RenderVariant::Date(format) => RenderVariant::Date(format.clone()),
            RenderVariant::Image => RenderVariant::Image,
            RenderVariant::Custom(render) => RenderVariant::Custom(Arc::clone(render)),
        }
    }
}

impl<R> fmt::Debug for RenderVariant<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderVariant::Plain => write!(f, "Plain"),
            RenderVariant::Number(format) => f.debug_tuple("Number").field(format).finish(),
            RenderVariant::Badge { variants } => {
                f.debug_struct("Badge").field("variants", variants).finish()
            }
            RenderVariant::Date(format) => f.debug_tuple("Date").field(format).finish(),
            RenderVariant::Image => write!(f, "Image"),
            RenderVariant::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Serializable tag of a render variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderKind {
    Plain,
    Number,
    Badge,
    Date,
    Image,
    Custom,
}

impl<R> RenderVariant<R> {
    pub fn kind(&self) -> RenderKind {
        match self {
            RenderVariant::Plain => RenderKind::Plain,
            RenderVariant::Number(_) => RenderKind::Number,
            RenderVariant::Badge { .. } => RenderKind::Badge,
            RenderVariant::Date(_) => RenderKind::Date,
            RenderVariant::Image => RenderKind::Image,
            RenderVariant::Custom(_) => RenderKind::Custom,
        }
    }
}

/// One table column
#[derive(Clone)]
pub struct ColumnDefinition<R> {
    /// Attribute the column reads and sorts by
    pub key: String,
    /// Header text
    pub header: String,
    /// CSS width hint, e.g. "50px"
    pub width: Option<String>,
    /// Whether clicking the header sorts (default: true)
    pub sortable: bool,
    /// Cell rendering
    pub render: RenderVariant<R>,
}

impl<R> fmt::Debug for ColumnDefinition<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDefinition")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("width", &self.width)
            .field("sortable", &self.sortable)
            .field("render", &self.render)
            .finish()
    }
}

impl<R: Record> ColumnDefinition<R> {
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            width: None,
            sortable: true,
            render: RenderVariant::Plain,
        }
    }

    /// Render this column for `row`
    pub fn render(&self, row: &R) -> Cell {
        let value = || row.field(&self.key);
        match &self.render {
            RenderVariant::Plain => Cell::Text(plain_text(value().as_ref())),
            RenderVariant::Number(format) => {
                let value = value();
                match value.as_ref().and_then(Value::as_f64) {
                    Some(n) => Cell::Text(format.format(n)),
                    None => Cell::Text(plain_text(value.as_ref())),
                }
            }
            RenderVariant::Badge { variants } => {
                let label = plain_text(value().as_ref());
                let tone = variants.get(&label).copied().unwrap_or_default();
                Cell::Badge { label, tone }
            }
            RenderVariant::Date(format) => Cell::Text(format.format(value().as_ref())),
            RenderVariant::Image => Cell::Image {
                url: plain_text(value().as_ref()),
                alt: self.header.clone(),
            },
            RenderVariant::Custom(render) => render(row),
        }
    }
}

fn plain_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(v) => display_string(v),
    }
}

/// Overrides accepted by [`TableBuilder::column`]
pub struct ColumnOptions<R> {
    pub width: Option<String>,
    pub sortable: Option<bool>,
    pub render: Option<RenderVariant<R>>,
}

impl<R> Default for ColumnOptions<R> {
    fn default() -> Self {
        Self {
            width: None,
            sortable: None,
            render: None,
        }
    }
}

impl<R> ColumnOptions<R> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: impl Into<String>) -> Self {
        self.width = Some(width.into());
        self
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = Some(sortable);
        self
    }

    pub fn render(mut self, render: RenderVariant<R>) -> Self {
        self.render = Some(render);
        self
    }
}

// ============================================================================
// Table Builder
// ============================================================================

/// Fluent, order-preserving column list builder
///
/// ```rust
/// use admin_grid::{BadgeTone, DynamicRecord, TableBuilder};
///
/// let columns = TableBuilder::<DynamicRecord>::new()
///     .text("name", "Name")
///     .badge("status", "Status", [("active", BadgeTone::Success)])
///     .date("joined", "Joined")
///     .build();
///
/// assert_eq!(columns.len(), 3);
/// ```
pub struct TableBuilder<R> {
    columns: Vec<ColumnDefinition<R>>,
    number_format: NumberFormat,
    date_format: DateFormat,
}

impl<R: Record> Default for TableBuilder<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> TableBuilder<R> {
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            number_format: NumberFormat::default(),
            date_format: DateFormat::default(),
        }
    }

    /// Builder whose number and date columns default to the config's formats
    pub fn with_config(config: &GridConfig) -> Self {
        Self {
            columns: Vec::new(),
            number_format: config.number_format.clone(),
            date_format: config.date_format.clone(),
        }
    }

    /// Append a column with explicit options
    pub fn column(
        mut self,
        key: impl Into<String>,
        header: impl Into<String>,
        options: ColumnOptions<R>,
    ) -> Self {
        let mut column = ColumnDefinition::new(key, header);
        column.width = options.width;
        if let Some(sortable) = options.sortable {
            column.sortable = sortable;
        }
        if let Some(render) = options.render {
            column.render = render;
        }
        self.columns.push(column);
        self
    }

    /// Raw value as text
    pub fn text(self, key: impl Into<String>, header: impl Into<String>) -> Self {
        self.column(key, header, ColumnOptions::new())
    }

    /// Number with the builder's default format
    pub fn number(self, key: impl Into<String>, header: impl Into<String>) -> Self {
        let format = self.number_format.clone();
        self.number_with(key, header, format)
    }

    pub fn number_with(
        self,
        key: impl Into<String>,
        header: impl Into<String>,
        format: NumberFormat,
    ) -> Self {
        self.column(
            key,
            header,
            ColumnOptions::new().render(RenderVariant::Number(format)),
        )
    }

    /// Value mapped through `variants`; unmapped values get the default tone
    pub fn badge<K: Into<String>>(
        self,
        key: impl Into<String>,
        header: impl Into<String>,
        variants: impl IntoIterator<Item = (K, BadgeTone)>,
    ) -> Self {
        let variants = variants.into_iter().map(|(k, v)| (k.into(), v)).collect();
        self.column(
            key,
            header,
            ColumnOptions::new().render(RenderVariant::Badge { variants }),
        )
    }

    /// Date with the builder's default format
    pub fn date(self, key: impl Into<String>, header: impl Into<String>) -> Self {
        let format = self.date_format.clone();
        self.date_with(key, header, format)
    }

    pub fn date_with(
        self,
        key: impl Into<String>,
        header: impl Into<String>,
        format: DateFormat,
    ) -> Self {
        self.column(
            key,
            header,
            ColumnOptions::new().render(RenderVariant::Date(format)),
        )
    }

    /// Image URL column, never sortable, 50px wide by default
    pub fn image(self, key: impl Into<String>, header: impl Into<String>) -> Self {
        self.column(
            key,
            header,
            ColumnOptions::new()
                .width("50px")
                .sortable(false)
                .render(RenderVariant::Image),
        )
    }

    /// Whole-row transform, for composite cells
    pub fn custom(
        self,
        key: impl Into<String>,
        header: impl Into<String>,
        render: impl Fn(&R) -> Cell + Send + Sync + 'static,
    ) -> Self {
        self.column(
            key,
            header,
            ColumnOptions::new().render(RenderVariant::Custom(Arc::new(render))),
        )
    }

    /// Set the width of the most recently added column
    pub fn width(mut self, width: impl Into<String>) -> Self {
        if let Some(column) = self.columns.last_mut() {
            column.width = Some(width.into());
        }
        self
    }

    /// Set sortability of the most recently added column
    pub fn sortable(mut self, sortable: bool) -> Self {
        if let Some(column) = self.columns.last_mut() {
            column.sortable = sortable;
        }
        self
    }

    pub fn build(self) -> Vec<ColumnDefinition<R>> {
        self.columns
    }
}
