//! Table renderer

use super::{Align, ColumnGroup, TableSchema};
use crate::delta::MetricsRecord;

const SEPARATOR: &str = "|";

/// Formats records and headers for a fixed [`TableSchema`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRenderer {
    schema: TableSchema,
}

impl TableRenderer {
    pub fn new(schema: TableSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// One data row. Values wider than their column are written whole.
    pub fn render_row(&self, record: &MetricsRecord) -> String {
        join(
            self.schema
                .columns()
                .map(|c| format!("{:>width$}", c.field.format(record), width = c.width)),
        )
    }

    /// Group titles centered between dashes over their columns
    pub fn banner_line(&self) -> String {
        join(self.schema.groups().iter().map(banner_segment))
    }

    pub fn label_line(&self) -> String {
        join(self.schema.columns().map(|c| match c.label_align {
            Align::Right => format!("{:>width$}", c.label, width = c.width),
            Align::Center => center(c.label, c.width, ' '),
        }))
    }

    /// Banner followed by labels
    pub fn header_lines(&self) -> [String; 2] {
        [self.banner_line(), self.label_line()]
    }
}

fn join(cells: impl Iterator<Item = String>) -> String {
    let cells: Vec<String> = cells.collect();
    format!("{SEPARATOR}{}{SEPARATOR}", cells.join(SEPARATOR))
}

fn banner_segment(group: &ColumnGroup) -> String {
    let width = group.width();
    if group.title.is_empty() {
        return " ".repeat(width);
    }
    let title = format!(" {} ", group.title);
    let title_width = title.chars().count();
    if title_width > width {
        return "-".repeat(width);
    }
    match group.banner_lead {
        Some(lead) => {
            let lead = lead.min(width - title_width);
            let trail = width - title_width - lead;
            format!("{}{}{}", "-".repeat(lead), title, "-".repeat(trail))
        }
        None => center(&title, width, '-'),
    }
}

/// Pad `text` to `width` with `fill`, the left side taking the odd one
fn center(text: &str, width: usize, fill: char) -> String {
    let pad = width.saturating_sub(text.chars().count());
    let left = pad - pad / 2;
    let right = pad / 2;
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat_n(fill, left));
    out.push_str(text);
    out.extend(std::iter::repeat_n(fill, right));
    out
}
