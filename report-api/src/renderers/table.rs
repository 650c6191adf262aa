use comfy_table::{
    modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Attribute, Cell, CellAlignment, Color,
    ContentArrangement, Table, TableComponent,
};

/// Builder for the tables every page prints
#[derive(Clone)]
pub struct TableBuilder {
    table: Table,
    rows: usize,
}

/// Table styling presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStyle {
    /// Record listings: full borders, one line between header and body
    Listing,
    /// Diff entries: no horizontal rules so long JSON values stay readable
    Diff,
}

impl TableBuilder {
    pub fn new() -> Self {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_content_arrangement(ContentArrangement::Dynamic);

        Self { table, rows: 0 }
    }

    pub fn with_style(style: TableStyle) -> Self {
        let mut builder = Self::new();
        builder.apply_style(style);
        builder
    }

    pub fn apply_style(&mut self, style: TableStyle) -> &mut Self {
        match style {
            TableStyle::Listing => {
                self.table.remove_style(TableComponent::HorizontalLines);
                self.table.remove_style(TableComponent::MiddleIntersections);
                self.table.remove_style(TableComponent::LeftBorderIntersections);
                self.table.remove_style(TableComponent::RightBorderIntersections);
            }
            TableStyle::Diff => {
                self.table
                    .remove_style(TableComponent::HorizontalLines)
                    .remove_style(TableComponent::LeftBorderIntersections)
                    .remove_style(TableComponent::RightBorderIntersections)
                    .remove_style(TableComponent::MiddleIntersections);
                self.table.set_content_arrangement(ContentArrangement::DynamicFullWidth);
            }
        }
        self
    }

    /// Bold header row
    pub fn headers<I, S>(&mut self, headers: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header_cells: Vec<Cell> = headers
            .into_iter()
            .map(|h| Cell::new(h.into()).add_attribute(Attribute::Bold))
            .collect();

        self.table.set_header(header_cells);
        self
    }

    pub fn row<I, S>(&mut self, cells: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row_cells: Vec<Cell> = cells.into_iter().map(|cell| Cell::new(cell.into())).collect();
        self.table.add_row(row_cells);
        self.rows += 1;
        self
    }

    pub fn styled_row(&mut self, cells: Vec<Cell>) -> &mut Self {
        self.table.add_row(cells);
        self.rows += 1;
        self
    }

    /// Right-align a numeric column
    pub fn align_right(&mut self, column: usize) -> &mut Self {
        if let Some(col) = self.table.column_mut(column) {
            col.set_cell_alignment(CellAlignment::Right);
        }
        self
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn build(self) -> String {
        self.table.to_string()
    }
}

impl Default for TableBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Styled cells
pub mod cells {
    use super::*;
    use crate::types::ItemStatus;

    pub fn bold<S: Into<String>>(text: S) -> Cell {
        Cell::new(text.into()).add_attribute(Attribute::Bold)
    }

    pub fn muted<S: Into<String>>(text: S) -> Cell {
        Cell::new(text.into()).fg(Color::DarkGrey)
    }

    pub fn normal<S: Into<String>>(text: S) -> Cell {
        Cell::new(text.into())
    }

    pub fn number<N: ToString>(value: N) -> Cell {
        Cell::new(value.to_string()).set_alignment(CellAlignment::Right)
    }

    /// Value cell; empty values are shown as a dimmed dash
    pub fn optional<S: Into<String>>(value: Option<S>) -> Cell {
        match value.map(Into::into).filter(|v: &String| !v.is_empty()) {
            Some(text) => Cell::new(text),
            None => muted("-"),
        }
    }

    /// Status badge coloured like the dashboard's chips
    pub fn status(status: &ItemStatus) -> Cell {
        let cell = Cell::new(status.to_string());
        match status {
            ItemStatus::Success => cell.fg(Color::Green),
            ItemStatus::Failed => cell.fg(Color::Red),
            ItemStatus::Processing => cell.fg(Color::Yellow),
            ItemStatus::Unknown => cell.fg(Color::DarkGrey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ItemStatus;

    #[test]
    fn test_table_builder_basic() {
        let mut builder = TableBuilder::new();
        builder.headers(vec!["ID", "Bank"]);
        builder.row(vec!["12", "State Bank"]);
        builder.row(vec!["13", "Canara"]);
        assert_eq!(builder.row_count(), 2);

        let table = builder.build();
        assert!(table.contains("ID"));
        assert!(table.contains("State Bank"));
        assert!(table.contains("Canara"));
    }

    #[test]
    fn test_styled_cells_render_text() {
        let mut builder = TableBuilder::with_style(TableStyle::Listing);
        builder.styled_row(vec![
            cells::number(7),
            cells::status(&ItemStatus::Failed),
            cells::optional(None::<String>),
        ]);
        let table = builder.build();

        assert!(table.contains('7'));
        assert!(table.contains("failed"));
        assert!(table.contains('-'));
    }
}
