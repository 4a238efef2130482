//! Aligned tables for terminal output, rendered with `tabled`.
//!
//! Cells arrive pre-formatted. Widths are display widths, so the block
//! glyphs of the speed meter line up like ASCII does.

use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Padding, Style, Width};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// A table with `N` columns.
#[derive(Debug, Clone)]
pub struct Table<const N: usize> {
    headers: [String; N],
    rows: Vec<[String; N]>,
    align: [Align; N],
    limits: [Option<usize>; N],
    styled_header: bool,
}

impl<const N: usize> Table<N> {
    pub fn new(headers: [&str; N]) -> Self {
        Self {
            headers: headers.map(str::to_owned),
            rows: Vec::new(),
            align: [Align::Left; N],
            limits: [None; N],
            styled_header: false,
        }
    }

    #[must_use]
    pub fn align(mut self, align: [Align; N]) -> Self {
        self.align = align;
        self
    }

    /// Same alignment for every column.
    #[must_use]
    pub fn align_all(mut self, align: Align) -> Self {
        self.align = [align; N];
        self
    }

    /// Cap the width of `column`; longer cells are cut.
    #[must_use]
    pub fn limit(mut self, column: usize, width: usize) -> Self {
        if let Some(slot) = self.limits.get_mut(column) {
            *slot = Some(width);
        }
        self
    }

    /// Render the header white on blue.
    #[must_use]
    pub fn header_style(mut self, color: bool) -> Self {
        self.styled_header = color;
        self
    }

    pub fn row(&mut self, cells: [String; N]) -> &mut Self {
        self.rows.push(cells);
        self
    }

    #[must_use]
    pub fn rows(mut self, rows: impl IntoIterator<Item = [String; N]>) -> Self {
        self.rows.extend(rows);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn build(&self) -> tabled::Table {
        let mut builder = Builder::default();
        builder.push_record(self.headers.clone());
        for row in &self.rows {
            builder.push_record(row.clone());
        }

        // One space on the outside, two between columns.
        let mut table = builder.build();
        table.with(Style::empty()).with(Padding::new(1, 1, 0, 0));
        for (column, &align) in self.align.iter().enumerate() {
            table.with(Modify::new(Columns::single(column)).with(alignment(align)));
        }
        for (column, limit) in self.limits.iter().enumerate() {
            if let Some(width) = *limit {
                table.with(Modify::new(Columns::single(column)).with(Width::truncate(width)));
            }
        }
        table
    }

    /// Lines of the rendered table, header first.
    pub fn lines(&self) -> Vec<String> {
        let rendered = self.build().to_string();
        rendered
            .lines()
            .enumerate()
            .map(|(i, line)| {
                if i == 0 && self.styled_header {
                    line.white().on_blue().to_string()
                } else {
                    line.to_owned()
                }
            })
            .collect()
    }

    pub fn render(&self) -> String {
        self.lines().join("\n")
    }
}

impl<const N: usize> std::fmt::Display for Table<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

fn alignment(align: Align) -> Alignment {
    match align {
        Align::Left => Alignment::left(),
        Align::Center => Alignment::center(),
        Align::Right => Alignment::right(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn widths_include_header() {
        let table = Table::new(["NAME", "ID"]).rows([
            ["a".to_owned(), "100".to_owned()],
            ["longer".to_owned(), "7".to_owned()],
        ]);
        assert_eq!(
            table.render(),
            " NAME    ID  \n a       100 \n longer  7   "
        );
    }

    #[test]
    fn right_and_center_alignment() {
        let table = Table::new(["ACTIVE", "N"])
            .align([Align::Center, Align::Right])
            .rows([["[x]".to_owned(), "5".to_owned()]]);
        let lines = table.lines();
        assert_eq!(lines[1], "  [x]    5 ");
    }

    #[test]
    fn align_all_broadcasts() {
        let table = Table::new(["A", "BB"])
            .align_all(Align::Right)
            .rows([["xyz".to_owned(), "1".to_owned()]]);
        assert_eq!(table.lines()[1], " xyz   1 ");
    }

    #[test]
    fn width_counts_display_columns() {
        let table = Table::new(["H"]).rows([["▂▃▅".to_owned()]]);
        assert_eq!(table.lines()[0], " H   ");
        assert_eq!(table.lines()[1], " ▂▃▅ ");
    }

    #[test]
    fn limit_truncates_long_cells() {
        let table = Table::new(["SSID"])
            .limit(0, 5)
            .rows([["a-very-long-network".to_owned()]]);
        assert_eq!(table.lines()[1], " a-ver ");
    }

    #[test]
    fn plain_header_without_color() {
        let table = Table::new(["X"]).header_style(false);
        assert_eq!(table.render(), " X ");
        assert!(table.is_empty());
    }

    #[test]
    fn colored_header_has_escape_codes() {
        let table = Table::new(["X"]).header_style(true);
        assert!(table.render().contains("\u{1b}["));
    }
}
