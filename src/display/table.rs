use crate::api::models::{Pagination, Workbook};
use crate::storage::config::Profile;
use crate::utils::text::truncate_text;
use crate::viz::table::{DataTable, label};
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets};
use crossterm::terminal;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Formatter for terminal tables
pub struct TableDisplay {
    max_width: Option<usize>,
    use_colors: bool,
}

impl Default for TableDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl TableDisplay {
    pub fn new() -> Self {
        Self {
            max_width: Self::detect_terminal_width(),
            use_colors: true,
        }
    }

    /// Terminal width clamped to 40..=200, 80 when unknown
    fn detect_terminal_width() -> Option<usize> {
        match terminal::size() {
            Ok((cols, _rows)) => Some((cols as usize).clamp(40, 200)),
            Err(_) => Some(80),
        }
    }

    pub fn with_max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn new_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_content_arrangement(ContentArrangement::Dynamic);
        if let Some(width) = self.max_width {
            table.set_width(u16::try_from(width).unwrap_or(u16::MAX));
        }
        table
    }

    fn header(&self, names: &[&str]) -> Vec<Cell> {
        names
            .iter()
            .map(|name| {
                let cell = Cell::new(name).add_attribute(Attribute::Bold);
                if self.use_colors {
                    cell.fg(Color::Cyan)
                } else {
                    cell
                }
            })
            .collect()
    }

    fn muted(&self, text: impl ToString) -> Cell {
        let cell = Cell::new(text.to_string());
        if self.use_colors {
            cell.fg(Color::DarkGrey)
        } else {
            cell
        }
    }

    /// Name and description widths from the available width
    fn column_widths(&self) -> (usize, usize) {
        let width = self.max_width.unwrap_or(80);
        // id, project, tags and borders take roughly half
        let name = (width / 4).max(16);
        let description = (width / 5).max(12);
        (name, description)
    }

    pub fn render_workbook_list(&self, workbooks: &[Workbook]) -> String {
        if workbooks.is_empty() {
            return "No workbooks found.".to_string();
        }

        let (name_width, desc_width) = self.column_widths();
        let mut table = self.new_table();
        table.set_header(self.header(&["ID", "Name", "Project", "Tags", "Views", "Description"]));

        for workbook in workbooks {
            let project = workbook
                .project
                .as_ref()
                .and_then(|p| p.name.as_deref())
                .unwrap_or("N/A");
            let description = workbook.description.as_deref().unwrap_or("N/A");

            table.add_row(vec![
                Cell::new(&workbook.id),
                Cell::new(truncate_text(&workbook.name, name_width)),
                Cell::new(truncate_text(project, desc_width)),
                Cell::new(workbook.tags.join(", ")),
                Cell::new(workbook.views.len()),
                self.muted(truncate_text(description, desc_width)),
            ]);
        }

        table.to_string()
    }

    pub fn render_workbook_detail(&self, workbook: &Workbook) -> String {
        let mut table = self.new_table();
        table.set_header(self.header(&["Field", "Value"]));

        let or_na = |value: Option<&str>| value.unwrap_or("N/A").to_string();
        let rows: Vec<(&str, String)> = vec![
            ("ID", workbook.id.clone()),
            ("Name", workbook.name.clone()),
            ("Description", or_na(workbook.description.as_deref())),
            (
                "Project",
                or_na(workbook.project.as_ref().and_then(|p| p.name.as_deref())),
            ),
            (
                "Owner",
                or_na(workbook.owner.as_ref().and_then(|o| o.name.as_deref())),
            ),
            ("Content URL", or_na(workbook.content_url.as_deref())),
            ("Web page", or_na(workbook.web_page_url.as_deref())),
            (
                "Created",
                workbook
                    .created_at
                    .map(|t| t.format(DATE_FORMAT).to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            (
                "Updated",
                workbook
                    .updated_at
                    .map(|t| t.format(DATE_FORMAT).to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            ),
            ("Tags", workbook.tags.join(", ")),
        ];
        for (field, value) in rows {
            table.add_row(vec![Cell::new(field).add_attribute(Attribute::Bold), Cell::new(value)]);
        }

        let mut output = table.to_string();
        if !workbook.views.is_empty() {
            let mut views = self.new_table();
            views.set_header(self.header(&["View ID", "View"]));
            for view in &workbook.views {
                views.add_row(vec![Cell::new(&view.id), Cell::new(&view.name)]);
            }
            output.push('\n');
            output.push_str(&views.to_string());
        }
        output
    }

    /// One-line pagination summary, e.g. `Page 2 (size 100) of 250 workbooks`
    pub fn render_pagination(&self, pagination: &Pagination) -> Option<String> {
        let total = pagination.total_available?;
        Some(format!(
            "Page {} (size {}) of {} workbooks",
            pagination.page_number.unwrap_or(1),
            pagination
                .page_size
                .map(|s| s.to_string())
                .unwrap_or_else(|| "?".to_string()),
            total
        ))
    }

    /// Render a data table, showing at most `limit` rows
    pub fn render_data_table(&self, data: &DataTable, limit: Option<usize>) -> String {
        if data.is_empty() {
            return "View returned no rows.".to_string();
        }

        let names: Vec<&str> = data.column_names().collect();
        let columns: Vec<_> = names.iter().filter_map(|n| data.column(n).ok()).collect();

        let mut table = self.new_table();
        table.set_header(self.header(&names));

        let shown = limit.unwrap_or(data.len()).min(data.len());
        for row in 0..shown {
            table.add_row(columns.iter().map(|column| {
                let value = &column[row];
                if value.is_null() {
                    self.muted("null").add_attribute(Attribute::Italic)
                } else {
                    Cell::new(label(value))
                }
            }));
        }

        let mut output = table.to_string();
        if shown != data.len() {
            output.push_str(&format!("\nShowing {} of {} rows", shown, data.len()));
        }
        output
    }

    pub fn render_profiles(&self, profiles: &[(&String, &Profile)], default: Option<&str>) -> String {
        if profiles.is_empty() {
            return "No profiles configured. Run 'bleau config set --profile <name> --server <url>'."
                .to_string();
        }

        let mut table = self.new_table();
        table.set_header(self.header(&["Profile", "Server", "Token name", "Site", "API version"]));
        for (name, profile) in profiles {
            let marker = if Some(name.as_str()) == default {
                format!("{} *", name)
            } else {
                name.to_string()
            };
            table.add_row(vec![
                Cell::new(marker),
                Cell::new(&profile.server_url),
                Cell::new(profile.token_name.as_deref().unwrap_or("N/A")),
                Cell::new(profile.site_id.as_deref().unwrap_or("(default)")),
                Cell::new(profile.api_version.as_deref().unwrap_or("(default)")),
            ]);
        }
        table.to_string()
    }
}
