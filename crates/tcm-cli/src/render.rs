//! Terminal tables for API payloads.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tcm_api::{CardDetail, CardSet, Pagination, Printing, SearchPage};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

pub fn printings_table(printings: &[Printing]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Set"),
        header_cell("No."),
        header_cell("Rarity"),
        header_cell("Printing"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for printing in printings {
        let set = match &printing.set_name {
            Some(name) => format!("{} ({})", name, printing.set_code.to_uppercase()),
            None => printing.set_code.to_uppercase(),
        };
        table.add_row(vec![
            Cell::new(&printing.name).add_attribute(Attribute::Bold),
            Cell::new(set),
            optional_cell(printing.collector_number.as_deref()),
            rarity_cell(printing.rarity.as_deref()),
            dim_cell(&printing.id),
        ]);
    }
    table
}

pub fn search_table(page: &SearchPage) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Name"),
        header_cell("Type"),
        header_cell("Cost"),
        header_cell("Printings"),
        header_cell("Oracle ID"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for card in &page.data {
        table.add_row(vec![
            Cell::new(&card.name).add_attribute(Attribute::Bold),
            optional_cell(card.type_line.as_deref()),
            optional_cell(card.mana_cost.as_deref()),
            card.printings_count
                .map_or_else(|| dim_cell("-"), Cell::new),
            dim_cell(&card.oracle_id),
        ]);
    }
    table
}

pub fn sets_table(sets: &[CardSet]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Name"),
        header_cell("Released"),
        header_cell("Cards"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for set in sets {
        table.add_row(vec![
            Cell::new(set.code.to_uppercase())
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            Cell::new(&set.name),
            optional_cell(set.release_date.as_deref()),
            set.card_count.map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    table
}

/// One-line pagination footer, e.g. `Page 2 of 5 (93 cards)`.
pub fn pagination_line(pagination: &Pagination) -> String {
    let mut line = format!(
        "Page {} of {} ({} cards)",
        pagination.current_page,
        pagination.total_pages.max(1),
        pagination.total
    );
    if pagination.has_next() {
        line.push_str(&format!(" - next: --page {}", pagination.current_page + 1));
    }
    line
}

/// Key/value lines describing a card.
pub fn card_lines(detail: &CardDetail) -> Vec<String> {
    let card = &detail.card;
    let mut lines = vec![card.name.clone()];
    if let Some(cost) = &card.mana_cost {
        lines.push(format!("Cost:      {cost}"));
    }
    if let Some(type_line) = &card.type_line {
        lines.push(format!("Type:      {type_line}"));
    }
    if let Some(text) = &detail.oracle_text {
        lines.push(String::new());
        lines.extend(text.lines().map(|line| format!("  {line}")));
        lines.push(String::new());
    }
    lines.push(format!("Oracle ID: {}", card.oracle_id));
    if let Some(printing) = &detail.printing {
        lines.push(format!(
            "Printing:  {} #{} ({})",
            printing.set_code.to_uppercase(),
            printing.collector_number.as_deref().unwrap_or("?"),
            printing.id
        ));
    }
    lines
}

/// Suffix shown when the backend answered from its cache.
pub fn cache_note(cached: bool) -> &'static str {
    if cached { " (cached)" } else { "" }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) if !value.is_empty() => Cell::new(value),
        _ => dim_cell("-"),
    }
}

fn rarity_cell(rarity: Option<&str>) -> Cell {
    let Some(rarity) = rarity else {
        return dim_cell("-");
    };
    let color = match rarity.to_ascii_lowercase().as_str() {
        "mythic" => Color::Red,
        "rare" => Color::Yellow,
        "uncommon" => Color::Grey,
        _ => Color::Reset,
    };
    Cell::new(rarity).fg(color)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
