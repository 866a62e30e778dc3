//! Grid table rendering.

/// Renders rows as a grid with a header separator:
///
/// ```text
/// +-----------+---------+
/// | Timestamp | CPU (%) |
/// +===========+=========+
/// | 18:00:05  | 15.2    |
/// +-----------+---------+
/// ```
///
/// Rows shorter than the header are padded with empty cells.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = border(&widths, '-');
    out.push_str(&table_row(&widths, headers.iter().copied()));
    out.push_str(&border(&widths, '='));
    for row in rows {
        out.push_str(&table_row(&widths, row.iter().map(String::as_str)));
        out.push_str(&border(&widths, '-'));
    }
    out
}

fn border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.extend(std::iter::repeat_n(fill, width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn table_row<'a>(widths: &[usize], mut cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for width in widths {
        let cell = cells.next().unwrap_or("");
        let pad = width.saturating_sub(cell.chars().count());
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(pad + 1));
        line.push('|');
    }
    line.push('\n');
    line
}
