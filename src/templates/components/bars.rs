use maud::{html, Markup};

/// Horizontal bar chart rendered as a table; widths are relative to `max`.
pub fn bar_rows(rows: &[(String, usize)], max: usize) -> Markup {
    html! {
        table style="width: 100%; border-collapse: collapse;" {
            tbody {
                @for (label, count) in rows {
                    tr {
                        td style="padding: 4px 8px; white-space: nowrap; width: 30%;" { (label) }
                        td style="padding: 4px 8px;" {
                            div style=(format!("background: #3498db; height: 14px; width: {}%;", bar_percent(*count, max))) {}
                        }
                        td style="padding: 4px 8px; text-align: right; width: 10%;" { (count) }
                    }
                }
            }
        }
    }
}

pub fn bar_percent(count: usize, max: usize) -> usize {
    if max == 0 {
        0
    } else {
        (count * 100) / max
    }
}
