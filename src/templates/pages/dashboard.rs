use crate::domain::analytics::{
    HistogramBin, ListingFilter, LocationPriceStats, LocationTypeCounts, Summary,
};
use crate::templates::components::{bar_percent, bar_rows, card, stat_card};
use crate::templates::desktop_layout;
use chrono::{DateTime, Utc};
use maud::{html, Markup};

pub struct DashboardVm {
    pub filter: ListingFilter,
    pub locations: Vec<String>,
    pub property_types: Vec<String>,
    pub summary: Summary,
    pub histogram: Vec<HistogramBin>,
    pub type_distribution: Vec<(String, usize)>,
    pub price_by_location: Vec<LocationPriceStats>,
    pub types_by_location: Vec<LocationTypeCounts>,
    pub refreshed_at: Option<DateTime<Utc>>,
    pub export_href: String,
}

pub fn dashboard_page(vm: &DashboardVm) -> Markup {
    desktop_layout(
        "Tunisie Annonce Dashboard",
        html! {
            main class="container" {
                (filters_form(vm))
                (summary_cards(&vm.summary))

                (card(&format!("Price Distribution ({} listings)", vm.summary.total), histogram(&vm.histogram)))

                (card(
                    &format!(
                        "Property Types ({} most common)",
                        vm.summary.most_common_type.as_deref().unwrap_or("N/A")
                    ),
                    type_distribution(&vm.type_distribution),
                ))

                (card("Price Distribution by Location (Top 10)", price_by_location(&vm.price_by_location)))

                (card("Property Types by Location (Top 8)", types_by_location(&vm.types_by_location)))
            }
        },
    )
}

fn filters_form(vm: &DashboardVm) -> Markup {
    html! {
        div style="background-color: #ecf0f1; padding: 15px; border-radius: 5px; margin-bottom: 20px;" {
            form action="/" method="get" style="display: inline-flex; gap: 10px; align-items: center;" {
                label for="location" style="font-weight: bold;" { "Location:" }
                select name="location" id="location" {
                    option value="all" selected[vm.filter.location.is_none()] { "All Locations" }
                    @for loc in &vm.locations {
                        option value=(loc) selected[vm.filter.location.as_deref() == Some(loc.as_str())] { (loc) }
                    }
                }

                label for="property_type" style="font-weight: bold;" { "Property Type:" }
                select name="property_type" id="property_type" {
                    option value="all" selected[vm.filter.property_type.is_none()] { "All Types" }
                    @for t in &vm.property_types {
                        option value=(t) selected[vm.filter.property_type.as_deref() == Some(t.as_str())] { (t) }
                    }
                }

                button type="submit" { "Apply" }
            }

            form action="/refresh" method="post" style="display: inline; margin-left: 20px;" {
                button type="submit" style="background-color: #3498db; color: white; border: none; padding: 6px 12px;" { "Refresh Data" }
            }

            a href=(vm.export_href) style="margin-left: 20px;" { "Download .xlsx" }

            @if let Some(at) = vm.refreshed_at {
                p style="color: #7f8c8d; font-size: 0.85em; margin-bottom: 0;" {
                    "Last refreshed " (at.format("%Y-%m-%d %H:%M:%S UTC"))
                }
            }
        }
    }
}

fn summary_cards(summary: &Summary) -> Markup {
    let avg = summary
        .average_price
        .map(format_price)
        .unwrap_or_else(|| "N/A".to_string());

    html! {
        div style="margin-bottom: 20px;" {
            (stat_card("Total Listings", &summary.total.to_string()))
            (stat_card("Average Price", &avg))
            (stat_card("Most Common Type", summary.most_common_type.as_deref().unwrap_or("N/A")))
            (stat_card("Top Location", summary.top_location.as_deref().unwrap_or("N/A")))
        }
    }
}

fn histogram(bins: &[HistogramBin]) -> Markup {
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0);

    html! {
        @if bins.is_empty() {
            p { "No price data available" }
        } @else {
            div style="display: flex; align-items: flex-end; height: 160px; gap: 2px;" {
                @for bin in bins {
                    div
                        title=(format!("{} – {}: {}", format_price(bin.lower), format_price(bin.upper), bin.count))
                        style=(format!("flex: 1; background: #3498db; height: {}%;", bar_percent(bin.count, max)))
                    {}
                }
            }
            p style="font-size: 0.85em; color: #7f8c8d;" {
                (format_price(bins[0].lower)) " – " (format_price(bins[bins.len() - 1].upper))
            }
        }
    }
}

fn type_distribution(rows: &[(String, usize)]) -> Markup {
    let max = rows.first().map(|(_, c)| *c).unwrap_or(0);
    html! {
        @if rows.is_empty() {
            p { "No property type data available" }
        } @else {
            (bar_rows(rows, max))
        }
    }
}

fn price_by_location(stats: &[LocationPriceStats]) -> Markup {
    html! {
        @if stats.is_empty() {
            p { "No location data available" }
        } @else {
            table style="width: 100%; border-collapse: collapse;" {
                thead {
                    tr {
                        th style="padding: 8px; text-align: left; border-bottom: 2px solid #eee;" { "Location" }
                        th style="padding: 8px; text-align: right; border-bottom: 2px solid #eee;" { "Listings" }
                        th style="padding: 8px; text-align: right; border-bottom: 2px solid #eee;" { "Min" }
                        th style="padding: 8px; text-align: right; border-bottom: 2px solid #eee;" { "Q1" }
                        th style="padding: 8px; text-align: right; border-bottom: 2px solid #eee;" { "Median" }
                        th style="padding: 8px; text-align: right; border-bottom: 2px solid #eee;" { "Q3" }
                        th style="padding: 8px; text-align: right; border-bottom: 2px solid #eee;" { "Max" }
                    }
                }
                tbody {
                    @for s in stats {
                        tr {
                            td style="padding: 8px; border-bottom: 1px solid #f9f9f9;" { (s.location) }
                            td style="padding: 8px; text-align: right; border-bottom: 1px solid #f9f9f9;" { (s.count) }
                            td style="padding: 8px; text-align: right; border-bottom: 1px solid #f9f9f9;" { (format_price(s.min)) }
                            td style="padding: 8px; text-align: right; border-bottom: 1px solid #f9f9f9;" { (format_price(s.q1)) }
                            td style="padding: 8px; text-align: right; border-bottom: 1px solid #f9f9f9;" { (format_price(s.median)) }
                            td style="padding: 8px; text-align: right; border-bottom: 1px solid #f9f9f9;" { (format_price(s.q3)) }
                            td style="padding: 8px; text-align: right; border-bottom: 1px solid #f9f9f9;" { (format_price(s.max)) }
                        }
                    }
                }
            }
        }
    }
}

fn types_by_location(rows: &[LocationTypeCounts]) -> Markup {
    html! {
        @if rows.is_empty() {
            p { "No location/property type data available" }
        } @else {
            @for row in rows {
                h4 style="margin-bottom: 4px;" { (row.location) }
                (bar_rows(&row.counts, row.counts.first().map(|(_, c)| *c).unwrap_or(0)))
            }
        }
    }
}

/// `1234567.8` → `"1,234,568 DT"`.
pub fn format_price(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.abs().to_string();

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0 {
        format!("-{grouped} DT")
    } else {
        format!("{grouped} DT")
    }
}
