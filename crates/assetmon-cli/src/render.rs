//! Plain-text rendering for terminal output.

use assetmon_core::{AssetConfiguration, AssetRecord, ConfigurationList};
use assetmon_dashboard::{DashboardSnapshot, FleetSummary, PanelDisplay, PowerChart};
use assetmon_live::ChannelState;
use assetmon_table::{DerivedView, ViewState};
use std::fmt::Write;

const COLUMNS: [&str; 6] = ["ID", "NAME", "TYPE", "LOCATION", "STATUS", "LAST UPDATED"];

/// Asset table with filter tabs and the "Showing x-y of n" caption.
pub fn render_table(view: &DerivedView, state: &ViewState) -> String {
    let mut out = String::new();

    let tabs: Vec<String> = view
        .status_options
        .iter()
        .map(|option| {
            if option == state.status_filter() {
                format!("[{option}]")
            } else {
                option.to_string()
            }
        })
        .collect();
    let _ = writeln!(out, "Status: {}", tabs.join(" "));
    let _ = writeln!(
        out,
        "Sort: {} {}{}",
        state.sort_key(),
        state.sort_direction(),
        if state.query().trim().is_empty() {
            String::new()
        } else {
            format!("  Search: \"{}\"", state.query().trim())
        }
    );

    if view.is_empty() {
        let _ = writeln!(out, "No assets found");
        return out;
    }

    let rows: Vec<[&str; 6]> = view.page.iter().map(row).collect();
    let mut widths = COLUMNS.map(|c| c.len());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let _ = writeln!(out, "{}", format_row(&COLUMNS, &widths));
    for cells in &rows {
        let _ = writeln!(out, "{}", format_row(cells, &widths));
    }

    match view.range() {
        Some((first, last, total)) => {
            let _ = writeln!(
                out,
                "Showing {first}-{last} of {total}  (page {}/{})",
                view.page_number, view.page_count
            );
        }
        None => {
            let _ = writeln!(out, "Page {} is empty ({} pages)", view.page_number, view.page_count);
        }
    }
    out
}

fn row(record: &AssetRecord) -> [&str; 6] {
    [
        record.id.as_str(),
        record.name.as_str(),
        record.asset_type.as_str(),
        record.location.as_str(),
        record.status.as_str(),
        record.last_updated.as_str(),
    ]
}

fn format_row(cells: &[&str; 6], widths: &[usize; 6]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

pub fn render_asset(record: &AssetRecord) -> String {
    format!(
        "{} ({})\n  type:         {}\n  location:     {}\n  status:       {}\n  last updated: {}\n",
        record.name, record.id, record.asset_type, record.location, record.status, record.last_updated
    )
}

pub fn render_telemetry(display: &PanelDisplay, channel: ChannelState) -> String {
    match display {
        PanelDisplay::Loading => "Loading telemetry...\n".to_string(),
        PanelDisplay::Failed(message) => format!("{message}\n"),
        PanelDisplay::Empty => "No telemetry data\n".to_string(),
        PanelDisplay::Ready { record, live } => {
            let source = if *live { "Live" } else { "Snapshot" };
            format!(
                "[{source}] {} at {}  temp {:.1} C  pressure {:.1} psi  vibration {:.2}  power {:.1} kW  status {}  (channel {channel})\n",
                record.asset_id,
                record.timestamp,
                record.temperature,
                record.pressure,
                record.vibration,
                record.power_consumption,
                record.status,
            )
        }
    }
}

pub fn render_power(chart: &PowerChart) -> String {
    let mut out = format!(
        "Power {} ({}): {} history / {} forecast points",
        chart.asset_name,
        chart.asset_id,
        chart.history_len(),
        chart.forecast_len()
    );
    if let Some(kw) = chart.latest_power_kw {
        let _ = write!(out, ", latest {kw:.1} kW");
    }
    if let Some(efficiency) = chart.mean_efficiency {
        let _ = write!(out, ", mean efficiency {efficiency:.1}%");
    }
    out.push('\n');
    out
}

pub fn render_summary(summary: &FleetSummary) -> String {
    let join = |counts: &[(String, usize)]| {
        counts
            .iter()
            .map(|(key, count)| format!("{key}={count}"))
            .collect::<Vec<_>>()
            .join(" ")
    };
    format!(
        "{} assets  by status: {}  by type: {}\n",
        summary.total,
        join(&summary.by_status),
        join(&summary.by_type)
    )
}

pub fn render_snapshot(snapshot: &DashboardSnapshot) -> String {
    let mut out = String::new();
    let taken = chrono::DateTime::from_timestamp_millis(snapshot.timestamp_ms)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_default();
    let _ = writeln!(out, "== Dashboard {taken} ==");
    if let Some(error) = &snapshot.assets_error {
        let _ = writeln!(out, "{error}");
    }
    out.push_str(&render_summary(&snapshot.summary));
    out.push_str(&render_table(&snapshot.view, &ViewState::new()));
    match (&snapshot.selected_id, &snapshot.power) {
        (Some(_), Some(chart)) => out.push_str(&render_power(chart)),
        (Some(id), None) => {
            let _ = writeln!(out, "Selected {id}: power history unavailable");
        }
        (None, _) => {}
    }
    out
}

/// Saved configuration, or the default template when none exists.
pub fn render_configuration(asset_id: &str, saved: Option<&AssetConfiguration>) -> String {
    match saved {
        Some(config) => pretty(config),
        None => {
            let template = AssetConfiguration::template_for(asset_id, "");
            format!(
                "No configuration saved for {asset_id}; defaults:\n{}",
                pretty(&template)
            )
        }
    }
}

pub fn render_configuration_list(list: &ConfigurationList) -> String {
    let mut out = format!("{} configuration(s)\n", list.count);
    for config in &list.configurations {
        let _ = writeln!(
            out,
            "  {}  {}  priority={:?}  maintenance={:?}  every {} days",
            config.asset_id,
            config.name,
            config.priority,
            config.maintenance_mode,
            config.maintenance_interval_days
        );
    }
    out
}

fn pretty(config: &AssetConfiguration) -> String {
    let mut json = serde_json::to_string_pretty(config).unwrap_or_default();
    json.push('\n');
    json
}
