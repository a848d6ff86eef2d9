use chrono::{DateTime, Local, TimeZone};

fn local(millis: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(millis).single()
}

/// `HH:MM:SS` in local time, or `--:--:--` for an out-of-range timestamp
pub fn format_time(millis: i64) -> String {
    local(millis).map_or_else(|| "--:--:--".to_string(), |t| t.format("%H:%M:%S").to_string())
}

/// `YYYY-MM-DD HH:MM` in local time
pub fn format_datetime(millis: i64) -> String {
    local(millis).map_or_else(
        || "----------".to_string(),
        |t| t.format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Default file name for an export made today
pub fn export_file_name() -> String {
    format!("stacktree-export-{}.json", Local::now().format("%Y-%m-%d"))
}
