use chrono::{DateTime, Local, Utc};

/// "5m ago", "3h ago", "2d ago", or a calendar date for anything older
/// than a week. Dates that don't parse are returned as given.
pub fn format_relative_time(date: &str, now: DateTime<Utc>) -> String {
    let Ok(parsed) = DateTime::parse_from_rfc3339(date) else {
        return date.to_string();
    };
    let parsed = parsed.with_timezone(&Utc);

    let diff = now.signed_duration_since(parsed);
    let mins = diff.num_minutes();
    let hours = diff.num_hours();
    let days = diff.num_days();

    if mins < 60 {
        format!("{mins}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        parsed.with_timezone(&Local).format("%Y-%m-%d").to_string()
    }
}

/// Local wall-clock rendering of an RFC 3339 timestamp, "Just now" if absent.
pub fn format_timestamp(ts: Option<&str>) -> String {
    match ts.map(DateTime::parse_from_rfc3339) {
        Some(Ok(t)) => t
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        Some(Err(_)) => ts.unwrap_or_default().to_string(),
        None => "Just now".to_string(),
    }
}
