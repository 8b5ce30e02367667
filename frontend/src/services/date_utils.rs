use shared::MonthKey;

/// Get current date in YYYY-MM-DD format from the browser clock.
pub fn current_date() -> String {
    use js_sys::Date;
    let now = Date::new_0();
    let year = now.get_full_year();
    let month = now.get_month() + 1; // JavaScript months are 0-indexed
    let day = now.get_date();

    format!("{:04}-{:02}-{:02}", year as u32, month as u32, day as u32)
}

/// Display label for a ledger month (e.g., "February 2026").
pub fn month_label(key: &MonthKey) -> String {
    format!("{} {}", month_name(key.month), key.year)
}

/// Format a YYYY-MM-DD date string for list rows (e.g., "February 18").
pub fn format_expense_date(date_str: &str) -> String {
    let parts: Vec<&str> = date_str.split('-').collect();
    if parts.len() == 3 {
        if let (Ok(month), Ok(day)) = (parts[1].parse::<u32>(), parts[2].parse::<u32>()) {
            if (1..=12).contains(&month) {
                return format!("{} {}", month_name(month), day);
            }
        }
    }
    date_str.to_string()
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January", 2 => "February", 3 => "March", 4 => "April",
        5 => "May", 6 => "June", 7 => "July", 8 => "August",
        9 => "September", 10 => "October", 11 => "November", 12 => "December",
        _ => "January",
    }
}
