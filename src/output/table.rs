use unicode_width::UnicodeWidthStr;

use crate::models::*;
use crate::summary::{CourtStats, SessionStats, StudentStats};

/// Format a money amount with two decimals.
pub fn format_money(amount: f64) -> String {
    format!("${amount:.2}")
}

fn format_rating(rating: f64) -> String {
    if rating == 0.0 {
        "-".to_string()
    } else {
        format!("{rating:.1}")
    }
}

/// Truncate a string to fit within max_width (respecting unicode width).
fn truncate(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let cw = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if width + cw + 3 > max_width {
            result.push_str("...");
            break;
        }
        result.push(ch);
        width += cw;
    }
    result
}

/// Left-pad to a display width; `{:<N}` counts chars, not columns.
fn pad(s: &str, width: usize) -> String {
    let s = truncate(s, width);
    let w = UnicodeWidthStr::width(s.as_str());
    format!("{s}{}", " ".repeat(width.saturating_sub(w)))
}

fn or_dash(v: Option<&str>) -> &str {
    v.unwrap_or("-")
}

fn day(v: Option<&str>) -> &str {
    match v {
        Some(d) => d.get(..10).unwrap_or(d),
        None => "-",
    }
}

pub fn print_session_stats(stats: &SessionStats) {
    println!(
        "Sessions: {}  scheduled: {}  completed: {}  cancelled: {}  revenue: {}  rating: {}\n",
        stats.total,
        stats.scheduled,
        stats.completed,
        stats.cancelled,
        format_money(stats.revenue),
        format_rating(stats.average_rating),
    );
}

pub fn print_sessions(sessions: &[CoachingSession]) {
    if sessions.is_empty() {
        println!("No sessions match the current filters.");
        return;
    }

    println!(
        "  {} {} {} {} {} {}",
        pad("PLAYER", 24),
        pad("DATE", 12),
        pad("TIME", 6),
        pad("STATUS", 11),
        pad("LEVEL", 12),
        "PRICE"
    );
    println!("  {}", "-".repeat(76));

    for s in sessions {
        println!(
            "  {} {} {} {} {} {}",
            pad(or_dash(s.player.as_deref()), 24),
            pad(day(s.date.as_deref()), 12),
            pad(or_dash(s.start_time.as_deref()), 6),
            pad(or_dash(s.status.as_deref()), 11),
            pad(or_dash(s.level.as_deref()), 12),
            s.price.map(format_money).unwrap_or_else(|| "-".to_string()),
        );
    }
}

pub fn print_student_stats(stats: &StudentStats) {
    println!(
        "Students: {}  active: {}  inactive: {}  rating: {}\n",
        stats.total,
        stats.active,
        stats.inactive,
        format_rating(stats.average_rating),
    );
}

pub fn print_students(students: &[Student]) {
    if students.is_empty() {
        println!("No students match the current filters.");
        return;
    }

    println!(
        "  {} {} {} {}",
        pad("NAME", 26),
        pad("LEVEL", 14),
        pad("JOINED", 12),
        "EMAIL"
    );
    println!("  {}", "-".repeat(76));

    for s in students {
        println!(
            "  {} {} {} {}",
            pad(or_dash(s.name.as_deref()), 26),
            pad(or_dash(s.level.as_deref()), 14),
            pad(day(s.joined_at.as_deref()), 12),
            or_dash(s.email.as_deref()),
        );
    }
}

pub fn print_court_stats(stats: &CourtStats) {
    println!(
        "Courts: {}  available: {}  avg rate: {}/h\n",
        stats.total,
        stats.available,
        format_money(stats.average_hourly_rate),
    );
}

pub fn print_courts(courts: &[Court]) {
    if courts.is_empty() {
        println!("No courts match the current filters.");
        return;
    }

    println!(
        "  {} {} {} {} {}",
        pad("COURT", 22),
        pad("CLUB", 20),
        pad("SURFACE", 10),
        pad("STATUS", 12),
        "RATE"
    );
    println!("  {}", "-".repeat(76));

    for c in courts {
        println!(
            "  {} {} {} {} {}",
            pad(or_dash(c.name.as_deref()), 22),
            pad(or_dash(c.club.as_deref()), 20),
            pad(or_dash(c.surface.as_deref()), 10),
            pad(or_dash(c.status.as_deref()), 12),
            c.hourly_rate.map(format_money).unwrap_or_else(|| "-".to_string()),
        );
    }
}

pub fn print_coach_membership(m: &CoachMembership) {
    println!("Coach membership");
    println!("  Status:    {}", m.status.as_str());
    println!("  Plan:      {}", or_dash(m.plan.as_deref()));
    if let Some(price) = m.price {
        let currency = m.currency.as_deref().unwrap_or("").to_uppercase();
        println!("  Price:     {} {}", format_money(price), currency);
    }
    println!("  Renews:    {}", day(m.current_period_end.as_deref()));
    println!("  Auto-renew: {}", if m.auto_renew { "yes" } else { "no" });
    if let Some(ref pm) = m.payment_method {
        println!(
            "  Card:      {} **** {} ({:02}/{})",
            or_dash(pm.brand.as_deref()),
            or_dash(pm.last4.as_deref()),
            pm.exp_month.unwrap_or(0),
            pm.exp_year.unwrap_or(0),
        );
    }
}

pub fn print_partner_membership(m: &PartnerMembership) {
    println!("Partner membership");
    println!("  Status:    {}", m.status.as_str());
    println!("  Plan:      {}", or_dash(m.plan.as_deref()));
    if let Some(price) = m.price {
        println!("  Price:     {}", format_money(price));
    }
    println!("  Renews:    {}", day(m.current_period_end.as_deref()));
    if !m.benefits.is_empty() {
        println!("  Benefits:");
        for b in &m.benefits {
            println!("    - {b}");
        }
    }
}

pub fn print_dashboard(d: &Dashboard) {
    println!("{} ({})\n", d.name().unwrap_or("Dashboard"), d.role());
    match d {
        Dashboard::Player {
            ranking,
            points,
            upcoming_bookings,
            ..
        } => {
            println!("  Ranking:           {}", ranking.map(|r| format!("#{r}")).unwrap_or_else(|| "-".into()));
            println!("  Points:            {}", points.map(|p| format!("{p:.0}")).unwrap_or_else(|| "-".into()));
            println!("  Upcoming bookings: {upcoming_bookings}");
        }
        Dashboard::Coach {
            students,
            upcoming_sessions,
            rating,
            ..
        } => {
            println!("  Students:          {students}");
            println!("  Upcoming sessions: {upcoming_sessions}");
            println!("  Rating:            {}", format_rating(rating.unwrap_or(0.0)));
        }
        Dashboard::Club {
            courts,
            members,
            monthly_revenue,
            ..
        } => {
            println!("  Courts:            {courts}");
            println!("  Members:           {members}");
            println!("  Monthly revenue:   {}", format_money(monthly_revenue.unwrap_or(0.0)));
        }
        Dashboard::Partner {
            plan,
            active_promotions,
            ..
        } => {
            println!("  Plan:              {}", or_dash(plan.as_deref()));
            println!("  Active promotions: {active_promotions}");
        }
        Dashboard::StateCommittee {
            state, clubs, players, ..
        } => {
            println!("  State:             {}", or_dash(state.as_deref()));
            println!("  Clubs:             {clubs}");
            println!("  Players:           {players}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_counts_columns() {
        assert_eq!(pad("Ana García", 12), "Ana García  ");
        assert_eq!(pad("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn day_prefix() {
        assert_eq!(day(Some("2024-06-01T10:00:00Z")), "2024-06-01");
        assert_eq!(day(Some("n/a")), "n/a");
        assert_eq!(day(None), "-");
    }
}
