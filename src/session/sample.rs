//! Demo data for `--sample` mode.

use chrono::{DateTime, Duration, Utc};

use crate::domain::channel::Channel;
use crate::domain::email::Email;

pub const PRESELECTED_EMAILS: [&str; 3] = ["1", "2", "3"];
pub const PRESELECTED_CHANNEL: &str = "C001";

const EMAILS: [(&str, &str, &str, &str, &str, i64); 10] = [
    (
        "Sarah Chen",
        "sarah.chen@company.com",
        "Project Deadline Update - Urgent Action Required",
        "The Q4 roadmap deadline has been moved up to Friday. Need your approval on the final design mockups by EOD tomorrow...",
        "1",
        2,
    ),
    (
        "Michael Torres",
        "michael.torres@client.com",
        "Client Meeting Reschedule Request",
        "Client requested to move Thursday's presentation to Wednesday 2 PM. Please confirm your availability as soon as possible...",
        "2",
        5,
    ),
    (
        "IT Department",
        "security@company.com",
        "Security Alert - Immediate Action Required",
        "Unusual login activity detected on your account from an unknown location. Please review and update your password immediately...",
        "3",
        1,
    ),
    (
        "Amanda Rodriguez",
        "amanda.r@company.com",
        "Weekly Team Sync Notes - January 15",
        "Here are the key takeaways from today's team sync: Product roadmap updates, sprint planning for next quarter, new hiring updates...",
        "4",
        24,
    ),
    (
        "Finance Team",
        "finance@company.com",
        "Q1 Budget Approval Request",
        "Please review and approve the Q1 budget allocation for your department. Deadline for approval is end of this week...",
        "5",
        36,
    ),
    (
        "Product Team",
        "product@company.com",
        "New Feature Requests from Customer Feedback",
        "We've compiled the top feature requests from our Q4 customer surveys. Would love to get your technical input on feasibility...",
        "6",
        48,
    ),
    (
        "Conference Team",
        "events@techconf.com",
        "TechConf 2026 - Speaker Invitation",
        "We would be honored to have you speak at TechConf 2026 in San Francisco. The event is scheduled for March 15-17...",
        "7",
        72,
    ),
    (
        "Code Review Bot",
        "bot@github.com",
        "Code Review Required - PR #234",
        "Your review is requested on Pull Request #234: \"Implement new authentication flow\". Changes include updates to login system...",
        "8",
        8,
    ),
    (
        "Engineering Leadership",
        "engineering@company.com",
        "Monthly Engineering Newsletter - January 2026",
        "Welcome to the January edition of our monthly newsletter! This month: new tech stack decisions, team growth updates, upcoming hackathon...",
        "9",
        96,
    ),
    (
        "HR Training",
        "training@company.com",
        "Upcoming Training: New Development Tools Workshop",
        "Join us for a hands-on workshop covering our new development tools and workflow. Session scheduled for next Tuesday at 2 PM...",
        "10",
        120,
    ),
];

const CHANNELS: [(&str, &str, u64, bool); 8] = [
    ("C001", "general", 245, false),
    ("C002", "engineering", 48, false),
    ("C003", "product-updates", 89, false),
    ("C004", "random", 156, false),
    ("C005", "design", 22, false),
    ("C006", "support-team", 15, false),
    ("C007", "leadership", 12, true),
    ("C008", "marketing", 34, false),
];

/// Sample inbox dated relative to `now`.
pub fn emails(now: DateTime<Utc>) -> Vec<Email> {
    EMAILS
        .iter()
        .map(|&(name, addr, subject, snippet, id, hours_ago)| {
            let at = now - Duration::hours(hours_ago);
            Email {
                id: id.to_string(),
                sender_name: name.to_string(),
                sender_email: addr.to_string(),
                subject: subject.to_string(),
                snippet: snippet.to_string(),
                date: at.to_rfc3339(),
                timestamp: Some(at.timestamp_millis()),
            }
        })
        .collect()
}

pub fn channels() -> Vec<Channel> {
    CHANNELS
        .iter()
        .map(|&(id, name, members, private)| Channel {
            id: id.to_string(),
            name: name.to_string(),
            member_count: Some(members),
            is_private: Some(private),
        })
        .collect()
}
