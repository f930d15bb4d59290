use time::{macros::format_description, OffsetDateTime};

use crate::models::{Environment, EnvironmentStatus};

/// Counts shown in the stats bar above the grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total: usize,
    pub working: usize,
    pub degraded: usize,
    pub down: usize,
}

impl DashboardStats {
    pub fn from_environments(environments: &[Environment]) -> Self {
        environments
            .iter()
            .fold(Self::default(), |mut stats, env| {
                stats.total += 1;
                match env.status {
                    EnvironmentStatus::Working => stats.working += 1,
                    EnvironmentStatus::Degraded => stats.degraded += 1,
                    EnvironmentStatus::Down => stats.down += 1,
                }
                stats
            })
    }
}

/// Everything a card displays for one environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    /// Name, falling back to the URL
    pub title: String,
    /// URL shown under the title when the card is titled by name
    pub subtitle: Option<String>,
    pub status: EnvironmentStatus,
    pub badge: &'static str,
    pub version: Option<String>,
    pub notes: Option<String>,
    /// Notes are highlighted as an issue unless the environment is working
    pub notes_flagged: bool,
    pub last_updated: String,
    pub updated_ago: String,
}

impl CardView {
    pub fn new(env: &Environment, now: OffsetDateTime) -> Self {
        let (title, subtitle) = match &env.name {
            Some(name) => (name.clone(), Some(env.url.clone())),
            None => (env.url.clone(), None),
        };

        Self {
            id: env.id.clone(),
            title,
            subtitle,
            status: env.status,
            badge: env.status.label(),
            version: env.version.clone(),
            notes: env.notes.clone(),
            notes_flagged: env.notes.is_some() && env.status != EnvironmentStatus::Working,
            last_updated: format_timestamp(env.last_updated),
            updated_ago: time_ago(env.last_updated, now),
        }
    }

    /// Plain-text rendition used by the terminal dashboard
    pub fn render(&self) -> String {
        let mut lines = vec![format!("[{}] {}", self.badge.to_uppercase(), self.title)];
        if let Some(url) = &self.subtitle {
            lines.push(format!("    URL:      {}", url));
        }
        if let Some(version) = &self.version {
            lines.push(format!("    Version:  {}", version));
        }
        if let Some(notes) = &self.notes {
            let marker = if self.notes_flagged { "!" } else { " " };
            lines.push(format!("  {} Notes:    {}", marker, notes));
        }
        lines.push(format!(
            "    Updated:  {} ({})",
            self.last_updated, self.updated_ago
        ));
        lines.push(format!("    Id:       {}", self.id));
        lines.join("\n")
    }
}

/// Short relative age: "Just now", "5m ago", "3h ago", "2d ago"
pub fn time_ago(then: OffsetDateTime, now: OffsetDateTime) -> String {
    let minutes = (now - then).whole_minutes();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes < 60 {
        format!("{}m ago", minutes)
    } else if minutes < 24 * 60 {
        format!("{}h ago", minutes / 60)
    } else {
        format!("{}d ago", minutes / (24 * 60))
    }
}

fn format_timestamp(ts: OffsetDateTime) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    ts.to_offset(time::UtcOffset::UTC)
        .format(format)
        .unwrap_or_else(|_| ts.to_string())
}
