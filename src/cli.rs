use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for task-timeline
#[derive(Parser)]
#[command(name = "task-timeline")]
#[command(about = "Build a day-by-day timeline from task dates")]
#[command(version)]
pub struct Cli {
    /// JSON file with an array of tasks ("-" reads stdin)
    #[arg(long, default_value = "-")]
    pub input: PathBuf,

    /// Output format: json, md, html
    #[arg(long, default_value = "json", value_parser = ["json", "md", "html"])]
    pub format: String,

    /// Output file path (stdout if not specified)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Day treated as today (YYYY-MM-DD format)
    #[arg(long, value_parser = validate_date)]
    pub date: Option<String>,

    /// Timezone for day boundaries (IANA timezone, e.g., "Europe/Moscow")
    #[arg(long)]
    pub tz: Option<String>,

    /// Show completed and abandoned tasks (overrides config)
    #[arg(long, action = clap::ArgAction::Set)]
    pub show_completed: Option<bool>,

    /// Pipe-separated abandoned status markers, e.g. "-|_|>" (overrides config)
    #[arg(long, allow_hyphen_values = true)]
    pub abandoned: Option<String>,
}

/// Validate date format (YYYY-MM-DD)
fn validate_date(s: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|_| s.to_string())
        .map_err(|e| format!("Invalid date '{s}': {e}. Use YYYY-MM-DD format"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2025-01-15").is_ok());
        assert!(validate_date("15.01.2025").is_err());
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "task-timeline",
            "--input",
            "tasks.json",
            "--format",
            "md",
            "--show-completed",
            "false",
            "--abandoned",
            "-|_|>",
        ])
        .unwrap();
        assert_eq!(cli.format, "md");
        assert_eq!(cli.show_completed, Some(false));
        assert_eq!(cli.abandoned.as_deref(), Some("-|_|>"));
        assert!(cli.tz.is_none());
    }

    #[test]
    fn test_abandoned_accepts_leading_hyphen() {
        let cli = Cli::try_parse_from(["task-timeline", "--abandoned", "-", "--tz", "UTC"]).unwrap();
        assert_eq!(cli.abandoned.as_deref(), Some("-"));
        assert_eq!(cli.tz.as_deref(), Some("UTC"));
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["task-timeline", "--format", "pdf"]).is_err());
    }
}
