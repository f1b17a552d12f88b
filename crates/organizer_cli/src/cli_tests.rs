use super::*;
use clap::Parser;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["github-organizer"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).expect("arguments should parse")
}

#[test]
fn test_settings_repository_is_optional() {
    assert_eq!(
        parse(&["settings", "my-org"]).command,
        Commands::Settings {
            org: "my-org".to_string(),
            repo: None
        }
    );
    assert_eq!(
        parse(&["settings", "my-org", "api"]).command,
        Commands::Settings {
            org: "my-org".to_string(),
            repo: Some("api".to_string())
        }
    );
}

#[test]
fn test_issue_number_is_parsed() {
    assert_eq!(
        parse(&["assign-issue", "my-org", "api", "42"]).command,
        Commands::AssignIssue {
            org: "my-org".to_string(),
            repo: "api".to_string(),
            issue: 42
        }
    );
}

#[test]
fn test_invalid_issue_number_is_rejected() {
    let result = Cli::try_parse_from(["github-organizer", "label-issue", "my-org", "api", "abc"]);

    assert!(result.is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = parse(&["update-repos", "my-org", "--dry-run", "--config", "org.toml"]);

    assert!(cli.dry_run);
    assert!(!cli.json_logs);
    assert_eq!(cli.config.as_deref(), Some("org.toml"));
    assert_eq!(
        cli.command,
        Commands::UpdateRepos {
            org: "my-org".to_string()
        }
    );
}

#[test]
fn test_credentials_from_arguments() {
    let cli = parse(&["--app-id", "12", "--private-key-path", "app.pem", "app-info"]);

    assert_eq!(cli.credentials.app_id, Some(12));
    assert_eq!(
        cli.credentials.private_key_path,
        Some(PathBuf::from("app.pem"))
    );
    assert_eq!(cli.command, Commands::AppInfo);
}

#[test]
fn test_missing_positional_is_rejected() {
    let result = Cli::try_parse_from(["github-organizer", "get-org-project-column", "my-org", "Roadmap"]);

    assert!(result.is_err());
}

#[test]
fn test_command_organization() {
    assert_eq!(
        parse(&["update-team-membership", "my-org", "core"])
            .command
            .organization(),
        Some("my-org")
    );
    assert_eq!(Commands::AppInfo.organization(), None);
    assert_eq!(Commands::Version.organization(), None);
}
