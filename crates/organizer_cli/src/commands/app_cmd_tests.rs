use super::*;
use github_client::models::Account;

fn installation(id: u64, login: &str) -> Installation {
    Installation {
        id,
        account: Account {
            id: id * 10,
            login: login.to_string(),
            account_type: "Organization".to_string(),
        },
        repository_selection: Some("all".to_string()),
    }
}

#[test]
fn test_find_installation_ignores_case() {
    let installations = vec![installation(1, "Other"), installation(2, "My-Org")];

    assert_eq!(
        find_installation(&installations, "my-org").map(|i| i.id),
        Some(2)
    );
}

#[test]
fn test_find_installation_missing() {
    assert!(find_installation(&[installation(1, "other")], "my-org").is_none());
}

#[test]
fn test_installation_renders_as_json() {
    let output = to_json(&installation(2, "my-org")).unwrap();

    assert!(output.contains("\"login\": \"my-org\""));
    assert!(output.contains("\"type\": \"Organization\""));
}
