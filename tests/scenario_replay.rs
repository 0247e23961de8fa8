mod common;

use common::{temp_file, GUARDED_SCENARIO};
use navsync::config::{Config, SerializerKind};
use navsync::router::RouterEvent;
use navsync::scenario::{run_scenario, Scenario, ScenarioError, Step};
use serde_json::json;

fn action_types(actions: &[serde_json::Value]) -> Vec<&str> {
    actions
        .iter()
        .filter_map(|action| action["type"].as_str())
        .collect()
}

#[test]
fn test_guarded_scenario_replay() {
    let (_dir, path) = temp_file("guarded.toml", GUARDED_SCENARIO);
    let scenario = Scenario::load(&path).unwrap();

    let report = run_scenario(&scenario, &Config::default()).unwrap();

    assert_eq!(report.scenario, "guarded");
    assert_eq!(
        action_types(&report.actions),
        vec!["ROUTER_NAVIGATION", "ROUTER_CANCEL", "ROUTE_ERROR"]
    );
    let ids: Vec<_> = report
        .actions
        .iter()
        .map(|action| action["payload"]["event"]["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(1), json!(2), json!(3)]);
    assert_eq!(report.final_url, "/a");
    assert_eq!(report.final_state["router"]["navigationId"], 3);
    assert!(matches!(
        report.events.last(),
        Some(RouterEvent::NavigationError(_))
    ));
}

#[test]
fn test_custom_state_key() {
    let scenario = Scenario::from_toml_str(GUARDED_SCENARIO).unwrap();
    let mut config = Config::default();
    config.router_store.state_key = "nav".to_string();
    config.router_store.serializer = SerializerKind::Minimal;

    let report = run_scenario(&scenario, &config).unwrap();

    assert!(report.final_state.get("router").is_none());
    assert_eq!(report.final_state["nav"]["navigationId"], 3);
}

#[test]
fn test_initial_state_restores_route() {
    let scenario = Scenario::from_toml_str(
        r#"
name = "restore on boot"

[[routes]]
path = "/inbox"

[[routes]]
path = "/settings"

[initial_state.router]
navigationId = 12
state = { url = "/settings" }

[initial_state.session]
user = "ada"
"#,
    )
    .unwrap();

    let report = run_scenario(&scenario, &Config::default()).unwrap();

    assert_eq!(report.final_url, "/settings");
    assert!(report.actions.is_empty());
    assert_eq!(report.final_state["session"]["user"], "ada");
}

#[test]
fn test_host_router_action_drives_navigation() {
    let scenario = Scenario {
        name: "devtools".to_string(),
        routes: vec![
            navsync::router::Route::new("/a"),
            navsync::router::Route::new("/b"),
        ],
        initial_state: None,
        steps: vec![
            Step::Navigate {
                url: "/a".to_string(),
            },
            Step::Dispatch {
                action: json!({
                    "type": "ROUTER_NAVIGATION",
                    "payload": {
                        "routerState": { "url": "/b" },
                        "event": { "id": 9, "url": "/b", "urlAfterRedirects": "/b", "state": { "url": "/b" } }
                    }
                }),
            },
        ],
    };

    let report = run_scenario(&scenario, &Config::default()).unwrap();

    assert_eq!(report.final_url, "/b");
    // One from the router, one from the host; the follow-up navigation is silent.
    assert_eq!(report.actions.len(), 2);
    assert_eq!(report.final_state["router"]["navigationId"], 9);
}

#[test]
fn test_invalid_route_table_is_reported() {
    let scenario = Scenario::from_toml_str("[[routes]]\npath = \"/**/x\"\n").unwrap();

    let err = run_scenario(&scenario, &Config::default()).unwrap_err();
    assert!(matches!(err, ScenarioError::Routes(_)));
}

#[test]
fn test_missing_scenario_file() {
    let err = Scenario::load(std::path::Path::new("/nonexistent/scenario.toml")).unwrap_err();
    assert!(matches!(err, ScenarioError::Read { .. }));
}
