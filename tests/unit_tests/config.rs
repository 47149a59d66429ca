use fenris_functions::config::Configuration;
use fenris_functions::FunctionError;

#[test]
fn typed_access() {
    let config = Configuration::new()
        .with("cells", 4)
        .with("scale", "2.5")
        .with("corner", "[0.0 1.0]");
    assert_eq!(config.get::<usize>("cells").unwrap(), 4);
    assert_eq!(config.get::<f64>("scale").unwrap(), 2.5);
    assert_eq!(config.get_raw("scale"), Some("2.5"));
    assert_eq!(config.get_list::<f64>("corner").unwrap(), vec![0.0, 1.0]);
    assert_eq!(config.get_list_of_len::<f64>("corner", 2).unwrap(), vec![0.0, 1.0]);

    let err = config.get_list_of_len::<f64>("corner", 3).unwrap_err();
    assert!(matches!(err, FunctionError::InvalidConfiguration { ref key, .. } if key == "corner"));
    assert!(config.get_list::<usize>("corner").is_err());
}

#[test]
fn a_single_value_is_a_list_of_one() {
    let config = Configuration::new().with("value", "3");
    assert_eq!(config.get_list::<i32>("value").unwrap(), vec![3]);
}

#[test]
fn merged_entries_of_other_take_precedence() {
    let defaults = Configuration::new().with("value", 1).with("name", "constant");
    let user = Configuration::new().with("value", 5);
    let merged = defaults.merged(&user);
    assert_eq!(merged.get::<i32>("value").unwrap(), 5);
    assert_eq!(merged.get::<String>("name").unwrap(), "constant");
    assert_eq!(merged.keys().collect::<Vec<_>>(), vec!["name", "value"]);
}

#[test]
fn display_lists_entries_in_key_order() {
    let config: Configuration = [("b", "2"), ("a", "1")].into_iter().collect();
    assert_eq!(config.to_string(), "a = 1\nb = 2\n");
    assert!(Configuration::new().is_empty());
    assert!(config.has_key("a"));
}

#[test]
fn configurations_round_trip_through_json() {
    let config = Configuration::new().with("num_elements", "[2 2]").with("name", "board");
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(json, r#"{"name":"board","num_elements":"[2 2]"}"#);
    let parsed: Configuration = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);
}
