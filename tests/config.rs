use notes_dom::{config::Selectors, Config};

#[test]
fn empty_object_is_the_default() {
	assert_eq!(Config::from_json("{}").unwrap(), Config::default());
}

#[test]
fn defaults_match_the_stock_page() {
	let config = Config::default();
	assert_eq!(config.storage_key, "notes");
	assert_eq!(config.confirm_timeout_ms, 3000);
	assert_eq!(config.delete_fade_ms, 300);
	assert_eq!(config.selectors.form, "#noteForm");
	assert_eq!(config.selectors.delete_button, ".delete-btn");
	assert_eq!(config.labels.clear_all, "Clear All");
	assert_eq!(config.labels.confirm, "Are you sure?");
	assert_eq!(config.advice.url, "https://api.adviceslip.com/advice");
	assert!((config.reveal.threshold - 0.1).abs() < f64::EPSILON);
	assert_eq!(config.modal.open, "[data-modal-open]");
	assert_eq!(config.modal.class, "active");
}

#[test]
fn partial_overrides() {
	let config = Config::from_json(r##"{"storageKey": "mine", "confirmTimeoutMs": 5000, "selectors": {"list": "#other", "status": null}}"##).unwrap();
	assert_eq!(config.storage_key, "mine");
	assert_eq!(config.confirm_timeout_ms, 5000);
	assert_eq!(config.selectors.list, "#other");
	assert_eq!(config.selectors.status, None);
	assert_eq!(config.selectors.form, Selectors::default().form);
}

#[test]
fn unknown_keys_are_rejected() {
	assert!(Config::from_json(r#"{"storagekey": "typo"}"#).is_err());
	assert!(Config::from_json("[]").is_err());
}

#[test]
fn sections_must_be_objects() {
	assert!(Config::from_json(r#"{"selectors": []}"#).is_err());
	assert!(Config::from_json(r#"{"reveal": ["x", "y"]}"#).is_err());
	assert!(Config::from_json("null").is_err());
	assert!(Config::from_json(r#""notes""#).is_err());
}
