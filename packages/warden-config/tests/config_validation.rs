use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use warden_config::Config;

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_toml<F>(mutate: F) -> String
where
	F: FnOnce(&mut toml::Table),
{
	let mut value: Value =
		toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.");
	let root = value.as_table_mut().expect("Template config must be a table.");

	mutate(root);

	toml::to_string(&value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("warden_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load(payload: String) -> warden_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = warden_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn table<'a>(root: &'a mut toml::Table, key: &str) -> &'a mut toml::Table {
	root.get_mut(key)
		.and_then(Value::as_table_mut)
		.unwrap_or_else(|| panic!("Template config must include [{key}]."))
}

#[test]
fn template_config_is_valid() {
	let cfg = load(sample_toml(|_| {})).expect("Template config should load.");

	assert_eq!(cfg.retrieval.top_k, 5);
	assert_eq!(cfg.retrieval.overfetch_multiplier, 2);
	assert_eq!(cfg.authorization.relation, "viewer");
}

#[test]
fn fixed_triple_defaults_apply_when_omitted() {
	let payload = sample_toml(|root| {
		let authorization = table(root, "authorization");

		authorization.remove("relation");
		authorization.remove("object_type");
		authorization.remove("subject_type");
	});
	let cfg = load(payload).expect("Defaults should fill the fixed triple.");

	assert_eq!(cfg.authorization.relation, "viewer");
	assert_eq!(cfg.authorization.object_type, "doc");
	assert_eq!(cfg.authorization.subject_type, "user");
}

#[test]
fn blank_api_token_normalizes_to_none() {
	let payload = sample_toml(|root| {
		let authorization = table(root, "authorization");

		authorization.insert("api_token".to_string(), Value::String("  ".to_string()));
	});
	let cfg = load(payload).expect("Blank token should normalize, not fail.");

	assert!(cfg.authorization.api_token.is_none());
}

#[test]
fn top_k_must_be_positive() {
	let payload = sample_toml(|root| {
		let retrieval = table(root, "retrieval");

		retrieval.insert("top_k".to_string(), Value::Integer(0));
	});
	let err = load(payload).expect_err("Expected top_k validation error.");

	assert!(
		err.to_string().contains("retrieval.top_k must be greater than zero."),
		"Unexpected error: {err}"
	);
}

#[test]
fn overfetch_multiplier_must_be_at_least_one() {
	let payload = sample_toml(|root| {
		let retrieval = table(root, "retrieval");

		retrieval.insert("overfetch_multiplier".to_string(), Value::Integer(0));
	});
	let err = load(payload).expect_err("Expected overfetch validation error.");

	assert!(
		err.to_string().contains("retrieval.overfetch_multiplier must be at least one."),
		"Unexpected error: {err}"
	);
}

#[test]
fn embedding_dimensions_must_match_vector_dim() {
	let payload = sample_toml(|root| {
		let storage = table(root, "storage");
		let qdrant = table(storage, "qdrant");

		qdrant.insert("vector_dim".to_string(), Value::Integer(768));
	});
	let err = load(payload).expect_err("Expected dimension mismatch error.");

	assert!(
		err.to_string()
			.contains("providers.embedding.dimensions must match storage.qdrant.vector_dim."),
		"Unexpected error: {err}"
	);
}

#[test]
fn provider_api_keys_must_be_non_empty() {
	let payload = sample_toml(|root| {
		let providers = table(root, "providers");
		let generation = table(providers, "generation");

		generation.insert("api_key".to_string(), Value::String(String::new()));
	});
	let err = load(payload).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("Provider generation api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn oracle_endpoint_fields_must_be_non_empty() {
	let payload = sample_toml(|root| {
		let authorization = table(root, "authorization");

		authorization.insert("store_id".to_string(), Value::String("  ".to_string()));
	});
	let err = load(payload).expect_err("Expected store_id validation error.");

	assert!(
		err.to_string().contains("authorization.store_id must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn missing_config_file_is_a_read_error() {
	let mut path = env::temp_dir();

	path.push("warden_config_test_missing.toml");

	let err = warden_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, warden_config::Error::ReadConfig { .. }));
}
