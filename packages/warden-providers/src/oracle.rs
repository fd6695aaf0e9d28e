use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Issues a single ListObjects query against the authorization oracle and
/// returns the raw, type-prefixed object identifiers. The caller decides
/// what an error means; this function never invents grants.
pub async fn list_objects(
	cfg: &warden_config::Authorization,
	subject: &str,
) -> Result<Vec<String>> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let url = format!("{}/stores/{}/list-objects", cfg.api_base, cfg.store_id);
	let body = serde_json::json!({
		"authorization_model_id": cfg.authorization_model_id,
		"user": format!("{}:{subject}", cfg.subject_type),
		"relation": cfg.relation,
		"type": cfg.object_type,
	});
	let res = client
		.post(url)
		.headers(crate::auth_headers(cfg.api_token.as_deref(), &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_list_objects_response(json)
}

fn parse_list_objects_response(json: Value) -> Result<Vec<String>> {
	let objects = json.get("objects").and_then(|v| v.as_array()).ok_or_else(|| {
		Error::InvalidResponse {
			message: "ListObjects response is missing objects array.".to_string(),
		}
	})?;
	let mut out = Vec::with_capacity(objects.len());

	for object in objects {
		let id = object.as_str().ok_or_else(|| Error::InvalidResponse {
			message: "ListObjects entry must be a string.".to_string(),
		})?;

		out.push(id.to_string());
	}

	Ok(out)
}
