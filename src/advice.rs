//! The "daily advice" quote, fetched once from [Advice Slip](https://api.adviceslip.com/).
//!
//! A failed fetch never surfaces as an error: [`display_text`] turns it into the configured fallback.

use crate::config::DEFAULT_ADVICE_FALLBACK;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, instrument, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Response, Window};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdviceError {
	#[error("request failed: {0}")]
	Network(String),
	#[error("unexpected HTTP status {0}")]
	Status(u16),
	#[error("malformed response: {0}")]
	Malformed(String),
	#[error("the response contained no advice")]
	Empty,
}
impl From<JsValue> for AdviceError {
	fn from(error: JsValue) -> Self {
		Self::Network(error.as_string().unwrap_or_else(|| format!("{:?}", error)))
	}
}

#[derive(Deserialize)]
struct Envelope {
	slip: Slip,
}

#[derive(Deserialize)]
struct Slip {
	advice: String,
}

/// Extracts `slip.advice` from a response body.
///
/// # Errors
///
/// Iff `json` doesn't have that shape or the advice is blank.
pub fn parse(json: &str) -> Result<String, AdviceError> {
	let envelope: Envelope = serde_json::from_str(json).map_err(|error| AdviceError::Malformed(error.to_string()))?;
	let advice = envelope.slip.advice.trim();
	if advice.is_empty() {
		Err(AdviceError::Empty)
	} else {
		Ok(advice.to_owned())
	}
}

/// The text to show for a fetch result: the advice in double quotes, or `fallback` on any failure.
///
/// Never blank: a blank `fallback` is replaced with [`DEFAULT_ADVICE_FALLBACK`].
#[must_use]
pub fn display_text(result: Result<String, AdviceError>, fallback: &str) -> String {
	match result {
		Ok(advice) => format!("\"{}\"", advice),
		Err(error) => {
			warn!("Showing fallback advice: {}", error);
			if fallback.trim().is_empty() {
				DEFAULT_ADVICE_FALLBACK.to_owned()
			} else {
				fallback.to_owned()
			}
		}
	}
}

/// Fetches and parses one piece of advice. No retries.
///
/// # Errors
///
/// Iff the request fails, the status isn't a success, or the body doesn't parse.
#[instrument(skip(window))]
pub async fn fetch(window: &Window, url: &str) -> Result<String, AdviceError> {
	let response = JsFuture::from(window.fetch_with_str(url)).await?;
	let response: Response = response
		.dyn_into()
		.map_err(|value| AdviceError::Malformed(format!("expected `Response` but got {:?}", value)))?;
	if !response.ok() {
		return Err(AdviceError::Status(response.status()));
	}

	let body = JsFuture::from(response.text()?).await?;
	let body = body
		.as_string()
		.ok_or_else(|| AdviceError::Malformed("the body is not text".to_owned()))?;
	let advice = parse(&body)?;
	info!("Fetched advice.");
	Ok(advice)
}
