use serde::de::DeserializeOwned;

use super::super::ProviderError;

pub(super) async fn read_telegram_result<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ProviderError> {
    let status = response.status();
    let body_text = response.text().await.map_err(ProviderError::from_reqwest)?;
    let parsed = serde_json::from_str::<serde_json::Value>(&body_text).ok();

    if !status.is_success() {
        return Err(ProviderError::Api {
            status: Some(status.as_u16()),
            error_code: parsed.as_ref().and_then(telegram_api_error_code),
            description: parsed
                .as_ref()
                .map(|data| telegram_api_error_description(data, &body_text).to_string())
                .unwrap_or(body_text),
        });
    }

    let Some(mut data) = parsed else {
        return Err(ProviderError::Decode(format!(
            "failed to parse Telegram success response: {body_text}"
        )));
    };

    let ok = data
        .get("ok")
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(true);
    if !ok {
        return Err(ProviderError::Api {
            status: Some(status.as_u16()),
            error_code: telegram_api_error_code(&data),
            description: telegram_api_error_description(&data, &body_text).to_string(),
        });
    }

    let result = data
        .get_mut("result")
        .map(serde_json::Value::take)
        .unwrap_or(serde_json::Value::Null);
    serde_json::from_value(result).map_err(|error| ProviderError::Decode(error.to_string()))
}

fn telegram_api_error_code(data: &serde_json::Value) -> Option<i64> {
    data.get("error_code").and_then(serde_json::Value::as_i64)
}

fn telegram_api_error_description<'a>(data: &'a serde_json::Value, fallback: &'a str) -> &'a str {
    data.get("description")
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(fallback)
}
