//! Translation of non-English posts via the Yandex translate API.
//!
//! One synchronous call per post, no retries and no caching: the call volume
//! is a handful of posts per run. Every failure mode (missing key,
//! transport error, non-200 API code, malformed body) collapses to "no
//! translation", and callers keep the source-language text. Translation is
//! never allowed to abort a run.

use serde::Deserialize;
use tracing::{debug, warn};

use crate::utils::truncate_for_log;

const ENDPOINT: &str = "https://translate.yandex.net/api/v1.5/tr.json/translate";

/// Response body of the translate endpoint. `text` entries are aligned
/// positionally with the `text` query parameters of the request.
#[derive(Debug, Deserialize)]
struct TranslateResponse {
    code: u32,
    #[serde(default)]
    text: Vec<String>,
}

/// Adapter around the Yandex translate HTTP API.
pub struct Translator {
    key: Option<String>,
    client: reqwest::Client,
}

impl Translator {
    /// Create an adapter. With no key, [`Translator::translate`] always
    /// reports "no translation".
    pub fn new(key: Option<String>) -> Self {
        Self {
            key,
            client: reqwest::Client::new(),
        }
    }

    /// Translate a list of text pieces.
    ///
    /// # Arguments
    ///
    /// * `paragraphs` - The text pieces to translate
    /// * `from_lang` - Language code of the source text
    /// * `to_lang` - Language code to translate into
    ///
    /// # Returns
    ///
    /// The translated pieces, aligned positionally with the input, or `None`
    /// when no usable translation could be obtained.
    pub async fn translate(
        &self,
        paragraphs: &[String],
        from_lang: &str,
        to_lang: &str,
    ) -> Option<Vec<String>> {
        let key = match &self.key {
            Some(key) => key,
            None => {
                debug!("no translate key configured; keeping source text");
                return None;
            }
        };

        let lang = format!("{from_lang}-{to_lang}");
        let mut query: Vec<(&str, &str)> =
            vec![("key", key.as_str()), ("lang", lang.as_str()), ("format", "plain")];
        for paragraph in paragraphs {
            query.push(("text", paragraph.as_str()));
        }

        let response = match self.client.get(ENDPOINT).query(&query).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "translation request failed");
                return None;
            }
        };
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "could not read translation response");
                return None;
            }
        };
        decode_response(&body, from_lang, to_lang)
    }
}

/// Decode the API response, treating anything but `code == 200` as failure.
fn decode_response(body: &str, from_lang: &str, to_lang: &str) -> Option<Vec<String>> {
    let parsed: TranslateResponse = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(
                error = %e,
                body = %truncate_for_log(body, 200),
                "translation response is not valid JSON"
            );
            return None;
        }
    };
    if parsed.code != 200 {
        warn!(code = parsed.code, from = from_lang, to = to_lang, "translation failed");
        return None;
    }
    Some(parsed.text)
}
