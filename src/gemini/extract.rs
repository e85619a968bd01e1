//! Text extraction from loosely shaped `generateContent` responses.
//!
//! The provider (and the SDKs wrapping it) return the generated text under a few
//! different nestings. Each known nesting is a [`ResponseShape`] variant, tried in
//! a fixed order; anything else is [`ResponseShape::Unrecognized`] and is rendered
//! as a JSON dump instead of failing the request.

use serde_json::Value;

/// Known response layouts, in priority order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResponseShape<'a> {
    /// `response.candidates[0].content.parts[0].text`
    WrappedCandidatePart(&'a str),
    /// `candidates[0].content.parts[0].text`
    CandidatePart(&'a str),
    /// `response.candidates[0].content.text`
    WrappedCandidateContent(&'a str),
    /// `text`
    TopLevelText(&'a str),
    Unrecognized(&'a Value),
}

impl<'a> ResponseShape<'a> {
    /// Classifies `response` by the first layout holding a non-empty string.
    #[must_use]
    pub fn classify(response: &'a Value) -> Self {
        let layouts: [(&str, fn(&'a str) -> Self); 4] = [
            ("/response/candidates/0/content/parts/0/text", Self::WrappedCandidatePart),
            ("/candidates/0/content/parts/0/text", Self::CandidatePart),
            ("/response/candidates/0/content/text", Self::WrappedCandidateContent),
            ("/text", Self::TopLevelText),
        ];

        layouts
            .into_iter()
            .find_map(|(pointer, variant)| {
                response
                    .pointer(pointer)
                    .and_then(Value::as_str)
                    .filter(|text| !text.is_empty())
                    .map(variant)
            })
            .unwrap_or(Self::Unrecognized(response))
    }

    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unrecognized(_))
    }

    /// The generated text, or a pretty-printed dump for unrecognized responses.
    #[must_use]
    pub fn into_text(self) -> String {
        match self {
            Self::WrappedCandidatePart(text)
            | Self::CandidatePart(text)
            | Self::WrappedCandidateContent(text)
            | Self::TopLevelText(text) => text.to_string(),
            Self::Unrecognized(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
        }
    }
}

/// Extracts the generated text from a raw provider response.
#[must_use]
pub fn extract_text(response: &Value) -> String {
    let shape = ResponseShape::classify(response);
    if !shape.is_recognized() {
        tracing::warn!("Unrecognized response shape, returning raw response");
    }
    shape.into_text()
}
