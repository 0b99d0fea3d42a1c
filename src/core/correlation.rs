use crate::core::sequence::CERT_FIELD;
use crate::domain::model::{InstitutionRecord, ProbeOutcome};
use std::collections::HashMap;

/// Status and size of a response, captured without reading the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSummary {
    pub status_code: u16,
    pub content_length: Option<u64>,
}

/// A finished request: the body that was actually submitted, plus whatever came back.
#[derive(Debug)]
pub struct Completion {
    pub submitted_body: Option<Vec<u8>>,
    pub response: std::result::Result<ResponseSummary, reqwest::Error>,
}

/// Recover the certificate number from a submitted form body.
pub fn decode_identifier(body: &[u8]) -> Option<i64> {
    url::form_urlencoded::parse(body)
        .find(|(key, _)| key == CERT_FIELD)
        .and_then(|(_, value)| value.trim().parse().ok())
}

/// Identifier to display-name lookup. The first record wins on duplicates.
#[derive(Debug, Default)]
pub struct NameIndex<'a> {
    names: HashMap<i64, &'a str>,
}

impl<'a> NameIndex<'a> {
    pub fn new(records: &'a [InstitutionRecord]) -> Self {
        let mut names = HashMap::with_capacity(records.len());
        for record in records {
            if let Some(id) = record.identifier {
                names.entry(id).or_insert(record.name.as_str());
            }
        }
        Self { names }
    }

    pub fn name_of(&self, identifier: i64) -> Option<&'a str> {
        self.names.get(&identifier).copied()
    }
}

/// Attribute a completion to its institution using only the submitted request.
pub fn correlate(names: &NameIndex<'_>, completion: Completion) -> ProbeOutcome {
    let identifier = completion
        .submitted_body
        .as_deref()
        .and_then(decode_identifier);

    if identifier.is_none() {
        tracing::debug!("Could not decode identifier from submitted request");
    }

    let name = identifier
        .and_then(|id| names.name_of(id))
        .map(str::to_string);

    let (status_code, content_length) = match completion.response {
        Ok(summary) => (Some(summary.status_code), summary.content_length),
        Err(e) => {
            tracing::warn!("Probe for {:?} failed: {}", identifier, e);
            (None, None)
        }
    };

    ProbeOutcome {
        name,
        identifier,
        status_code,
        content_length,
    }
}
