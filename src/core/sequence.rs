use crate::domain::model::InstitutionRecord;
use crate::utils::error::{ProbeError, Result};

/// Form field carrying the certificate number.
pub const CERT_FIELD: &str = "CertNum";
/// Companion field the lookup form submits alongside the number.
pub const CERT_CONSTRAINT_FIELD: &str = "CertNum_INTEGER";
pub const CERT_CONSTRAINT_TEXT: &str = "The FDIC Certificate Number must be a positive integer";

/// One outbound lookup, derived from a single institution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    pub identifier: Option<i64>,
    fields: Vec<(&'static str, String)>,
}

impl ProbeRequest {
    pub fn for_identifier(identifier: Option<i64>) -> Self {
        let cert = identifier.map(|id| id.to_string()).unwrap_or_default();
        Self {
            identifier,
            fields: vec![
                (CERT_FIELD, cert),
                (CERT_CONSTRAINT_FIELD, CERT_CONSTRAINT_TEXT.to_string()),
            ],
        }
    }

    /// Key-value pairs in submission order.
    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    /// The `application/x-www-form-urlencoded` body for this request.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.fields.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}

/// Index-addressable view of the probe requests for a record list.
///
/// Holds no cursor: `get(i)` is a pure function of the backing slice, so
/// any number of consumers may pull by index or iterate independently.
#[derive(Debug, Clone, Copy)]
pub struct RequestSequence<'a> {
    records: &'a [InstitutionRecord],
}

impl<'a> RequestSequence<'a> {
    pub fn new(records: &'a [InstitutionRecord]) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<ProbeRequest> {
        self.records
            .get(index)
            .map(|record| ProbeRequest::for_identifier(record.identifier))
            .ok_or(ProbeError::SequenceExhausted {
                index,
                len: self.records.len(),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = ProbeRequest> + 'a {
        self.records
            .iter()
            .map(|record| ProbeRequest::for_identifier(record.identifier))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(identifier: Option<i64>, name: &str) -> InstitutionRecord {
        InstitutionRecord {
            identifier,
            name: name.to_string(),
            city: "Springfield".to_string(),
            state: "Illinois".to_string(),
            active: true,
        }
    }

    #[test]
    fn test_request_fields_shape() {
        let request = ProbeRequest::for_identifier(Some(3850));
        assert_eq!(
            request.fields(),
            &[
                ("CertNum", "3850".to_string()),
                ("CertNum_INTEGER", CERT_CONSTRAINT_TEXT.to_string()),
            ]
        );
        assert_eq!(
            request.encode(),
            "CertNum=3850&CertNum_INTEGER=The+FDIC+Certificate+Number+must+be+a+positive+integer"
        );
    }

    #[test]
    fn test_get_is_deterministic() {
        let records = vec![record(Some(101), "Bank A"), record(Some(102), "Bank B")];
        let sequence = RequestSequence::new(&records);

        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence.get(1).unwrap(), sequence.get(1).unwrap());
        assert_eq!(sequence.get(0).unwrap().identifier, Some(101));
        assert_eq!(sequence.get(1).unwrap().identifier, Some(102));
    }

    #[test]
    fn test_out_of_range_is_exhaustion() {
        let records = vec![record(Some(101), "Bank A")];
        let sequence = RequestSequence::new(&records);

        match sequence.get(1) {
            Err(ProbeError::SequenceExhausted { index, len }) => {
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_iter_covers_every_record() {
        let records = vec![
            record(Some(1), "One"),
            record(None, "Unknown"),
            record(Some(3), "Three"),
        ];
        let sequence = RequestSequence::new(&records);

        let ids: Vec<Option<i64>> = sequence.iter().map(|r| r.identifier).collect();
        assert_eq!(ids, vec![Some(1), None, Some(3)]);
    }

    #[test]
    fn test_null_identifier_encodes_empty_cert() {
        let request = ProbeRequest::for_identifier(None);
        assert!(request.encode().starts_with("CertNum=&"));
    }
}
