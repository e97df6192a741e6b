use serde::{Deserialize, Serialize};
use std::fmt;

/// Answer records returned for one query
pub type AnswerSet = Vec<AnswerRecord>;

/// DNS record type mnemonic sent as the `type` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address
    A,
    /// IPv6 address
    Aaaa,
    /// Canonical name
    Cname,
    /// Mail exchanger
    Mx,
    /// Name server
    Ns,
    /// Text record (SPF, DKIM and DMARC all live here)
    Txt,
}

impl RecordType {
    /// The mnemonic as understood by DNS-JSON resolvers
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Ns => "NS",
            Self::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Individual answer record from a DNS-JSON response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    /// Owner name of the record
    #[serde(default)]
    pub name: String,

    /// Numeric RR type (16 = TXT, 5 = CNAME)
    #[serde(default, rename = "type")]
    pub record_type: u16,

    /// Record data, TXT strings usually arrive wrapped in double quotes
    #[serde(default)]
    pub data: String,
}

impl AnswerRecord {
    /// Numeric RR type of a TXT record
    pub const TXT: u16 = 16;

    /// Build a TXT answer (handy for tests and fixtures)
    #[must_use]
    pub fn txt(name: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: Self::TXT,
            data: data.into(),
        }
    }

    /// Record data with one leading and one trailing double quote removed.
    ///
    /// Internal quotes (multi-string TXT records such as `"a" "b"`) are left alone.
    #[must_use]
    pub fn unquoted_data(&self) -> &str {
        let data = self.data.strip_prefix('"').unwrap_or(&self.data);
        data.strip_suffix('"').unwrap_or(data)
    }
}

/// DNS-JSON (`application/dns-json`) response envelope
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DnsJsonResponse {
    /// DNS response code (0 = NOERROR, 3 = NXDOMAIN)
    #[serde(default, rename = "Status")]
    pub status: Option<u32>,

    /// Answer section, absent when there are no records
    #[serde(default, rename = "Answer")]
    pub answer: Option<Vec<AnswerRecord>>,
}

impl DnsJsonResponse {
    /// The answer records; a missing `Answer` section is an empty set
    #[must_use]
    pub fn answers(self) -> AnswerSet {
        self.answer.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_one_quote_pair() {
        let r = AnswerRecord::txt("example.com", "\"v=spf1 -all\"");
        assert_eq!(r.unquoted_data(), "v=spf1 -all");

        let split = AnswerRecord::txt("example.com", "\"v=spf1 a\" \"-all\"");
        assert_eq!(split.unquoted_data(), "v=spf1 a\" \"-all");

        let bare = AnswerRecord::txt("example.com", "v=spf1 -all");
        assert_eq!(bare.unquoted_data(), "v=spf1 -all");
    }

    #[test]
    fn missing_answer_section_is_empty() {
        let resp: DnsJsonResponse =
            serde_json::from_str(r#"{"Status":3,"TC":false,"Question":[]}"#).unwrap();
        assert_eq!(resp.status, Some(3));
        assert!(resp.answers().is_empty());
    }

    #[test]
    fn parses_cloudflare_answer() {
        let body = r#"{
            "Status": 0,
            "Answer": [
                {"name": "example.com", "type": 16, "TTL": 300, "data": "\"v=spf1 -all\""}
            ]
        }"#;
        let answers = serde_json::from_str::<DnsJsonResponse>(body).unwrap().answers();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].record_type, AnswerRecord::TXT);
        assert_eq!(answers[0].unquoted_data(), "v=spf1 -all");
    }

    #[test]
    fn record_type_mnemonic() {
        assert_eq!(RecordType::Txt.to_string(), "TXT");
        assert_eq!(RecordType::Aaaa.as_str(), "AAAA");
    }
}
