use serde::{Deserialize, Serialize};

use crate::core::answer::{Answer, Citation};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryCitation {
    pub text: String,
    pub source: String,
    pub paragraph: String,
    pub link: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub answer: String,
    #[serde(default)]
    pub citations: Vec<QueryCitation>,
}

impl From<QueryCitation> for Citation {
    fn from(wire: QueryCitation) -> Self {
        Citation::new(wire.text, wire.source, wire.paragraph, wire.link)
    }
}

impl From<QueryResponse> for Answer {
    fn from(wire: QueryResponse) -> Self {
        Answer::new(
            wire.answer,
            wire.citations.into_iter().map(Citation::from).collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_converts_with_citation_order_intact() {
        let payload = r#"{
            "answer": "In *Dani Devi v. Pritam Singh* the Court held **10%**.",
            "citations": [
                {"text": "first", "source": "a.pdf", "paragraph": "Para 7", "link": "https://x.test/a"},
                {"text": "second", "source": "b.pdf", "paragraph": "Para 2", "link": "https://x.test/b"}
            ]
        }"#;

        let response: QueryResponse = serde_json::from_str(payload).expect("valid payload");
        let answer = Answer::from(response);

        assert_eq!(
            answer.narrative_markup(),
            "In *Dani Devi v. Pritam Singh* the Court held **10%**."
        );
        let registry = answer.citations();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(0).map(Citation::quoted_text), Some("first"));
        assert_eq!(registry.get(1).map(Citation::source_document_id), Some("b.pdf"));
        assert_eq!(registry.get(0).map(Citation::paragraph_label), Some("Para 7"));
        assert_eq!(
            registry.get(1).map(Citation::external_link),
            Some("https://x.test/b")
        );
    }

    #[test]
    fn missing_citations_default_to_empty() {
        let response: QueryResponse =
            serde_json::from_str(r#"{"answer": "No authority found."}"#).expect("valid payload");
        assert!(response.citations.is_empty());
    }

    #[test]
    fn request_serializes_query_field() {
        let request = QueryRequest {
            query: "  is the claimant entitled?  ".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&request).expect("serializes"),
            r#"{"query":"  is the claimant entitled?  "}"#
        );
    }
}
