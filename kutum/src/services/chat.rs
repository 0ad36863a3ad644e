use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::assistant::{generate_rule_based, ContextAssembler, KeywordRetriever};
use crate::config::AssistantConfig;
use crate::error::{KutumError, Result};
use crate::llm::prompts::{chat_user_prompt, ASSISTANT_SYSTEM_PROMPT};
use crate::llm::LlmProvider;
use crate::models::{Member, Snapshot};
use crate::services::MemberStore;

/// One question plus whatever household data the client sent with it.
#[derive(Debug, Clone, Default)]
pub struct ChatQuery {
    pub message: String,
    /// Normalized `allData`; `None` when the client sent none or an empty object.
    pub snapshot: Option<Snapshot>,
    /// Normalized legacy `members` list.
    pub members: Option<Vec<Member>>,
}

impl ChatQuery {
    /// Normalize a raw request payload.
    pub fn from_payload(
        message: impl Into<String>,
        members: Option<&[Value]>,
        all_data: Option<&Value>,
    ) -> Self {
        let snapshot = all_data
            .filter(|value| value.as_object().is_some_and(|obj| !obj.is_empty()))
            .map(Snapshot::from_value);

        Self {
            message: message.into(),
            snapshot,
            members: members.map(Member::normalize_all),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Llm,
    RuleBased,
}

#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub response: String,
    pub relevant_members: Vec<Member>,
    pub source: AnswerSource,
}

/// Retrieval first, then the LLM when there is one, with the rule-based
/// responder as the fallback for every model failure.
#[derive(Debug, Clone)]
pub struct ChatService {
    llm: LlmProvider,
    retriever: KeywordRetriever,
    assembler: ContextAssembler,
    store: MemberStore,
}

impl ChatService {
    pub fn new(llm: LlmProvider, config: &AssistantConfig, store: MemberStore) -> Self {
        Self {
            llm,
            retriever: KeywordRetriever::new(config.max_ranked_members),
            assembler: ContextAssembler::new(config),
            store,
        }
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.is_available()
    }

    pub async fn answer(&self, query: ChatQuery) -> Result<ChatOutcome> {
        let message = query.message.trim();
        if message.is_empty() {
            return Err(KutumError::Validation("Message is required".to_string()));
        }

        let members = self.candidate_members(&query).await;
        let ranked = self.retriever.rank(message, &members);
        debug!(
            candidates = members.len(),
            ranked = ranked.len(),
            has_snapshot = query.snapshot.is_some(),
            "Retrieved relevant members"
        );

        let use_llm =
            self.llm.is_available() && (query.snapshot.is_some() || !ranked.is_empty());

        if use_llm {
            let context = self.assembler.build(query.snapshot.as_ref(), &ranked);
            let prompt = chat_user_prompt(&context, message);

            match self.llm.complete(ASSISTANT_SYSTEM_PROMPT, &prompt, None).await {
                Ok(response) => {
                    info!(source = "llm", ranked = ranked.len(), "Answered chat message");
                    return Ok(ChatOutcome {
                        response,
                        relevant_members: ranked,
                        source: AnswerSource::Llm,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "LLM answer failed, using rule-based response");
                }
            }
        }

        let response = generate_rule_based(message, &ranked);
        info!(source = "rule_based", ranked = ranked.len(), "Answered chat message");

        Ok(ChatOutcome {
            response,
            relevant_members: ranked,
            source: AnswerSource::RuleBased,
        })
    }

    /// Snapshot members win over the legacy list, which wins over the
    /// retained store.
    async fn candidate_members(&self, query: &ChatQuery) -> Vec<Member> {
        if let Some(members) = query
            .snapshot
            .as_ref()
            .and_then(|snapshot| snapshot.family_members.clone())
        {
            return members;
        }

        match &query.members {
            Some(members) if !members.is_empty() => members.clone(),
            _ => self.store.members().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::NO_MATCH_RESPONSE;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn service(store: MemberStore) -> ChatService {
        ChatService::new(
            LlmProvider::unavailable("disabled in tests"),
            &AssistantConfig::default(),
            store,
        )
    }

    fn family_json() -> Vec<Value> {
        vec![
            json!({"id": "1", "name": "Raj", "relation": "Son", "age": "12"}),
            json!({"id": "2", "name": "Mina", "relation": "Daughter", "age": "8"}),
        ]
    }

    #[tokio::test]
    async fn test_blank_message_is_rejected() {
        let result = service(MemberStore::new())
            .answer(ChatQuery::from_payload("   ", None, None))
            .await;
        assert!(matches!(result, Err(KutumError::Validation(_))));
    }

    #[tokio::test]
    async fn test_sons_scenario_without_llm() {
        let members = family_json();
        let outcome = service(MemberStore::new())
            .answer(ChatQuery::from_payload(
                "How many sons do I have?",
                Some(&members),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(outcome.source, AnswerSource::RuleBased);
        assert_eq!(outcome.response, "You have 1 son(s): Raj");
        assert_eq!(outcome.relevant_members[0].name, "Raj");
    }

    #[tokio::test]
    async fn test_snapshot_members_override_legacy_list() {
        let legacy = family_json();
        let all_data = json!({
            "familyMembers": [{"name": "Asha", "relation": "Wife", "age": "38"}]
        });

        let outcome = service(MemberStore::new())
            .answer(ChatQuery::from_payload(
                "tell me about asha",
                Some(&legacy),
                Some(&all_data),
            ))
            .await
            .unwrap();

        let names: Vec<_> = outcome.relevant_members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Asha"]);
    }

    #[tokio::test]
    async fn test_retained_members_are_used_when_request_has_none() {
        let store = MemberStore::new();
        store
            .replace(vec![Member::new("1", "Raj", "Son", "12")])
            .await;

        let outcome = service(store)
            .answer(ChatQuery::from_payload("how old is raj", None, None))
            .await
            .unwrap();

        assert_eq!(outcome.response, "Age information:\nRaj (Son): 12");
    }

    #[tokio::test]
    async fn test_no_data_gives_no_match_message() {
        let outcome = service(MemberStore::new())
            .answer(ChatQuery::from_payload("who is here", None, None))
            .await
            .unwrap();

        assert_eq!(outcome.response, NO_MATCH_RESPONSE);
        assert!(outcome.relevant_members.is_empty());
    }

    #[test]
    fn test_empty_all_data_is_ignored() {
        let query = ChatQuery::from_payload("hi", None, Some(&json!({})));
        assert!(query.snapshot.is_none());

        let query = ChatQuery::from_payload("hi", None, Some(&json!(null)));
        assert!(query.snapshot.is_none());

        let query = ChatQuery::from_payload("hi", None, Some(&json!({"documents": []})));
        assert!(query.snapshot.is_some());
    }
}
