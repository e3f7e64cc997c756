use super::*;
use crate::section::{Item, ItemField, MultiSectionConfig, SectionConfig, StyleMap, StyleValue};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Client returning a canned answer and remembering the prompts it saw.
struct CannedClient {
    answer: Result<String, fn() -> ModelError>,
    prompts: Mutex<Vec<String>>,
}

impl CannedClient {
    fn answering(answer: &str) -> Self {
        Self {
            answer: Ok(answer.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing(error: fn() -> ModelError) -> Self {
        Self {
            answer: Err(error),
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl crate::llm::ModelClient for CannedClient {
    async fn generate(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.answer {
            Ok(answer) => Ok(answer.clone()),
            Err(make) => Err(make()),
        }
    }
}

fn hero_snapshot() -> MultiSectionConfig {
    let button = Item::new("hero-btn", "button")
        .with_field(ItemField::Content, "Shop Now")
        .with_style("backgroundColor", "#2563eb");
    MultiSectionConfig::single(Section::Hero, SectionConfig::new(vec![button], StyleMap::new()))
}

#[test]
fn unexpected_envelope_counts_as_missing_json() {
    let error = EngineError::from(ModelError::UnexpectedShape("no candidates".into()));
    assert_eq!(error.kind(), ErrorKind::NoJsonFound);

    let error = EngineError::from(ModelError::Status {
        status: 500,
        body: "boom".into(),
    });
    assert_eq!(error.kind(), ErrorKind::ModelCallFailed);
}

#[test]
fn stage_errors_map_to_engine_kinds() {
    assert_eq!(
        EngineError::from(crate::preprocessing::RouteError::NoActiveSection).kind(),
        ErrorKind::NoActiveSection
    );
    assert_eq!(
        EngineError::from(crate::postprocessing::ExtractError::NoJsonFound).kind(),
        ErrorKind::NoJsonFound
    );
    let parse = crate::postprocessing::ResponseParser::parse("{oops").unwrap_err();
    assert_eq!(EngineError::from(parse).kind(), ErrorKind::MalformedJson);
    assert_eq!(
        EngineError::from(MergeError::NothingToMerge(Section::Hero)).kind(),
        ErrorKind::NothingToMerge
    );
}

#[test]
fn user_messages_name_the_section_when_relevant() {
    let message = EngineError::NothingToMerge(Section::Collection).user_message();
    assert!(message.contains("collection section"));
    assert!(EngineError::ModelCallFailed(ModelError::Timeout)
        .user_message()
        .contains("nothing was changed"));
}

#[tokio::test]
async fn successful_request_returns_only_the_active_section() {
    let client = CannedClient::answering(
        "Sure!\n```json\n{\"items\": [{\"id\": \"hero-btn\", \"styles\": {\"backgroundColor\": \"red\"}}]}\n```",
    );
    let engine = Engine::new(client);
    let mut history = ConversationHistory::new();

    let reply = engine
        .process_user_request("make the button red", &hero_snapshot(), &mut history)
        .await;

    assert!(reply.is_success());
    assert!(reply.navbar_config.is_none());
    assert!(reply.collection_config.is_none());
    let hero = reply.section_config(Section::Hero).unwrap();
    assert_eq!(hero.items[0].styles["backgroundColor"], StyleValue::from("#ff0000"));
    assert_eq!(reply.changes.len(), 1);
    assert_eq!(history.len(), 2);
    assert_eq!(history.last().unwrap().content, reply.message);
}

#[tokio::test]
async fn prompt_describes_the_routed_section() {
    let client = Arc::new(CannedClient::answering("{}"));
    let engine = Engine::new(Arc::clone(&client));
    let mut history = ConversationHistory::new();
    engine
        .process_user_request("make the button red", &hero_snapshot(), &mut history)
        .await;

    let prompts = client.prompts.lock().unwrap();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("hero section"));
    assert!(prompts[0].contains("id: \"hero-btn\""));
}

#[tokio::test]
async fn transport_failure_returns_original_config() {
    let engine = Engine::new(CannedClient::failing(|| ModelError::Timeout));
    let snapshot = hero_snapshot();
    let mut history = ConversationHistory::new();

    let reply = engine
        .process_user_request("make the button red", &snapshot, &mut history)
        .await;

    assert_eq!(reply.error, Some(ErrorKind::ModelCallFailed));
    assert_eq!(reply.hero_config, snapshot.hero);
    assert!(reply.changes.is_empty());
    assert_eq!(history.len(), 2);
    assert_eq!(history.turns()[1].role, Role::Assistant);
}

#[tokio::test]
async fn endpoint_timeout_is_a_failed_model_call() {
    use crate::config::EngineConfig;
    use crate::llm::GenerationClient;
    use httpmock::prelude::*;
    use std::time::Duration;

    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST);
            then.status(200).delay(Duration::from_secs(2)).body("{}");
        })
        .await;
    let config = EngineConfig {
        api_url: server.url("/generate"),
        api_key: "test-key".to_string(),
        request_timeout_seconds: 1,
        ..EngineConfig::default()
    };
    let engine = Engine::new(GenerationClient::new(&config).unwrap());
    let snapshot = hero_snapshot();
    let mut history = ConversationHistory::new();

    let reply = engine
        .process_user_request("make the button red", &snapshot, &mut history)
        .await;

    assert_eq!(reply.error, Some(ErrorKind::ModelCallFailed));
    assert_eq!(reply.hero_config, snapshot.hero);
    assert!(reply.message.contains("nothing was changed"));
}

#[tokio::test]
async fn empty_snapshot_never_calls_the_model() {
    let client = Arc::new(CannedClient::answering("{}"));
    let engine = Engine::new(Arc::clone(&client));
    let mut history = ConversationHistory::new();

    let reply = engine
        .process_user_request("make it pop", &MultiSectionConfig::default(), &mut history)
        .await;

    assert_eq!(reply.error, Some(ErrorKind::NoActiveSection));
    assert!(reply.navbar_config.is_none() && reply.hero_config.is_none() && reply.collection_config.is_none());
    assert!(client.prompts.lock().unwrap().is_empty());
    assert_eq!(history.len(), 2);
}

#[test]
fn reply_serializes_with_ui_field_names() {
    let error = EngineError::NothingToMerge(Section::Hero);
    let snapshot = hero_snapshot();
    let reply = EngineReply {
        message: error.user_message(),
        navbar_config: None,
        hero_config: snapshot.hero.clone(),
        collection_config: None,
        changes: Vec::new(),
        error: Some(error.kind()),
    };

    let value = serde_json::to_value(&reply).unwrap();
    assert!(value.get("heroConfig").is_some());
    assert!(value.get("navbarConfig").is_none());
    assert!(value.get("changes").is_none());
    assert_eq!(value["error"], "nothing_to_merge");
}
