use fortune_teller::{
    build_service, BirthRecord, ErrorKind, FortuneConfig, FortuneResponse, Gender,
    InterpretationRequest, ResponseFormat,
};
use httpmock::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

const SAJU_TEMPLATE: &str = "성별: {gender}\n생년월일: {birthDate}\n생시: {birthTime}";

fn template_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn config_for(server: &MockServer, template: &NamedTempFile) -> FortuneConfig {
    let toml_content = format!(
        r#"
[openai]
api_key = "test-key"
base_url = "{}"
model = "gpt-4o-mini"

[retry]
max_attempts = 3
delay_ms = 0

[prompt]
saju_template = "{}"
"#,
        server.url("/v1"),
        template.path().display()
    );
    FortuneConfig::from_toml_str(&toml_content).unwrap()
}

fn saju_request() -> InterpretationRequest {
    InterpretationRequest::new(
        BirthRecord::new("1990-05-20", Some("14:30".to_string()), Gender::Male),
        "SAJU",
    )
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_saju_interpretation_end_to_end() {
    let server = MockServer::start();
    let template = template_file(SAJU_TEMPLATE);

    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("Authorization", "Bearer test-key")
            .body_contains("1990-05-20")
            .body_contains("14시 30분")
            .body_contains("남성");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(completion_body("good fortune"));
    });

    let config = config_for(&server, &template);
    let service = build_service(&config).unwrap();

    let result = service.interpret(&saju_request()).await.unwrap();

    api_mock.assert();
    assert_eq!(result.fortune_type, "사주");
    assert_eq!(result.result_text, "good fortune");

    let json = serde_json::to_value(FortuneResponse::from_result(&result, ResponseFormat::Extended))
        .unwrap();
    assert_eq!(json["result"], "good fortune");
    assert_eq!(json["birthInfo"]["birthTime"], "14시 30분");
    assert!(json.get("createdAt").is_some());
}

#[tokio::test]
async fn test_failing_endpoint_exhausts_retries() {
    let server = MockServer::start();
    let template = template_file(SAJU_TEMPLATE);

    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(500).body("internal error");
    });

    let service = build_service(&config_for(&server, &template)).unwrap();
    let err = service.interpret(&saju_request()).await.unwrap_err();

    api_mock.assert_hits(3);
    assert_eq!(err.kind(), ErrorKind::OrchestratorExhausted);

    let envelope = err.to_envelope();
    assert_eq!(envelope.status, 503);
    assert_eq!(envelope.error, "Fortune Service Error");
}

#[tokio::test]
async fn test_empty_completion_exhausts_retries() {
    let server = MockServer::start();
    let template = template_file(SAJU_TEMPLATE);

    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(completion_body("  "));
    });

    let service = build_service(&config_for(&server, &template)).unwrap();
    let err = service.interpret(&saju_request()).await.unwrap_err();

    api_mock.assert_hits(3);
    assert_eq!(err.kind(), ErrorKind::OrchestratorExhausted);
}

#[tokio::test]
async fn test_tarot_never_reaches_the_endpoint() {
    let server = MockServer::start();
    let template = template_file(SAJU_TEMPLATE);

    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(completion_body("unused"));
    });

    let service = build_service(&config_for(&server, &template)).unwrap();
    let mut request = saju_request();
    request.fortune_type = "tarot".to_string();

    let err = service.interpret(&request).await.unwrap_err();

    api_mock.assert_hits(0);
    assert_eq!(err.kind(), ErrorKind::UnsupportedFortuneType);
    assert_eq!(err.to_envelope().status, 501);
}

#[tokio::test]
async fn test_invalid_birth_date_never_reaches_the_endpoint() {
    let server = MockServer::start();
    let template = template_file(SAJU_TEMPLATE);

    let api_mock = server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).json_body(completion_body("unused"));
    });

    let service = build_service(&config_for(&server, &template)).unwrap();
    let mut request = saju_request();
    request.birth.birth_date = "1899-12-31".to_string();

    let err = service.interpret(&request).await.unwrap_err();

    api_mock.assert_hits(0);
    assert_eq!(err.kind(), ErrorKind::TooEarly);
    assert_eq!(err.to_envelope().status, 400);
}

#[test]
fn test_shipped_templates_load() {
    let mut config = FortuneConfig::default();
    config.prompt.saju_template = Some(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/saju-prompt.txt").to_string());
    config.prompt.daily_template = Some(concat!(env!("CARGO_MANIFEST_DIR"), "/prompts/daily-prompt.txt").to_string());

    let templates = fortune_teller::app::bootstrap::load_templates(&config).unwrap();

    let saju = templates.for_type(fortune_teller::FortuneType::Saju).unwrap();
    assert!(saju.placeholders().contains(&"birthTime"));
    let daily = templates.for_type(fortune_teller::FortuneType::Daily).unwrap();
    assert!(daily.placeholders().contains(&"fortuneType"));
}
