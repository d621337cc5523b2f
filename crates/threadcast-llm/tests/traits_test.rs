use threadcast_llm::{GenerateOptions, GenerateRequest};

#[test]
fn test_generate_request_creation() {
    let request = GenerateRequest::new("google/flan-t5-base", "Hello");

    assert_eq!(request.model, "google/flan-t5-base");
    assert_eq!(request.prompt, "Hello");
    assert_eq!(request.options, GenerateOptions::default());
}

#[test]
fn test_generate_request_with_options() {
    let options = GenerateOptions::new().max_new_tokens(400);
    let request = GenerateRequest::new("model", "prompt").with_options(options);

    assert_eq!(request.options.max_new_tokens, Some(400));
}

#[test]
fn test_generate_options_default() {
    let options = GenerateOptions::default();

    assert_eq!(options.max_new_tokens, None);
}
