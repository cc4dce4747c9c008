mod common;

use common::*;
use weather_mcp::agent::Agent;
use weather_mcp::repl::chat_loop;

async fn run(agent: &Agent<MockClient, RecordingHost>, input: &str) -> String {
    let mut output = Vec::new();
    chat_loop(agent, input.as_bytes(), &mut output).await.unwrap();
    String::from_utf8(output).unwrap()
}

#[tokio::test]
async fn test_repl_quit_in_any_case_ends_without_requests() {
    for input in ["quit\n", "QUIT\n", "  Quit  \n"] {
        let client = MockClient::new(vec![]);
        let agent = Agent::new(client.clone(), RecordingHost::with_tools(&["get_alerts"]));

        let output = run(&agent, input).await;

        assert!(output.starts_with("\nMCP Client Started!\nType your queries or 'quit' to exit.\n"));
        assert!(client.requests().is_empty(), "{input:?}");
    }
}

#[tokio::test]
async fn test_repl_prints_each_answer() {
    let client = MockClient::new(vec![text("Sunny all week.")]);
    let agent = Agent::new(client.clone(), RecordingHost::with_tools(&["get_forecast"]));

    let output = run(&agent, "\n\nWeather in Denver?\nquit\n").await;

    assert!(output.contains("\nQuery: \nSunny all week.\n"));
    assert_eq!(client.requests().len(), 1);
    assert_eq!(prompt_of(&client.requests()[0]), "Weather in Denver?");
}

#[tokio::test]
async fn test_repl_failed_turn_is_reported_and_loop_continues() {
    let client = MockClient::new(vec![]);
    let agent = Agent::new(client.clone(), RecordingHost::with_tools(&["get_alerts"]));

    let output = run(&agent, "first\nsecond\nquit\n").await;

    assert_eq!(
        output.matches("\nError: Provider error: No more mock responses\n").count(),
        2
    );
    assert_eq!(client.requests().len(), 2);
}

#[tokio::test]
async fn test_repl_end_of_input_ends_the_session() {
    let client = MockClient::new(vec![text("ok")]);
    let agent = Agent::new(client.clone(), RecordingHost::with_tools(&["get_alerts"]));

    let output = run(&agent, "hello").await;

    assert!(output.ends_with("\nok\n\nQuery: "));
    assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn test_repl_undecodable_line_is_reported_and_loop_continues() {
    let client = MockClient::new(vec![text("Clear skies in Denver.")]);
    let agent = Agent::new(client.clone(), RecordingHost::with_tools(&["get_forecast"]));

    let mut output = Vec::new();
    chat_loop(
        &agent,
        &b"caf\xe9?\nWeather in Denver?\nquit\n"[..],
        &mut output,
    )
    .await
    .unwrap();
    let output = String::from_utf8(output).unwrap();

    assert!(output.contains("\nError: input is not valid UTF-8"));
    assert!(output.contains("\nClear skies in Denver.\n"));
    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(prompt_of(&requests[0]), "Weather in Denver?");
}
