#![cfg(unix)]

use codesearch_core::config::EnginesConfig;
use codesearch_core::{Config, SearchRequest};
use codesearch_engines::SearchService;
use codesearch_mcp::handlers::engines::SearchEnginesArgs;
use codesearch_mcp::handlers::search::CodeSearchArgs;
use codesearch_mcp::{CodesearchServer, McpContext};
use codesearch_testkit::{FakeEngine, temp_dir_in_workspace};
use rmcp::handler::server::wrapper::Parameters;
use serde_json::json;
use std::time::Instant;
use tokio::time::{Duration, timeout};

/// A slow search must not hold up other tool calls
#[tokio::test(flavor = "multi_thread")]
async fn test_slow_search_does_not_block_other_tools() {
    let temp = temp_dir_in_workspace();
    let bin = temp_dir_in_workspace();
    let rg = FakeEngine::builder(bin.path(), "rg").sleep(2).build();

    let config = Config {
        engines: EnginesConfig {
            ripgrep: rg.binary(),
            git: "codesearch-missing-git".to_string(),
            grep: "codesearch-missing-grep".to_string(),
            ast_grep: "codesearch-missing-ast-grep".to_string(),
        },
        ..Config::default()
    };
    let service = SearchService::new(temp.path(), config).unwrap();
    let server = CodesearchServer::new(McpContext::new(service));

    let search_server = server.clone();
    let search = tokio::spawn(async move {
        let request =
            SearchRequest::from_json(json!({"type": "text", "query": "x", "timeoutMs": 5000}))
                .unwrap();
        search_server
            .code_search(Parameters(CodeSearchArgs {
                request,
                working_directory: None,
            }))
            .await
    });

    // Let the search reach its sleeping child
    tokio::time::sleep(Duration::from_millis(200)).await;

    let started = Instant::now();
    let report = timeout(
        Duration::from_millis(1500),
        server.search_engines(Parameters(SearchEnginesArgs::default())),
    )
    .await;
    assert!(report.is_ok(), "search_engines blocked by a running search");
    assert!(report.unwrap().is_ok());
    assert!(started.elapsed() < Duration::from_millis(1500));

    let result = search.await.unwrap().unwrap();
    assert!(!result.content.is_empty());
}

/// Concurrent searches share one availability memo
#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_searches_use_memoized_engine() {
    let temp = temp_dir_in_workspace();
    let bin = temp_dir_in_workspace();
    let rg = FakeEngine::builder(bin.path(), "rg").build();

    let config = Config {
        engines: EnginesConfig {
            ripgrep: rg.binary(),
            ..EnginesConfig::default()
        },
        ..Config::default()
    };
    let service = SearchService::new(temp.path(), config).unwrap();
    let server = CodesearchServer::new(McpContext::new(service));

    // Warm the memo so every concurrent call below reuses it
    let warm = SearchRequest::from_json(json!({"type": "text", "query": "warm"})).unwrap();
    server
        .code_search(Parameters(CodeSearchArgs {
            request: warm,
            working_directory: None,
        }))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for i in 0..4 {
        let server = server.clone();
        handles.push(tokio::spawn(async move {
            let request =
                SearchRequest::from_json(json!({"type": "text", "query": format!("q{i}")}))
                    .unwrap();
            server
                .code_search(Parameters(CodeSearchArgs {
                    request,
                    working_directory: None,
                }))
                .await
        }));
    }
    for handle in handles {
        let result = handle.await.unwrap().unwrap();
        let text = result.content[0].as_text().unwrap();
        let response: serde_json::Value = serde_json::from_str(&text.text).unwrap();
        assert_eq!(response["engine"], "ripgrep");
    }
}
