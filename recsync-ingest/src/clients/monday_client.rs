//! Monday.com board client
//!
//! GraphQL over HTTPS. The first page comes from `boards(ids:)`, later pages
//! from `next_items_page(cursor:)` until the cursor runs out.

use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::models::RawBoardItem;
use crate::types::BoardSource;

const USER_AGENT: &str = concat!("recsync/", env!("CARGO_PKG_VERSION"));

/// Safety stop for a cursor that never ends
const MAX_PAGES: usize = 1000;

const FIRST_PAGE_QUERY: &str = r#"
query ($boardIds: [ID!], $limit: Int!) {
    boards(ids: $boardIds) {
        id
        name
        items_page(limit: $limit) {
            cursor
            items {
                id
                name
                column_values {
                    id
                    text
                }
            }
        }
    }
}
"#;

const NEXT_PAGE_QUERY: &str = r#"
query ($cursor: String!, $limit: Int!) {
    next_items_page(cursor: $cursor, limit: $limit) {
        cursor
        items {
            id
            name
            column_values {
                id
                text
            }
        }
    }
}
"#;

/// One page of board items
#[derive(Debug, Clone, Deserialize)]
pub struct ItemsPage {
    pub cursor: Option<String>,
    #[serde(default)]
    pub items: Vec<RawBoardItem>,
}

/// Monday.com GraphQL client
pub struct MondayClient {
    http_client: reqwest::Client,
    config: BoardConfig,
}

impl MondayClient {
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BoardError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    async fn query(&self, query: &str, variables: Value) -> Result<Value, BoardError> {
        let response = self
            .http_client
            .post(&self.config.api_url)
            .header(reqwest::header::AUTHORIZATION, self.config.api_key.as_str())
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| BoardError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(BoardError::Api(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| BoardError::Malformed(e.to_string()))
    }
}

#[async_trait::async_trait]
impl BoardSource for MondayClient {
    async fn fetch_board(&self, board_id: u64) -> Result<Vec<RawBoardItem>, BoardError> {
        let limit = self.config.page_limit;

        tracing::debug!(board_id = board_id, limit = limit, "Querying board");
        let body = self
            .query(
                FIRST_PAGE_QUERY,
                json!({ "boardIds": [board_id.to_string()], "limit": limit }),
            )
            .await?;
        let mut page = parse_first_page(&body)?;
        let mut items = std::mem::take(&mut page.items);
        let mut pages = 1;

        while let Some(cursor) = page.cursor.take() {
            if pages >= MAX_PAGES {
                tracing::warn!(board_id = board_id, "Page limit reached, stopping pagination");
                break;
            }
            let body = self
                .query(NEXT_PAGE_QUERY, json!({ "cursor": cursor, "limit": limit }))
                .await?;
            page = parse_next_page(&body)?;
            items.append(&mut page.items);
            pages += 1;
        }

        tracing::info!(
            board_id = board_id,
            items = items.len(),
            pages = pages,
            "Retrieved board items"
        );

        Ok(items)
    }
}

fn check_graphql_errors(body: &Value) -> Result<(), BoardError> {
    match body.get("errors").and_then(Value::as_array) {
        Some(errors) if !errors.is_empty() => {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("message").and_then(Value::as_str))
                .collect();
            Err(BoardError::Malformed(format!(
                "GraphQL errors: {}",
                messages.join("; ")
            )))
        }
        _ => Ok(()),
    }
}

fn page_from(value: Option<&Value>, what: &str) -> Result<ItemsPage, BoardError> {
    let value = value.ok_or_else(|| BoardError::Malformed(format!("missing {}", what)))?;
    serde_json::from_value(value.clone())
        .map_err(|e| BoardError::Malformed(format!("{}: {}", what, e)))
}

/// Parse the `boards(ids:)` response
pub fn parse_first_page(body: &Value) -> Result<ItemsPage, BoardError> {
    check_graphql_errors(body)?;
    let board = body
        .pointer("/data/boards/0")
        .ok_or_else(|| BoardError::Malformed("missing data.boards[0]".to_string()))?;
    page_from(board.get("items_page"), "items_page")
}

/// Parse the `next_items_page` response
pub fn parse_next_page(body: &Value) -> Result<ItemsPage, BoardError> {
    check_graphql_errors(body)?;
    page_from(body.pointer("/data/next_items_page"), "next_items_page")
}
