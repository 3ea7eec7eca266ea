#[cfg(feature = "lambda")]
use crate::domain::ports::{CacheItem, CacheStore};
#[cfg(feature = "lambda")]
use crate::utils::error::{ChartError, Result};
#[cfg(feature = "lambda")]
use async_trait::async_trait;
#[cfg(feature = "lambda")]
use aws_sdk_dynamodb::types::AttributeValue;
#[cfg(feature = "lambda")]
use aws_sdk_dynamodb::Client as DynamoClient;
#[cfg(feature = "lambda")]
use std::collections::HashMap;

#[cfg(feature = "lambda")]
const KEY_ATTRIBUTE: &str = "pk";
#[cfg(feature = "lambda")]
const PAYLOAD_ATTRIBUTE: &str = "payload";
#[cfg(feature = "lambda")]
const TTL_ATTRIBUTE: &str = "ttl";
#[cfg(feature = "lambda")]
const CREATED_AT_ATTRIBUTE: &str = "createdAt";

/// House cache in a DynamoDB table with native TTL on the `ttl` attribute.
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct DynamoCacheStore {
    client: DynamoClient,
    table_name: String,
}

#[cfg(feature = "lambda")]
impl DynamoCacheStore {
    pub fn new(client: DynamoClient, table_name: String) -> Self {
        Self { client, table_name }
    }
}

#[cfg(feature = "lambda")]
fn string_attribute(item: &HashMap<String, AttributeValue>, name: &str) -> Result<String> {
    item.get(name)
        .and_then(|value| value.as_s().ok())
        .cloned()
        .ok_or_else(|| ChartError::cache(format!("cache item lacks string attribute {}", name)))
}

#[cfg(feature = "lambda")]
fn number_attribute(item: &HashMap<String, AttributeValue>, name: &str) -> Result<i64> {
    item.get(name)
        .and_then(|value| value.as_n().ok())
        .and_then(|n| n.parse::<i64>().ok())
        .ok_or_else(|| ChartError::cache(format!("cache item lacks numeric attribute {}", name)))
}

#[cfg(feature = "lambda")]
#[async_trait]
impl CacheStore for DynamoCacheStore {
    async fn get_item(&self, key: &str) -> Result<Option<CacheItem>> {
        let resp = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(KEY_ATTRIBUTE, AttributeValue::S(key.to_string()))
            .send()
            .await
            .map_err(|e| {
                ChartError::cache(format!("DynamoDB GetItem failed: {}", e.into_service_error()))
            })?;

        let Some(item) = resp.item() else {
            return Ok(None);
        };

        Ok(Some(CacheItem {
            payload: string_attribute(item, PAYLOAD_ATTRIBUTE)?,
            ttl: number_attribute(item, TTL_ATTRIBUTE)?,
            created_at: string_attribute(item, CREATED_AT_ATTRIBUTE).unwrap_or_default(),
        }))
    }

    async fn put_item(&self, key: &str, item: CacheItem) -> Result<()> {
        self.client
            .put_item()
            .table_name(&self.table_name)
            .item(KEY_ATTRIBUTE, AttributeValue::S(key.to_string()))
            .item(PAYLOAD_ATTRIBUTE, AttributeValue::S(item.payload))
            .item(TTL_ATTRIBUTE, AttributeValue::N(item.ttl.to_string()))
            .item(CREATED_AT_ATTRIBUTE, AttributeValue::S(item.created_at))
            .send()
            .await
            .map_err(|e| {
                ChartError::cache(format!("DynamoDB PutItem failed: {}", e.into_service_error()))
            })?;
        Ok(())
    }
}
