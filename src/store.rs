// SPDX-License-Identifier: Apache-2.0

//! Durable-store provisioning.
//!
//! Resets the DynamoDB ticket table to a known state before each trial:
//! every record unreserved, version 0. The provisioner never creates schema;
//! it checks the table exists and reports the miss, then still attempts the
//! writes (the batch write fails fatally if the table truly is absent).
//! Writes are batched to bound request count; a partial failure mid-batch is
//! surfaced as an error, never rolled back.

use std::collections::HashMap;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::{AttributeValue, PutRequest, WriteRequest};
use aws_sdk_dynamodb::Client;

use crate::error::StoreError;
use crate::ticket::TicketRecord;

/// DynamoDB caps BatchWriteItem at 25 put requests per call.
const BATCH_WRITE_LIMIT: usize = 25;

/// Seam between the trial harness and the durable store.
pub trait Provisioner {
    /// Ensure the store holds exactly `n` fresh, unreserved records with
    /// ids `0..n-1`, overwriting whatever sits at those keys.
    fn reset(&self, n: u64) -> impl std::future::Future<Output = Result<(), StoreError>>;
}

/// The DynamoDB table of ticket records.
#[derive(Debug, Clone)]
pub struct TicketTable {
    client: Client,
    table: String,
}

impl TicketTable {
    pub fn new(client: Client, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Whether the configured table exists. Any describe failure other than
    /// "not found" is fatal.
    pub async fn exists(&self) -> Result<bool, StoreError> {
        match self
            .client
            .describe_table()
            .table_name(&self.table)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_resource_not_found_exception() {
                    Ok(false)
                } else {
                    Err(StoreError::Describe {
                        table: self.table.clone(),
                        reason: service_err.to_string(),
                    })
                }
            }
        }
    }

    /// Overwrite records `0..n-1` with fresh, unreserved state.
    pub async fn seed(&self, n: u64) -> Result<(), StoreError> {
        let mut writes = Vec::with_capacity(n as usize);
        for i in 0..n {
            let put = PutRequest::builder()
                .set_item(Some(seed_item(i)))
                .build()
                .map_err(|e| StoreError::ItemBuild {
                    reason: e.to_string(),
                })?;
            writes.push(WriteRequest::builder().put_request(put).build());
        }

        for chunk in writes.chunks(BATCH_WRITE_LIMIT) {
            let resp = self
                .client
                .batch_write_item()
                .request_items(self.table.clone(), chunk.to_vec())
                .send()
                .await
                .map_err(|e| StoreError::BatchWrite {
                    table: self.table.clone(),
                    reason: DisplayErrorContext(e).to_string(),
                })?;

            if let Some(unprocessed) = resp.unprocessed_items() {
                let count: usize = unprocessed.values().map(Vec::len).sum();
                if count > 0 {
                    return Err(StoreError::Unprocessed {
                        table: self.table.clone(),
                        count,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Provisioner for TicketTable {
    async fn reset(&self, n: u64) -> Result<(), StoreError> {
        if !self.exists().await? {
            tracing::error!(table = %self.table, "TABLE DOES NOT EXIST");
        }
        self.seed(n).await
    }
}

/// Store item for a fresh ticket record: `Key`/`ID` string key, `Version`
/// number, `Value` nested map of the record fields.
fn seed_item(i: u64) -> HashMap<String, AttributeValue> {
    let record = TicketRecord::fresh(i);
    let key = TicketRecord::key(i);

    let mut value = HashMap::new();
    value.insert("id".to_string(), AttributeValue::N(record.id.to_string()));
    value.insert("taken".to_string(), AttributeValue::Bool(record.taken));
    value.insert("res_email".to_string(), AttributeValue::Null(true));
    value.insert("res_name".to_string(), AttributeValue::Null(true));
    value.insert("res_card".to_string(), AttributeValue::Null(true));

    let mut item = HashMap::new();
    item.insert("Key".to_string(), AttributeValue::S(key.clone()));
    item.insert("ID".to_string(), AttributeValue::S(key));
    item.insert(
        "Version".to_string(),
        AttributeValue::N(record.version.to_string()),
    );
    item.insert("Value".to_string(), AttributeValue::M(value));
    item
}
