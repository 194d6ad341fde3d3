// SPDX-License-Identifier: AGPL-3.0-or-later

use tokio::sync::broadcast;

use crate::db::TableName;
use crate::manager::Sender;

/// Sender for cross-service communication bus.
pub type ServiceSender = Sender<ServiceMessage>;

/// Creates a broadcast channel for use as a service bus.
pub fn create_service_sender(capacity: usize) -> ServiceSender {
    let (tx, _) = broadcast::channel(capacity);
    tx
}

/// Messages which can be sent on the communication bus.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ServiceMessage {
    /// Records of a table were created, updated or deleted.
    TableChanged(TableName),
}
