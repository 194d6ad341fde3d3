// SPDX-License-Identifier: AGPL-3.0-or-later

use std::sync::Arc;

use log::trace;

use crate::bus::{ServiceMessage, ServiceSender};
use crate::db::{MemoryStore, TableName};
use crate::validation::ValidatorRegistry;

#[derive(Clone, Debug)]
pub struct HttpServiceContext {
    /// Entity store.
    pub store: MemoryStore,

    /// Sender of the service bus, informs other services about written tables.
    pub tx: ServiceSender,

    /// Validators run when a submission gets validated.
    pub validators: Arc<ValidatorRegistry>,
}

impl HttpServiceContext {
    pub fn new(store: MemoryStore, tx: ServiceSender) -> Self {
        Self {
            store,
            tx,
            validators: Arc::new(ValidatorRegistry::default()),
        }
    }

    /// Announces a write to a table on the service bus.
    pub fn notify(&self, table: TableName) {
        if self.tx.send(ServiceMessage::TableChanged(table)).is_err() {
            trace!("No subscriber informed about changes in {}", table);
        }
    }
}
