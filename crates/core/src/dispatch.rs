use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

use crate::search::{SearchClient, SearchRequest, SearchResponse};

/// Runs searches on a tokio runtime and funnels their results back to the
/// single-threaded host loop.
///
/// Every request gets its own task; nothing is cancelled. Ordering is
/// restored on the receiving side by comparing sequence numbers.
pub struct SearchDispatcher<C> {
    client: Arc<C>,
    handle: Handle,
    tx: UnboundedSender<SearchResponse>,
}

impl<C: SearchClient + 'static> SearchDispatcher<C> {
    pub fn new(client: C, handle: Handle) -> (Self, UnboundedReceiver<SearchResponse>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let d = Self {
            client: Arc::new(client),
            handle,
            tx,
        };
        (d, rx)
    }

    pub fn dispatch(&self, req: SearchRequest) {
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        debug!(target: "core::dispatch", "spawn seq={} query={:?}", req.seq, req.query);
        self.handle.spawn(async move {
            let result = client.search(&req.query).await;
            if let Err(e) = &result {
                error!(target: "core::dispatch", "search seq={} failed: {}", req.seq, e);
            }
            let _ = tx.send(SearchResponse {
                seq: req.seq,
                query: req.query,
                result,
            });
        });
    }
}
