//! The list-then-watch loop feeding informer stores.
use std::time::Duration;

use futures::{future::BoxFuture, stream::BoxStream, StreamExt};
use helio_core::{watch::WatchEvent, Meta};

use crate::store::Writer;

const RETRY_DELAY: Duration = Duration::from_secs(1);

/// A store-level change derived from the watch protocol
#[derive(Debug, Clone)]
pub enum Event<K> {
    /// An object was added or modified
    Applied(K),
    /// An object was deleted
    Deleted(K),
    /// The full state was re-listed; previous state is replaced
    Restarted(Vec<K>),
}

/// The pair of primitives the sync loop is driven by
///
/// `list` returns a full snapshot together with the collection's resource
/// version; `watch` opens an event stream from a given version. The informer
/// factory wires these against a [`Backend`](helio_client::Backend); tests
/// substitute closures.
pub struct ListerWatcher<K> {
    /// Fetch a full snapshot and its resource version
    #[allow(clippy::type_complexity)]
    pub list: Box<dyn Fn() -> BoxFuture<'static, helio_client::Result<(Vec<K>, String)>> + Send + Sync>,
    /// Open a watch stream from a resource version
    #[allow(clippy::type_complexity)]
    pub watch: Box<
        dyn Fn(String) -> BoxFuture<'static, helio_client::Result<BoxStream<'static, helio_client::Result<WatchEvent<K>>>>>
            + Send
            + Sync,
    >,
}

/// Drive one store from a [`ListerWatcher`] until cancelled
///
/// Lists into the store, then applies watch events, re-listing when the
/// resync interval elapses. Errors restart the watch (or the list) after a
/// short delay and are logged, never surfaced; readers just observe the last
/// synced state.
pub async fn run<K>(lw: ListerWatcher<K>, mut writer: Writer<K>, resync: Duration)
where
    K: Meta + Clone,
{
    loop {
        let (objs, rv) = match (lw.list)().await {
            Ok(listed) => listed,
            Err(err) => {
                tracing::warn!(error = %err, "list failed, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        };
        writer.apply_event(&Event::Restarted(objs));
        let mut version = rv;

        let resync_at = tokio::time::sleep(resync);
        tokio::pin!(resync_at);

        'watching: loop {
            let mut events = match (lw.watch)(version.clone()).await {
                Ok(stream) => stream,
                Err(err) => {
                    tracing::warn!(error = %err, "watch failed, relisting");
                    tokio::time::sleep(RETRY_DELAY).await;
                    break 'watching;
                }
            };
            loop {
                tokio::select! {
                    () = &mut resync_at => break 'watching,
                    event = events.next() => match event {
                        Some(Ok(WatchEvent::Added(obj) | WatchEvent::Modified(obj))) => {
                            if let Some(rv) = obj.resource_version() {
                                version = rv.to_string();
                            }
                            writer.apply_event(&Event::Applied(obj));
                        }
                        Some(Ok(WatchEvent::Deleted(obj))) => {
                            if let Some(rv) = obj.resource_version() {
                                version = rv.to_string();
                            }
                            writer.apply_event(&Event::Deleted(obj));
                        }
                        Some(Ok(WatchEvent::Bookmark(bookmark))) => {
                            version = bookmark.metadata.resource_version;
                        }
                        Some(Ok(WatchEvent::Error(err))) => {
                            // desync (e.g. expired version): the list fixes it
                            tracing::warn!(error = %err, "error event on watch, relisting");
                            break 'watching;
                        }
                        Some(Err(err)) => {
                            tracing::warn!(error = %err, "watch stream failed, rewatching");
                            tokio::time::sleep(RETRY_DELAY).await;
                            continue 'watching;
                        }
                        // server-side timeout: reconnect from the last seen
                        // version, pacing servers that close immediately
                        None => {
                            tokio::time::sleep(RETRY_DELAY).await;
                            continue 'watching;
                        }
                    }
                }
            }
        }
    }
}
