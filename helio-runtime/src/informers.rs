//! Shared informers and their de-duplicating factory.
use std::{
    any::{Any, TypeId},
    collections::HashMap,
    sync::Arc,
    time::Duration,
};

use futures::{future::BoxFuture, FutureExt};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use helio_client::{Backend, Client};
use helio_core::{
    discovery::{ApiResource, Scope},
    gvk::GroupVersionResource,
    params::{ListParams, WatchParams},
    Meta,
};

use crate::{
    lister::Lister,
    store::{Store, Writer},
    sync::{self, ListerWatcher},
};

/// One long-lived informer for a kind `K`
///
/// Holds the read side of the kind's store plus its not-yet-started sync
/// loop. Obtained from a [`SharedInformerFactory`], which guarantees at most
/// one informer per kind.
pub struct SharedInformer<K> {
    resource: ApiResource,
    store: Store<K>,
    task: Mutex<Option<BoxFuture<'static, ()>>>,
}

impl<K: Clone> SharedInformer<K> {
    /// The resource this informer watches
    pub fn resource(&self) -> &ApiResource {
        &self.resource
    }

    /// A read handle onto the informer's cache
    pub fn store(&self) -> Store<K> {
        self.store.clone()
    }

    /// A typed read-only lister over the informer's cache
    pub fn lister(&self) -> Lister<K> {
        Lister::new(self.store.clone(), self.resource.group_resource())
    }

    /// Take the informer's sync loop, present until the first call
    pub(crate) fn take_task(&self) -> Option<BoxFuture<'static, ()>> {
        self.task.lock().take()
    }
}

/// A type-erased handle to a shared informer, resolved by resource identity
pub struct GenericInformer {
    resource: ApiResource,
    handle: Arc<dyn Any + Send + Sync>,
}

impl GenericInformer {
    /// The resource the underlying informer watches
    pub fn resource(&self) -> &ApiResource {
        &self.resource
    }

    /// Recover the typed informer, `None` if `K` is not its kind
    pub fn downcast<K: Send + Sync + 'static>(&self) -> Option<Arc<SharedInformer<K>>> {
        self.handle.clone().downcast::<SharedInformer<K>>().ok()
    }
}

type Constructor = Box<dyn Fn(&SharedInformerFactory) -> GenericInformer + Send + Sync>;

struct Registration {
    resource: ApiResource,
    construct: Constructor,
}

/// An explicit lookup table from resource identity to informer constructor
///
/// Built once at startup by whoever knows the kinds in play, then handed to
/// the factory. Resolution is a plain map lookup; unknown identities yield
/// `None` rather than an error.
#[derive(Default)]
pub struct Registry {
    by_gvr: HashMap<GroupVersionResource, Registration>,
}

impl Registry {
    /// An empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a kind `K` under its resource identity
    pub fn register<K>(&mut self, resource: ApiResource)
    where
        K: Meta + Clone + DeserializeOwned + Send + Sync + 'static,
    {
        let gvr = resource.group_version_resource();
        let construct_resource = resource.clone();
        let construct: Constructor = Box::new(move |factory| {
            let informer = factory.typed_informer::<K>(&construct_resource);
            GenericInformer {
                resource: construct_resource.clone(),
                handle: informer,
            }
        });
        self.by_gvr.insert(gvr, Registration { resource, construct });
    }

    /// The resource registered under an identity, if any
    pub fn resource(&self, gvr: &GroupVersionResource) -> Option<&ApiResource> {
        self.by_gvr.get(gvr).map(|r| &r.resource)
    }
}

struct CacheEntry {
    handle: Arc<dyn Any + Send + Sync>,
    runner: Box<dyn Fn() -> Option<BoxFuture<'static, ()>> + Send + Sync>,
}

/// A factory caching one shared informer per kind
///
/// Informers are memoized by the kind's type identity: every caller asking
/// for the same `K` receives the same informer and therefore the same cache.
/// Cached informers live as long as the factory; there is no eviction.
pub struct SharedInformerFactory {
    client: Client,
    default_resync: Duration,
    namespace: Option<String>,
    registry: Registry,
    cache: Mutex<HashMap<TypeId, CacheEntry>>,
}

impl SharedInformerFactory {
    /// Construct a factory with a default resync interval
    #[must_use]
    pub fn new(client: Client, default_resync: Duration) -> Self {
        Self {
            client,
            default_resync,
            namespace: None,
            registry: Registry::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Restrict informers of namespaced kinds to one namespace
    #[must_use]
    pub fn namespace(mut self, ns: &str) -> Self {
        self.namespace = Some(ns.to_string());
        self
    }

    /// Attach a kind registry for identity-based resolution
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Get or create the informer for kind `K`
    ///
    /// `ctor` is invoked at most once per kind for the factory's lifetime;
    /// concurrent callers all receive the first constructed informer. The
    /// ctor must not call back into the factory's informer methods.
    pub fn informer_for<K, F>(&self, ctor: F) -> Arc<SharedInformer<K>>
    where
        K: Send + Sync + 'static,
        F: FnOnce(&Self) -> Arc<SharedInformer<K>>,
    {
        let mut cache = self.cache.lock();
        if let Some(entry) = cache.get(&TypeId::of::<K>()) {
            return entry
                .handle
                .clone()
                .downcast::<SharedInformer<K>>()
                .expect("informer cache entries are keyed by their kind's TypeId");
        }
        let informer = ctor(self);
        let runner_informer = informer.clone();
        cache.insert(TypeId::of::<K>(), CacheEntry {
            handle: informer.clone(),
            runner: Box::new(move || runner_informer.take_task()),
        });
        informer
    }

    /// Get or create the informer for kind `K` backed by a resource's collection
    pub fn typed_informer<K>(&self, resource: &ApiResource) -> Arc<SharedInformer<K>>
    where
        K: Meta + Clone + DeserializeOwned + Send + Sync + 'static,
    {
        self.informer_for(|factory| factory.build_informer(resource))
    }

    /// Resolve an informer through the registry by resource identity
    ///
    /// Unknown identities yield `None`; known ones yield the memoized
    /// informer for the registered kind, constructing it on first use.
    pub fn informer_for_resource(&self, gvr: &GroupVersionResource) -> Option<GenericInformer> {
        let registration = self.registry.by_gvr.get(gvr)?;
        Some((registration.construct)(self))
    }

    /// Spawn every cached informer's sync loop
    ///
    /// Each loop is spawned at most once across repeated calls; loops run
    /// independently with no ordering guarantees between kinds. Returns the
    /// handles of the loops spawned by this call.
    pub fn run_all(&self) -> Vec<JoinHandle<()>> {
        self.cache
            .lock()
            .values()
            .filter_map(|entry| (entry.runner)())
            .map(tokio::spawn)
            .collect()
    }

    fn build_informer<K>(&self, resource: &ApiResource) -> Arc<SharedInformer<K>>
    where
        K: Meta + Clone + DeserializeOwned + Send + Sync + 'static,
    {
        let scope = if resource.namespaced {
            Scope::Namespaced
        } else {
            Scope::Cluster
        };
        let writer = Writer::new(scope);
        let store = writer.as_reader();

        let backend = Backend::new(self.client.clone(), resource.group_version());
        let plural = resource.plural.clone();
        // namespace scope only applies to namespaced kinds
        let namespace = resource.namespaced.then(|| self.namespace.clone()).flatten();

        let lw = ListerWatcher {
            list: Box::new({
                let backend = backend.clone();
                let plural = plural.clone();
                let namespace = namespace.clone();
                move || {
                    let backend = backend.clone();
                    let plural = plural.clone();
                    let namespace = namespace.clone();
                    async move {
                        let list = backend
                            .list::<K>(&plural, namespace.as_deref(), &ListParams::default())
                            .await?;
                        let version = list.metadata.resource_version.clone().unwrap_or_default();
                        Ok((list.items, version))
                    }
                    .boxed()
                }
            }),
            watch: Box::new(move |version| {
                let backend = backend.clone();
                let plural = plural.clone();
                let namespace = namespace.clone();
                async move {
                    backend
                        .watch::<K>(&plural, namespace.as_deref(), &WatchParams::default(), &version)
                        .await
                }
                .boxed()
            }),
        };

        let task = sync::run(lw, writer, self.default_resync).boxed();
        Arc::new(SharedInformer {
            resource: resource.clone(),
            store,
            task: Mutex::new(Some(task)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Registry, SharedInformerFactory};
    use helio_client::Client;
    use helio_core::{
        discovery::ApiResource,
        gvk::{GroupVersionKind, GroupVersionResource},
        labels::Selector,
        DynamicObject,
    };

    use std::{convert::Infallible, sync::Arc, time::Duration};

    use bytes::Bytes;
    use futures::StreamExt;
    use http::{Request, Response};
    use http_body_util::{combinators::UnsyncBoxBody, BodyExt, Full, StreamBody};
    use tower_test::mock;

    fn widgets() -> ApiResource {
        ApiResource::from_gvk_with_plural(
            &GroupVersionKind::gvk("fleet.example.dev", "v1", "Widget"),
            "widgets",
        )
    }

    fn idle_client() -> Client {
        let (mock_service, handle) =
            mock::pair::<Request<helio_client::client::Body>, Response<helio_client::client::Body>>();
        // informers are lazy until run_all; the handle can be leaked unanswered
        std::mem::forget(handle);
        Client::new(mock_service)
    }

    #[tokio::test]
    async fn informer_is_a_singleton_per_kind() {
        let factory = SharedInformerFactory::new(idle_client(), Duration::from_secs(3600));

        let first = factory.typed_informer::<DynamicObject>(&widgets());
        let second = factory.typed_informer::<DynamicObject>(&widgets());
        assert!(Arc::ptr_eq(&first, &second));

        // constructor must not run again for a cached kind
        let mut invoked = false;
        let third = factory.informer_for::<DynamicObject, _>(|f| {
            invoked = true;
            f.build_informer(&widgets())
        });
        assert!(Arc::ptr_eq(&first, &third));
        assert!(!invoked);
    }

    #[tokio::test]
    async fn registry_resolves_known_identities_only() {
        let mut registry = Registry::new();
        registry.register::<DynamicObject>(widgets());

        let factory = SharedInformerFactory::new(idle_client(), Duration::from_secs(3600))
            .registry(registry);

        let gvr = GroupVersionResource::gvr("fleet.example.dev", "v1", "widgets");
        let generic = factory.informer_for_resource(&gvr).expect("registered");
        assert_eq!(generic.resource().kind, "Widget");

        // the generic handle is the same informer the typed path yields
        let typed = factory.typed_informer::<DynamicObject>(&widgets());
        let downcast = generic.downcast::<DynamicObject>().expect("right kind");
        assert!(Arc::ptr_eq(&typed, &downcast));

        let unknown = GroupVersionResource::gvr("fleet.example.dev", "v1", "gizmos");
        assert!(factory.informer_for_resource(&unknown).is_none());
    }

    fn json_body(value: &serde_json::Value) -> UnsyncBoxBody<Bytes, Infallible> {
        Full::new(Bytes::from(serde_json::to_vec(value).unwrap())).boxed_unsync()
    }

    fn watch_body(lines: Vec<serde_json::Value>) -> UnsyncBoxBody<Bytes, Infallible> {
        let frames = lines.into_iter().map(|v| {
            let mut line = serde_json::to_vec(&v).unwrap();
            line.push(b'\n');
            Ok(http_body::Frame::data(Bytes::from(line)))
        });
        // leave the stream open after the scripted events, like a live watch
        StreamBody::new(futures::stream::iter(frames).chain(futures::stream::pending()))
            .boxed_unsync()
    }

    #[tokio::test]
    async fn run_all_syncs_stores_end_to_end() {
        let svc = tower::service_fn(|req: Request<helio_client::client::Body>| async move {
            let watching = req.uri().query().unwrap_or("").contains("watch=true");
            if watching {
                let event = serde_json::json!({
                    "type": "ADDED",
                    "object": {
                        "apiVersion": "fleet.example.dev/v1",
                        "kind": "Widget",
                        "metadata": { "name": "fresh", "namespace": "default",
                                      "resourceVersion": "11", "labels": { "app": "blog" } }
                    }
                });
                Ok::<_, Infallible>(Response::builder().body(watch_body(vec![event])).unwrap())
            } else {
                let list = serde_json::json!({
                    "apiVersion": "fleet.example.dev/v1",
                    "kind": "WidgetList",
                    "metadata": { "resourceVersion": "10" },
                    "items": [{
                        "metadata": { "name": "seed", "namespace": "default",
                                      "resourceVersion": "9", "labels": { "app": "blog" } }
                    }]
                });
                Ok(Response::builder().body(json_body(&list)).unwrap())
            }
        });

        let factory =
            SharedInformerFactory::new(Client::new(svc), Duration::from_secs(3600));
        let informer = factory.typed_informer::<DynamicObject>(&widgets());
        let lister = informer.lister();

        let handles = factory.run_all();
        assert_eq!(handles.len(), 1);
        // the loop was taken; a second run_all spawns nothing
        assert!(factory.run_all().is_empty());

        for _ in 0..100 {
            if informer.store().len() == 2 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(lister.get(Some("default"), "seed").is_ok());
        assert!(lister.get(Some("default"), "fresh").is_ok());
        assert_eq!(
            lister
                .list(Some("default"), &Selector::everything().eq("app", "blog"))
                .len(),
            2
        );

        for handle in handles {
            handle.abort();
        }
    }

    #[tokio::test]
    async fn watch_stream_ends_are_resumed() {
        // a watch body that closes immediately forces the loop to rewatch
        let svc = tower::service_fn(|req: Request<helio_client::client::Body>| async move {
            let watching = req.uri().query().unwrap_or("").contains("watch=true");
            if watching {
                Ok::<_, Infallible>(
                    Response::builder()
                        .body(Full::new(Bytes::new()).boxed_unsync())
                        .unwrap(),
                )
            } else {
                let list = serde_json::json!({
                    "metadata": { "resourceVersion": "10" },
                    "items": []
                });
                Ok(Response::builder().body(json_body(&list)).unwrap())
            }
        });

        let factory =
            SharedInformerFactory::new(Client::new(svc), Duration::from_secs(3600));
        let informer = factory.typed_informer::<DynamicObject>(&widgets());
        let handles = factory.run_all();

        // loop keeps running through empty watch responses
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(informer.store().is_empty());
        for handle in handles {
            handle.abort();
        }
    }
}

