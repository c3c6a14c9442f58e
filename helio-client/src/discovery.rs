//! High-level utilities for runtime API discovery.
//!
//! The [`Discovery`] client builds a full catalog of the resources a server
//! serves. Servers with aggregated discovery answer in a single round trip;
//! older servers are scanned with one bounded-concurrency request per group
//! version.
use std::collections::BTreeMap;

use futures::{StreamExt, TryStreamExt};
use http_body_util::BodyExt;

pub use helio_core::discovery::{verbs, ApiResource, Scope};
use helio_core::{
    discovery::{
        aggregated::{self, APIGroupDiscoveryList},
        legacy::{APIGroupList, APIResourceList},
    },
    gvk::{GroupVersion, GroupVersionResource},
};

use crate::{client::Body, Client, DiscoveryError, Error, Result};

const DEFAULT_FANOUT_WIDTH: usize = 10;

/// One resource as reported by discovery
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiscoveredResource {
    /// Plural name of the resource, used in url paths
    pub name: String,
    /// Singular name of the resource
    pub singular_name: String,
    /// Group of the returned kind, empty when the server did not report one
    pub group: String,
    /// Version of the returned kind, empty when the server did not report one
    pub version: String,
    /// Name of the returned kind, empty when the server did not report one
    pub kind: String,
    /// Whether objects of this resource live in namespaces
    pub namespaced: bool,
    /// Supported operation types
    pub verbs: Vec<String>,
    /// Suggested short names
    pub short_names: Vec<String>,
    /// Grouped-resource categories
    pub categories: Vec<String>,
    /// Names of subresources served under instances of this resource
    pub subresources: Vec<String>,
}

impl DiscoveredResource {
    /// Whether a given verb is supported on this resource
    pub fn supports_operation(&self, operation: &str) -> bool {
        self.verbs.iter().any(|op| op == operation)
    }

    /// The scope of the resource
    pub fn scope(&self) -> Scope {
        if self.namespaced {
            Scope::Namespaced
        } else {
            Scope::Cluster
        }
    }
}

/// The full set of resources served by an api server
///
/// Built fresh on every [`Discovery::run`]; group versions are kept sorted
/// for deterministic iteration.
#[derive(Clone, Debug, Default)]
pub struct DiscoveryCatalog {
    groups: BTreeMap<GroupVersion, Vec<DiscoveredResource>>,
}

impl DiscoveryCatalog {
    /// Iterate over all discovered group versions in sorted order
    pub fn groups(&self) -> impl Iterator<Item = &GroupVersion> {
        self.groups.keys()
    }

    /// The resources served under one group version
    pub fn get(&self, gv: &GroupVersion) -> Option<&[DiscoveredResource]> {
        self.groups.get(gv).map(Vec::as_slice)
    }

    /// Resolve a group-version-resource triple into an addressable [`ApiResource`]
    pub fn resolve_gvr(&self, gvr: &GroupVersionResource) -> Option<ApiResource> {
        let gv = GroupVersion::gv(&gvr.group, &gvr.version);
        let found = self.get(&gv)?.iter().find(|r| r.name == gvr.resource)?;
        Some(ApiResource {
            group: gv.group,
            version: gv.version,
            kind: found.kind.clone(),
            plural: found.name.clone(),
            namespaced: found.namespaced,
        })
    }

    fn insert(&mut self, gv: GroupVersion, resources: Vec<DiscoveredResource>) {
        self.groups.insert(gv, resources);
    }
}

/// A discovery client scanning the full api surface of a server
pub struct Discovery {
    client: Client,
    width: usize,
}

impl Discovery {
    /// Construct a discovery client
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            width: DEFAULT_FANOUT_WIDTH,
        }
    }

    /// Bound the number of concurrent group version fetches in the legacy protocol
    #[must_use]
    pub fn width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }

    /// Run the discovery algorithm and build a catalog
    ///
    /// A single request to `/apis` negotiates the protocol: servers with
    /// aggregated discovery answer with the whole catalog inline, others
    /// with a group list that is then fanned out over at most `width`
    /// concurrent per-group-version requests. The first failed fetch fails
    /// the call and drops its in-flight siblings.
    pub async fn run(&self) -> Result<DiscoveryCatalog> {
        let req = http::Request::get("/apis")
            .header(http::header::ACCEPT, aggregated::ACCEPT_AGGREGATED_DISCOVERY)
            .body(vec![])
            .map_err(Error::HttpError)?;
        let res = self.client.send(req.map(Body::from)).await?;
        let status = res.status();
        let is_aggregated = res
            .headers()
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(aggregated::is_aggregated_media_type);
        let body = res.into_body().collect().await?.to_bytes();
        let text = String::from_utf8(body.to_vec()).map_err(Error::FromUtf8)?;
        crate::client::handle_api_errors(&text, status)?;

        if is_aggregated {
            tracing::debug!("server supports aggregated discovery");
            let doc: APIGroupDiscoveryList =
                serde_json::from_str(&text).map_err(Error::SerdeError)?;
            Ok(from_aggregated(doc))
        } else {
            let groups: APIGroupList = serde_json::from_str(&text).map_err(Error::SerdeError)?;
            self.scan_groups(groups).await
        }
    }

    /// Legacy protocol: one resource list fetch per group version
    async fn scan_groups(&self, groups: APIGroupList) -> Result<DiscoveryCatalog> {
        let gvs = groups
            .groups
            .iter()
            .flat_map(|g| g.versions.iter().map(move |v| (g, v)))
            .map(|(g, v)| {
                // an entry without a version cannot be fetched
                if v.version.is_empty() {
                    return Err(Error::Discovery(DiscoveryError::InvalidGroupVersion(
                        v.group_version.clone(),
                    )));
                }
                Ok(GroupVersion::gv(&g.name, &v.version))
            })
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(group_versions = gvs.len(), "falling back to legacy discovery");

        let fetched = futures::stream::iter(gvs.into_iter().map(|gv| {
            let client = self.client.clone();
            async move {
                let url = if gv.group.is_empty() {
                    format!("/api/{}", gv.version)
                } else {
                    format!("/apis/{}/{}", gv.group, gv.version)
                };
                let req = http::Request::get(url).body(vec![]).map_err(Error::HttpError)?;
                let list = client.request::<APIResourceList>(req).await?;
                Ok::<_, Error>((gv, list))
            }
        }))
        .buffer_unordered(self.width.max(1))
        .try_collect::<Vec<_>>()
        .await?;

        // merge single-threaded after all fetches completed
        let mut catalog = DiscoveryCatalog::default();
        for (gv, list) in fetched {
            catalog.insert(gv, from_legacy_list(&list));
        }
        Ok(catalog)
    }
}

fn from_aggregated(doc: APIGroupDiscoveryList) -> DiscoveryCatalog {
    let mut catalog = DiscoveryCatalog::default();
    for group in doc.items {
        let group_name = group
            .metadata
            .and_then(|m| m.name)
            .unwrap_or_default();
        for version in group.versions {
            let gv = GroupVersion::gv(&group_name, &version.version);
            let resources = version
                .resources
                .into_iter()
                .map(|r| {
                    // zero-valued responseKind is kept as empty strings
                    let rk = r.response_kind.unwrap_or_default();
                    DiscoveredResource {
                        name: r.resource,
                        singular_name: r.singular_resource,
                        group: rk.group,
                        version: rk.version,
                        kind: rk.kind,
                        namespaced: r.scope == "Namespaced",
                        verbs: r.verbs,
                        short_names: r.short_names,
                        categories: r.categories,
                        subresources: r
                            .subresources
                            .into_iter()
                            .map(|s| s.subresource)
                            .collect(),
                    }
                })
                .collect();
            catalog.insert(gv, resources);
        }
    }
    catalog
}

fn from_legacy_list(list: &APIResourceList) -> Vec<DiscoveredResource> {
    let mut resources = Vec::new();
    for d in &list.resources {
        if d.name.contains('/') {
            continue;
        }
        resources.push(DiscoveredResource {
            name: d.name.clone(),
            singular_name: d.singular_name.clone(),
            group: d.group.clone().unwrap_or_default(),
            version: d.version.clone().unwrap_or_default(),
            kind: d.kind.clone(),
            namespaced: d.namespaced,
            verbs: d.verbs.clone(),
            short_names: d.short_names.clone(),
            categories: d.categories.clone(),
            subresources: Vec::new(),
        });
    }
    // subresources appear as separate `parent/sub` entries
    for d in &list.resources {
        if let Some((parent, sub)) = d.name.split_once('/') {
            if let Some(r) = resources.iter_mut().find(|r| r.name == parent) {
                r.subresources.push(sub.to_string());
            }
        }
    }
    resources
}

#[cfg(test)]
mod tests {
    use super::{verbs, Discovery};
    use crate::{client::Body, Client, DiscoveryError, Error};
    use helio_core::gvk::{GroupVersion, GroupVersionResource};

    use std::{
        convert::Infallible,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
        time::Duration,
    };

    use futures::pin_mut;
    use http::{Request, Response};
    use tower_test::mock;

    const AGGREGATED_CONTENT_TYPE: &str =
        "application/json;g=apidiscovery.k8s.io;v=v2beta1;as=APIGroupDiscoveryList";

    fn aggregated_doc() -> serde_json::Value {
        serde_json::json!({
            "kind": "APIGroupDiscoveryList",
            "items": [{
                "metadata": { "name": "fleet.example.dev" },
                "versions": [{
                    "version": "v1",
                    "resources": [{
                        "resource": "widgets",
                        "responseKind": { "group": "fleet.example.dev", "version": "v1", "kind": "Widget" },
                        "scope": "Namespaced",
                        "singularResource": "widget",
                        "verbs": ["get", "list", "watch"],
                        "subresources": [{ "subresource": "status", "verbs": ["get", "update"] }]
                    }, {
                        "resource": "gizmos",
                        "responseKind": {},
                        "scope": "Cluster",
                        "singularResource": "gizmo",
                        "verbs": ["get", "list"]
                    }]
                }]
            }]
        })
    }

    #[tokio::test]
    async fn aggregated_protocol_is_one_shot() {
        let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
        let spawned = tokio::spawn(async move {
            pin_mut!(handle);
            let (request, send) = handle.next_request().await.expect("service not called");
            assert_eq!(request.uri().to_string(), "/apis");
            let accept = request.headers().get(http::header::ACCEPT).unwrap();
            assert!(accept.to_str().unwrap().contains("apidiscovery.k8s.io"));
            send.send_response(
                Response::builder()
                    .header(http::header::CONTENT_TYPE, AGGREGATED_CONTENT_TYPE)
                    .body(Body::from(serde_json::to_vec(&aggregated_doc()).unwrap()))
                    .unwrap(),
            );
            // any further request would mean the legacy fan-out ran
            assert!(handle.next_request().await.is_none());
        });

        let discovery = Discovery::new(Client::new(mock_service));
        let catalog = discovery.run().await.unwrap();
        drop(discovery);

        let gv = GroupVersion::gv("fleet.example.dev", "v1");
        let resources = catalog.get(&gv).unwrap();
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0].kind, "Widget");
        assert_eq!(resources[0].subresources, vec!["status"]);
        assert!(resources[0].supports_operation(verbs::LIST));

        // a zero-valued responseKind maps to an empty identity
        assert_eq!(resources[1].name, "gizmos");
        assert_eq!(resources[1].kind, "");
        assert_eq!(resources[1].group, "");
        assert!(!resources[1].namespaced);

        let ar = catalog
            .resolve_gvr(&GroupVersionResource::gvr("fleet.example.dev", "v1", "widgets"))
            .unwrap();
        assert_eq!(ar.plural, "widgets");
        assert!(ar.namespaced);
        spawned.await.unwrap();
    }

    #[tokio::test]
    async fn legacy_protocol_fans_out_per_group_version() {
        let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
        let spawned = tokio::spawn(async move {
            pin_mut!(handle);
            let (request, send) = handle.next_request().await.expect("service not called");
            assert_eq!(request.uri().to_string(), "/apis");
            let groups = serde_json::json!({
                "kind": "APIGroupList",
                "groups": [{
                    "name": "fleet.example.dev",
                    "versions": [{ "groupVersion": "fleet.example.dev/v1", "version": "v1" }]
                }]
            });
            // no aggregated content type: plain json triggers the fallback
            send.send_response(
                Response::builder()
                    .header(http::header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&groups).unwrap()))
                    .unwrap(),
            );

            let (request, send) = handle.next_request().await.expect("no per-gv fetch");
            assert_eq!(request.uri().to_string(), "/apis/fleet.example.dev/v1");
            let list = serde_json::json!({
                "kind": "APIResourceList",
                "groupVersion": "fleet.example.dev/v1",
                "resources": [
                    { "name": "widgets", "singularName": "widget", "namespaced": true,
                      "kind": "Widget", "verbs": ["get", "list", "watch"] },
                    { "name": "widgets/status", "singularName": "", "namespaced": true,
                      "kind": "Widget", "verbs": ["get", "update"] }
                ]
            });
            send.send_response(
                Response::builder()
                    .body(Body::from(serde_json::to_vec(&list).unwrap()))
                    .unwrap(),
            );
        });

        let discovery = Discovery::new(Client::new(mock_service));
        let catalog = discovery.run().await.unwrap();

        let gv = GroupVersion::gv("fleet.example.dev", "v1");
        let resources = catalog.get(&gv).unwrap();
        assert_eq!(resources.len(), 1);
        assert_eq!(resources[0].name, "widgets");
        assert_eq!(resources[0].subresources, vec!["status"]);
        spawned.await.unwrap();
    }

    #[tokio::test]
    async fn legacy_rejects_malformed_group_versions() {
        let (mock_service, handle) = mock::pair::<Request<Body>, Response<Body>>();
        let spawned = tokio::spawn(async move {
            pin_mut!(handle);
            let (_request, send) = handle.next_request().await.expect("service not called");
            let groups = serde_json::json!({
                "groups": [{
                    "name": "fleet.example.dev",
                    "versions": [{ "groupVersion": "fleet.example.dev/", "version": "" }]
                }]
            });
            send.send_response(
                Response::builder()
                    .header(http::header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&groups).unwrap()))
                    .unwrap(),
            );
        });

        let discovery = Discovery::new(Client::new(mock_service));
        let err = discovery.run().await.unwrap_err();
        match err {
            Error::Discovery(DiscoveryError::InvalidGroupVersion(gv)) => {
                assert_eq!(gv, "fleet.example.dev/");
            }
            e => panic!("unexpected error: {e:?}"),
        }
        spawned.await.unwrap();
    }

    #[tokio::test]
    async fn legacy_fanout_is_bounded() {
        let num_gvs = 12;
        let width = 3;

        let inflight = Arc::new(AtomicUsize::new(0));
        let max_inflight = Arc::new(AtomicUsize::new(0));
        let total = Arc::new(AtomicUsize::new(0));

        let groups = serde_json::json!({
            "groups": (0..num_gvs).map(|i| serde_json::json!({
                "name": format!("g{i}.example.dev"),
                "versions": [{ "groupVersion": format!("g{i}.example.dev/v1"), "version": "v1" }]
            })).collect::<Vec<_>>()
        });

        let svc = tower::service_fn({
            let (inflight, max_inflight, total) =
                (inflight.clone(), max_inflight.clone(), total.clone());
            let groups = groups.clone();
            move |req: Request<Body>| {
                let (inflight, max_inflight, total) =
                    (inflight.clone(), max_inflight.clone(), total.clone());
                let groups = groups.clone();
                async move {
                    total.fetch_add(1, Ordering::SeqCst);
                    if req.uri().path() == "/apis" {
                        return Ok::<_, Infallible>(
                            Response::builder()
                                .header(http::header::CONTENT_TYPE, "application/json")
                                .body(Body::from(serde_json::to_vec(&groups).unwrap()))
                                .unwrap(),
                        );
                    }
                    let now = inflight.fetch_add(1, Ordering::SeqCst) + 1;
                    max_inflight.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    inflight.fetch_sub(1, Ordering::SeqCst);
                    let list = serde_json::json!({
                        "groupVersion": "ignored",
                        "resources": []
                    });
                    Ok(Response::builder()
                        .body(Body::from(serde_json::to_vec(&list).unwrap()))
                        .unwrap())
                }
            }
        });

        let discovery = Discovery::new(Client::new(svc)).width(width);
        let catalog = discovery.run().await.unwrap();

        assert_eq!(catalog.groups().count(), num_gvs);
        assert_eq!(total.load(Ordering::SeqCst), num_gvs + 1);
        assert!(max_inflight.load(Ordering::SeqCst) <= width);
    }

    #[tokio::test]
    async fn legacy_fanout_fails_on_first_error() {
        let svc = tower::service_fn(move |req: Request<Body>| async move {
            if req.uri().path() == "/apis" {
                let groups = serde_json::json!({
                    "groups": [
                        { "name": "ok.example.dev",
                          "versions": [{ "groupVersion": "ok.example.dev/v1", "version": "v1" }] },
                        { "name": "bad.example.dev",
                          "versions": [{ "groupVersion": "bad.example.dev/v1", "version": "v1" }] }
                    ]
                });
                return Ok::<_, Infallible>(
                    Response::builder()
                        .header(http::header::CONTENT_TYPE, "application/json")
                        .body(Body::from(serde_json::to_vec(&groups).unwrap()))
                        .unwrap(),
                );
            }
            if req.uri().path().starts_with("/apis/bad") {
                let status = serde_json::json!({
                    "status": "Failure",
                    "message": "boom",
                    "reason": "InternalError",
                    "code": 500
                });
                return Ok(Response::builder()
                    .status(500)
                    .body(Body::from(serde_json::to_vec(&status).unwrap()))
                    .unwrap());
            }
            let list = serde_json::json!({ "groupVersion": "ok.example.dev/v1", "resources": [] });
            Ok(Response::builder()
                .body(Body::from(serde_json::to_vec(&list).unwrap()))
                .unwrap())
        });

        let discovery = Discovery::new(Client::new(svc));
        let err = discovery.run().await.unwrap_err();
        match err {
            Error::Api(e) => assert_eq!(e.code, 500),
            e => panic!("unexpected error: {e:?}"),
        }
    }
}
