//! Generic resource operations over one group version.
use either::Either;
use futures::stream::BoxStream;
use serde::{de::DeserializeOwned, Serialize};

use helio_core::{
    gvk::GroupVersion,
    object::ObjectList,
    params::{DeleteParams, GetParams, ListParams, PostParams, WatchParams},
    request::{self, Request},
    response::Status,
    watch::WatchEvent,
    DynamicObject, Meta,
};

use crate::{Client, Error, Result};

/// A generic client for the resources of one group version
///
/// One `Backend` serves every kind under its group version; the plural
/// resource name selects the collection per call, so resources only known
/// through discovery need no per-kind client type. The namespaced and
/// cluster-scoped call forms collapse into an `Option<&str>` namespace.
#[derive(Clone)]
pub struct Backend {
    client: Client,
    gv: GroupVersion,
}

impl Backend {
    /// Construct a backend for one group version
    pub fn new(client: Client, gv: GroupVersion) -> Self {
        Self { client, gv }
    }

    /// The group version this backend addresses
    pub fn group_version(&self) -> &GroupVersion {
        &self.gv
    }

    fn request(&self, namespace: Option<&str>, resource: &str) -> Request {
        Request::new(Request::resource_path(&self.gv, namespace, resource))
    }

    /// Get a named instance of a resource
    pub async fn get<K>(
        &self,
        resource: &str,
        namespace: Option<&str>,
        name: &str,
        gp: &GetParams,
    ) -> Result<K>
    where
        K: DeserializeOwned,
    {
        let req = self
            .request(namespace, resource)
            .get(name, gp)
            .map_err(Error::BuildRequest)?;
        self.client.request::<K>(req).await
    }

    /// List instances of a resource
    ///
    /// `ListParams::timeout` is forwarded to the server as `timeoutSeconds`.
    pub async fn list<K>(
        &self,
        resource: &str,
        namespace: Option<&str>,
        lp: &ListParams,
    ) -> Result<ObjectList<K>>
    where
        K: Clone + DeserializeOwned,
    {
        let req = self
            .request(namespace, resource)
            .list(lp)
            .map_err(Error::BuildRequest)?;
        self.client.request::<ObjectList<K>>(req).await
    }

    /// Create an instance of a resource
    ///
    /// The target namespace is the object's own `metadata.namespace`.
    pub async fn create<K>(&self, resource: &str, pp: &PostParams, data: &K) -> Result<K>
    where
        K: Meta + Serialize + DeserializeOwned,
    {
        let bytes = serde_json::to_vec(data).map_err(Error::SerdeError)?;
        let req = self
            .request(data.namespace(), resource)
            .create(pp, bytes)
            .map_err(Error::BuildRequest)?;
        self.client.request::<K>(req).await
    }

    /// Replace an instance of a resource
    ///
    /// The object's own name and namespace address the instance; an object
    /// without `metadata.name` fails locally before any request is sent.
    pub async fn update<K>(&self, resource: &str, pp: &PostParams, data: &K) -> Result<K>
    where
        K: Meta + Serialize + DeserializeOwned,
    {
        let name = named(data)?;
        let bytes = serde_json::to_vec(data).map_err(Error::SerdeError)?;
        let req = self
            .request(data.namespace(), resource)
            .replace(name, pp, bytes)
            .map_err(Error::BuildRequest)?;
        self.client.request::<K>(req).await
    }

    /// Replace the `/status` subresource of an instance
    pub async fn update_status<K>(&self, resource: &str, pp: &PostParams, data: &K) -> Result<K>
    where
        K: Meta + Serialize + DeserializeOwned,
    {
        let name = named(data)?;
        let bytes = serde_json::to_vec(data).map_err(Error::SerdeError)?;
        let req = self
            .request(data.namespace(), resource)
            .replace_subresource("status", name, pp, bytes)
            .map_err(Error::BuildRequest)?;
        self.client.request::<K>(req).await
    }

    /// Delete a named instance of a resource
    ///
    /// Returns the deleted object when deletion is in progress, or a
    /// [`Status`] when the deletion is immediate.
    pub async fn delete(
        &self,
        resource: &str,
        namespace: Option<&str>,
        name: &str,
        dp: &DeleteParams,
    ) -> Result<Either<DynamicObject, Status>> {
        let req = self
            .request(namespace, resource)
            .delete(name, dp)
            .map_err(Error::BuildRequest)?;
        self.client.request_status::<DynamicObject>(req).await
    }

    /// Watch a resource collection from a given resource version
    ///
    /// The stream ends when the server-side timeout expires (290s unless set
    /// in `wp`); callers are expected to re-watch from the last seen version.
    pub async fn watch<K>(
        &self,
        resource: &str,
        namespace: Option<&str>,
        wp: &WatchParams,
        version: &str,
    ) -> Result<BoxStream<'static, Result<WatchEvent<K>>>>
    where
        K: Clone + DeserializeOwned + Send + 'static,
    {
        let req = self
            .request(namespace, resource)
            .watch(wp, version)
            .map_err(Error::BuildRequest)?;
        self.client.request_events::<K>(req).await
    }
}

fn named<K: Meta>(data: &K) -> Result<&str> {
    data.name().ok_or_else(|| {
        Error::BuildRequest(request::Error::Validation(
            "object has no metadata.name".into(),
        ))
    })
}
