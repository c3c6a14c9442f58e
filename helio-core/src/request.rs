//! Request builder type for the generic backend.
use crate::{
    gvk::GroupVersion,
    params::{DeleteParams, GetParams, ListParams, PostParams, WatchParams},
};
use thiserror::Error;

pub(crate) const DEFAULT_WATCH_TIMEOUT_SECS: u32 = 290;

/// Possible errors when building a request.
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to build a http request.
    #[error("failed to build request: {0}")]
    BuildRequest(#[source] http::Error),

    /// Failed to serialize body.
    #[error("failed to serialize body: {0}")]
    SerializeBody(#[source] serde_json::Error),

    /// Failed to validate request parameters.
    #[error("request validation failed: {0}")]
    Validation(String),
}

/// A request builder for one resource collection
///
/// Takes a url path to the collection and supplies constructors for the
/// common operations. The operations all return [`http::Request`] objects.
#[derive(Debug, Clone)]
pub struct Request {
    /// The path component of the collection url
    pub url_path: String,
}

impl Request {
    /// New request with a resource collection's url path
    pub fn new<S: Into<String>>(url_path: S) -> Self {
        Self {
            url_path: url_path.into(),
        }
    }

    /// Compute the url path of a resource collection
    ///
    /// The empty group routes through the legacy `/api` prefix, everything
    /// else through `/apis/{group}`. A namespace segment is inserted for
    /// namespaced calls.
    pub fn resource_path(gv: &GroupVersion, namespace: Option<&str>, resource: &str) -> String {
        let api = if gv.group.is_empty() {
            format!("/api/{}", gv.version)
        } else {
            format!("/apis/{}/{}", gv.group, gv.version)
        };
        match namespace {
            Some(ns) => format!("{api}/namespaces/{ns}/{resource}"),
            None => format!("{api}/{resource}"),
        }
    }
}

/// Convenience methods found from API conventions
impl Request {
    /// Get a single instance
    pub fn get(&self, name: &str, gp: &GetParams) -> Result<http::Request<Vec<u8>>, Error> {
        let target = format!("{}/{}?", self.url_path, name);
        let mut qp = form_urlencoded::Serializer::new(target);
        if let Some(rv) = &gp.resource_version {
            qp.append_pair("resourceVersion", rv.as_str());
        }
        let urlstr = qp.finish();
        let req = http::Request::get(urlstr);
        req.body(vec![]).map_err(Error::BuildRequest)
    }

    /// List a collection of a resource
    pub fn list(&self, lp: &ListParams) -> Result<http::Request<Vec<u8>>, Error> {
        let target = format!("{}?", self.url_path);
        let mut qp = form_urlencoded::Serializer::new(target);
        lp.populate_qp(&mut qp);
        let urlstr = qp.finish();
        let req = http::Request::get(urlstr);
        req.body(vec![]).map_err(Error::BuildRequest)
    }

    /// Watch a collection of a resource from a given version
    ///
    /// Always sets `watch=true`, and derives `timeoutSeconds` the same way
    /// as list calls (falling back to 290s when unset).
    pub fn watch(&self, wp: &WatchParams, ver: &str) -> Result<http::Request<Vec<u8>>, Error> {
        wp.validate()?;
        let target = format!("{}?", self.url_path);
        let mut qp = form_urlencoded::Serializer::new(target);

        qp.append_pair("watch", "true");
        qp.append_pair("resourceVersion", ver);

        qp.append_pair(
            "timeoutSeconds",
            &wp.timeout.unwrap_or(DEFAULT_WATCH_TIMEOUT_SECS).to_string(),
        );
        if let Some(fields) = &wp.field_selector {
            qp.append_pair("fieldSelector", fields);
        }
        if let Some(labels) = &wp.label_selector {
            qp.append_pair("labelSelector", labels);
        }
        if wp.bookmarks {
            qp.append_pair("allowWatchBookmarks", "true");
        }

        let urlstr = qp.finish();
        let req = http::Request::get(urlstr);
        req.body(vec![]).map_err(Error::BuildRequest)
    }

    /// Create an instance of a resource
    pub fn create(&self, pp: &PostParams, data: Vec<u8>) -> Result<http::Request<Vec<u8>>, Error> {
        let target = format!("{}?", self.url_path);
        let mut qp = form_urlencoded::Serializer::new(target);
        pp.populate_qp(&mut qp);
        let urlstr = qp.finish();
        let req = http::Request::post(urlstr);
        req.body(data).map_err(Error::BuildRequest)
    }

    /// Replace an instance of a resource
    ///
    /// Requires `metadata.resourceVersion` set in data
    pub fn replace(
        &self,
        name: &str,
        pp: &PostParams,
        data: Vec<u8>,
    ) -> Result<http::Request<Vec<u8>>, Error> {
        let target = format!("{}/{}?", self.url_path, name);
        let mut qp = form_urlencoded::Serializer::new(target);
        pp.populate_qp(&mut qp);
        let urlstr = qp.finish();
        let req = http::Request::put(urlstr);
        req.body(data).map_err(Error::BuildRequest)
    }

    /// Replace an instance of a subresource
    pub fn replace_subresource(
        &self,
        subresource_name: &str,
        name: &str,
        pp: &PostParams,
        data: Vec<u8>,
    ) -> Result<http::Request<Vec<u8>>, Error> {
        let target = format!("{}/{}/{}?", self.url_path, name, subresource_name);
        let mut qp = form_urlencoded::Serializer::new(target);
        pp.populate_qp(&mut qp);
        let urlstr = qp.finish();
        let req = http::Request::put(urlstr);
        req.body(data).map_err(Error::BuildRequest)
    }

    /// Delete an instance of a resource
    pub fn delete(&self, name: &str, dp: &DeleteParams) -> Result<http::Request<Vec<u8>>, Error> {
        let target = format!("{}/{}?", self.url_path, name);
        let qp = form_urlencoded::Serializer::new(target);
        let urlstr = qp.finish();
        let body = serde_json::to_vec(&dp).map_err(Error::SerializeBody)?;
        let req = http::Request::delete(urlstr);
        req.body(body).map_err(Error::BuildRequest)
    }
}
