//! Request parameter optionals for the generic backend calls.
use crate::request::Error;
use serde::Serialize;

/// Common query parameters for get calls
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetParams {
    /// An explicit resourceVersion to read at
    pub resource_version: Option<String>,
}

impl GetParams {
    /// Sets the resource version
    #[must_use]
    pub fn at(resource_version: &str) -> Self {
        Self {
            resource_version: Some(resource_version.into()),
        }
    }

    /// Accept any stale data from the server's cache
    #[must_use]
    pub fn any() -> Self {
        Self::at("0")
    }
}

/// Common query parameters used in list calls on collections
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListParams {
    /// A selector to restrict the list of returned objects by their labels.
    ///
    /// Defaults to everything if `None`.
    pub label_selector: Option<String>,

    /// A selector to restrict the list of returned objects by their fields.
    ///
    /// Defaults to everything if `None`.
    pub field_selector: Option<String>,

    /// Timeout for the list call.
    ///
    /// This limits the duration of the call, regardless of any activity or
    /// inactivity, and is forwarded to the server as `timeoutSeconds`.
    pub timeout: Option<u32>,

    /// Limit the number of results.
    ///
    /// If there are more results, the server will respond with a continue
    /// token which can be used to fetch another page of results.
    pub limit: Option<u32>,

    /// Fetch a second page of results using a continue token.
    pub continue_token: Option<String>,

    /// An explicit resourceVersion to list at.
    pub resource_version: Option<String>,
}

impl ListParams {
    /// Configure the timeout for the list call
    #[must_use]
    pub fn timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout = Some(timeout_secs);
        self
    }

    /// Configure the selector to restrict returned objects by their fields
    #[must_use]
    pub fn fields(mut self, field_selector: &str) -> Self {
        self.field_selector = Some(field_selector.to_string());
        self
    }

    /// Configure the selector to restrict returned objects by their labels
    #[must_use]
    pub fn labels(mut self, label_selector: &str) -> Self {
        self.label_selector = Some(label_selector.to_string());
        self
    }

    /// Sets a result limit
    #[must_use]
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets a continue token
    #[must_use]
    pub fn continue_token(mut self, token: &str) -> Self {
        self.continue_token = Some(token.to_string());
        self
    }

    /// Sets the resource version to list at
    #[must_use]
    pub fn at(mut self, resource_version: &str) -> Self {
        self.resource_version = Some(resource_version.into());
        self
    }

    pub(crate) fn populate_qp(&self, qp: &mut form_urlencoded::Serializer<String>) {
        if let Some(fields) = &self.field_selector {
            qp.append_pair("fieldSelector", fields);
        }
        if let Some(labels) = &self.label_selector {
            qp.append_pair("labelSelector", labels);
        }
        if let Some(limit) = &self.limit {
            qp.append_pair("limit", &limit.to_string());
        }
        if let Some(timeout) = &self.timeout {
            qp.append_pair("timeoutSeconds", &timeout.to_string());
        }
        if let Some(continue_token) = &self.continue_token {
            qp.append_pair("continue", continue_token);
        } else if let Some(rv) = &self.resource_version {
            qp.append_pair("resourceVersion", rv.as_str());
        }
    }
}

/// Common query parameters used in watch calls
#[derive(Clone, Debug, PartialEq)]
pub struct WatchParams {
    /// A selector to restrict watched objects by their labels.
    pub label_selector: Option<String>,

    /// A selector to restrict watched objects by their fields.
    pub field_selector: Option<String>,

    /// Timeout for the watch call.
    ///
    /// This limits the duration of the call, regardless of any activity or
    /// inactivity. Defaults to 290s when unset, mirroring the list timeout
    /// derivation.
    pub timeout: Option<u32>,

    /// Enable watch bookmarks from the server to minimize replays on restart
    pub bookmarks: bool,
}

impl Default for WatchParams {
    fn default() -> Self {
        Self {
            label_selector: None,
            field_selector: None,
            timeout: None,
            bookmarks: true,
        }
    }
}

impl WatchParams {
    /// Configure the timeout for the watch call
    #[must_use]
    pub fn timeout(mut self, timeout_secs: u32) -> Self {
        self.timeout = Some(timeout_secs);
        self
    }

    /// Configure the selector to restrict watched objects by their fields
    #[must_use]
    pub fn fields(mut self, field_selector: &str) -> Self {
        self.field_selector = Some(field_selector.to_string());
        self
    }

    /// Configure the selector to restrict watched objects by their labels
    #[must_use]
    pub fn labels(mut self, label_selector: &str) -> Self {
        self.label_selector = Some(label_selector.to_string());
        self
    }

    /// Disable watch bookmarks
    #[must_use]
    pub fn disable_bookmarks(mut self) -> Self {
        self.bookmarks = false;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if let Some(0) = self.timeout {
            return Err(Error::Validation(
                "WatchParams::timeout must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Common parameters for create and update calls
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PostParams {
    /// Whether to run this as a dry run and not persist changes
    pub dry_run: bool,
    /// The name of the actor performing the change, recorded by the server
    pub field_manager: Option<String>,
}

impl PostParams {
    pub(crate) fn populate_qp(&self, qp: &mut form_urlencoded::Serializer<String>) {
        if self.dry_run {
            qp.append_pair("dryRun", "All");
        }
        if let Some(fm) = &self.field_manager {
            qp.append_pair("fieldManager", fm);
        }
    }
}

/// Common parameters for delete calls, serialized into the request body
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteParams {
    /// When present, indicates that modifications should not be persisted
    #[serde(serialize_with = "dry_run_all_ser", skip_serializing_if = "is_false")]
    pub dry_run: bool,

    /// The duration in seconds before the object should be deleted.
    ///
    /// Zero means delete immediately, `None` means the kind's default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grace_period_seconds: Option<u32>,
}

fn is_false(b: &bool) -> bool {
    !b
}

// dryRun serializes as a list on delete bodies, unlike its query form
fn dry_run_all_ser<S: serde::Serializer>(_: &bool, s: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeTuple;
    let mut map = s.serialize_tuple(1)?;
    map.serialize_element("All")?;
    map.end()
}
