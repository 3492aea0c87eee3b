//! GridDB web API endpoints

use serde::Serialize;

use super::request::TqlRequest;
use crate::variable::VariableQuery;

/// Number of containers listed for a container variable
pub const CONTAINER_LIST_LIMIT: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Method {
    #[serde(rename = "GET")]
    Get,
    #[serde(rename = "POST")]
    Post,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// One endpoint of `/griddb/v2/{cluster}/dbs/{database}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Execute TQL statements
    Tql,
    /// List containers
    Containers { limit: usize },
    /// Schema of one container
    ContainerInfo { container: String },
    /// Connectivity check
    CheckConnection,
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Self::Tql => Method::Post,
            _ => Method::Get,
        }
    }

    /// Path below the server root, with path parameters percent-encoded
    pub fn path(&self, cluster: &str, database: &str) -> String {
        let base = format!(
            "/griddb/v2/{}/dbs/{}",
            urlencoding::encode(cluster),
            urlencoding::encode(database)
        );

        match self {
            Self::Tql => format!("{}/tql", base),
            Self::Containers { .. } => format!("{}/containers", base),
            Self::ContainerInfo { container } => {
                format!("{}/containers/{}/info", base, urlencoding::encode(container))
            }
            Self::CheckConnection => format!("{}/checkConnection", base),
        }
    }

    /// Query string parameters
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Containers { limit } => vec![("limit", limit.to_string())],
            _ => Vec::new(),
        }
    }

    /// Absolute URL on one server
    pub fn url(&self, server: &str, cluster: &str, database: &str) -> String {
        let mut url = format!("{}{}", server.trim_end_matches('/'), self.path(cluster, database));
        let params = self.params();
        if !params.is_empty() {
            let query: Vec<String> = params
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect();
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }
}

/// A request ready to be sent: endpoint plus optional JSON body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    pub endpoint: Endpoint,
    pub body: Option<Vec<TqlRequest>>,
}

impl ApiCall {
    pub fn get(endpoint: Endpoint) -> Self {
        Self { endpoint, body: None }
    }

    pub fn tql(requests: Vec<TqlRequest>) -> Self {
        Self {
            endpoint: Endpoint::Tql,
            body: Some(requests),
        }
    }
}

impl VariableQuery {
    /// Endpoint that answers this variable query
    pub fn endpoint(&self) -> Endpoint {
        match self {
            Self::ContainerList => Endpoint::Containers {
                limit: CONTAINER_LIST_LIMIT,
            },
            Self::ColumnList { container } => Endpoint::ContainerInfo {
                container: container.clone(),
            },
            Self::DataQuery { .. } => Endpoint::Tql,
        }
    }
}
