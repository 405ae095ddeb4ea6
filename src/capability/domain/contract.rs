//! Contract payloads describing how a capability is invoked.
//!
//! Each contract kind has a fixed schema. Constructors validate their
//! inputs; [`CapabilityContracts::validated`] re-checks payloads that arrived
//! through deserialisation.

use super::CapabilityDomainError;
use crate::route::domain::HttpMethod;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Discriminant naming a contract kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    /// Service-oriented API invoked through a handler reference.
    SoaApi,
    /// Tool-invocation contract.
    McpTool,
    /// Public REST endpoint.
    RestApi,
}

impl ContractKind {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SoaApi => "soa_api",
            Self::McpTool => "mcp_tool",
            Self::RestApi => "rest_api",
        }
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to an in-process handler, resolved at invocation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HandlerRef(String);

impl HandlerRef {
    /// Creates a handler reference.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::EmptyHandlerReference`] when the
    /// value is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, CapabilityDomainError> {
        let normalized = value.into().trim().to_owned();
        if normalized.is_empty() {
            return Err(CapabilityDomainError::EmptyHandlerReference);
        }
        Ok(Self(normalized))
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HandlerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn normalize_endpoint(kind: ContractKind, raw: String) -> Result<String, CapabilityDomainError> {
    let endpoint = raw.trim().to_owned();
    if !endpoint.starts_with('/') {
        return Err(CapabilityDomainError::InvalidEndpoint { kind, endpoint });
    }
    Ok(endpoint)
}

/// SOA API contract: an endpoint backed by an in-process handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoaApiContract {
    api_name: String,
    endpoint: String,
    method: HttpMethod,
    handler: HandlerRef,
}

impl SoaApiContract {
    /// Creates a validated SOA API contract.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError`] when the API name is blank, the
    /// endpoint is not an absolute path, or the method is unknown.
    pub fn new(
        api_name: impl Into<String>,
        endpoint: impl Into<String>,
        method: &str,
        handler: HandlerRef,
    ) -> Result<Self, CapabilityDomainError> {
        let contract = Self {
            api_name: api_name.into().trim().to_owned(),
            endpoint: endpoint.into(),
            method: HttpMethod::try_from(method)?,
            handler,
        };
        contract.validated()
    }

    fn validated(self) -> Result<Self, CapabilityDomainError> {
        if self.api_name.trim().is_empty() {
            return Err(CapabilityDomainError::EmptyApiName);
        }
        if self.handler.as_str().trim().is_empty() {
            return Err(CapabilityDomainError::EmptyHandlerReference);
        }
        let endpoint = normalize_endpoint(ContractKind::SoaApi, self.endpoint)?;
        Ok(Self { endpoint, ..self })
    }

    /// Returns the API name.
    #[must_use]
    pub fn api_name(&self) -> &str {
        &self.api_name
    }

    /// Returns the endpoint path.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the handler reference.
    #[must_use]
    pub const fn handler(&self) -> &HandlerRef {
        &self.handler
    }
}

/// REST API contract: a public endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestApiContract {
    endpoint: String,
    method: HttpMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    handler: Option<HandlerRef>,
}

impl RestApiContract {
    /// Creates a validated REST API contract.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError`] when the endpoint is not an
    /// absolute path or the method is unknown.
    pub fn new(endpoint: impl Into<String>, method: &str) -> Result<Self, CapabilityDomainError> {
        Ok(Self {
            endpoint: normalize_endpoint(ContractKind::RestApi, endpoint.into())?,
            method: HttpMethod::try_from(method)?,
            handler: None,
        })
    }

    fn validated(self) -> Result<Self, CapabilityDomainError> {
        let endpoint = normalize_endpoint(ContractKind::RestApi, self.endpoint)?;
        Ok(Self { endpoint, ..self })
    }

    /// Sets the handler serving this endpoint.
    #[must_use]
    pub fn with_handler(mut self, handler: HandlerRef) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Returns the endpoint path.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the optional handler reference.
    #[must_use]
    pub const fn handler(&self) -> Option<&HandlerRef> {
        self.handler.as_ref()
    }
}

/// Tool-invocation contract: a tool name and its parameter schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McpToolContract {
    tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mcp_server: Option<String>,
    input_schema: Value,
}

impl McpToolContract {
    /// Creates a validated tool contract.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::EmptyToolName`] when the name is
    /// blank or [`CapabilityDomainError::InvalidToolSchema`] when
    /// `input_schema` is not a JSON object.
    pub fn new(
        tool_name: impl Into<String>,
        input_schema: Value,
    ) -> Result<Self, CapabilityDomainError> {
        Self {
            tool_name: tool_name.into().trim().to_owned(),
            mcp_server: None,
            input_schema,
        }
        .validated()
    }

    fn validated(self) -> Result<Self, CapabilityDomainError> {
        if self.tool_name.trim().is_empty() {
            return Err(CapabilityDomainError::EmptyToolName);
        }
        if !self.input_schema.is_object() {
            return Err(CapabilityDomainError::InvalidToolSchema(self.tool_name));
        }
        Ok(self)
    }

    /// Names the tool server hosting this tool.
    #[must_use]
    pub fn with_mcp_server(mut self, server: impl Into<String>) -> Self {
        self.mcp_server = Some(server.into());
        self
    }

    /// Returns the tool name.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the hosting server name, if declared.
    #[must_use]
    pub fn mcp_server(&self) -> Option<&str> {
        self.mcp_server.as_deref()
    }

    /// Returns the parameter schema.
    #[must_use]
    pub const fn input_schema(&self) -> &Value {
        &self.input_schema
    }
}

/// The set of contracts a capability declares, at most one per kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityContracts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    soa_api: Option<SoaApiContract>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mcp_tool: Option<McpToolContract>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rest_api: Option<RestApiContract>,
}

impl CapabilityContracts {
    /// Creates an empty contract set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the SOA API contract.
    #[must_use]
    pub fn with_soa_api(mut self, contract: SoaApiContract) -> Self {
        self.soa_api = Some(contract);
        self
    }

    /// Sets the tool contract.
    #[must_use]
    pub fn with_mcp_tool(mut self, contract: McpToolContract) -> Self {
        self.mcp_tool = Some(contract);
        self
    }

    /// Sets the REST API contract.
    #[must_use]
    pub fn with_rest_api(mut self, contract: RestApiContract) -> Self {
        self.rest_api = Some(contract);
        self
    }

    /// Returns the SOA API contract, if declared.
    #[must_use]
    pub const fn soa_api(&self) -> Option<&SoaApiContract> {
        self.soa_api.as_ref()
    }

    /// Returns the tool contract, if declared.
    #[must_use]
    pub const fn mcp_tool(&self) -> Option<&McpToolContract> {
        self.mcp_tool.as_ref()
    }

    /// Returns the REST API contract, if declared.
    #[must_use]
    pub const fn rest_api(&self) -> Option<&RestApiContract> {
        self.rest_api.as_ref()
    }

    /// Returns whether no contract is declared.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.soa_api.is_none() && self.mcp_tool.is_none() && self.rest_api.is_none()
    }

    /// Returns the declared contract kinds in canonical order.
    #[must_use]
    pub fn kinds(&self) -> Vec<ContractKind> {
        [
            self.soa_api.as_ref().map(|_| ContractKind::SoaApi),
            self.mcp_tool.as_ref().map(|_| ContractKind::McpTool),
            self.rest_api.as_ref().map(|_| ContractKind::RestApi),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Checks that at least one contract is declared and every declared
    /// payload matches its schema, normalising endpoints in place.
    ///
    /// # Errors
    ///
    /// Returns [`CapabilityDomainError::NoContracts`] for an empty set, or the
    /// first payload validation failure.
    pub fn validated(self) -> Result<Self, CapabilityDomainError> {
        if self.is_empty() {
            return Err(CapabilityDomainError::NoContracts);
        }
        Ok(Self {
            soa_api: self.soa_api.map(SoaApiContract::validated).transpose()?,
            mcp_tool: self.mcp_tool.map(McpToolContract::validated).transpose()?,
            rest_api: self.rest_api.map(RestApiContract::validated).transpose()?,
        })
    }
}
