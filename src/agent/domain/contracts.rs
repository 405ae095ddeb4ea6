//! The agent's in-process surface and the tools it depends on.
//!
//! Agents consume tools; they never provide them. Any payload that would
//! declare a tool as exposed by the agent is rejected.

use super::AgentDomainError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys that mark a tool entry as a provider declaration.
const PROVIDER_MARKERS: [&str; 2] = ["input_schema", "exposes"];

/// Direct in-process invocation surface of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentApi {
    entrypoint: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
}

impl AgentApi {
    /// Creates an API description for `entrypoint`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyEntrypoint`] when the value is
    /// blank.
    pub fn new(entrypoint: impl Into<String>) -> Result<Self, AgentDomainError> {
        let value = entrypoint.into().trim().to_owned();
        if value.is_empty() {
            return Err(AgentDomainError::EmptyEntrypoint);
        }
        Ok(Self {
            entrypoint: value,
            description: None,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns the entrypoint.
    #[must_use]
    pub fn entrypoint(&self) -> &str {
        &self.entrypoint
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// A tool an agent consumes, with where it is served from.
///
/// Deserialises from either a bare tool name or an object with
/// `tool_name` and the optional location fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawToolDependency")]
pub struct ToolDependency {
    tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mcp_server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wraps_service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    wraps_method: Option<String>,
}

impl ToolDependency {
    /// Creates a dependency on `tool_name`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyToolName`] when the name is blank.
    pub fn new(tool_name: impl Into<String>) -> Result<Self, AgentDomainError> {
        let name = tool_name.into().trim().to_owned();
        if name.is_empty() {
            return Err(AgentDomainError::EmptyToolName);
        }
        Ok(Self {
            tool_name: name,
            mcp_server: None,
            wraps_service: None,
            wraps_method: None,
        })
    }

    /// Names the MCP server hosting the tool. Blank values are ignored.
    #[must_use]
    pub fn with_mcp_server(mut self, server: impl Into<String>) -> Self {
        self.mcp_server = non_blank(&server.into());
        self
    }

    /// Names the service the tool wraps. Blank values are ignored.
    #[must_use]
    pub fn with_wraps_service(mut self, service: impl Into<String>) -> Self {
        self.wraps_service = non_blank(&service.into());
        self
    }

    /// Names the wrapped service method. Blank values are ignored.
    #[must_use]
    pub fn with_wraps_method(mut self, method: impl Into<String>) -> Self {
        self.wraps_method = non_blank(&method.into());
        self
    }

    fn validated(self) -> Result<Self, AgentDomainError> {
        let mut checked = Self::new(self.tool_name)?;
        checked.mcp_server = self.mcp_server.as_deref().and_then(non_blank);
        checked.wraps_service = self.wraps_service.as_deref().and_then(non_blank);
        checked.wraps_method = self.wraps_method.as_deref().and_then(non_blank);
        Ok(checked)
    }

    /// Returns the tool name.
    #[must_use]
    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    /// Returns the hosting MCP server, if known.
    #[must_use]
    pub fn mcp_server(&self) -> Option<&str> {
        self.mcp_server.as_deref()
    }

    /// Returns the wrapped service, if any.
    #[must_use]
    pub fn wraps_service(&self) -> Option<&str> {
        self.wraps_service.as_deref()
    }

    /// Returns the wrapped service method, if any.
    #[must_use]
    pub fn wraps_method(&self) -> Option<&str> {
        self.wraps_method.as_deref()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawToolDependency {
    Name(String),
    Detailed {
        #[serde(alias = "name")]
        tool_name: String,
        #[serde(default)]
        mcp_server: Option<String>,
        #[serde(default)]
        wraps_service: Option<String>,
        #[serde(default)]
        wraps_method: Option<String>,
    },
}

impl From<RawToolDependency> for ToolDependency {
    fn from(raw: RawToolDependency) -> Self {
        match raw {
            RawToolDependency::Name(tool_name) => Self {
                tool_name,
                mcp_server: None,
                wraps_service: None,
                wraps_method: None,
            },
            RawToolDependency::Detailed {
                tool_name,
                mcp_server,
                wraps_service,
                wraps_method,
            } => Self {
                tool_name,
                mcp_server,
                wraps_service,
                wraps_method,
            },
        }
    }
}

/// Contracts an agent declares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentContracts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    agent_api: Option<AgentApi>,
    #[serde(default)]
    mcp_tools: Vec<ToolDependency>,
}

impl AgentContracts {
    /// Creates an empty contract set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the in-process API.
    #[must_use]
    pub fn with_agent_api(mut self, api: AgentApi) -> Self {
        self.agent_api = Some(api);
        self
    }

    /// Sets the consumed tools by name, trimmed and de-duplicated in order.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyToolName`] for a blank name.
    pub fn with_mcp_tools(
        self,
        tools: impl IntoIterator<Item = String>,
    ) -> Result<Self, AgentDomainError> {
        let dependencies = tools
            .into_iter()
            .map(ToolDependency::new)
            .collect::<Result<Vec<_>, _>>()?;
        self.with_tool_dependencies(dependencies)
    }

    /// Sets the consumed tools. The first entry for a tool name wins.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::EmptyToolName`] for a blank name.
    pub fn with_tool_dependencies(
        mut self,
        tools: impl IntoIterator<Item = ToolDependency>,
    ) -> Result<Self, AgentDomainError> {
        let mut ordered: Vec<ToolDependency> = Vec::new();
        for raw in tools {
            let tool = raw.validated()?;
            if !ordered.iter().any(|known| known.tool_name == tool.tool_name) {
                ordered.push(tool);
            }
        }
        self.mcp_tools = ordered;
        Ok(self)
    }

    /// Parses a raw `{agent_api?, mcp_tools?}` payload.
    ///
    /// `mcp_tools` entries may be tool names or `{tool_name}` objects. An
    /// entry carrying `input_schema` or `exposes`, or a top-level `mcp_tool`
    /// key, declares a provided tool and is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`AgentDomainError::ExposedToolDeclared`] for provider-shaped
    /// payloads, and other [`AgentDomainError`] variants for malformed ones.
    pub fn from_json(payload: &Value) -> Result<Self, AgentDomainError> {
        let object = payload
            .as_object()
            .ok_or(AgentDomainError::MalformedContracts)?;
        let mut contracts = Self::new();
        let mut tools = Vec::new();
        for (key, value) in object {
            match key.as_str() {
                "agent_api" => contracts.agent_api = Some(parse_agent_api(value)?),
                "mcp_tools" => tools = parse_tool_entries(value)?,
                "mcp_tool" => return Err(AgentDomainError::ExposedToolDeclared(tool_label(value))),
                other => return Err(AgentDomainError::UnknownContract(other.to_owned())),
            }
        }
        contracts.with_tool_dependencies(tools)
    }

    pub(super) fn normalized(self) -> Result<Self, AgentDomainError> {
        let api = self
            .agent_api
            .map(|api| {
                let checked = AgentApi::new(api.entrypoint)?;
                Ok::<_, AgentDomainError>(match api.description {
                    Some(description) => checked.with_description(description),
                    None => checked,
                })
            })
            .transpose()?;
        Self {
            agent_api: api,
            mcp_tools: Vec::new(),
        }
        .with_tool_dependencies(self.mcp_tools)
    }

    /// Returns the in-process API, if declared.
    #[must_use]
    pub const fn agent_api(&self) -> Option<&AgentApi> {
        self.agent_api.as_ref()
    }

    /// Returns the consumed tools.
    #[must_use]
    pub fn mcp_tools(&self) -> &[ToolDependency] {
        &self.mcp_tools
    }

    /// Returns the consumed tool names in declaration order.
    pub fn tool_names(&self) -> impl Iterator<Item = &str> {
        self.mcp_tools.iter().map(ToolDependency::tool_name)
    }
}

fn parse_agent_api(value: &Value) -> Result<AgentApi, AgentDomainError> {
    let entrypoint = value
        .get("entrypoint")
        .and_then(Value::as_str)
        .ok_or(AgentDomainError::EmptyEntrypoint)?;
    let api = AgentApi::new(entrypoint)?;
    Ok(match value.get("description").and_then(Value::as_str) {
        Some(description) => api.with_description(description),
        None => api,
    })
}

fn parse_tool_entries(value: &Value) -> Result<Vec<ToolDependency>, AgentDomainError> {
    let entries = value
        .as_array()
        .ok_or_else(|| AgentDomainError::MalformedToolEntry(value.to_string()))?;
    entries.iter().map(parse_tool_entry).collect()
}

fn parse_tool_entry(entry: &Value) -> Result<ToolDependency, AgentDomainError> {
    match entry {
        Value::String(name) => ToolDependency::new(name.as_str()),
        Value::Object(fields) => {
            if PROVIDER_MARKERS.iter().any(|marker| fields.contains_key(*marker)) {
                return Err(AgentDomainError::ExposedToolDeclared(object_label(fields)));
            }
            let name = fields
                .get("tool_name")
                .or_else(|| fields.get("name"))
                .and_then(Value::as_str)
                .ok_or_else(|| AgentDomainError::MalformedToolEntry(entry.to_string()))?;
            Ok(ToolDependency::new(name)?
                .with_mcp_server(text_field(fields, "mcp_server"))
                .with_wraps_service(text_field(fields, "wraps_service"))
                .with_wraps_method(text_field(fields, "wraps_method")))
        }
        other => Err(AgentDomainError::MalformedToolEntry(other.to_string())),
    }
}

fn text_field<'a>(fields: &'a Map<String, Value>, key: &str) -> &'a str {
    fields.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

fn object_label(fields: &Map<String, Value>) -> String {
    fields
        .get("tool_name")
        .or_else(|| fields.get("name"))
        .and_then(Value::as_str)
        .unwrap_or("<unnamed>")
        .to_owned()
}

fn tool_label(value: &Value) -> String {
    value
        .as_object()
        .map_or_else(|| value.to_string(), object_label)
}
