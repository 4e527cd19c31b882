//! The client: owns the transport and performs every round trip.
//!
//! Request builders assemble model inputs without I/O; [`Client::execute`]
//! serializes an input, hands it to the [`Transport`] and deserializes the
//! output. Table lifecycle operations live here as well.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use dynakit_model::Operation;
use dynakit_model::input::{
    CreateTableInput, DeleteTableInput, DescribeTableInput, ListTablesInput, UpdateTableInput,
};
use dynakit_model::output::{
    CreateTableOutput, DeleteTableOutput, DescribeTableOutput, ListTablesOutput,
    UpdateTableOutput,
};
use dynakit_model::types::{
    ProvisionedThroughput, StreamSpecification, StreamViewType, TableDescription,
};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::schema::{AttributeDefinition, KeySchema};
use crate::table::TableHandle;
use crate::transport::{Transport, TransportError};

/// Client for one store endpoint. Cheap to clone.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client with default configuration.
    pub fn new(transport: impl Transport) -> Self {
        Self::from_config(ClientConfig::default(), transport)
    }

    /// Create a client with explicit configuration.
    pub fn from_config(config: ClientConfig, transport: impl Transport) -> Self {
        Self::with_shared_transport(config, Arc::new(transport))
    }

    /// Create a client around an already shared transport.
    #[must_use]
    pub fn with_shared_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        Self { transport, config }
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Default delay between pages of a count.
    #[must_use]
    pub fn count_delay(&self) -> Duration {
        self.config.count_delay()
    }

    /// Serialize `input`, submit it and deserialize the response.
    pub async fn execute<I, O>(&self, operation: Operation, input: &I) -> Result<O>
    where
        I: Serialize + Sync,
        O: DeserializeOwned,
    {
        let body = serde_json::to_vec(input).map_err(TransportError::Encode)?;
        debug!(%operation, bytes = body.len(), "submitting request");

        let response = match self.transport.submit(operation, Bytes::from(body)).await {
            Ok(response) => response,
            Err(err) => {
                warn!(%operation, error = %err, "request failed");
                return Err(err.into());
            }
        };

        serde_json::from_slice(&response).map_err(|e| {
            warn!(%operation, error = %e, "undecodable response");
            Error::from(TransportError::Decode(e))
        })
    }

    // -----------------------------------------------------------------------
    // Table lifecycle
    // -----------------------------------------------------------------------

    /// List all table names, following pagination until exhausted.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut input = ListTablesInput::default();
        loop {
            let page: ListTablesOutput = self.execute(Operation::ListTables, &input).await?;
            names.extend(page.table_names);
            match page.last_evaluated_table_name {
                Some(last) if !last.is_empty() => input.exclusive_start_table_name = Some(last),
                _ => break,
            }
        }
        Ok(names)
    }

    /// Describe a table.
    pub async fn describe_table(&self, name: &str) -> Result<TableDescription> {
        let input = DescribeTableInput {
            table_name: name.to_owned(),
        };
        let output: DescribeTableOutput = self
            .execute(Operation::DescribeTable, &input)
            .await
            .map_err(|e| e.not_found_as(name))?;
        output.table.ok_or_else(|| Error::NotFound(name.to_owned()))
    }

    /// Create a table.
    pub async fn create_table(&self, request: &CreateTableRequest) -> Result<TableDescription> {
        let input = request.to_input()?;
        debug!(table = %request.name, keys = input.key_schema.len(), "creating table");
        let output: CreateTableOutput = self.execute(Operation::CreateTable, &input).await?;
        Ok(output.table_description.unwrap_or_default())
    }

    /// Change throughput or stream settings of a table.
    pub async fn update_table(&self, request: &UpdateTableRequest) -> Result<TableDescription> {
        let input = UpdateTableInput {
            table_name: request.name.clone(),
            provisioned_throughput: request.throughput,
            stream_specification: request.stream.map(StreamSetting::specification),
        };
        let output: UpdateTableOutput = self
            .execute(Operation::UpdateTable, &input)
            .await
            .map_err(|e| e.not_found_as(&request.name))?;
        Ok(output.table_description.unwrap_or_default())
    }

    /// Delete a table.
    pub async fn delete_table(&self, name: &str) -> Result<TableDescription> {
        let input = DeleteTableInput {
            table_name: name.to_owned(),
        };
        let output: DeleteTableOutput = self
            .execute(Operation::DeleteTable, &input)
            .await
            .map_err(|e| e.not_found_as(name))?;
        Ok(output.table_description.unwrap_or_default())
    }

    /// Look up a table and bind its key schema.
    pub async fn table(&self, name: &str) -> Result<TableHandle> {
        let description = self.describe_table(name).await?;
        TableHandle::from_description(description)
    }

    /// Create a table and return a handle bound to the requested schema.
    pub async fn create_table_handle(&self, request: &CreateTableRequest) -> Result<TableHandle> {
        let schema = KeySchema::from_definitions(request.keys.clone())?;
        let description = self.create_table(request).await?;
        Ok(TableHandle::new(request.name.clone(), schema).with_description(description))
    }
}

/// Stream setting of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSetting {
    /// No stream.
    Disabled,
    /// Stream with the given view.
    Enabled(StreamViewType),
}

impl StreamSetting {
    /// Parse `NO` or a stream view name such as `NEW_AND_OLD_IMAGES`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let setting = match name.to_ascii_uppercase().as_str() {
            "NO" => Self::Disabled,
            "KEYS_ONLY" => Self::Enabled(StreamViewType::KeysOnly),
            "NEW_IMAGE" => Self::Enabled(StreamViewType::NewImage),
            "OLD_IMAGE" => Self::Enabled(StreamViewType::OldImage),
            "NEW_AND_OLD_IMAGES" => Self::Enabled(StreamViewType::NewAndOldImages),
            _ => return None,
        };
        Some(setting)
    }

    fn specification(self) -> StreamSpecification {
        match self {
            Self::Disabled => StreamSpecification {
                stream_enabled: false,
                stream_view_type: None,
            },
            Self::Enabled(view) => StreamSpecification {
                stream_enabled: true,
                stream_view_type: Some(view),
            },
        }
    }
}

/// Parameters of a new table.
#[derive(Debug, Clone)]
pub struct CreateTableRequest {
    name: String,
    keys: Vec<AttributeDefinition>,
    throughput: Option<ProvisionedThroughput>,
    stream: Option<StreamSetting>,
}

impl CreateTableRequest {
    /// A table keyed by `keys`: the hash key first, then an optional range key.
    pub fn new(name: impl Into<String>, keys: Vec<AttributeDefinition>) -> Self {
        Self {
            name: name.into(),
            keys,
            throughput: None,
            stream: None,
        }
    }

    /// Provision read and write capacity.
    #[must_use]
    pub fn throughput(mut self, read: i64, write: i64) -> Self {
        self.throughput = Some(ProvisionedThroughput {
            read_capacity_units: read,
            write_capacity_units: write,
        });
        self
    }

    /// Configure the change stream.
    #[must_use]
    pub fn stream(mut self, setting: StreamSetting) -> Self {
        self.stream = Some(setting);
        self
    }

    /// The table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Assemble the wire input, checking the key count.
    pub fn to_input(&self) -> Result<CreateTableInput> {
        let schema = KeySchema::from_definitions(self.keys.clone())?;
        Ok(CreateTableInput {
            table_name: self.name.clone(),
            key_schema: schema.key_schema_elements(),
            attribute_definitions: schema.attribute_definitions(),
            provisioned_throughput: self.throughput,
            local_secondary_indexes: Vec::new(),
            stream_specification: self.stream.map(StreamSetting::specification),
        })
    }
}

/// Changes to an existing table.
#[derive(Debug, Clone)]
pub struct UpdateTableRequest {
    name: String,
    throughput: Option<ProvisionedThroughput>,
    stream: Option<StreamSetting>,
}

impl UpdateTableRequest {
    /// Start an update of `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            throughput: None,
            stream: None,
        }
    }

    /// New read and write capacity.
    #[must_use]
    pub fn throughput(mut self, read: i64, write: i64) -> Self {
        self.throughput = Some(ProvisionedThroughput {
            read_capacity_units: read,
            write_capacity_units: write,
        });
        self
    }

    /// New stream setting.
    #[must_use]
    pub fn stream(mut self, setting: StreamSetting) -> Self {
        self.stream = Some(setting);
        self
    }
}
