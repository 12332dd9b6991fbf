//! Version 1 of the on-disk configuration format.

use std::collections::BTreeMap;
use std::path::Path;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tokio::fs;

use query_engine_metadata::metadata::{
    FieldSpec, FilterOperator, QueryConfiguration, SortDirection, ValueType,
};

use crate::error::{ParseConfigurationError, WriteParsedConfigurationError};
use crate::values::{ConnectionUri, Secret};

pub const CURRENT_VERSION: u32 = 1;
pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const CONFIGURATION_JSONSCHEMA_FILENAME: &str = "schema.json";
pub const DEFAULT_CONNECTION_URI_VARIABLE: &str = "SIMPLE_REST_DATABASE_URL";

const DEFAULT_SCHEMA: &str = "public";
const DEFAULT_EXPORT_LIMIT: u32 = 1000;
const DEFAULT_KEY_COLUMN: &str = "id";

/// The configuration as it is written on disk: how to connect to the
/// database, and what each list endpoint may filter and sort on.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParsedConfiguration {
    /// Which version of the configuration format are we using
    pub version: u32,
    pub connection_uri: ConnectionUri,
    /// The database schema every resource table lives in.
    #[serde(default = "default_schema")]
    pub schema: String,
    /// The most rows an export may return.
    #[serde(default = "default_export_limit")]
    pub export_limit: u32,
    #[serde(default)]
    pub resources: BTreeMap<String, ResourceConfiguration>,
}

/// A table exposed as a list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResourceConfiguration {
    pub table: String,
    /// The column exports are ordered by.
    #[serde(default = "default_key_column")]
    pub key_column: String,
    pub query: QueryConfiguration,
}

fn default_schema() -> String {
    DEFAULT_SCHEMA.to_string()
}

fn default_export_limit() -> u32 {
    DEFAULT_EXPORT_LIMIT
}

fn default_key_column() -> String {
    DEFAULT_KEY_COLUMN.to_string()
}

impl ResourceConfiguration {
    pub fn new(table: impl Into<String>, query: QueryConfiguration) -> Self {
        Self {
            table: table.into(),
            key_column: default_key_column(),
            query,
        }
    }
}

impl ParsedConfiguration {
    /// A configuration with no resources, reading its connection URI from
    /// the default environment variable.
    pub fn empty() -> Self {
        Self {
            version: CURRENT_VERSION,
            connection_uri: ConnectionUri(Secret::from_environment(
                DEFAULT_CONNECTION_URI_VARIABLE,
            )),
            schema: default_schema(),
            export_limit: DEFAULT_EXPORT_LIMIT,
            resources: BTreeMap::new(),
        }
    }

    /// The catalogue of the admin application: categories, products and tags.
    pub fn initial() -> Self {
        let mut configuration = Self::empty();
        configuration.resources = BTreeMap::from([
            ("categories".to_string(), categories()),
            ("products".to_string(), products()),
            ("tags".to_string(), tags()),
        ]);
        configuration
    }
}

fn categories() -> ResourceConfiguration {
    ResourceConfiguration::new(
        "categories",
        QueryConfiguration::empty()
            .with_field(
                "id",
                FieldSpec::new("id", ValueType::Number)
                    .sortable()
                    .filterable(&[FilterOperator::Eq]),
            )
            .with_field(
                "name",
                FieldSpec::new("name", ValueType::String)
                    .sortable()
                    .filterable(&[FilterOperator::Like]),
            )
            .with_field(
                "isActive",
                FieldSpec::new("is_active", ValueType::Boolean)
                    .sortable()
                    .filterable(&[FilterOperator::Eq]),
            )
            .with_field(
                "createdAt",
                FieldSpec::new("created_at", ValueType::Date).sortable(),
            )
            .with_field(
                "updatedAt",
                FieldSpec::new("updated_at", ValueType::Date).sortable(),
            )
            .with_default_sort("id", SortDirection::Asc),
    )
}

fn products() -> ResourceConfiguration {
    ResourceConfiguration::new(
        "products",
        QueryConfiguration::empty()
            .with_field(
                "id",
                FieldSpec::new("id", ValueType::Number)
                    .sortable()
                    .filterable(&[FilterOperator::Eq]),
            )
            .with_field(
                "categoryId",
                FieldSpec::new("category_id", ValueType::Number)
                    .sortable()
                    .filterable(&[FilterOperator::Eq]),
            )
            .with_field(
                "name",
                FieldSpec::new("name", ValueType::String)
                    .sortable()
                    .filterable(&[FilterOperator::Like]),
            )
            .with_field(
                "status",
                FieldSpec::new("status", ValueType::String)
                    .with_column_type("status")
                    .sortable()
                    .filterable(&[FilterOperator::Like, FilterOperator::Eq]),
            )
            .with_field(
                "price",
                FieldSpec::new("price", ValueType::Number)
                    .sortable()
                    .filterable(&[FilterOperator::Gte, FilterOperator::Lte]),
            )
            .with_field(
                "stock",
                FieldSpec::new("stock", ValueType::Number)
                    .sortable()
                    .filterable(&[FilterOperator::Gte, FilterOperator::Lte]),
            )
            .with_field(
                "availableAt",
                FieldSpec::new("available_at", ValueType::Date)
                    .sortable()
                    .filterable(&[FilterOperator::Gte, FilterOperator::Lte]),
            )
            .with_field(
                "createdAt",
                FieldSpec::new("created_at", ValueType::Date).sortable(),
            )
            .with_field(
                "updatedAt",
                FieldSpec::new("updated_at", ValueType::Date).sortable(),
            )
            .with_default_sort("id", SortDirection::Asc),
    )
}

fn tags() -> ResourceConfiguration {
    ResourceConfiguration::new(
        "tags",
        QueryConfiguration::empty()
            .with_field(
                "id",
                FieldSpec::new("id", ValueType::Number)
                    .sortable()
                    .filterable(&[FilterOperator::Eq]),
            )
            .with_field(
                "name",
                FieldSpec::new("name", ValueType::String)
                    .sortable()
                    .filterable(&[FilterOperator::Like]),
            )
            .with_default_sort("id", SortDirection::Asc),
    )
}

/// Only the version tag, read before the rest of the file so that an
/// unknown version is reported as such rather than as a parse error.
#[derive(Deserialize)]
struct VersionTag {
    version: Option<serde_json::Value>,
}

/// Parse the configuration format from a directory.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<ParsedConfiguration, ParseConfigurationError> {
    let configuration_file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);

    let configuration_file_contents =
        fs::read_to_string(&configuration_file)
            .await
            .map_err(|err| {
                ParseConfigurationError::IoErrorButStringified(format!(
                    "{}: {}",
                    &configuration_file.display(),
                    err
                ))
            })?;

    let parse_error = |error: serde_json::Error| ParseConfigurationError::ParseError {
        file_path: configuration_file.clone(),
        line: error.line(),
        column: error.column(),
        message: error.to_string(),
    };

    let version_tag: VersionTag =
        serde_json::from_str(&configuration_file_contents).map_err(parse_error)?;
    match version_tag.version {
        None => {
            return Err(ParseConfigurationError::DidNotFindExpectedVersionTag(
                configuration_file.clone(),
            ))
        }
        Some(version) if version.as_u64() != Some(u64::from(CURRENT_VERSION)) => {
            return Err(ParseConfigurationError::UnsupportedVersion {
                file_path: configuration_file.clone(),
                version: version.to_string(),
            })
        }
        Some(_) => {}
    }

    let parsed_config: ParsedConfiguration =
        serde_json::from_str(&configuration_file_contents).map_err(parse_error)?;

    if parsed_config.connection_uri == ConnectionUri(Secret::Plain(String::new())) {
        return Err(ParseConfigurationError::EmptyConnectionUri {
            file_path: configuration_file,
        });
    }

    tracing::debug!(
        resources = parsed_config.resources.len(),
        "parsed configuration from {}",
        configuration_file.display()
    );

    Ok(parsed_config)
}

/// Write the parsed configuration into a directory on disk, together with
/// the JSON schema describing it.
pub async fn write_parsed_configuration(
    parsed_config: &ParsedConfiguration,
    out_dir: impl AsRef<Path>,
) -> Result<(), WriteParsedConfigurationError> {
    let configuration_file = out_dir.as_ref().to_owned().join(CONFIGURATION_FILENAME);
    fs::create_dir_all(out_dir.as_ref()).await?;

    // create the configuration file
    fs::write(
        configuration_file,
        serde_json::to_string_pretty(parsed_config)? + "\n",
    )
    .await?;

    // create the jsonschema file
    let configuration_jsonschema_file_path = out_dir
        .as_ref()
        .to_owned()
        .join(CONFIGURATION_JSONSCHEMA_FILENAME);

    let output = schemars::schema_for!(ParsedConfiguration);
    fs::write(
        &configuration_jsonschema_file_path,
        serde_json::to_string_pretty(&output)? + "\n",
    )
    .await?;

    Ok(())
}
