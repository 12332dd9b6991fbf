//! Convert the parsed configuration into the runtime configuration.

use crate::configuration::Configuration;
use crate::environment::Environment;
use crate::error::MakeRuntimeConfigurationError;
use crate::values::{ConnectionUri, Secret};
use crate::version1::{ParsedConfiguration, CONFIGURATION_FILENAME};

/// Resolve the connection URI against the environment and check that every
/// resource's default sort names one of its fields.
pub fn make_runtime_configuration(
    parsed_config: ParsedConfiguration,
    environment: impl Environment,
) -> Result<Configuration, MakeRuntimeConfigurationError> {
    let connection_uri = match parsed_config.connection_uri {
        ConnectionUri(Secret::Plain(uri)) => Ok(uri),
        ConnectionUri(Secret::FromEnvironment { variable }) => {
            environment.read(&variable).map_err(|error| {
                MakeRuntimeConfigurationError::MissingEnvironmentVariable {
                    file_path: CONFIGURATION_FILENAME.into(),
                    message: error.to_string(),
                }
            })
        }
    }?;

    for (name, resource) in &parsed_config.resources {
        if let Some(default) = resource
            .query
            .default_sort
            .iter()
            .find(|default| resource.query.lookup_field(&default.field).is_none())
        {
            return Err(MakeRuntimeConfigurationError::UnknownDefaultSortField {
                resource: name.clone(),
                field: default.field.clone(),
            });
        }
    }

    Ok(Configuration {
        connection_uri,
        schema: parsed_config.schema,
        export_limit: parsed_config.export_limit,
        resources: parsed_config.resources,
    })
}
