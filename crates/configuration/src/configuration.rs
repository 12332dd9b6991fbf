//! Runtime configuration.

use std::collections::BTreeMap;

use crate::version1::ResourceConfiguration;

/// The 'Configuration' type collects all the information necessary to serve queries at runtime.
///
/// Values of this type are produced from a 'ParsedConfiguration' using
/// 'make_runtime_configuration', which resolves secrets and checks that
/// every resource is internally consistent.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub connection_uri: String,
    pub schema: String,
    pub export_limit: u32,
    pub resources: BTreeMap<String, ResourceConfiguration>,
}

impl Configuration {
    /// Lookup a resource by the name used to address it.
    pub fn lookup_resource(&self, name: &str) -> Option<&ResourceConfiguration> {
        self.resources.get(name)
    }
}
