//! The commands behind the `simple-rest` binary.

use std::io::Write;
use std::path::PathBuf;

use clap::Subcommand;
use tracing::{info_span, Instrument};

use query_engine_execution::{metrics::Metrics, query};
use query_engine_sql::sql;
use query_engine_translation::translation::plan::{self, TableTarget};
use query_engine_translation::translation::query::{parse, ParsedRequest, QueryParams};
use simple_rest_configuration::environment::Environment;
use simple_rest_configuration::{
    make_runtime_configuration, parse_configuration, write_parsed_configuration,
    ParsedConfiguration, ResourceConfiguration,
};

/// The various contextual bits and bobs we need to run.
pub struct Context<Env: Environment> {
    pub configuration_dir: PathBuf,
    pub environment: Env,
    /// Where query metrics are registered while a command runs.
    pub metrics_registry: prometheus::Registry,
    /// Print the collected metrics after running a query.
    pub print_metrics: bool,
}

/// The command invoked by the user.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write the initial configuration, describing the admin catalogue.
    Initialize,
    /// Print the parsed request and the SQL that would serve it.
    Translate {
        #[arg(long)]
        resource: String,
        /// The query string of the list request, such as `_sort=name&name_like=chair`.
        #[arg(default_value = "")]
        query: String,
    },
    /// Run a list request and print the total count followed by the page.
    List {
        #[arg(long)]
        resource: String,
        #[arg(default_value = "")]
        query: String,
    },
    /// Run an export: every matching row in key order, up to the export limit.
    Export {
        #[arg(long)]
        resource: String,
        #[arg(default_value = "")]
        query: String,
    },
}

/// Run a command in a given directory.
pub async fn run(
    command: Command,
    context: Context<impl Environment>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Initialize => initialize(&context).await,
        Command::Translate { resource, query } => translate(&context, &resource, &query, out).await,
        Command::List { resource, query } => list(context, &resource, &query, out).await,
        Command::Export { resource, query } => export(context, &resource, &query, out).await,
    }
}

async fn initialize(context: &Context<impl Environment>) -> anyhow::Result<()> {
    write_parsed_configuration(&ParsedConfiguration::initial(), &context.configuration_dir).await?;
    tracing::info!(
        "wrote the initial configuration to {}",
        context.configuration_dir.display()
    );
    Ok(())
}

async fn translate(
    context: &Context<impl Environment>,
    resource_name: &str,
    query_string: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    // translating never needs the database, so secrets stay unresolved.
    let parsed = parse_configuration(&context.configuration_dir).await?;
    let resource = find_resource(&parsed.resources, resource_name)?;
    let target = TableTarget::new(parsed.schema.clone(), resource.table.clone());

    let request = parse_request(resource, query_string);
    let list = plan::translate_list(&target, &request);

    writeln!(out, "{}", serde_json::to_string_pretty(&request)?)?;
    write_sql(out, "count", &list.count_sql())?;
    write_sql(out, "rows", &list.rows_sql())?;
    Ok(())
}

async fn list(
    mut context: Context<impl Environment>,
    resource_name: &str,
    query_string: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let configuration = make_runtime_configuration(
        parse_configuration(&context.configuration_dir).await?,
        context.environment,
    )?;
    let resource = find_resource(&configuration.resources, resource_name)?;
    let target = TableTarget::new(configuration.schema.clone(), resource.table.clone());

    let request = parse_request(resource, query_string);
    let (pool, metrics) =
        connect(&configuration.connection_uri, &mut context.metrics_registry).await?;

    let result = query::execute_list(&pool, &metrics, &plan::translate_list(&target, &request))
        .instrument(info_span!("Execute list", resource = resource_name))
        .await;
    metrics.update_pool_metrics(&pool);
    let result = result?;

    writeln!(out, "X-Total-Count: {}", result.total)?;
    writeln!(out, "{}", serde_json::to_string_pretty(&result.rows)?)?;
    if context.print_metrics {
        write_metrics(out, &context.metrics_registry)?;
    }
    Ok(())
}

async fn export(
    mut context: Context<impl Environment>,
    resource_name: &str,
    query_string: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let configuration = make_runtime_configuration(
        parse_configuration(&context.configuration_dir).await?,
        context.environment,
    )?;
    let resource = find_resource(&configuration.resources, resource_name)?;
    let target = TableTarget::new(configuration.schema.clone(), resource.table.clone());

    let request = parse_request(resource, query_string);
    let select = plan::translate_export(
        &target,
        &request,
        &resource.key_column,
        u64::from(configuration.export_limit),
    );
    let (pool, metrics) =
        connect(&configuration.connection_uri, &mut context.metrics_registry).await?;

    let rows = query::execute_rows(&pool, &metrics, &select)
        .instrument(info_span!("Execute export", resource = resource_name))
        .await;
    metrics.update_pool_metrics(&pool);
    let rows = rows?;

    writeln!(out, "{}", serde_json::to_string_pretty(&rows)?)?;
    if context.print_metrics {
        write_metrics(out, &context.metrics_registry)?;
    }
    Ok(())
}

fn find_resource<'a>(
    resources: &'a std::collections::BTreeMap<String, ResourceConfiguration>,
    name: &str,
) -> anyhow::Result<&'a ResourceConfiguration> {
    resources.get(name).ok_or_else(|| {
        let known: Vec<&str> = resources.keys().map(String::as_str).collect();
        anyhow::anyhow!("unknown resource {name:?}; expected one of {known:?}")
    })
}

fn parse_request(resource: &ResourceConfiguration, query_string: &str) -> ParsedRequest {
    parse(&QueryParams::parse(query_string), &resource.query, vec![])
}

async fn connect(
    connection_uri: &str,
    metrics_registry: &mut prometheus::Registry,
) -> anyhow::Result<(sqlx::PgPool, Metrics)> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect(connection_uri)
        .instrument(info_span!("Connect to database"))
        .await?;
    let metrics = Metrics::initialize(metrics_registry)?;
    metrics.update_pool_metrics(&pool);
    Ok((pool, metrics))
}

/// Write the registry in the Prometheus text exposition format.
fn write_metrics(
    out: &mut impl Write,
    metrics_registry: &prometheus::Registry,
) -> anyhow::Result<()> {
    let encoded = prometheus::TextEncoder::new().encode_to_string(&metrics_registry.gather())?;
    writeln!(out, "\n-- metrics\n{encoded}")?;
    Ok(())
}

fn write_sql(out: &mut impl Write, label: &str, query: &sql::string::SQL) -> anyhow::Result<()> {
    let pretty = sqlformat::format(
        &query.sql,
        &sqlformat::QueryParams::None,
        sqlformat::FormatOptions::default(),
    );
    let params: Vec<(usize, &sql::string::Param)> = query
        .params
        .iter()
        .enumerate()
        .map(|(i, p)| (i + 1, p))
        .collect();

    writeln!(out, "\n-- {label}\n{pretty}\n-- params: {params:?}")?;
    Ok(())
}
