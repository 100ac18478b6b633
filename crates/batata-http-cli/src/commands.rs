//! Subcommand handlers

use std::io::Write;
use std::sync::Arc;

use batata_http_client::{
    BatataConfigClient, BatataNamingClient, ConfigIdentity, ConfigRequest, ConfigService,
    HttpTransport, NamingService, ServerEndpoint, ServiceInstance, ServiceRequest,
};
use tracing::info;

use crate::settings::{Command, ListInstancesArgs, RegisterArgs};

pub async fn run(
    command: Command,
    transport: Arc<HttpTransport>,
    endpoints: Vec<ServerEndpoint>,
) -> anyhow::Result<()> {
    match command {
        Command::GetConfig(args) => {
            let client = BatataConfigClient::with_transport(transport);
            let request = ConfigRequest::new(
                ConfigIdentity::new(&args.namespace, &args.group, &args.data_id),
                endpoints,
            );
            let content = client.get_config(&request).await?;

            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&content)?;
            stdout.flush()?;
        }
        Command::Register(args) => {
            let client = BatataNamingClient::with_transport(transport);
            let request = ServiceRequest::new(register_instance(args), endpoints);
            let registered = client.register_service(&request).await?;

            info!(
                "Registered {}:{} to service {}",
                request.instance.ip, request.instance.port, request.instance.service_name
            );
            println!("{}", registered);
        }
        Command::ListInstances(args) => {
            let client = BatataNamingClient::with_transport(transport);
            let request = ServiceRequest::new(lookup_template(args), endpoints);
            let list = client.get_service(&request).await?;

            println!("{}", serde_json::to_string_pretty(&list)?);
        }
    }

    Ok(())
}

fn register_instance(args: RegisterArgs) -> ServiceInstance {
    ServiceInstance {
        ip: args.ip,
        port: args.port,
        namespace_id: args.namespace_id,
        weight: args.weight,
        enabled: !args.disabled,
        healthy: !args.unhealthy,
        metadata: args.metadata,
        cluster_name: args.cluster_name,
        service_name: args.service_name,
        group_name: args.group_name,
        ephemeral: !args.persistent,
    }
}

/// Instance template whose naming fields drive the lookup query
fn lookup_template(args: ListInstancesArgs) -> ServiceInstance {
    ServiceInstance {
        namespace_id: args.namespace_id,
        healthy: args.healthy_only,
        cluster_name: args.clusters,
        service_name: args.service_name,
        group_name: args.group_name,
        ..Default::default()
    }
}
