use std::path::Path;

use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Event, Node, PersistentVolumeClaim, Pod, Secret, Service};
use kube::api::{Api, ListParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tracing::info;

use crate::models::{
    ClusterSnapshot, DeploymentInfo, EventInfo, NodeInfo, PodInfo, SecretInfo, ServiceInfo,
    VolumeClaimInfo,
};

const ROLE_LABEL: &str = "kubernetes.io/role";
const ROLE_FALLBACK: &str = "N/A";

#[derive(Debug, thiserror::Error)]
pub enum InspectionError {
    #[error("reading kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),
    #[error("building cluster client: {0}")]
    Client(#[from] kube::Error),
    #[error("listing {kind}: {source}")]
    List {
        kind: &'static str,
        source: kube::Error,
    },
    #[error("building metrics request: {0}")]
    MetricsRequest(#[from] http::Error),
    #[error("querying {scope} metrics: {source}")]
    Metrics {
        scope: &'static str,
        source: kube::Error,
    },
}

pub struct Inspector {
    client: Client,
}

impl Inspector {
    /// Authenticates against the control plane named by `context` in the
    /// kubeconfig at `kubeconfig_path`.
    pub async fn connect(kubeconfig_path: &Path, context: &str) -> Result<Self, InspectionError> {
        let kubeconfig = Kubeconfig::read_from(kubeconfig_path)?;
        let options = KubeConfigOptions {
            context: Some(context.to_string()),
            ..Default::default()
        };
        let config = Config::from_custom_kubeconfig(kubeconfig, &options).await?;
        let client = Client::try_from(config)?;

        Ok(Self { client })
    }

    /// Runs the fixed sequence of read-only queries and assembles the
    /// snapshot. Any single query failure aborts the whole collection.
    pub async fn collect(&self) -> Result<ClusterSnapshot, InspectionError> {
        let nodes = self
            .list_all::<Node>("nodes")
            .await?
            .into_iter()
            .map(node_info)
            .collect::<Vec<_>>();
        let pods = self
            .list_all::<Pod>("pods")
            .await?
            .into_iter()
            .map(pod_info)
            .collect::<Vec<_>>();
        let services = self
            .list_all::<Service>("services")
            .await?
            .into_iter()
            .map(service_info)
            .collect::<Vec<_>>();
        let deployments = self
            .list_all::<Deployment>("deployments")
            .await?
            .into_iter()
            .map(deployment_info)
            .collect::<Vec<_>>();
        let pvcs = self
            .list_all::<PersistentVolumeClaim>("persistentvolumeclaims")
            .await?
            .into_iter()
            .map(volume_claim_info)
            .collect::<Vec<_>>();
        let secrets = self
            .list_all::<Secret>("secrets")
            .await?
            .into_iter()
            .map(secret_info)
            .collect::<Vec<_>>();
        let events = self
            .list_all::<Event>("events")
            .await?
            .into_iter()
            .map(event_info)
            .collect::<Vec<_>>();

        let nodes_usage = self.metrics("nodes").await?;
        let pods_usage = self.metrics("pods").await?;

        info!(
            "collected {} nodes, {} pods, {} services, {} deployments, {} events",
            nodes.len(),
            pods.len(),
            services.len(),
            deployments.len(),
            events.len()
        );

        Ok(ClusterSnapshot::assemble(
            nodes,
            pods,
            services,
            deployments,
            pvcs,
            secrets,
            events,
            nodes_usage,
            pods_usage,
        ))
    }

    async fn list_all<K>(&self, kind: &'static str) -> Result<Vec<K>, InspectionError>
    where
        K: kube::Resource + Clone + serde::de::DeserializeOwned + std::fmt::Debug,
        <K as kube::Resource>::DynamicType: Default,
    {
        let api: Api<K> = Api::all(self.client.clone());
        let list = api
            .list(&ListParams::default())
            .await
            .map_err(|source| InspectionError::List { kind, source })?;
        Ok(list.items)
    }

    // metrics.k8s.io is not a typed resource, so node and pod usage are
    // fetched as raw JSON and carried through the snapshot untouched.
    async fn metrics(&self, scope: &'static str) -> Result<serde_json::Value, InspectionError> {
        let request = http::Request::builder()
            .method("GET")
            .uri(format!("/apis/metrics.k8s.io/v1beta1/{scope}"))
            .body(Vec::new())?;

        self.client
            .request::<serde_json::Value>(request)
            .await
            .map_err(|source| InspectionError::Metrics { scope, source })
    }
}

fn node_info(node: Node) -> NodeInfo {
    let meta = node.metadata;
    let role = meta
        .labels
        .as_ref()
        .and_then(|labels| labels.get(ROLE_LABEL))
        .cloned()
        .unwrap_or_else(|| ROLE_FALLBACK.to_string());
    let status = node
        .status
        .and_then(|s| s.conditions)
        .and_then(|conditions| conditions.into_iter().find(|c| c.type_ == "Ready"))
        .map(|c| c.status)
        .unwrap_or_else(|| "Unknown".to_string());

    NodeInfo {
        name: meta.name.unwrap_or_default(),
        status,
        role,
    }
}

fn pod_info(pod: Pod) -> PodInfo {
    PodInfo {
        namespace: pod.metadata.namespace.unwrap_or_default(),
        name: pod.metadata.name.unwrap_or_default(),
        status: pod.status.and_then(|s| s.phase).unwrap_or_default(),
    }
}

fn service_info(service: Service) -> ServiceInfo {
    let spec = service.spec.unwrap_or_default();

    ServiceInfo {
        namespace: service.metadata.namespace.unwrap_or_default(),
        name: service.metadata.name.unwrap_or_default(),
        type_: spec.type_.unwrap_or_default(),
        cluster_ip: spec.cluster_ip.unwrap_or_default(),
    }
}

fn deployment_info(deployment: Deployment) -> DeploymentInfo {
    DeploymentInfo {
        namespace: deployment.metadata.namespace.unwrap_or_default(),
        name: deployment.metadata.name.unwrap_or_default(),
        replicas: deployment.spec.and_then(|s| s.replicas),
    }
}

fn volume_claim_info(pvc: PersistentVolumeClaim) -> VolumeClaimInfo {
    VolumeClaimInfo {
        namespace: pvc.metadata.namespace.unwrap_or_default(),
        name: pvc.metadata.name.unwrap_or_default(),
        status: pvc.status.and_then(|s| s.phase).unwrap_or_default(),
    }
}

fn secret_info(secret: Secret) -> SecretInfo {
    SecretInfo {
        namespace: secret.metadata.namespace.unwrap_or_default(),
        name: secret.metadata.name.unwrap_or_default(),
        type_: secret.type_.unwrap_or_default(),
    }
}

fn event_info(event: Event) -> EventInfo {
    EventInfo {
        namespace: event.metadata.namespace.unwrap_or_default(),
        name: event.metadata.name.unwrap_or_default(),
        message: event.message,
        type_: event.type_,
        reason: event.reason,
        timestamp: event.last_timestamp.map(|t| t.0),
    }
}
