pub mod openai;

pub use openai::Provider;

use crate::models::{ClusterSnapshot, Overview};

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("serializing cluster snapshot: {0}")]
    Payload(#[from] serde_yaml::Error),
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion endpoint returned {status}: {body}")]
    Endpoint { status: u16, body: String },
    #[error("completion returned no choices")]
    NoChoices,
}

/// Turns a snapshot into a natural-language status report through the
/// configured completion provider.
pub struct Narrator {
    provider: Provider,
}

impl Narrator {
    pub fn new(provider: Provider) -> Self {
        Self { provider }
    }

    pub async fn narrate(
        &self,
        snapshot: &ClusterSnapshot,
        language: &str,
    ) -> Result<String, GenerationError> {
        let system = system_prompt(&snapshot.overview, language);
        let payload = format!("Kubernetes Info: {}", serde_yaml::to_string(snapshot)?);
        let report = self.provider.submit(&system, &payload).await?;

        Ok(report.trim().to_string())
    }
}

// The prompt fixes the report structure; the overview counts are baked into
// the example so the model repeats them instead of re-counting.
fn system_prompt(overview: &Overview, language: &str) -> String {
    format!(
        r#"# Instruction
 - You are an assistant specialized in Kubernetes. Using the provided Kubernetes cluster information, generate a comprehensive status report.
 - You must generate the report in {language}
 - Your responses should be informative, visually appealing, logical and actionable.

# Report Example:
# Kubernetes Cluster Status Report

## Node Status:
- For each node, include:
    - Name
    - Role
    - Status
    - Resource Usage (CPU in m, Memory in Gi)

## OverView:
- Nodes(Agent/Users) : {node_agents}/{node_users} ea
- Namespaces : {namespaces} ea
- Services : {services} ea
- Deployments : {deployments} ea
- StatefulSets : {statefulsets} ea
- ReplicaSets : {replicasets} ea
- Pods : {pods} ea
- PersistentVolumeClaims : {pvcs} ea
- Secrets : {secrets} ea

## Pod Status:
- Include the overall pod status across all nodes (e.g., all pods are running)
- Highlight key pods, including their namespace, name, status, and resource usage (CPU in m, Memory in Gi)

## Deployment Status:
- For each namespace, list all deployments, including the name and replica count

## Service Status:
- For each namespace, list all services, including the name, type, and cluster IP

## Events:
- List any significant events, including their namespace, name, message, type, reason, and timestamp

## Potential Issues and Recommendations:
- Identify any pods with high CPU or memory usage and recommend adjustments
- Suggest scaling strategies if necessary
- Recommend setting up monitoring tools
- Provide suggestions for namespace and node pool management"#,
        language = language,
        node_agents = overview.node_agents,
        node_users = overview.node_users,
        namespaces = overview.namespaces,
        services = overview.services,
        deployments = overview.deployments,
        statefulsets = overview.statefulsets,
        replicasets = overview.replicasets,
        pods = overview.pods,
        pvcs = overview.pvcs,
        secrets = overview.secrets,
    )
}
