use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

// Minimal projections of the cluster objects the report cares about. Only
// these fields reach the model; full API objects are never retained.

#[derive(Debug, Clone, Serialize)]
pub struct NodeInfo {
    pub name: String,
    pub status: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PodInfo {
    pub namespace: String,
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub namespace: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub cluster_ip: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeploymentInfo {
    pub namespace: String,
    pub name: String,
    pub replicas: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VolumeClaimInfo {
    pub namespace: String,
    pub name: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecretInfo {
    pub namespace: String,
    pub name: String,
    #[serde(rename = "type")]
    pub type_: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventInfo {
    pub namespace: String,
    pub name: String,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    pub reason: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Summary counts derived from the snapshot's own lists; there is no second
/// source of truth behind them.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Overview {
    pub node_agents: usize,
    pub node_users: usize,
    pub namespaces: usize,
    pub services: usize,
    pub deployments: usize,
    pub statefulsets: usize,
    pub replicasets: usize,
    pub pods: usize,
    pub pvcs: usize,
    pub secrets: usize,
}

impl Overview {
    pub fn from_lists(
        nodes: &[NodeInfo],
        pods: &[PodInfo],
        services: &[ServiceInfo],
        deployments: &[DeploymentInfo],
        pvcs: &[VolumeClaimInfo],
        secrets: &[SecretInfo],
    ) -> Self {
        let namespaces: HashSet<&str> = pods.iter().map(|p| p.namespace.as_str()).collect();

        Self {
            node_agents: nodes.iter().filter(|n| n.role.contains("agent")).count(),
            node_users: nodes.iter().filter(|n| n.role.contains("user")).count(),
            namespaces: namespaces.len(),
            services: services.len(),
            deployments: deployments.len(),
            // StatefulSet/ReplicaSet counts are a name-substring heuristic
            // over the deployments list, not separate typed queries.
            statefulsets: deployments
                .iter()
                .filter(|d| d.name.to_lowercase().contains("statefulset"))
                .count(),
            replicasets: deployments
                .iter()
                .filter(|d| d.name.to_lowercase().contains("replicaset"))
                .count(),
            pods: pods.len(),
            pvcs: pvcs.len(),
            secrets: secrets.len(),
        }
    }
}

/// The complete set of cluster observations collected in one run. Produced
/// once by the inspector, serialized once for the narrator, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ClusterSnapshot {
    pub nodes: Vec<NodeInfo>,
    pub pods: Vec<PodInfo>,
    pub services: Vec<ServiceInfo>,
    pub deployments: Vec<DeploymentInfo>,
    pub pvcs: Vec<VolumeClaimInfo>,
    pub secrets: Vec<SecretInfo>,
    pub events: Vec<EventInfo>,
    pub nodes_usage: Value,
    pub pods_usage: Value,
    pub overview: Overview,
}

impl ClusterSnapshot {
    #[allow(clippy::too_many_arguments)]
    pub fn assemble(
        nodes: Vec<NodeInfo>,
        pods: Vec<PodInfo>,
        services: Vec<ServiceInfo>,
        deployments: Vec<DeploymentInfo>,
        pvcs: Vec<VolumeClaimInfo>,
        secrets: Vec<SecretInfo>,
        events: Vec<EventInfo>,
        nodes_usage: Value,
        pods_usage: Value,
    ) -> Self {
        let overview = Overview::from_lists(&nodes, &pods, &services, &deployments, &pvcs, &secrets);

        Self {
            nodes,
            pods,
            services,
            deployments,
            pvcs,
            secrets,
            events,
            nodes_usage,
            pods_usage,
            overview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, role: &str) -> NodeInfo {
        NodeInfo {
            name: name.to_string(),
            status: "True".to_string(),
            role: role.to_string(),
        }
    }

    fn pod(namespace: &str, name: &str) -> PodInfo {
        PodInfo {
            namespace: namespace.to_string(),
            name: name.to_string(),
            status: "Running".to_string(),
        }
    }

    fn deployment(name: &str) -> DeploymentInfo {
        DeploymentInfo {
            namespace: "default".to_string(),
            name: name.to_string(),
            replicas: Some(1),
        }
    }

    #[test]
    fn pod_and_namespace_counts_follow_the_pod_list() {
        let pods = vec![pod("default", "web-1"), pod("default", "web-2"), pod("kube-system", "dns")];
        let overview = Overview::from_lists(&[], &pods, &[], &[], &[], &[]);

        assert_eq!(overview.pods, 3);
        assert_eq!(overview.namespaces, 2);
    }

    #[test]
    fn role_counts_never_exceed_node_count() {
        let nodes = vec![
            node("n1", "agent"),
            node("n2", "user"),
            node("n3", "N/A"),
        ];
        let overview = Overview::from_lists(&nodes, &[], &[], &[], &[], &[]);

        assert_eq!(overview.node_agents, 1);
        assert_eq!(overview.node_users, 1);
        assert!(overview.node_agents + overview.node_users <= nodes.len());
    }

    #[test]
    fn workload_counts_use_name_substrings() {
        let deployments = vec![
            deployment("api"),
            deployment("redis-statefulset"),
            deployment("Worker-ReplicaSet"),
        ];
        let overview = Overview::from_lists(&[], &[], &[], &deployments, &[], &[]);

        assert_eq!(overview.deployments, 3);
        assert_eq!(overview.statefulsets, 1);
        assert_eq!(overview.replicasets, 1);
    }

    #[test]
    fn snapshot_overview_is_derived_from_its_lists() {
        let snapshot = ClusterSnapshot::assemble(
            vec![node("n1", "agent"), node("n2", "user")],
            vec![pod("default", "a"), pod("default", "b"), pod("infra", "c")],
            vec![ServiceInfo {
                namespace: "default".to_string(),
                name: "web".to_string(),
                type_: "ClusterIP".to_string(),
                cluster_ip: "10.0.0.1".to_string(),
            }],
            vec![deployment("api")],
            vec![],
            vec![],
            vec![],
            Value::Null,
            Value::Null,
        );

        assert_eq!(snapshot.overview.pods, snapshot.pods.len());
        assert_eq!(snapshot.overview.namespaces, 2);
        assert_eq!(snapshot.overview.services, 1);
        assert_eq!(snapshot.overview.deployments, 1);
        assert_eq!(snapshot.overview.pvcs, 0);
        assert_eq!(snapshot.overview.secrets, 0);
    }

    #[test]
    fn snapshot_serializes_to_yaml_with_renamed_fields() {
        let snapshot = ClusterSnapshot::assemble(
            vec![],
            vec![],
            vec![ServiceInfo {
                namespace: "default".to_string(),
                name: "web".to_string(),
                type_: "NodePort".to_string(),
                cluster_ip: "10.0.0.9".to_string(),
            }],
            vec![],
            vec![],
            vec![],
            vec![],
            Value::Null,
            Value::Null,
        );

        let yaml = serde_yaml::to_string(&snapshot).unwrap();
        assert!(yaml.contains("type: NodePort"));
        assert!(yaml.contains("cluster_ip: 10.0.0.9"));
        assert!(yaml.contains("overview:"));
    }
}
