//! Query keys and the closed registry of view roots.
//!
//! Every cached, independently refreshable resource view is identified by
//! a [`QueryKey`]: a root name plus disambiguating params (namespace,
//! resource name). The set of roots is a compile-time-fixed taxonomy
//! declared once in the [`registry!`](macro) invocation below, which emits
//! both the key constructors and the [`ROOTS`] scope table. A root that is
//! missing from the cluster-switch sweep set therefore cannot exist: scope
//! classification and key construction come from the same declaration.

use std::fmt;

/// Scope of a query-key root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootScope {
    /// Data depends on which cluster is selected; swept on cluster switch.
    Cluster,
    /// Data is global to the dashboard (cluster inventory, auth, approvals).
    Global,
}

/// One registered query-key root.
#[derive(Debug, Clone, Copy)]
pub struct RootSpec {
    pub name: &'static str,
    pub scope: RootScope,
}

/// Identity of one cached, independently refreshable resource view.
///
/// Keys compare by value: two constructions with the same root and params
/// are the same cache entry. Keys are immutable once built and can only be
/// built through the registry constructors in this module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    root: &'static str,
    params: Vec<String>,
}

impl QueryKey {
    fn new(root: &'static str, params: &[&str]) -> Self {
        Self {
            root,
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// The resource-class root, the first element of the key tuple.
    pub fn root(&self) -> &'static str {
        self.root
    }

    /// Disambiguating params (namespace, resource name, container, ...).
    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for param in &self.params {
            write!(f, "/{param}")?;
        }
        Ok(())
    }
}

/// Declares the full root taxonomy in one place.
///
/// Emits the [`ROOTS`] table and one constructor function per root.
macro_rules! registry {
    ($( $fname:ident ( $($param:ident),* ) => $root:literal : $scope:ident ),* $(,)?) => {
        /// Every registered query-key root with its scope.
        pub const ROOTS: &[RootSpec] = &[
            $( RootSpec { name: $root, scope: RootScope::$scope } ),*
        ];

        $(
            #[doc = concat!("Key for the `", $root, "` view.")]
            pub fn $fname( $($param: &str),* ) -> QueryKey {
                QueryKey::new($root, &[ $($param),* ])
            }
        )*
    };
}

registry! {
    // Cluster overview and inventory
    overview() => "overview": Cluster,
    namespaces() => "namespaces": Cluster,
    namespace(name) => "namespace": Cluster,
    nodes() => "nodes": Cluster,
    node(name) => "node": Cluster,
    events(namespace) => "events": Cluster,

    // Workloads
    pods(namespace) => "pods": Cluster,
    pod(namespace, name) => "pod": Cluster,
    pod_logs(namespace, name, container) => "pod-logs": Cluster,
    pod_events(namespace, name) => "pod-events": Cluster,
    pod_metrics(namespace, name) => "pod-metrics": Cluster,
    deployments(namespace) => "deployments": Cluster,
    deployment(namespace, name) => "deployment": Cluster,
    deployment_pods(namespace, name) => "deployment-pods": Cluster,
    daemonsets(namespace) => "daemonsets": Cluster,
    daemonset(namespace, name) => "daemonset": Cluster,
    statefulsets(namespace) => "statefulsets": Cluster,
    statefulset(namespace, name) => "statefulset": Cluster,
    replicasets(namespace) => "replicasets": Cluster,
    replicaset(namespace, name) => "replicaset": Cluster,
    jobs(namespace) => "jobs": Cluster,
    job(namespace, name) => "job": Cluster,
    cronjobs(namespace) => "cronjobs": Cluster,
    cronjob(namespace, name) => "cronjob": Cluster,

    // Networking
    services(namespace) => "services": Cluster,
    service(namespace, name) => "service": Cluster,
    endpoints(namespace) => "endpoints": Cluster,
    ingresses(namespace) => "ingresses": Cluster,
    ingress(namespace, name) => "ingress": Cluster,
    networkpolicies(namespace) => "networkpolicies": Cluster,
    networkpolicy(namespace, name) => "networkpolicy": Cluster,

    // Config and storage
    configmaps(namespace) => "configmaps": Cluster,
    configmap(namespace, name) => "configmap": Cluster,
    secrets(namespace) => "secrets": Cluster,
    secret(namespace, name) => "secret": Cluster,
    persistentvolumes() => "persistentvolumes": Cluster,
    persistentvolume(name) => "persistentvolume": Cluster,
    persistentvolumeclaims(namespace) => "persistentvolumeclaims": Cluster,
    persistentvolumeclaim(namespace, name) => "persistentvolumeclaim": Cluster,
    storageclasses() => "storageclasses": Cluster,
    storageclass(name) => "storageclass": Cluster,
    resourcequotas(namespace) => "resourcequotas": Cluster,
    limitranges(namespace) => "limitranges": Cluster,

    // RBAC
    serviceaccounts(namespace) => "serviceaccounts": Cluster,
    serviceaccount(namespace, name) => "serviceaccount": Cluster,
    roles(namespace) => "roles": Cluster,
    role(namespace, name) => "role": Cluster,
    rolebindings(namespace) => "rolebindings": Cluster,
    rolebinding(namespace, name) => "rolebinding": Cluster,
    clusterroles() => "clusterroles": Cluster,
    clusterrole(name) => "clusterrole": Cluster,
    clusterrolebindings() => "clusterrolebindings": Cluster,
    clusterrolebinding(name) => "clusterrolebinding": Cluster,

    // Autoscaling and metrics
    horizontalpodautoscalers(namespace) => "horizontalpodautoscalers": Cluster,
    horizontalpodautoscaler(namespace, name) => "horizontalpodautoscaler": Cluster,
    node_metrics(name) => "node-metrics": Cluster,
    cluster_metrics() => "cluster-metrics": Cluster,

    // Alerting and observation (server-computed, consumed opaquely)
    alerts() => "alerts": Cluster,
    alert_rules() => "alert-rules": Cluster,
    silences() => "silences": Cluster,
    audit_logs() => "audit-logs": Cluster,
    audit_stats() => "audit-stats": Cluster,
    observation_summary() => "observation-summary": Cluster,
    observation_trends() => "observation-trends": Cluster,

    // Global: meaningful regardless of the selected cluster
    clusters() => "clusters": Global,
    current_user() => "current-user": Global,
    users() => "users": Global,
    user(name) => "user": Global,
    approvals() => "approvals": Global,
    approval_rules() => "approval-rules": Global,
}

/// Roots whose data is meaningless outside the selected cluster.
pub fn cluster_scoped_roots() -> impl Iterator<Item = &'static str> {
    ROOTS
        .iter()
        .filter(|r| r.scope == RootScope::Cluster)
        .map(|r| r.name)
}

/// Whether a root name is present in the registry.
pub fn is_registered(root: &str) -> bool {
    ROOTS.iter().any(|r| r.name == root)
}

/// The scope of a registered root, if any.
pub fn scope_of(root: &str) -> Option<RootScope> {
    ROOTS.iter().find(|r| r.name == root).map(|r| r.scope)
}
