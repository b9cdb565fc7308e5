//! Sample releases for `--demo`.

use rview_types::Gvr;
use rview_util::MemoryStore;
use serde_json::{Value, json};
use tracing::warn;

fn release(namespace: &str, name: &str, revision: u64, status: &str, chart: Value, values: Value) -> Value {
    json!({
        "metadata": { "namespace": namespace, "name": name },
        "version": revision,
        "info": { "status": status },
        "chart": chart,
        "values": values
    })
}

fn nginx_chart() -> Value {
    json!({
        "metadata": { "name": "nginx", "version": "15.1.0" },
        "values": {
            "replicaCount": 1,
            "image": { "repository": "nginx", "tag": "1.25", "pullPolicy": "IfNotPresent" },
            "service": { "type": "ClusterIP", "port": 80 },
            "resources": {}
        }
    })
}

fn redis_chart() -> Value {
    json!({
        "metadata": { "name": "redis", "version": "18.4.0" },
        "values": {
            "architecture": "replication",
            "auth": { "enabled": true, "password": null },
            "master": { "persistence": { "enabled": true, "size": "8Gi" } },
            "replica": { "replicaCount": 3 }
        }
    })
}

/// Memory store holding a few releases under `gvr`.
pub fn store(gvr: &Gvr) -> MemoryStore {
    let store = MemoryStore::new();
    let documents = [
        release(
            "default",
            "frontend",
            3,
            "deployed",
            nginx_chart(),
            json!({ "replicaCount": 2, "image": { "tag": "1.27" } }),
        ),
        release("default", "docs", 1, "deployed", nginx_chart(), json!({})),
        release(
            "cache",
            "redis",
            7,
            "failed",
            redis_chart(),
            json!({ "architecture": "standalone", "replica": null, "auth": { "enabled": false } }),
        ),
    ];
    for document in documents {
        if let Err(error) = store.insert(gvr, document) {
            warn!(error = %error, "Skipping demo release");
        }
    }
    store
}
