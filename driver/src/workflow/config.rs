use anyhow::Context;
use mmwcore::config::TraceConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;

fn default_bridge_addr() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    #[serde(default)]
    pub traces: TraceConfig,
    #[serde(default = "default_bridge_addr")]
    pub bridge_addr: SocketAddr,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            traces: TraceConfig::default(),
            bridge_addr: default_bridge_addr(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Defaults with every trace looked up under `base_dir`.
    pub fn for_directory<P: AsRef<Path>>(base_dir: P) -> Self {
        Self {
            traces: TraceConfig::default().with_base_dir(base_dir.as_ref()),
            ..Self::default()
        }
    }
}
