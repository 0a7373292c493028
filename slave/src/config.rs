use std::default::Default;

/// Contains Config properties which will be used by the slave coordinator.
#[derive(Clone, Debug)]
pub struct SlaveConfig {
    /// Address of the master's listening endpoint ("host:port").
    pub master_addr: String,
    /// Name of the object in the initial snapshot that anchors this slave's
    /// local view. Startup fails if the snapshot has no object by this name.
    pub root_name: String,
}

impl SlaveConfig {
    pub fn new(master_addr: impl Into<String>, root_name: impl Into<String>) -> Self {
        Self {
            master_addr: master_addr.into(),
            root_name: root_name.into(),
        }
    }
}

impl Default for SlaveConfig {
    fn default() -> Self {
        Self {
            master_addr: "127.0.0.1:34000".to_string(),
            root_name: "RootNode".to_string(),
        }
    }
}
