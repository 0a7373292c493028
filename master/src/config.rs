use std::default::Default;

/// Contains Config properties which will be used by the master coordinator.
/// How these get filled in (config file, CLI) is the application's concern.
#[derive(Clone, Debug)]
pub struct MasterConfig {
    /// Interface to listen on. Empty means every interface; only the port
    /// matters then.
    pub listen_addr: String,
    /// Port slaves connect to. Zero disables clustering.
    pub listen_port: u16,
    /// Number of slave processes that must connect before startup
    /// completes. Zero disables clustering.
    pub slave_count: usize,
    /// Rendering scale factor handed to every slave during the init
    /// handshake so all displays agree on units.
    pub scale_factor: f32,
}

impl MasterConfig {
    /// Clustering runs only with a real port and at least one slave.
    pub fn clustering_enabled(&self) -> bool {
        self.listen_port != 0 && self.slave_count != 0
    }

    /// The address handed to bind. With an empty listen_addr this is
    /// ":<port>", which the transport reads as every-interface.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.listen_port)
    }
}

impl Default for MasterConfig {
    fn default() -> Self {
        Self {
            listen_addr: String::new(),
            listen_port: 0,
            slave_count: 0,
            scale_factor: 1.0,
        }
    }
}
