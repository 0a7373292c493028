use log::{error, info, warn};

use lockview_shared::{
    ConnectionGroup, MasterFrameData, ReplicationContext, SceneStore, TransportError,
};

use crate::{config::MasterConfig, error::MasterError};

/// Where the coordinator is in its lifecycle. `AwaitingSlaves` carries the
/// number of connections still outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterPhase {
    /// Clustering disabled by configuration; networking never starts
    Unclustered,
    Unbound,
    Bound,
    AwaitingSlaves(usize),
    Ready,
    /// Networking permanently off after a fault; rendering continues
    Degraded,
    Teardown,
}

/// Drives the authoritative side of the cluster: the startup handshake with
/// every slave, then one broadcast per frame.
///
/// The scene store is injected and owned here, not kept in a process-global
/// registry. The application mutates the store between frames through
/// [`store_mut`](Self::store_mut); `frame_update` drains what changed and
/// puts it on the wire.
pub struct MasterCoordinator {
    config: MasterConfig,
    store: SceneStore,
    replication: ReplicationContext,
    group: Option<ConnectionGroup>,
    phase: MasterPhase,
}

impl MasterCoordinator {
    pub fn new(config: MasterConfig, store: SceneStore) -> Self {
        let phase = if config.clustering_enabled() {
            MasterPhase::Unbound
        } else {
            MasterPhase::Unclustered
        };
        Self {
            config,
            store,
            replication: ReplicationContext::new(),
            group: None,
            phase,
        }
    }

    /// Opens the listening endpoint. Split out from
    /// [`configure_network`](Self::configure_network) so an application can
    /// publish the bound address before blocking in the accept loop.
    pub fn bind(&mut self) -> Result<(), MasterError> {
        match self.phase {
            MasterPhase::Unbound => {}
            _ => return Ok(()),
        }
        let mut group = ConnectionGroup::new();
        group.bind(&self.config.bind_addr())?;
        self.group = Some(group);
        self.phase = MasterPhase::Bound;
        Ok(())
    }

    /// Completes cluster startup: accepts exactly `slave_count` connections,
    /// one after another, then runs the init handshake (scale factor, full
    /// snapshot, finish=false).
    ///
    /// This blocks until every expected slave has connected. There is no
    /// timeout: a missing slave stalls the whole cluster, which is the
    /// accepted startup contract on a controlled LAN.
    pub fn configure_network(&mut self) -> Result<(), MasterError> {
        if self.phase == MasterPhase::Unclustered {
            info!("cluster networking disabled (no port or no slaves configured)");
            return Ok(());
        }
        self.bind()?;

        let slave_count = self.config.slave_count;
        let group = self.group.as_mut().ok_or(TransportError::NotConnected)?;

        for accepted in 0..slave_count {
            self.phase = MasterPhase::AwaitingSlaves(slave_count - accepted);
            info!("waiting for slave #{accepted} to connect ...");
            let channel = group.accept_point()?;
            info!("slave #{accepted} connected on channel {channel}");
        }
        info!("all {slave_count} slave nodes have connected");

        group.signal()?;
        group.put_value(&self.config.scale_factor)?;
        let snapshot = self.replication.drain_and_serialize(&mut self.store, true);
        let group = self.group.as_mut().ok_or(TransportError::NotConnected)?;
        group.put_value(&snapshot)?;
        group.put_value(&0u8)?;
        group.flush()?;

        // The snapshot already carries everything recorded while the scene
        // was assembled; replaying those creations next frame would collide
        // with ids the slaves now hold.
        self.store.clear_changes();

        self.phase = MasterPhase::Ready;
        Ok(())
    }

    /// One frame of the broadcast loop: barrier, incremental diff, finish
    /// flag, application payload, flush, then one answer payload per slave.
    ///
    /// Never lets a fault escape. On any transport or replication error the
    /// entire connection group is dropped and the coordinator runs
    /// unclustered for the rest of the process. No retry, no reconnect.
    pub fn frame_update(&mut self, frame_data: &mut dyn MasterFrameData) {
        if self.phase == MasterPhase::Ready {
            if let Err(err) = self.broadcast_frame(false, frame_data) {
                error!("communication fault during frame broadcast: {err}");
                // XXX: there is no way to tell which channel faulted, so
                // every slave connection goes down with it
                warn!("disabling cluster networking for the rest of the run");
                self.drop_group();
                self.phase = MasterPhase::Degraded;
            }
        }

        // Change records are cleared once per frame even when no slave is
        // listening, or the set grows without bound
        self.store.clear_changes();
    }

    /// Sends the finish flag with one last frame and tears the group down.
    /// Slaves acknowledge the flag before disconnecting; their
    /// acknowledgments are collected so the final frame is not cut short in
    /// flight.
    pub fn finish(&mut self, frame_data: &mut dyn MasterFrameData) {
        if self.phase != MasterPhase::Ready {
            self.phase = MasterPhase::Teardown;
            return;
        }

        let result = self.broadcast_frame(true, frame_data).and_then(|_| {
            let group = self.group.as_mut().ok_or(TransportError::NotConnected)?;
            for channel in 0..group.channel_count() {
                let _ack: u8 = group.get_value_from(channel)?;
            }
            Ok(())
        });
        if let Err(err) = result {
            error!("communication fault during finish: {err}");
        }

        self.drop_group();
        self.phase = MasterPhase::Teardown;
    }

    fn broadcast_frame(
        &mut self,
        finish: bool,
        frame_data: &mut dyn MasterFrameData,
    ) -> Result<(), MasterError> {
        let diff = self.replication.drain_and_serialize(&mut self.store, false);
        let group = self.group.as_mut().ok_or(TransportError::NotConnected)?;

        group.signal()?;
        group.put_value(&diff)?;
        group.put_value(&(finish as u8))?;
        frame_data.send_to_slaves(group)?;
        group.flush()?;

        for channel in 0..group.channel_count() {
            frame_data.read_from_slave(group, channel)?;
        }
        Ok(())
    }

    fn drop_group(&mut self) {
        if let Some(group) = &mut self.group {
            group.disconnect();
        }
        self.group = None;
    }

    pub fn phase(&self) -> MasterPhase {
        self.phase
    }

    pub fn is_clustered(&self) -> bool {
        self.phase == MasterPhase::Ready
    }

    pub fn config(&self) -> &MasterConfig {
        &self.config
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut SceneStore {
        &mut self.store
    }

    /// The bound listening address, once `bind` has run.
    pub fn local_addr(&self) -> Option<std::net::SocketAddr> {
        self.group.as_ref().and_then(|group| group.local_addr())
    }
}
