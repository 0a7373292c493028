use log::{error, info};

use lockview_shared::{
    exit_codes, Connection, ObjectId, ReplicationContext, SceneStore, SlaveFrameData,
    TransportError,
};

use crate::{config::SlaveConfig, error::SlaveError, scene_index::SceneIndex};

/// Where the coordinator is in its lifecycle. The Connecting/AwaitingInit/
/// LocatingRoot steps all happen inside one blocking
/// [`connect_and_init`](SlaveCoordinator::connect_and_init) call, so from
/// the outside only these three are observable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlavePhase {
    Disconnected,
    Running,
    Exited,
}

/// What a completed frame means for the caller's loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Keep calling `frame_update`
    Continue,
    /// The master raised the finish flag; the slave has disconnected
    Finished,
}

/// Mirrors the master's scene state for one render process.
///
/// Owns its injected [`SceneStore`] and keeps it in lockstep with the
/// master: one blocking init handshake, then one receive/apply/exchange
/// round per frame, driven from the render loop.
pub struct SlaveCoordinator {
    config: SlaveConfig,
    store: SceneStore,
    replication: ReplicationContext,
    index: SceneIndex,
    connection: Option<Connection>,
    scale_factor: f32,
    root_id: Option<ObjectId>,
    phase: SlavePhase,
}

impl SlaveCoordinator {
    pub fn new(config: SlaveConfig, store: SceneStore) -> Self {
        Self {
            config,
            store,
            replication: ReplicationContext::new(),
            index: SceneIndex::new(),
            connection: None,
            scale_factor: 1.0,
            root_id: None,
            phase: SlavePhase::Disconnected,
        }
    }

    /// Connects to the master, runs the init handshake, and locates the
    /// scene root. Blocks until the master sends the initial sync.
    ///
    /// Every failure here is fatal and mapped to its own exit code by
    /// [`SlaveError::exit_code`]; a slave that cannot complete this never
    /// enters the frame loop.
    pub fn connect_and_init(&mut self) -> Result<(), SlaveError> {
        info!("connecting to master at {}", self.config.master_addr);
        let mut connection = Connection::connect_point(&self.config.master_addr)
            .map_err(SlaveError::ConnectFailure)?;
        info!("connected");

        // The init sync always carries data; the barrier result is not
        // meaningful here
        connection.wait()?;
        self.scale_factor = connection.get_value()?;
        let snapshot: Vec<u8> = connection.get_value()?;
        let applied = self
            .replication
            .apply(&mut self.store, &snapshot, &mut self.index)?;
        info!("initial sync applied, {applied} objects");
        // Replicated state must not look like local edits
        self.store.clear_changes();
        let _finish: u8 = connection.get_value()?;
        self.connection = Some(connection);

        info!("searching for scene root (name is {}) ...", self.config.root_name);
        match self.index.find(&self.config.root_name) {
            Some(id) => {
                info!("found it");
                self.root_id = Some(id);
            }
            None => {
                self.disconnect();
                return Err(SlaveError::RootNotFound(self.config.root_name.clone()));
            }
        }

        self.phase = SlavePhase::Running;
        Ok(())
    }

    /// One frame of the mirror loop: block on the barrier, apply the diff,
    /// read the finish flag, exchange application payloads.
    ///
    /// On the finish flag the acknowledgment goes back, the connection
    /// closes, and `Finished` tells the caller to exit clean. On any fault
    /// the connection closes and the error carries the exit code. No
    /// retry, no reconnect.
    pub fn frame_update(
        &mut self,
        frame_data: &mut dyn SlaveFrameData,
    ) -> Result<FrameOutcome, SlaveError> {
        match self.frame_step(frame_data) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.disconnect();
                self.phase = SlavePhase::Exited;
                Err(err)
            }
        }
    }

    fn frame_step(&mut self, frame_data: &mut dyn SlaveFrameData) -> Result<FrameOutcome, SlaveError> {
        if self.phase != SlavePhase::Running {
            return Err(SlaveError::Comm(TransportError::NotConnected));
        }
        let connection = self
            .connection
            .as_mut()
            .ok_or(SlaveError::Comm(TransportError::NotConnected))?;

        let mut finish = 0u8;
        if connection.wait()? {
            let diff: Vec<u8> = connection.get_value()?;
            self.replication
                .apply(&mut self.store, &diff, &mut self.index)?;
            self.store.clear_changes();
            finish = connection.get_value()?;
            frame_data.read_from_master(connection)?;
            frame_data.send_to_master(connection)?;
            connection.flush()?;
        }

        if finish != 0 {
            connection.put_value(&finish)?;
            connection.flush()?;
            info!("finish flag received; leaving the cluster");
            self.disconnect();
            self.phase = SlavePhase::Exited;
            return Ok(FrameOutcome::Finished);
        }

        Ok(FrameOutcome::Continue)
    }

    /// Runs the whole slave lifecycle and returns the process exit code:
    /// init, then frames until finish or fault. The single error-kind match
    /// lives in [`SlaveError::exit_code`].
    pub fn run(&mut self, frame_data: &mut dyn SlaveFrameData) -> i32 {
        if let Err(err) = self.connect_and_init() {
            error!("{err}");
            return err.exit_code();
        }
        loop {
            match self.frame_update(frame_data) {
                Ok(FrameOutcome::Continue) => {}
                Ok(FrameOutcome::Finished) => return exit_codes::SUCCESS,
                Err(err) => {
                    error!("{err}");
                    return err.exit_code();
                }
            }
        }
    }

    fn disconnect(&mut self) {
        if let Some(connection) = &mut self.connection {
            connection.disconnect();
        }
        self.connection = None;
    }

    pub fn phase(&self) -> SlavePhase {
        self.phase
    }

    /// The rendering scale factor received during init.
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    /// The scene root located after the init snapshot.
    pub fn root_id(&self) -> Option<ObjectId> {
        self.root_id
    }

    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    pub fn index(&self) -> &SceneIndex {
        &self.index
    }
}
