use crate::transport::{Channel, Connection, ConnectionGroup, TransportError};

/// The master's half of the per-frame application payload exchange. The
/// payload rides in-band after the finish flag and is opaque to the sync
/// core; what goes into it is the application's business.
pub trait MasterFrameData {
    /// Buffers this frame's payload for every slave. Called between the
    /// finish flag and the flush.
    fn send_to_slaves(&mut self, group: &mut ConnectionGroup) -> Result<(), TransportError>;

    /// Reads one slave's answer payload. Called once per channel after the
    /// flush.
    fn read_from_slave(
        &mut self,
        group: &mut ConnectionGroup,
        channel: Channel,
    ) -> Result<(), TransportError>;
}

/// The slave's half of the per-frame application payload exchange.
pub trait SlaveFrameData {
    /// Consumes the master's payload for this frame.
    fn read_from_master(&mut self, connection: &mut Connection) -> Result<(), TransportError>;

    /// Buffers this slave's answer payload. Flushed by the coordinator.
    fn send_to_master(&mut self, connection: &mut Connection) -> Result<(), TransportError>;
}

/// Empty payload: nothing crosses the wire beyond the core protocol.
impl MasterFrameData for () {
    fn send_to_slaves(&mut self, _group: &mut ConnectionGroup) -> Result<(), TransportError> {
        Ok(())
    }

    fn read_from_slave(
        &mut self,
        _group: &mut ConnectionGroup,
        _channel: Channel,
    ) -> Result<(), TransportError> {
        Ok(())
    }
}

impl SlaveFrameData for () {
    fn read_from_master(&mut self, _connection: &mut Connection) -> Result<(), TransportError> {
        Ok(())
    }

    fn send_to_master(&mut self, _connection: &mut Connection) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Default payload: the master distributes its near/far clip planes every
/// frame so slave viewports track the active projection, and each slave
/// answers with a pad byte. A pad byte also leads the downstream payload,
/// keeping the exchange shape symmetric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    pub near: f32,
    pub far: f32,
}

impl ViewParams {
    pub fn new(near: f32, far: f32) -> Self {
        Self { near, far }
    }
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            near: 0.1,
            far: 10000.0,
        }
    }
}

impl MasterFrameData for ViewParams {
    fn send_to_slaves(&mut self, group: &mut ConnectionGroup) -> Result<(), TransportError> {
        group.put_value(&0u8)?;
        group.put_value(&self.near)?;
        group.put_value(&self.far)?;
        Ok(())
    }

    fn read_from_slave(
        &mut self,
        group: &mut ConnectionGroup,
        channel: Channel,
    ) -> Result<(), TransportError> {
        let _pad: u8 = group.get_value_from(channel)?;
        Ok(())
    }
}

impl SlaveFrameData for ViewParams {
    fn read_from_master(&mut self, connection: &mut Connection) -> Result<(), TransportError> {
        let _pad: u8 = connection.get_value()?;
        self.near = connection.get_value()?;
        self.far = connection.get_value()?;
        Ok(())
    }

    fn send_to_master(&mut self, connection: &mut Connection) -> Result<(), TransportError> {
        connection.put_value(&0u8)?;
        Ok(())
    }
}
