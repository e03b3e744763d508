//! OSC-over-TCP client.

use std::io::Write;
use std::net::TcpStream;

use midi2osc_core::{OscAddress, OscValue};

use crate::error::{Error, Result};
use crate::message::encode_message;

/// A connected OSC client. Packets are framed with a 4-byte big-endian
/// length prefix, per the OSC 1.0 stream transport.
pub struct OscClient {
    stream: TcpStream,
}

impl OscClient {
    /// Establish the TCP stream. `OscAddress` only admits the TCP scheme,
    /// so there is nothing else to dispatch on here.
    pub fn connect(addr: &OscAddress) -> Result<Self> {
        let stream = TcpStream::connect((addr.host.as_str(), addr.port))?;
        stream.set_nodelay(true)?;
        Ok(Self { stream })
    }

    /// Write one framed message. Errors are reported to the caller and
    /// leave the stream in an unusable state.
    pub fn send(&mut self, path: &str, value: &OscValue) -> Result<()> {
        let packet = encode_message(path, value);
        let len =
            u32::try_from(packet.len()).map_err(|_| Error::PacketTooLarge(packet.len()))?;
        self.stream.write_all(&len.to_be_bytes())?;
        self.stream.write_all(&packet)?;
        self.stream.flush()?;
        Ok(())
    }
}
