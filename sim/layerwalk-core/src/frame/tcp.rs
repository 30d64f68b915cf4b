use std::fmt::{self, Display};

/// The source port every simulated client sends from.
pub const CLIENT_PORT: u16 = 12345;
/// The destination port of TCP segments.
pub const HTTP_PORT: u16 = 80;

/// The fields of a TCP header that the simulation shows.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub struct TcpHeader {
    /// The source port number
    pub src_port: u16,
    /// The destination port number
    pub dst_port: u16,
    /// The sequence number of the first data octet in this segment (except when
    /// SYN is present). If SYN is present the sequence number is the initial
    /// sequence number (ISN) and the first data octet is ISN+1.
    pub seq: u32,
    /// If the ACK control bit is set this field contains the value of the next
    /// sequence number the sender of the segment is expecting to receive.
    pub ack: u32,
    /// Flags that adjust the how segments are handled
    pub ctl: Control,
}

impl Default for TcpHeader {
    fn default() -> Self {
        Self {
            src_port: CLIENT_PORT,
            dst_port: HTTP_PORT,
            seq: 0,
            ack: 0,
            ctl: Control::default(),
        }
    }
}

impl Display for TcpHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TCP {} > {} [{}] seq={} ack={}",
            self.src_port, self.dst_port, self.ctl, self.seq, self.ack
        )
    }
}

/// Used for describing the TCP header a frame should carry
#[derive(Debug, Default)]
pub struct TcpHeaderBuilder(TcpHeader);

impl TcpHeaderBuilder {
    /// Initialize the TCP header with defaults and the given values
    pub fn new(src_port: u16, dst_port: u16, seq: u32) -> Self {
        Self(TcpHeader {
            src_port,
            dst_port,
            seq,
            ack: 0,
            ctl: Control::default(),
        })
    }

    /// Set the acknowledgement number
    pub fn ack(mut self, ack: u32) -> Self {
        self.0.ack = ack;
        self.0.ctl.set_ack(true);
        self
    }

    /// Set the syn bit up
    pub fn syn(mut self) -> Self {
        self.0.ctl.set_syn(true);
        self
    }

    pub fn build(self) -> TcpHeader {
        self.0
    }
}

/// The control bits of a TCP header. The simulation only sets SYN and ACK.
#[derive(Debug, Default, Hash, PartialEq, Eq, Clone, Copy)]
pub struct Control(u8);

const SYN: u8 = 1;
const ACK: u8 = 4;

/// Bit positions and their letters, lowest bit first
const LETTERS: [(u8, char); 6] = [(0, 'F'), (1, 'S'), (2, 'R'), (3, 'P'), (4, 'A'), (5, 'U')];

impl Control {
    /// Get whether the acknowledgment field significant
    pub const fn ack(self) -> bool {
        self.bit(ACK)
    }

    /// Set whether the acknowledgment field significant
    pub fn set_ack(&mut self, state: bool) {
        self.set_bit(ACK, state);
    }

    /// Get whether to synchronize sequence numbers
    pub const fn syn(self) -> bool {
        self.bit(SYN)
    }

    /// Set whether to synchronize sequence numbers
    pub fn set_syn(&mut self, state: bool) {
        self.set_bit(SYN, state);
    }

    const fn bit(self, bit: u8) -> bool {
        (self.0 >> bit) & 0b1 == 1
    }

    fn set_bit(&mut self, bit: u8, state: bool) {
        self.0 = (self.0 & !(1 << bit)) | ((state as u8) << bit);
    }
}

/// Flags are written lowest bit first, so a SYN-ACK reads `SA`.
impl Display for Control {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (bit, letter) in LETTERS {
            if self.bit(bit) {
                write!(f, "{letter}")?;
            }
        }
        Ok(())
    }
}
