// Purpose - external interfaces: note table, textual control protocol, audio sinks

pub mod midi;
pub mod protocol;
pub mod sink;

pub use protocol::{parse, Command, ProtocolError};
pub use sink::{AudioSink, CpalSink, OfflineSink};
