mod command_request;
pub use command_request::CommandRequest;
pub use command_request::CommandVerb;
mod control_word;
pub use control_word::ControlWord;
mod protocol_stream;
pub use protocol_stream::ProtocolStream;
