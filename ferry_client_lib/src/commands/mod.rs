mod background;
pub use background::BackgroundTransfer;
mod get;
pub use get::GetCommand;
mod ls;
pub use ls::LsCommand;
mod put;
pub use put::PutCommand;
mod remote;
pub use remote::RemoteCommand;
mod terminate;
pub use terminate::TerminateCommand;

use std::path::Path;

/// Name the server should see for a local path: its last component.
fn remote_name(file_name: &str) -> &str {
    Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(file_name)
}
