use std::path::{Path, PathBuf};
use std::io;


#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Encode(#[from] ipc::Error),
    #[error("socket: {0}")]
    Socket(#[source] io::Error),
    #[error("connect {}: {source}", .path.display())]
    Connect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("send: {0}")]
    Send(#[source] io::Error),
    #[error("recv: {0}")]
    Receive(#[source] io::Error),
}

impl Error {
    /// `UnixStream::connect` creates the socket and connects in one call, so
    /// tell the two apart by errno.
    pub fn connect(path: &Path, err: io::Error) -> Error {
        match err.raw_os_error() {
            Some(libc::EMFILE | libc::ENFILE | libc::ENOBUFS | libc::ENOMEM | libc::EAFNOSUPPORT | libc::EPROTONOSUPPORT) => {
                Error::Socket(err)
            },
            _ => Error::Connect {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}
