use crate::error::Error;

use std::os::unix::net::UnixStream;
use std::io::{Read, Write};
use std::path::Path;

use log::trace;

use ipc::REPLY_CAPACITY;


pub struct Client {
    stream: UnixStream,
}

impl Client {
    pub fn new(path: &Path) -> Result<Client, Error> {
        trace!("connecting to {}", path.display());

        Ok(Client {
            stream: UnixStream::connect(path).map_err(|err| Error::connect(path, err))?,
        })
    }

    pub fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.stream.write_all(bytes).map_err(Error::Send)
    }

    /// Reads whatever the peer answers with in a single read, an empty reply
    /// means the peer closed the connection.
    pub fn receive(&mut self) -> Result<Vec<u8>, Error> {
        let mut buffer = vec![0; REPLY_CAPACITY];

        let len = self.stream.read(&mut buffer).map_err(Error::Receive)?;
        buffer.truncate(len);

        Ok(buffer)
    }
}
