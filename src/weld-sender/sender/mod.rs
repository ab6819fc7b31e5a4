use crate::config::Configuration;
use crate::client::Client;
use crate::error::Error;

use log::{debug, info, warn};

use ipc::Message;


pub struct Sender {
    config: Configuration,
}

impl Sender {
    pub fn new(config: Configuration) -> Sender {
        Sender {
            config,
        }
    }

    /// Delivers one `send` message for `widget` and returns the reply, if one
    /// was read. The connection is closed before this returns.
    pub fn send(&self, widget: &str, event: &str) -> Result<Option<Vec<u8>>, Error> {
        let payload = Message::send(widget, event).encode(self.config.overflow)?;

        debug!("payload: {}", String::from_utf8_lossy(&payload));

        let mut client = Client::new(&self.config.socket)?;

        self.exchange(&mut client, &payload)
    }

    fn exchange(&self, client: &mut Client, payload: &[u8]) -> Result<Option<Vec<u8>>, Error> {
        client.send(payload)?;

        info!("sent {} bytes to {}", payload.len(), self.config.socket.display());

        if !self.config.read_reply {
            return Ok(None);
        }

        Ok(self.reply(client))
    }

    /// A failed read is reported and otherwise ignored.
    fn reply(&self, client: &mut Client) -> Option<Vec<u8>> {
        match client.receive() {
            Ok(reply) => {
                debug!("reply: {}", String::from_utf8_lossy(&reply));

                Some(reply)
            },
            Err(err) => {
                warn!("{err}");

                None
            },
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    use std::os::unix::net::UnixListener;
    use std::io::{self, Read, Write};
    use std::path::PathBuf;
    use std::thread;

    use ipc::{Overflow, MAX_MESSAGE_LEN};

    fn config(socket: PathBuf) -> Configuration {
        Configuration {
            socket,
            ..Configuration::default()
        }
    }

    /// Accepts one connection, records what it reads in one go and answers
    /// with `reply`.
    fn serve(listener: UnixListener, reply: &'static [u8]) -> thread::JoinHandle<Vec<u8>> {
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();

            let mut buffer = vec![0; 4096];
            let len = stream.read(&mut buffer).unwrap();
            buffer.truncate(len);

            stream.write_all(reply).unwrap();

            buffer
        })
    }

    #[test]
    fn delivers_message_and_reads_reply() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weld.sock");
        let server = serve(UnixListener::bind(&path).unwrap(), b"ok");

        let reply = Sender::new(config(path)).send("lamp", "click").unwrap();

        assert_eq!(reply.as_deref(), Some(&b"ok"[..]));
        assert_eq!(
            server.join().unwrap(),
            br#"{"action": "send", "widget": "lamp", "bind_event": "click"}"#
        );
    }

    #[test]
    fn repeated_invocations_send_the_same_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weld.sock");
        let listener = UnixListener::bind(&path).unwrap();
        let sender = Sender::new(config(path));

        let mut received = Vec::new();

        for _ in 0..2 {
            let server = serve(listener.try_clone().unwrap(), b"ok");
            sender.send("clock", "hover").unwrap();
            received.push(server.join().unwrap());
        }

        assert_eq!(received[0], received[1]);
    }

    #[test]
    fn no_reply_skips_the_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weld.sock");
        let listener = UnixListener::bind(&path).unwrap();

        // holds the connection open without answering until the sender is done
        let (done, wait) = std::sync::mpsc::channel::<()>();
        let server = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buffer = Vec::new();
            wait.recv().unwrap();
            stream.read_to_end(&mut buffer).unwrap();
            buffer
        });

        let config = Configuration {
            read_reply: false,
            ..config(path)
        };

        assert_eq!(Sender::new(config).send("lamp", "click").unwrap(), None);
        done.send(()).unwrap();

        assert!(server.join().unwrap().starts_with(br#"{"action": "send""#));
    }

    #[test]
    fn missing_listener_fails() {
        let dir = tempfile::tempdir().unwrap();

        let err = Sender::new(config(dir.path().join("weld.sock")))
            .send("lamp", "click")
            .unwrap_err();

        assert!(matches!(err, Error::Connect { .. }));
    }

    #[test]
    fn oversized_message_is_truncated_on_the_wire() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weld.sock");
        let server = serve(UnixListener::bind(&path).unwrap(), b"ok");

        let widget = "w".repeat(400);
        Sender::new(config(path)).send(&widget, "click").unwrap();

        assert_eq!(server.join().unwrap().len(), MAX_MESSAGE_LEN);
    }

    #[test]
    fn strict_mode_never_connects() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weld.sock");
        let listener = UnixListener::bind(&path).unwrap();
        listener.set_nonblocking(true).unwrap();

        let config = Configuration {
            overflow: Overflow::Reject,
            ..config(path)
        };

        let widget = "w".repeat(400);
        let err = Sender::new(config).send(&widget, "click").unwrap_err();

        assert!(matches!(err, Error::Encode(ipc::Error::TooLong { .. })));
        assert_eq!(listener.accept().unwrap_err().kind(), io::ErrorKind::WouldBlock);
    }

    #[test]
    fn send_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weld.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let mut client = Client::new(&path).unwrap();
        drop(listener.accept().unwrap());
        drop(listener);

        let err = Sender::new(config(path)).exchange(&mut client, b"{}").unwrap_err();

        assert!(matches!(err, Error::Send(_)));
    }

    #[test]
    fn receive_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weld.sock");
        let listener = UnixListener::bind(&path).unwrap();

        let mut client = Client::new(&path).unwrap();
        let (stream, _) = listener.accept().unwrap();

        // closing with the payload still unread resets the connection
        client.send(b"{}").unwrap();
        drop(stream);

        assert_eq!(Sender::new(config(path)).reply(&mut client), None);
    }
}
