use serde::Serialize;
use serde_json::ser::Formatter;
use clap::Parser;

use std::io;


pub const SOCKET_PATH: &str = "/tmp/weld.sock";

/// Largest payload the receiver accepts in one read, matching the 256 byte
/// buffer of the deployed sender minus its terminator.
pub const MAX_MESSAGE_LEN: usize = 255;

pub const REPLY_CAPACITY: usize = 1024;


#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to encode message: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message is {len} bytes, limit is {limit}")]
    TooLong {
        len: usize,
        limit: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    /// Cut the payload at the limit, the way the receiver has always seen it.
    #[default]
    Truncate,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Send,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message<'a> {
    pub action: Action,
    pub widget: &'a str,
    pub bind_event: &'a str,
}

impl<'a> Message<'a> {
    pub fn send(widget: &'a str, bind_event: &'a str) -> Message<'a> {
        Message {
            action: Action::Send,
            widget,
            bind_event,
        }
    }

    /// Serializes to `{"action": "send", "widget": "..", "bind_event": ".."}`
    /// and applies the length limit. Values are JSON-escaped, so a `"` in
    /// either one goes out as `\"` instead of ending the string early.
    pub fn encode(&self, overflow: Overflow) -> Result<Vec<u8>, Error> {
        let mut bytes: Vec<u8> = Vec::with_capacity(MAX_MESSAGE_LEN + 1);

        let mut serializer = serde_json::Serializer::with_formatter(&mut bytes, Spaced);
        self.serialize(&mut serializer)?;

        match overflow {
            Overflow::Reject if bytes.len() > MAX_MESSAGE_LEN => Err(Error::TooLong {
                len: bytes.len(),
                limit: MAX_MESSAGE_LEN,
            }),
            Overflow::Reject => Ok(bytes),
            Overflow::Truncate => Ok(truncate(bytes, MAX_MESSAGE_LEN)),
        }
    }
}

fn truncate(mut bytes: Vec<u8>, limit: usize) -> Vec<u8> {
    if bytes.len() > limit {
        let mut end = limit;

        // continuation bytes look like 0b10xxxxxx
        while end > 0 && (bytes[end] & 0xc0) == 0x80 {
            end -= 1;
        }

        bytes.truncate(end);
    }

    bytes
}

/// Compact JSON with a space after every `:` and `,`.
struct Spaced;

impl Formatter for Spaced {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Forward a bind event to a running weld widget.
///
/// Options go before the two names. Either name may start with `-` as long as
/// it is not made up only of known short flags.
#[derive(Debug, Parser)]
#[command(name = "weld-sender", version)]
pub struct Arguments {
    /// Name of the widget that receives the event
    #[arg(value_name = "WIDGET_NAME", allow_hyphen_values = true)]
    pub widget: String,

    /// Bound event to trigger on the widget
    #[arg(value_name = "EVENT_NAME", allow_hyphen_values = true)]
    pub event: String,

    /// Do not report failures on stderr
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Increase logging, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Close the connection right after sending instead of waiting for a reply
    #[arg(short, long)]
    pub no_reply: bool,

    /// Fail on messages over the size limit instead of truncating them
    #[arg(short, long)]
    pub strict: bool,
}
