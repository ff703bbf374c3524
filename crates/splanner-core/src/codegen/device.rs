//! Device control channel used to push generated scripts to a hub.

use std::future::Future;
use std::time::Duration;

use log::{debug, info};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};

use super::GeneratedScript;
use crate::error::{Result, SplanError};

/// Callback invoked with every text message the device sends back.
pub type MessageHandler = Box<dyn FnMut(&str) + Send>;

/// Text transport to a connected hub.
///
/// Pairing and discovery belong to the transport; the planner only needs to
/// send a payload and hear replies.
pub trait DeviceChannel {
    /// Sends a text payload, failing with `SplanError::DeliveryFailed`.
    fn send(&mut self, text: &str) -> impl Future<Output = Result<()>> + Send;

    /// Registers a handler for incoming messages.
    fn subscribe(&mut self, on_message: MessageHandler);
}

/// Sends a generated script, terminated by one line feed.
pub async fn deliver_script<C: DeviceChannel>(
    channel: &mut C,
    script: &GeneratedScript,
) -> Result<()> {
    let mut payload = String::with_capacity(script.text.len() + 1);
    payload.push_str(&script.text);
    payload.push('\n');
    channel.send(&payload).await?;
    info!(
        "Delivered {} byte {} script",
        payload.len(),
        script.hub.as_str()
    );
    Ok(())
}

/// Channel over a pair of async byte streams, such as a serial device node.
///
/// Incoming data is split into lines; each line is handed to every
/// subscriber when [`StreamChannel::pump_incoming`] runs.
pub struct StreamChannel<R, W> {
    reader: BufReader<R>,
    writer: W,
    subscribers: Vec<MessageHandler>,
}

impl<R, W> StreamChannel<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
            subscribers: Vec::new(),
        }
    }

    /// Reads lines until the stream ends or stays silent for `idle`,
    /// dispatching each to the subscribers. Returns the number of lines.
    pub async fn pump_incoming(&mut self, idle: Duration) -> Result<usize> {
        let mut received = 0;
        let mut line = String::new();
        loop {
            line.clear();
            let read = match tokio::time::timeout(idle, self.reader.read_line(&mut line)).await {
                Ok(read) => read.map_err(|e| SplanError::DeliveryFailed {
                    message: format!("reading from device: {e}"),
                })?,
                Err(_) => break,
            };
            if read == 0 {
                break;
            }

            let message = line.trim_end_matches(['\r', '\n']);
            for handler in &mut self.subscribers {
                handler(message);
            }
            received += 1;
        }
        debug!("Received {received} line(s) from device");
        Ok(received)
    }

    /// Consumes the channel and returns the underlying streams.
    pub fn into_inner(self) -> (R, W) {
        (self.reader.into_inner(), self.writer)
    }
}

impl<R, W> DeviceChannel for StreamChannel<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn send(&mut self, text: &str) -> Result<()> {
        let delivery_failed = |e: std::io::Error| SplanError::DeliveryFailed {
            message: e.to_string(),
        };
        self.writer
            .write_all(text.as_bytes())
            .await
            .map_err(delivery_failed)?;
        self.writer.flush().await.map_err(delivery_failed)
    }

    fn subscribe(&mut self, on_message: MessageHandler) {
        self.subscribers.push(on_message);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::models::Hub;

    #[tokio::test]
    async fn test_deliver_script_appends_single_line_feed() {
        let mut channel = StreamChannel::new(tokio::io::empty(), Vec::new());
        let script = GeneratedScript {
            hub: Hub::Spike,
            text: "print('hi')".to_string(),
        };

        deliver_script(&mut channel, &script).await.unwrap();

        let (_, written) = channel.into_inner();
        assert_eq!(written, b"print('hi')\n");
    }

    #[tokio::test]
    async fn test_pump_incoming_dispatches_lines() {
        let incoming: &[u8] = b"ready\r\nrun 1 done\n";
        let mut channel = StreamChannel::new(incoming, tokio::io::sink());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        channel.subscribe(Box::new(move |msg| sink.lock().unwrap().push(msg.to_string())));

        let count = channel.pump_incoming(Duration::from_millis(200)).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(*seen.lock().unwrap(), vec!["ready", "run 1 done"]);
    }
}
