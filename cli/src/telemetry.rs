use std::io::Write;

use anyhow::Context as _;
use monster_sweeper_protocol::Envelope;

/// Destination for game-result events.
pub trait TelemetrySink {
    fn publish(&mut self, envelope: &Envelope) -> anyhow::Result<()>;
}

/// Writes one JSON object per line and flushes after each, so a reader sees events as they happen.
#[derive(Debug)]
pub struct JsonLinesSink<W> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> TelemetrySink for JsonLinesSink<W> {
    fn publish(&mut self, envelope: &Envelope) -> anyhow::Result<()> {
        let line = envelope.to_json().context("serializing telemetry event")?;
        writeln!(self.writer, "{line}").context("writing telemetry event")?;
        self.writer.flush().context("flushing telemetry sink")?;
        log::debug!("Published to {}: {}", envelope.topic, line);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monster_sweeper_protocol::GameResult;

    #[test]
    fn writes_one_line_per_event() {
        let mut buf = Vec::new();
        let mut sink = JsonLinesSink::new(&mut buf);

        sink.publish(&Envelope::game_result(GameResult::Failed)).unwrap();
        sink.publish(&Envelope::game_result(GameResult::Won)).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"topic":"monster-chaos-game/monster","payload":{"game_result":"FAILED"}}"#
        );
        assert!(lines[1].ends_with(r#"{"game_result":"WON"}}"#));
    }
}
