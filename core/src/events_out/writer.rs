use std::fmt::Write as _;
use std::io::{self, Write};

use crate::scheme::StreamingMode;
use crate::xml::escape;

use super::event::{format_time, Event, EventDefaults};

fn audit_preview(s: &str) -> String {
    const MAX: usize = 120;
    if s.len() <= MAX {
        return s.to_string();
    }
    let end = s
        .char_indices()
        .take_while(|(i, _)| *i < MAX)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let mut out = s[..end].to_string();
    out.push('…');
    out
}

/// Serializes events in the host's streaming format.
///
/// In xml mode the output is wrapped in one `<stream>` envelope: `open_stream` and
/// `close_stream` each write at most once per writer.
pub struct EventWriter<W: Write> {
    out: W,
    mode: StreamingMode,
    opened: bool,
    closed: bool,
    events: u64,
    bytes: u64,
}

impl<W: Write> EventWriter<W> {
    pub fn new(out: W, mode: StreamingMode) -> Self {
        Self {
            out,
            mode,
            opened: false,
            closed: false,
            events: 0,
            bytes: 0,
        }
    }

    pub fn mode(&self) -> StreamingMode {
        self.mode
    }

    pub fn events_written(&self) -> u64 {
        self.events
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    pub fn is_open(&self) -> bool {
        self.opened && !self.closed
    }

    pub fn open_stream(&mut self) -> io::Result<()> {
        if self.opened {
            return Ok(());
        }
        if self.mode == StreamingMode::Xml {
            self.write_raw("<stream>\n")?;
        }
        self.opened = true;
        Ok(())
    }

    pub fn emit(&mut self, event: &Event, defaults: &EventDefaults) -> io::Result<()> {
        if self.closed {
            return Err(io::Error::other("event stream already closed"));
        }
        self.open_stream()?;

        let rendered = match self.mode {
            StreamingMode::Xml => render_xml(event, defaults),
            StreamingMode::Simple => render_simple(event),
        };
        if self.events < 5 {
            tracing::debug!(
                target: "modinput.events_out",
                count = self.events,
                bytes = rendered.len(),
                preview = %audit_preview(rendered.trim_end()),
                "writing event"
            );
        }
        self.write_raw(&rendered)?;
        self.events += 1;
        Ok(())
    }

    pub fn close_stream(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        if self.opened && self.mode == StreamingMode::Xml {
            self.write_raw("</stream>\n")?;
        }
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_raw(&mut self, s: &str) -> io::Result<()> {
        self.out.write_all(s.as_bytes())?;
        self.bytes += s.len() as u64;
        Ok(())
    }
}

fn render_xml(event: &Event, defaults: &EventDefaults) -> String {
    let mut out = String::from("<event");
    if let Some(stanza) = &defaults.stanza {
        let _ = write!(out, " stanza=\"{}\"", escape(stanza));
    }
    if event.unbroken {
        out.push_str(" unbroken=\"1\"");
    }
    out.push('>');

    if let Some(time) = &event.time {
        let _ = write!(out, "<time>{}</time>", format_time(time));
    }
    let _ = write!(out, "<data>{}</data>", escape(&event.data));

    let fields = [
        ("source", event.source.as_ref().or(defaults.source.as_ref())),
        (
            "sourcetype",
            event.sourcetype.as_ref().or(defaults.sourcetype.as_ref()),
        ),
        ("index", event.index.as_ref().or(defaults.index.as_ref())),
        ("host", event.host.as_ref().or(defaults.host.as_ref())),
    ];
    for (tag, value) in fields {
        if let Some(value) = value {
            let _ = write!(out, "<{tag}>{}</{tag}>", escape(value));
        }
    }

    if event.unbroken && event.done {
        out.push_str("<done/>");
    }
    out.push_str("</event>\n");
    out
}

fn render_simple(event: &Event) -> String {
    let mut line: String = event
        .data
        .chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect();
    line.push('\n');
    line
}

/// Scoped envelope: the stream is closed when the guard is dropped, whatever path
/// the run took to get there. Use [`EventStream::finish`] to see close errors.
pub struct EventStream<W: Write> {
    writer: Option<EventWriter<W>>,
}

impl<W: Write> EventStream<W> {
    pub fn open(mut writer: EventWriter<W>) -> io::Result<Self> {
        writer.open_stream()?;
        Ok(Self {
            writer: Some(writer),
        })
    }

    pub fn emit(&mut self, event: &Event, defaults: &EventDefaults) -> io::Result<()> {
        match self.writer.as_mut() {
            Some(w) => w.emit(event, defaults),
            None => Err(io::Error::other("event stream already finished")),
        }
    }

    pub fn events_written(&self) -> u64 {
        self.writer.as_ref().map(EventWriter::events_written).unwrap_or(0)
    }

    pub fn finish(mut self) -> io::Result<EventWriter<W>> {
        let mut writer = self
            .writer
            .take()
            .ok_or_else(|| io::Error::other("event stream already finished"))?;
        writer.close_stream()?;
        Ok(writer)
    }
}

impl<W: Write> Drop for EventStream<W> {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writer.close_stream() {
                tracing::error!(
                    target: "modinput.events_out",
                    error = %e,
                    "failed to close event stream"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn defaults() -> EventDefaults {
        EventDefaults {
            stanza: Some("web_ping://a".to_string()),
            source: Some("web_ping://a".to_string()),
            sourcetype: Some("web_ping".to_string()),
            index: Some("main".to_string()),
            host: Some("idx01".to_string()),
        }
    }

    fn output(writer: EventWriter<Vec<u8>>) -> String {
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn control_characters_never_reach_the_stream() {
        let mut stream = EventStream::open(EventWriter::new(Vec::new(), StreamingMode::Xml)).unwrap();
        stream
            .emit(&Event::new("nul\u{0}bell\u{7}ok"), &defaults())
            .unwrap();
        let out = output(stream.finish().unwrap());
        assert!(out.contains("<data>nulbellok</data>"));
        assert!(!out.contains('\u{0}'));
    }

    #[test]
    fn xml_events_are_enveloped_and_escaped() {
        let mut stream = EventStream::open(EventWriter::new(Vec::new(), StreamingMode::Xml)).unwrap();
        let time = Utc.timestamp_millis_opt(1_700_000_000_250).unwrap();
        stream
            .emit(
                &Event::new("a < b & \"c\"").with_time(time).with_index("other"),
                &defaults(),
            )
            .unwrap();
        let writer = stream.finish().unwrap();
        assert_eq!(writer.events_written(), 1);

        assert_eq!(
            output(writer),
            "<stream>\n\
             <event stanza=\"web_ping://a\"><time>1700000000.250</time>\
             <data>a &lt; b &amp; &quot;c&quot;</data><source>web_ping://a</source>\
             <sourcetype>web_ping</sourcetype><index>other</index><host>idx01</host></event>\n\
             </stream>\n"
        );
    }

    #[test]
    fn missing_metadata_is_omitted() {
        let mut writer = EventWriter::new(Vec::new(), StreamingMode::Xml);
        writer
            .emit(&Event::new("x").unbroken(true), &EventDefaults::default())
            .unwrap();
        writer.close_stream().unwrap();
        assert_eq!(
            output(writer),
            "<stream>\n<event unbroken=\"1\"><data>x</data><done/></event>\n</stream>\n"
        );
    }

    #[test]
    fn envelope_is_closed_exactly_once_on_drop() {
        let mut buf = Vec::new();
        {
            let writer = EventWriter::new(&mut buf, StreamingMode::Xml);
            let mut stream = EventStream::open(writer).unwrap();
            stream.emit(&Event::new("one"), &EventDefaults::default()).unwrap();
            // dropped without finish, as on an error path
        }
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.matches("<stream>").count(), 1);
        assert_eq!(text.matches("</stream>").count(), 1);
        assert!(text.ends_with("</stream>\n"));
    }

    #[test]
    fn empty_stream_is_still_well_formed() {
        let stream = EventStream::open(EventWriter::new(Vec::new(), StreamingMode::Xml)).unwrap();
        let writer = stream.finish().unwrap();
        assert_eq!(output(writer), "<stream>\n</stream>\n");
    }

    #[test]
    fn emit_after_close_fails() {
        let mut writer = EventWriter::new(Vec::new(), StreamingMode::Xml);
        writer.close_stream().unwrap();
        writer.close_stream().unwrap();
        assert!(writer.emit(&Event::new("late"), &defaults()).is_err());
    }

    #[test]
    fn simple_mode_writes_single_lines_without_envelope() {
        let mut stream =
            EventStream::open(EventWriter::new(Vec::new(), StreamingMode::Simple)).unwrap();
        stream.emit(&Event::new("line one\nstill one"), &defaults()).unwrap();
        stream.emit(&Event::new("line two"), &defaults()).unwrap();
        assert_eq!(output(stream.finish().unwrap()), "line one still one\nline two\n");
    }
}
