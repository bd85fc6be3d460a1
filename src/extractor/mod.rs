//! Scan result extraction
//!
//! Flattens an nmap XML document into one [`PortRecord`] per
//! `host/ports/port` element, in document order. Only well-formedness is
//! enforced: any attribute or child element the scanner left out becomes an
//! empty field, and a host without an address is reported as `unknown`.

mod record;

pub use record::{PortRecord, ReportSummary, UNKNOWN_IP};

use crate::{ReportError, Result};
use log::{debug, info};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::io;
use std::path::Path;

/// Read a scan document from disk and extract its port records
pub fn extract_records<P: AsRef<Path>>(path: P) -> Result<Vec<PortRecord>> {
    let path = path.as_ref();
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ReportError::NotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let records = parse_records(&data)?;
    info!("Extracted {} port record(s) from {}", records.len(), path.display());
    Ok(records)
}

/// Extract port records from an in-memory scan document
pub fn parse_records(xml: &[u8]) -> Result<Vec<PortRecord>> {
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);
    reader.check_end_names(true);

    let mut walker = DocumentWalker::default();

    loop {
        let event = reader.read_event().map_err(|e| {
            ReportError::MalformedInput(format!(
                "{} (at byte {})",
                e,
                reader.buffer_position()
            ))
        })?;

        match event {
            Event::Start(ref e) => walker.open(e, false)?,
            Event::Empty(ref e) => walker.open(e, true)?,
            Event::End(ref e) => walker.close(e.name().as_ref())?,
            Event::Text(_) | Event::CData(_) if walker.stack.is_empty() => {
                return Err(ReportError::MalformedInput(
                    "content outside of the root element".to_string(),
                ));
            }
            Event::Text(ref t) => {
                t.unescape()?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    walker.finish()
}

/// Fields of the `port` element currently being read
#[derive(Debug, Default)]
struct PortFields {
    port: String,
    protocol: String,
    state: Option<String>,
    service: Option<ServiceFields>,
}

#[derive(Debug, Default)]
struct ServiceFields {
    name: String,
    product: String,
    version: String,
}

/// Host being read; records are only finalized when the host closes
#[derive(Debug, Default)]
struct HostState {
    ip: Option<String>,
    address_seen: bool,
    ports: Vec<PortFields>,
}

#[derive(Debug, Default)]
struct DocumentWalker {
    // Names of the currently open elements, root first
    stack: Vec<Vec<u8>>,
    seen_root: bool,
    host: Option<HostState>,
    port: Option<PortFields>,
    records: Vec<PortRecord>,
}

impl DocumentWalker {
    fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
        check_element(e)?;
        let name = e.name().as_ref().to_vec();

        if self.stack.is_empty() {
            if self.seen_root {
                return Err(ReportError::MalformedInput(
                    "more than one root element".to_string(),
                ));
            }
            self.seen_root = true;
            if name != b"nmaprun" {
                debug!("Unexpected root element <{}>", String::from_utf8_lossy(&name));
            }
        }

        match (self.stack.len(), name.as_slice()) {
            (1, b"host") => {
                self.host = Some(HostState::default());
            }
            (2, b"address") if self.in_host() => {
                if let Some(host) = self.host.as_mut() {
                    if !host.address_seen {
                        host.address_seen = true;
                        host.ip = attribute(e, "addr")?.filter(|addr| !addr.is_empty());
                    }
                }
            }
            (3, b"port") if self.in_host() && self.stack[2] == b"ports" => {
                self.port = Some(PortFields {
                    port: attribute(e, "portid")?.unwrap_or_default(),
                    protocol: attribute(e, "protocol")?.unwrap_or_default(),
                    ..Default::default()
                });
            }
            (4, b"state") if self.port.is_some() => {
                let state = attribute(e, "state")?.unwrap_or_default();
                if let Some(port) = self.port.as_mut() {
                    port.state.get_or_insert(state);
                }
            }
            (4, b"service") if self.port.is_some() => {
                let service = ServiceFields {
                    name: attribute(e, "name")?.unwrap_or_default(),
                    product: attribute(e, "product")?.unwrap_or_default(),
                    version: attribute(e, "version")?.unwrap_or_default(),
                };
                if let Some(port) = self.port.as_mut() {
                    port.service.get_or_insert(service);
                }
            }
            _ => {}
        }

        self.stack.push(name.clone());
        if empty {
            self.close(&name)?;
        }

        Ok(())
    }

    fn close(&mut self, name: &[u8]) -> Result<()> {
        match self.stack.pop() {
            Some(open) if open == name => {}
            Some(open) => {
                return Err(ReportError::MalformedInput(format!(
                    "expected </{}>, found </{}>",
                    String::from_utf8_lossy(&open),
                    String::from_utf8_lossy(name)
                )));
            }
            None => {
                return Err(ReportError::MalformedInput(format!(
                    "unexpected closing tag </{}>",
                    String::from_utf8_lossy(name)
                )));
            }
        }

        match (self.stack.len(), name) {
            (3, b"port") => {
                if let (Some(port), Some(host)) = (self.port.take(), self.host.as_mut()) {
                    host.ports.push(port);
                }
            }
            (1, b"host") => {
                if let Some(host) = self.host.take() {
                    self.finish_host(host);
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn in_host(&self) -> bool {
        self.host.is_some() && self.stack.get(1).map(Vec::as_slice) == Some(b"host".as_slice())
    }

    fn finish_host(&mut self, host: HostState) {
        let ip = host.ip.unwrap_or_else(|| UNKNOWN_IP.to_string());
        debug!("Host {} has {} port element(s)", ip, host.ports.len());

        self.records.extend(host.ports.into_iter().map(|port| {
            let service = port.service.unwrap_or_default();
            PortRecord {
                ip: ip.clone(),
                port: port.port,
                protocol: port.protocol,
                state: port.state.unwrap_or_default(),
                service: service.name,
                product: service.product,
                version: service.version,
            }
        }));
    }

    fn finish(self) -> Result<Vec<PortRecord>> {
        if !self.seen_root {
            return Err(ReportError::MalformedInput(
                "document has no root element".to_string(),
            ));
        }

        if let Some(open) = self.stack.last() {
            return Err(ReportError::MalformedInput(format!(
                "unexpected end of document, <{}> is not closed",
                String::from_utf8_lossy(open)
            )));
        }

        Ok(self.records)
    }
}

/// Reject bad names, duplicate or unquoted attributes and unknown entities
fn check_element(e: &BytesStart<'_>) -> Result<()> {
    let name = e.name();
    if !is_xml_name(name.as_ref()) {
        return Err(ReportError::MalformedInput(format!(
            "invalid element name <{}>",
            String::from_utf8_lossy(name.as_ref())
        )));
    }

    for attr in e.attributes() {
        let attr = attr?;
        if !is_xml_name(attr.key.as_ref()) {
            return Err(ReportError::MalformedInput(format!(
                "invalid attribute name {:?} on <{}>",
                String::from_utf8_lossy(attr.key.as_ref()),
                String::from_utf8_lossy(name.as_ref())
            )));
        }
        attr.unescape_value()?;
    }

    Ok(())
}

fn is_xml_name(name: &[u8]) -> bool {
    let Ok(name) = std::str::from_utf8(name) else {
        return false;
    };

    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '.' | '_' | ':' | '\u{B7}'))
}

/// Unescaped value of an attribute, `None` when it is absent
fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>> {
    match e.try_get_attribute(key)? {
        Some(attr) => Ok(Some(attr.unescape_value()?.into_owned())),
        None => Ok(None),
    }
}
