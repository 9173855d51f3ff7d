//! Raw TCP transport to the label printer and the print entry point.
//!
//! A label program is written over one connection to port 9100 and the
//! connection is closed. Nothing is read back from the printer.

use log::{debug, info};
use std::env;
use std::io::{self, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use crate::{
    error::{Error, SendError},
    label::{build_label, LabelFields, LabelProgram},
    layout::Layout,
};

/// Conventional raw printing port (JetDirect).
pub const DEFAULT_PORT: u16 = 9100;
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(5000);

pub const HOST_VAR: &str = "LABEL_PRINTER_HOST";
pub const PORT_VAR: &str = "LABEL_PRINTER_PORT";
pub const TIMEOUT_VAR: &str = "LABEL_PRINTER_TIMEOUT_MS";

const SUCCESS_MESSAGE: &str = "label sent";

/// Outcome of a print request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintResult {
    pub success: bool,
    pub message: String,
}

impl PrintResult {
    fn sent() -> Self {
        PrintResult {
            success: true,
            message: SUCCESS_MESSAGE.to_string(),
        }
    }
}

impl From<Result<(), SendError>> for PrintResult {
    fn from(result: Result<(), SendError>) -> Self {
        match result {
            Ok(()) => Self::sent(),
            Err(err) => PrintResult {
                success: false,
                message: err.to_string(),
            },
        }
    }
}

/// Printer connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterConfig {
    host: String,
    port: u16,
    timeout: Duration,
}

impl PrinterConfig {
    /// Initialize configuration with the default port and timeout.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use zpl_label::PrinterConfig;
    ///
    /// let config = PrinterConfig::new("192.168.1.50")
    ///     .with_port(9100)
    ///     .with_timeout(Duration::from_secs(3));
    /// assert_eq!(config.host(), "192.168.1.50");
    /// assert_eq!(config.port(), 9100);
    /// ```
    pub fn new(host: &str) -> PrinterConfig {
        PrinterConfig {
            host: host.to_string(),
            port: DEFAULT_PORT,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Read settings from `LABEL_PRINTER_HOST`, `LABEL_PRINTER_PORT` and
    /// `LABEL_PRINTER_TIMEOUT_MS`, falling back to the defaults for unset
    /// variables.
    pub fn from_env() -> Result<PrinterConfig, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<PrinterConfig, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(HOST_VAR).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let mut config = PrinterConfig::new(host.trim());

        if let Some(port) = lookup(PORT_VAR) {
            let port = port.trim().parse::<u16>().map_err(|err| {
                Error::InvalidConfig(format!("{}={:?}: {}", PORT_VAR, port, err))
            })?;
            config = config.with_port(port);
        }

        if let Some(ms) = lookup(TIMEOUT_VAR) {
            let ms = ms.trim().parse::<u64>().map_err(|err| {
                Error::InvalidConfig(format!("{}={:?}: {}", TIMEOUT_VAR, ms, err))
            })?;
            config = config.with_timeout(Duration::from_millis(ms));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_port(self, port: u16) -> Self {
        PrinterConfig { port, ..self }
    }

    /// Deadline covering both connecting and writing.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        PrinterConfig { timeout, ..self }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn validate(&self) -> Result<(), Error> {
        if self.host.is_empty() {
            return Err(Error::InvalidConfig("printer host is empty".to_string()));
        }
        if self.port == 0 {
            return Err(Error::InvalidConfig("printer port is 0".to_string()));
        }
        if self.timeout.as_millis() == 0 {
            return Err(Error::InvalidConfig("printer timeout is 0".to_string()));
        }
        Ok(())
    }
}

/// Render a label and send it to the configured printer.
///
/// Rendering and configuration problems are returned as `Err` and nothing is
/// sent. Transport failures come back inside the `PrintResult`.
pub fn print_label(fields: &LabelFields, config: &PrinterConfig) -> Result<PrintResult, Error> {
    config.validate()?;
    let program = build_label(fields, &Layout::STANDARD)?;
    Ok(send(program, config.host(), config.port, config.timeout))
}

/// Send a label program over a raw TCP connection.
///
/// Opens a single connection, writes the whole program, then closes it. The
/// printer's answer is never read and a failed send is not retried. The
/// `timeout` is one deadline shared by connect and write; on expiry the
/// socket is dropped.
pub fn send(program: LabelProgram, host: &str, port: u16, timeout: Duration) -> PrintResult {
    let result = deliver(program.as_bytes(), host, port, timeout);
    match &result {
        Ok(()) => info!("Sent {} byte label to {}:{}", program.len(), host, port),
        Err(err) => info!("Label was not sent: {}", err),
    }
    PrintResult::from(result)
}

fn deliver(buf: &[u8], host: &str, port: u16, timeout: Duration) -> Result<(), SendError> {
    let addr = format!("{}:{}", host, port);
    let deadline = Instant::now() + timeout;
    let timed_out = || SendError::Timeout {
        addr: addr.clone(),
        timeout,
    };
    let write_error = |source: io::Error| {
        if is_timeout(&source) {
            timed_out()
        } else {
            SendError::Write {
                addr: addr.clone(),
                source,
            }
        }
    };

    let mut stream = connect(&addr, deadline, timeout)?;

    // the socket timeout applies per call, so it is re-armed from the
    // deadline before every write
    let mut written = 0;
    while written < buf.len() {
        let left = remaining(deadline).ok_or_else(timed_out)?;
        stream
            .set_write_timeout(Some(left))
            .map_err(write_error)?;

        match stream.write(&buf[written..]) {
            Ok(0) => return Err(write_error(io::ErrorKind::WriteZero.into())),
            Ok(n) => written += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(write_error(err)),
        }
    }
    debug!("Wrote {} bytes to {}", written, addr);

    match stream.shutdown(Shutdown::Both) {
        Ok(()) => Ok(()),
        // peer closed first, everything was already handed to the kernel
        Err(err) if err.kind() == io::ErrorKind::NotConnected => Ok(()),
        Err(source) => Err(SendError::Write { addr, source }),
    }
}

fn connect(addr: &str, deadline: Instant, timeout: Duration) -> Result<TcpStream, SendError> {
    let timed_out = || SendError::Timeout {
        addr: addr.to_string(),
        timeout,
    };

    let candidates: Vec<SocketAddr> = addr
        .to_socket_addrs()
        .map_err(|source| SendError::Unreachable {
            addr: addr.to_string(),
            source,
        })?
        .collect();

    // name resolution cannot be interrupted, but it still spends the budget
    if remaining(deadline).is_none() {
        return Err(timed_out());
    }

    let mut last_error =
        io::Error::new(io::ErrorKind::AddrNotAvailable, "host resolved to no addresses");

    for candidate in candidates {
        let remaining = match remaining(deadline) {
            Some(remaining) => remaining,
            None => break,
        };
        debug!("Connecting to {} ({:?} left)", candidate, remaining);

        match TcpStream::connect_timeout(&candidate, remaining) {
            Ok(stream) => return Ok(stream),
            Err(err) => {
                debug!("Connect to {} failed: {:?}", candidate, err);
                last_error = err;
            }
        }
    }

    if is_timeout(&last_error) || remaining(deadline).is_none() {
        Err(timed_out())
    } else {
        Err(SendError::Unreachable {
            addr: addr.to_string(),
            source: last_error,
        })
    }
}

fn remaining(deadline: Instant) -> Option<Duration> {
    let left = deadline.saturating_duration_since(Instant::now());
    if left.is_zero() {
        None
    } else {
        Some(left)
    }
}

fn is_timeout(err: &io::Error) -> bool {
    // blocking sockets report an expired write timeout as WouldBlock on unix
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
    )
}
