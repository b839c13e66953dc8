//! FTP implementation of the `RemoteStore` port, built on `suppaftp`.
//!
//! FTP answers both "no such file" and "permission denied" with 550, so a 550
//! from `MKD` or `DELE` is followed by a `CWD` or `SIZE` lookup that tells the
//! two apart. Only another 550 counts as "absent"; a dropped session is
//! reported as such.

use std::io::{ErrorKind, Write as _};
use std::net::{SocketAddr, ToSocketAddrs as _};
use std::time::Duration;

use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream, Status};

use crate::application::ports::RemoteStore;
use crate::domain::RemoteError;

/// Everything needed to open an authenticated FTP session.
#[derive(Clone)]
pub struct ConnectionSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    /// Connect and socket read/write timeout.
    pub timeout: Duration,
    /// Upper bound on a single write to the data connection.
    pub chunk_size: usize,
}

impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("timeout", &self.timeout)
            .field("chunk_size", &self.chunk_size)
            .finish_non_exhaustive()
    }
}

/// An open FTP session in binary transfer mode.
pub struct FtpRemote {
    stream: FtpStream,
    chunk_size: usize,
    closed: bool,
}

impl FtpRemote {
    /// Connect, log in, and switch to binary transfers.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Connection` if the host cannot be resolved or
    /// reached, or the login is refused; `RemoteError::Timeout` if the
    /// server does not answer in time.
    pub fn connect(settings: &ConnectionSettings) -> Result<Self, RemoteError> {
        let addr = resolve(&settings.host, settings.port)?;
        tracing::debug!(%addr, host = %settings.host, "connecting");

        let mut stream = FtpStream::connect_timeout(addr, settings.timeout)
            .map_err(|e| connect_error(&e))?;
        let socket = stream.get_ref();
        socket
            .set_read_timeout(Some(settings.timeout))
            .and_then(|()| socket.set_write_timeout(Some(settings.timeout)))
            .map_err(|e| RemoteError::Connection(e.to_string()))?;

        stream
            .login(&settings.username, &settings.password)
            .map_err(|e| connect_error(&e))?;
        stream
            .transfer_type(FileType::Binary)
            .map_err(|e| connect_error(&e))?;
        tracing::info!(host = %settings.host, user = %settings.username, "logged in");

        Ok(Self {
            stream,
            chunk_size: settings.chunk_size.max(1),
            closed: false,
        })
    }

    /// Ask `SIZE` whether `path` is a file.
    fn file_lookup(&mut self, path: &str) -> Lookup {
        match self.stream.size(path) {
            Ok(_) => Lookup::Present,
            Err(e) => Lookup::from_error(e),
        }
    }

    /// Ask `CWD` whether `path` is a directory, then restore the working directory.
    fn dir_lookup(&mut self, path: &str) -> Lookup {
        let cwd = match self.stream.pwd() {
            Ok(cwd) => cwd,
            Err(e) => return Lookup::Failed(classify(e)),
        };
        match self.stream.cwd(path) {
            Ok(()) => match self.stream.cwd(&cwd) {
                Ok(()) => Lookup::Present,
                Err(e) => Lookup::Failed(classify(e)),
            },
            Err(e) => Lookup::from_error(e),
        }
    }
}

/// Answer to a follow-up query made after a command was refused with 550.
#[derive(Debug, Clone, PartialEq)]
enum Lookup {
    /// The path exists.
    Present,
    /// The query was refused with 550 too.
    Absent,
    /// The server gave some other reply, e.g. `SIZE` not implemented.
    Unanswered(String),
    /// The session failed while asking.
    Failed(RemoteError),
}

impl Lookup {
    fn from_error(err: FtpError) -> Self {
        if is_file_unavailable(&err) {
            Self::Absent
        } else if matches!(err, FtpError::ConnectionError(_)) {
            Self::Failed(classify(err))
        } else {
            Self::Unanswered(err.to_string())
        }
    }
}

/// Outcome of an `MKD` refused with 550, given what `CWD` said about the path.
fn refused_mkdir_outcome(refusal: RemoteError, dir: Lookup) -> RemoteError {
    match dir {
        Lookup::Present => RemoteError::AlreadyExists,
        Lookup::Absent | Lookup::Unanswered(_) => refusal,
        Lookup::Failed(err) => err,
    }
}

/// Outcome of a `DELE` refused with 550, given what `SIZE` said about the path.
///
/// A server that cannot answer `SIZE` is taken at its word that the file is gone.
fn refused_delete_outcome(path: &str, refusal: RemoteError, file: Lookup) -> RemoteError {
    match file {
        Lookup::Present => refusal,
        Lookup::Absent => RemoteError::NotFound,
        Lookup::Unanswered(reply) => {
            tracing::warn!(
                path,
                error = %refusal,
                reply = %reply,
                "server cannot confirm the file is absent; treating delete failure as not found"
            );
            RemoteError::NotFound
        }
        Lookup::Failed(err) => err,
    }
}

impl RemoteStore for FtpRemote {
    fn change_dir(&mut self, path: &str) -> Result<(), RemoteError> {
        self.stream.cwd(path).map_err(classify)
    }

    fn make_dir(&mut self, path: &str) -> Result<(), RemoteError> {
        match self.stream.mkdir(path) {
            Ok(()) => Ok(()),
            Err(e) if is_file_unavailable(&e) => {
                let dir = self.dir_lookup(path);
                Err(refused_mkdir_outcome(classify(e), dir))
            }
            Err(e) => Err(classify(e)),
        }
    }

    fn delete(&mut self, path: &str) -> Result<(), RemoteError> {
        match self.stream.rm(path) {
            Ok(()) => Ok(()),
            Err(e) if is_file_unavailable(&e) => {
                let file = self.file_lookup(path);
                Err(refused_delete_outcome(path, classify(e), file))
            }
            Err(e) => Err(classify(e)),
        }
    }

    fn store(&mut self, path: &str, contents: &[u8]) -> Result<u64, RemoteError> {
        let mut data = self.stream.put_with_stream(path).map_err(classify)?;
        for chunk in contents.chunks(self.chunk_size) {
            data.write_all(chunk).map_err(|e| classify_io(&e))?;
        }
        self.stream.finalize_put_stream(data).map_err(classify)?;
        tracing::debug!(path, bytes = contents.len(), "stored");
        Ok(contents.len() as u64)
    }

    fn close(&mut self) -> Result<(), RemoteError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.stream.quit().map_err(classify)
    }
}

fn resolve(host: &str, port: u16) -> Result<SocketAddr, RemoteError> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| RemoteError::Connection(format!("cannot resolve {host}: {e}")))?
        .next()
        .ok_or_else(|| RemoteError::Connection(format!("no address found for {host}")))
}

fn is_file_unavailable(err: &FtpError) -> bool {
    matches!(err, FtpError::UnexpectedResponse(resp) if matches!(resp.status, Status::FileUnavailable))
}

fn classify_io(err: &std::io::Error) -> RemoteError {
    match err.kind() {
        ErrorKind::TimedOut | ErrorKind::WouldBlock => RemoteError::Timeout,
        _ => RemoteError::ConnectionLost(err.to_string()),
    }
}

/// Map a `suppaftp` error onto the port's error classes.
fn classify(err: FtpError) -> RemoteError {
    let text = err.to_string();
    match err {
        FtpError::ConnectionError(io) => classify_io(&io),
        FtpError::UnexpectedResponse(resp) if matches!(resp.status, Status::FileUnavailable) => {
            RemoteError::PermissionDenied(text)
        }
        _ => RemoteError::Io(text),
    }
}

fn connect_error(err: &FtpError) -> RemoteError {
    match err {
        FtpError::ConnectionError(io)
            if matches!(io.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) =>
        {
            RemoteError::Timeout
        }
        other => RemoteError::Connection(other.to_string()),
    }
}
