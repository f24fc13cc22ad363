//! ALSA `amidi` transport
//!
//! `amidi -s FILE` sends a `.syx` file with a configurable pause between
//! SysEx messages. Without `--sysex-interval` the Pacer silently drops most
//! of an export.

use super::{port_matches, SysexSender, TransportError};
use crate::config::PacerConfig;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const AMIDI: &str = "amidi";

/// How often a running amidi process is checked against the timeout
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One row of `amidi -l`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmidiPort {
    /// "I", "O" or "IO"
    pub direction: String,
    /// ALSA raw MIDI device (e.g. "hw:2,0,0"), passed to `amidi -p`
    pub device: String,
    /// Port name as reported by the driver
    pub name: String,
}

impl AmidiPort {
    pub fn is_output(&self) -> bool {
        self.direction.contains('O')
    }
}

/// Parse the output of `amidi -l`
///
/// ```text
/// Dir Device    Name
/// IO  hw:2,0,0  PACER MIDI 1
/// ```
pub fn parse_amidi_ports(output: &str) -> Vec<AmidiPort> {
    output
        .lines()
        .filter_map(|line| {
            let (direction, rest) = line.trim().split_once(char::is_whitespace)?;
            let (device, name) = rest.trim_start().split_once(char::is_whitespace)?;
            if direction == "Dir" {
                return None;
            }
            Some(AmidiPort {
                direction: direction.to_string(),
                device: device.to_string(),
                name: name.trim().to_string(),
            })
        })
        .collect()
}

/// List raw MIDI ports via `amidi -l`
pub fn list_amidi_ports() -> Result<Vec<AmidiPort>, TransportError> {
    let output = Command::new(AMIDI)
        .arg("-l")
        .output()
        .map_err(spawn_error)?;

    if !output.status.success() {
        return Err(TransportError::Failed(
            String::from_utf8_lossy(&output.stderr).trim().to_string(),
        ));
    }

    let ports = parse_amidi_ports(&String::from_utf8_lossy(&output.stdout));
    log::debug!("list_amidi_ports: found {} ports", ports.len());
    Ok(ports)
}

/// Find the port whose name matches `device_name`, preferring output ports
pub fn find_port<'a>(ports: &'a [AmidiPort], device_name: &str) -> Option<&'a AmidiPort> {
    let mut matching = ports.iter().filter(|p| port_matches(&p.name, device_name));
    let first = matching.clone().next();
    matching.find(|p| p.is_output()).or(first)
}

fn spawn_error(e: io::Error) -> TransportError {
    if e.kind() == io::ErrorKind::NotFound {
        TransportError::AmidiNotFound
    } else {
        TransportError::Io(e)
    }
}

/// Sends SysEx through `amidi -p PORT --sysex-interval=MS -s FILE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmidiSender {
    port: String,
    timeout: Duration,
    sysex_interval_ms: u64,
}

impl AmidiSender {
    pub fn new(port: impl Into<String>, timeout: Duration, sysex_interval_ms: u64) -> Self {
        Self {
            port: port.into(),
            timeout,
            sysex_interval_ms,
        }
    }

    /// Build a sender from `pacer.yaml`
    ///
    /// Uses `amidi_port` when set, otherwise looks up `device_name` in
    /// `amidi -l`.
    pub fn from_config(config: &PacerConfig) -> Result<Self, TransportError> {
        let port = match &config.amidi_port {
            Some(port) => port.clone(),
            None => {
                let ports = list_amidi_ports()?;
                let port = find_port(&ports, &config.device_name)
                    .ok_or_else(|| TransportError::NoPort(config.device_name.clone()))?;
                log::info!(
                    "AmidiSender: matched '{}' to {} ({})",
                    config.device_name,
                    port.device,
                    port.name
                );
                port.device.clone()
            }
        };
        Ok(Self::new(port, config.timeout(), config.sysex_interval_ms))
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    fn command(&self, file: &std::path::Path) -> Command {
        let mut cmd = Command::new(AMIDI);
        cmd.arg("-p")
            .arg(&self.port)
            .arg(format!("--sysex-interval={}", self.sysex_interval_ms))
            .arg("-s")
            .arg(file)
            .stdin(Stdio::null());
        cmd
    }
}

/// Run a command to completion, killing it once `timeout` elapses
///
/// Stderr is drained on its own thread so a chatty child can't stall on a
/// full pipe while we poll.
fn run_with_timeout(cmd: &mut Command, timeout: Duration) -> Result<(), TransportError> {
    let mut child = cmd
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_error)?;

    let stderr = child.stderr.take().map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            if let Err(e) = pipe.read_to_end(&mut buf) {
                log::debug!("run_with_timeout: stderr read failed: {}", e);
            }
            String::from_utf8_lossy(&buf).trim().to_string()
        })
    });

    let start = Instant::now();
    let status = loop {
        if let Some(status) = child.try_wait()? {
            break status;
        }
        if start.elapsed() >= timeout {
            log::warn!("run_with_timeout: {:?} timed out, killing", cmd.get_program());
            if let Err(e) = child.kill() {
                log::warn!("run_with_timeout: kill failed: {}", e);
            }
            if let Err(e) = child.wait() {
                log::warn!("run_with_timeout: reaping killed child failed: {}", e);
            }
            return Err(TransportError::Timeout(timeout.as_secs()));
        }
        std::thread::sleep(POLL_INTERVAL);
    };

    let stderr = stderr
        .map(|reader| reader.join().unwrap_or_default())
        .unwrap_or_default();
    if status.success() {
        Ok(())
    } else {
        Err(TransportError::Failed(stderr))
    }
}

impl SysexSender for AmidiSender {
    fn destination(&self) -> &str {
        &self.port
    }

    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut file = tempfile::Builder::new()
            .prefix("paternologia-")
            .suffix(".syx")
            .tempfile()?;
        file.write_all(data)?;
        file.flush()?;

        log::info!(
            "AmidiSender: sending {} bytes to {} (interval {} ms)",
            data.len(),
            self.port,
            self.sysex_interval_ms
        );
        run_with_timeout(&mut self.command(file.path()), self.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = "\
Dir Device    Name
IO  hw:1,0,0  Scarlett 2i4 USB MIDI 1
I   hw:2,0,0  PACER MIDI 1
IO  hw:2,0,1  PACER MIDI 2
";

    #[test]
    fn test_parse_amidi_ports() {
        let ports = parse_amidi_ports(LISTING);
        assert_eq!(ports.len(), 3);
        assert_eq!(
            ports[0],
            AmidiPort {
                direction: "IO".to_string(),
                device: "hw:1,0,0".to_string(),
                name: "Scarlett 2i4 USB MIDI 1".to_string(),
            }
        );
        assert!(!ports[1].is_output());
        assert_eq!(ports[2].name, "PACER MIDI 2");
    }

    #[test]
    fn test_parse_ignores_noise() {
        assert!(parse_amidi_ports("").is_empty());
        assert!(parse_amidi_ports("Dir Device    Name\n\n").is_empty());
        assert!(parse_amidi_ports("IO\n").is_empty());
    }

    #[test]
    fn test_find_port_prefers_output() {
        let ports = parse_amidi_ports(LISTING);
        let port = find_port(&ports, "pacer").unwrap();
        assert_eq!(port.device, "hw:2,0,1");

        let inputs_only = &ports[1..2];
        assert_eq!(find_port(inputs_only, "PACER").unwrap().device, "hw:2,0,0");

        assert!(find_port(&ports, "MicroFreak").is_none());
    }

    #[test]
    fn test_from_config_with_explicit_port() {
        let config = PacerConfig {
            amidi_port: Some("hw:3,0,0".to_string()),
            sysex_interval_ms: 30,
            ..PacerConfig::default()
        };
        let sender = AmidiSender::from_config(&config).unwrap();
        assert_eq!(sender.port(), "hw:3,0,0");
        assert_eq!(sender.destination(), "hw:3,0,0");
        assert_eq!(sender, AmidiSender::new("hw:3,0,0", Duration::from_secs(5), 30));
    }

    #[test]
    fn test_command_line() {
        let sender = AmidiSender::new("hw:2,0,0", Duration::from_secs(5), 20);
        let cmd = sender.command(std::path::Path::new("/tmp/song.syx"));
        let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(cmd.get_program(), AMIDI);
        assert_eq!(
            args,
            vec!["-p", "hw:2,0,0", "--sysex-interval=20", "-s", "/tmp/song.syx"]
        );
    }

    #[test]
    fn test_spawn_error_mapping() {
        let missing = io::Error::new(io::ErrorKind::NotFound, "no amidi");
        assert!(matches!(spawn_error(missing), TransportError::AmidiNotFound));

        let denied = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert!(matches!(spawn_error(denied), TransportError::Io(_)));
    }

    #[cfg(unix)]
    fn sh(script: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(script);
        cmd
    }

    #[cfg(unix)]
    #[test]
    fn test_run_drains_large_stderr() {
        // Far more than a pipe buffer holds
        let mut cmd = sh("head -c 262144 /dev/zero >&2");
        assert!(run_with_timeout(&mut cmd, Duration::from_secs(10)).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_reports_stderr_on_failure() {
        let mut cmd = sh("echo 'cannot open port hw:9,0,0' >&2; exit 1");
        match run_with_timeout(&mut cmd, Duration::from_secs(10)) {
            Err(TransportError::Failed(stderr)) => {
                assert_eq!(stderr, "cannot open port hw:9,0,0")
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_run_kills_on_timeout() {
        let start = Instant::now();
        let mut cmd = sh("sleep 10");
        let result = run_with_timeout(&mut cmd, Duration::from_millis(100));
        assert!(matches!(result, Err(TransportError::Timeout(_))));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
