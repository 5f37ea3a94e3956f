//! The lookup seam between the resolver and the site environment.
//!
//! Every external lookup the wrappers depend on goes through the
//! [`Directory`] trait, so the resolver and the wrapper drivers are plain
//! functions over data. The production implementation shells out to the
//! standard directory client (`hesinfo`) and spooler client (`lpstat`),
//! and probes print servers over TCP.

use std::net::{TcpStream, ToSocketAddrs};
use std::process::Command;
use std::time::Duration;

use log::debug;

use crate::config::Config;

const IPP_PORT: u16 = 631;

/// Directory and spooler lookups the resolver depends on.
pub trait Directory {
    /// The local spooler's default destination, if one is configured.
    fn default_destination(&self) -> Option<String>;

    /// The device URI the local spooler has for `queue`, if it knows the
    /// queue at all.
    fn device_uri(&self, queue: &str) -> Option<String>;

    /// The directory capability record for `queue`.
    fn queue_capabilities(&self, queue: &str) -> Option<String>;

    /// Cluster records for the machine this wrapper runs on.
    fn local_cluster(&self) -> Vec<String>;

    /// Known site print servers, lowercased.
    fn print_servers(&self) -> Vec<String>;

    /// Whether `host` accepts connections on the IPP port.
    fn accepts_ipp(&self, host: &str) -> bool;
}

/// Production [`Directory`] backed by `hesinfo`, `lpstat`, and a TCP probe.
pub struct SystemDirectory {
    probe_timeout: Duration,
}

impl SystemDirectory {
    pub fn new(config: &Config) -> Self {
        Self {
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
        }
    }
}

/// Runs a lookup command and returns its stdout on success.
fn capture(command: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(command).args(args).output().ok()?;
    if !output.status.success() {
        debug!("{command} {} exited unsuccessfully", args.join(" "));
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

fn hesinfo(name: &str, record: &str) -> Vec<String> {
    match capture("hesinfo", &[name, record]) {
        Some(out) => out
            .lines()
            .map(str::to_string)
            .filter(|line| !line.is_empty())
            .collect(),
        None => Vec::new(),
    }
}

impl Directory for SystemDirectory {
    fn default_destination(&self) -> Option<String> {
        // "system default destination: meadow", or a no-default message
        // with no colon-separated value.
        let out = capture("lpstat", &["-d"])?;
        out.lines()
            .find_map(|line| line.split_once(": ").map(|(_, queue)| queue.trim().to_string()))
            .filter(|queue| !queue.is_empty())
    }

    fn device_uri(&self, queue: &str) -> Option<String> {
        // "device for meadow: ipp://printers.example.com/printers/meadow"
        let out = capture("lpstat", &["-v", queue])?;
        out.lines()
            .filter(|line| line.starts_with("device for "))
            .find_map(|line| line.split_once(": ").map(|(_, uri)| uri.trim().to_string()))
            .filter(|uri| !uri.is_empty())
    }

    fn queue_capabilities(&self, queue: &str) -> Option<String> {
        hesinfo(queue, "pcap").into_iter().next()
    }

    fn local_cluster(&self) -> Vec<String> {
        let fqdn = capture("hostname", &["--fqdn"])
            .map(|out| out.trim().to_string())
            .filter(|name| !name.is_empty());
        match fqdn {
            Some(fqdn) => hesinfo(&fqdn, "cluster"),
            None => Vec::new(),
        }
    }

    fn print_servers(&self) -> Vec<String> {
        hesinfo("cups-print", "sloc")
            .into_iter()
            .chain(hesinfo("cups-cluster", "sloc"))
            .map(|server| server.to_lowercase())
            .collect()
    }

    fn accepts_ipp(&self, host: &str) -> bool {
        let addrs = match (host, IPP_PORT).to_socket_addrs() {
            Ok(addrs) => addrs,
            Err(_) => return false,
        };
        for addr in addrs {
            if TcpStream::connect_timeout(&addr, self.probe_timeout).is_ok() {
                return true;
            }
        }
        false
    }
}
