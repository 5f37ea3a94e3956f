//! Queue resolution.
//!
//! Maps a user-supplied (or defaulted) queue name to the subsystem, print
//! server, and canonical queue name that should receive the invocation.
//! Every lookup failure degrades toward "let the local CUPS spooler deal
//! with it" rather than failing the invocation.

use log::debug;
use url::Url;

use crate::config::Config;
use crate::directory::Directory;
use crate::system::System;

/// Finds the default print queue.
///
/// Preference order: explicit configuration (the `PRINTER` environment
/// variable or the site file), the local spooler's default destination,
/// then the machine's cluster record.
pub fn default_queue(config: &Config, directory: &dyn Directory) -> Option<String> {
    if let Some(queue) = &config.default_queue {
        return Some(queue.clone());
    }

    if let Some(queue) = directory.default_destination() {
        return Some(queue);
    }

    // Cluster records are "<key> <value>" pairs; the lpr key names the
    // cluster's default queue.
    for record in directory.local_cluster() {
        if let Some((key, value)) = record.split_once(char::is_whitespace) {
            if key == "lpr" && !value.trim().is_empty() {
                return Some(value.trim().to_string());
            }
        }
    }

    None
}

/// Canonicalizes a local queue name to its site queue name.
///
/// A queue the local spooler does not know is assumed to already be a site
/// queue name. A locally configured queue whose device URI bounces to a
/// site frontend or backend canonicalizes to the queue name in the URI
/// path, which may differ from the local name. Anything else is a genuinely
/// local destination and yields `None`.
pub fn canonicalize_queue(
    queue: &str,
    config: &Config,
    directory: &dyn Directory,
) -> Option<String> {
    let Some(uri) = directory.device_uri(queue) else {
        return Some(queue.to_string());
    };

    let parsed = match Url::parse(&uri) {
        Ok(parsed) => parsed,
        Err(_) => return None,
    };
    if parsed.scheme() != "ipp" {
        return None;
    }
    let host = parsed.host_str()?.to_lowercase();

    let known = config
        .frontends
        .iter()
        .chain(config.backends.iter())
        .map(|server| server.to_lowercase())
        .chain(directory.print_servers());
    if !known.into_iter().any(|server| server == host) {
        return None;
    }

    let path = parsed.path();
    path.strip_prefix("/printers/")
        .or_else(|| path.strip_prefix("/classes/"))
        .map(str::to_string)
        .filter(|name| !name.is_empty())
}

/// Finds the print server for a queue from its capability record.
pub fn print_server_for(queue: &str, directory: &dyn Directory) -> Option<String> {
    // "meadow:rp=meadow:rm=GET-PRINT.EXAMPLE.COM:ka#0:mc#0:"
    let record = directory.queue_capabilities(queue)?;
    record
        .split(':')
        .find_map(|field| field.strip_prefix("rm="))
        .map(str::to_string)
        .filter(|server| !server.is_empty())
}

/// Figures out which printing system to use for a queue.
///
/// Canonicalizes the name, strips any `/instance` suffix, looks up the
/// backing print server, and probes it: a server speaking IPP gets the job
/// over CUPS, anything else is assumed to be LPRng. When the queue is
/// local, or no server can be found, the local CUPS spooler is good
/// enough and no server override is returned.
pub fn find_queue(
    queue: &str,
    config: &Config,
    directory: &dyn Directory,
) -> (System, Option<String>, String) {
    let Some(canonical) = canonicalize_queue(queue, config, directory) else {
        debug!("{queue} is a local destination");
        return (System::Cups, None, queue.to_string());
    };

    // Instances select alternate option sets; the server side only knows
    // the base queue name.
    let canonical = canonical.split('/').next().unwrap_or_default().to_string();

    let Some(server) = print_server_for(&canonical, directory) else {
        debug!("no capability record for {canonical}");
        return (System::Cups, None, canonical);
    };

    if directory.accepts_ipp(&server) {
        (System::Cups, Some(server), canonical)
    } else {
        (System::Lprng, Some(server), canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct StubDirectory {
        default_destination: Option<String>,
        device_uris: HashMap<String, String>,
        capabilities: HashMap<String, String>,
        cluster: Vec<String>,
        servers: Vec<String>,
        ipp_hosts: Vec<String>,
    }

    impl Directory for StubDirectory {
        fn default_destination(&self) -> Option<String> {
            self.default_destination.clone()
        }

        fn device_uri(&self, queue: &str) -> Option<String> {
            self.device_uris.get(queue).cloned()
        }

        fn queue_capabilities(&self, queue: &str) -> Option<String> {
            self.capabilities.get(queue).cloned()
        }

        fn local_cluster(&self) -> Vec<String> {
            self.cluster.clone()
        }

        fn print_servers(&self) -> Vec<String> {
            self.servers.clone()
        }

        fn accepts_ipp(&self, host: &str) -> bool {
            self.ipp_hosts.iter().any(|known| known == host)
        }
    }

    fn site_config() -> Config {
        Config {
            frontends: vec![
                "printers.example.com".to_string(),
                "cluster-printers.example.com".to_string(),
            ],
            backends: vec!["get-print.example.com".to_string()],
            ..Config::default()
        }
    }

    #[test]
    fn test_default_queue_prefers_config() {
        let config = Config {
            default_queue: Some("meadow".to_string()),
            ..Config::default()
        };
        let directory = StubDirectory {
            default_destination: Some("spooler-default".to_string()),
            ..StubDirectory::default()
        };
        assert_eq!(
            default_queue(&config, &directory),
            Some("meadow".to_string())
        );
    }

    #[test]
    fn test_default_queue_from_spooler() {
        let directory = StubDirectory {
            default_destination: Some("spooler-default".to_string()),
            ..StubDirectory::default()
        };
        assert_eq!(
            default_queue(&Config::default(), &directory),
            Some("spooler-default".to_string())
        );
    }

    #[test]
    fn test_default_queue_from_cluster_record() {
        let directory = StubDirectory {
            cluster: vec![
                "syslib 9.4.0".to_string(),
                "lpr meadow".to_string(),
            ],
            ..StubDirectory::default()
        };
        assert_eq!(
            default_queue(&Config::default(), &directory),
            Some("meadow".to_string())
        );
    }

    #[test]
    fn test_default_queue_none_found() {
        assert_eq!(default_queue(&Config::default(), &StubDirectory::default()), None);
    }

    #[test]
    fn test_canonicalize_non_local_queue() {
        let directory = StubDirectory::default();
        assert_eq!(
            canonicalize_queue("python", &site_config(), &directory),
            Some("python".to_string())
        );
    }

    #[test]
    fn test_canonicalize_local_only_queue() {
        let directory = StubDirectory {
            device_uris: HashMap::from([(
                "patience".to_string(),
                "mdns://patience._printer._tcp.local.".to_string(),
            )]),
            ..StubDirectory::default()
        };
        assert_eq!(canonicalize_queue("patience", &site_config(), &directory), None);
    }

    #[test]
    fn test_canonicalize_unrecognized_uri_path() {
        let directory = StubDirectory {
            device_uris: HashMap::from([(
                "screwedup".to_string(),
                "ipp://PRINTERS.EXAMPLE.COM/stuff/screwedup".to_string(),
            )]),
            ..StubDirectory::default()
        };
        assert_eq!(canonicalize_queue("screwedup", &site_config(), &directory), None);
    }

    #[test]
    fn test_canonicalize_bounce_to_site_printer() {
        let directory = StubDirectory {
            device_uris: HashMap::from([(
                "ajax".to_string(),
                "ipp://cluster-printers.example.com:631/printers/ajax".to_string(),
            )]),
            ..StubDirectory::default()
        };
        assert_eq!(
            canonicalize_queue("ajax", &site_config(), &directory),
            Some("ajax".to_string())
        );
    }

    #[test]
    fn test_canonicalize_misnamed_bounce_queue() {
        let directory = StubDirectory {
            device_uris: HashMap::from([(
                "w20".to_string(),
                "ipp://cluster-printers.example.com:631/printers/ajax".to_string(),
            )]),
            ..StubDirectory::default()
        };
        assert_eq!(
            canonicalize_queue("w20", &site_config(), &directory),
            Some("ajax".to_string())
        );
    }

    #[test]
    fn test_canonicalize_bounce_to_site_class() {
        let directory = StubDirectory {
            device_uris: HashMap::from([(
                "ajax2".to_string(),
                "ipp://cluster-printers.example.com:631/classes/ajax2".to_string(),
            )]),
            ..StubDirectory::default()
        };
        assert_eq!(
            canonicalize_queue("ajax2", &site_config(), &directory),
            Some("ajax2".to_string())
        );
    }

    #[test]
    fn test_canonicalize_uses_directory_servers() {
        let directory = StubDirectory {
            device_uris: HashMap::from([(
                "ajax".to_string(),
                "ipp://new-print.example.com/printers/ajax".to_string(),
            )]),
            servers: vec!["new-print.example.com".to_string()],
            ..StubDirectory::default()
        };
        assert_eq!(
            canonicalize_queue("ajax", &Config::default(), &directory),
            Some("ajax".to_string())
        );
    }

    #[test]
    fn test_print_server_parses_capability_record() {
        let directory = StubDirectory {
            capabilities: HashMap::from([(
                "ajax".to_string(),
                "ajax:rp=ajax:rm=GET-PRINT.EXAMPLE.COM:ka#0:mc#0:".to_string(),
            )]),
            ..StubDirectory::default()
        };
        assert_eq!(
            print_server_for("ajax", &directory),
            Some("GET-PRINT.EXAMPLE.COM".to_string())
        );
    }

    #[test]
    fn test_print_server_missing_record() {
        assert_eq!(print_server_for("ajax", &StubDirectory::default()), None);
    }

    #[test]
    fn test_find_queue_local_destination() {
        let directory = StubDirectory {
            device_uris: HashMap::from([(
                "foo".to_string(),
                "mdns://foo._printer._tcp.local.".to_string(),
            )]),
            ..StubDirectory::default()
        };
        assert_eq!(
            find_queue("foo", &site_config(), &directory),
            (System::Cups, None, "foo".to_string())
        );
    }

    #[test]
    fn test_find_queue_site_cups_queue() {
        let directory = StubDirectory {
            capabilities: HashMap::from([(
                "ajax".to_string(),
                "ajax:rp=ajax:rm=GET-PRINT.EXAMPLE.COM:ka#0:mc#0:".to_string(),
            )]),
            ipp_hosts: vec!["GET-PRINT.EXAMPLE.COM".to_string()],
            ..StubDirectory::default()
        };
        assert_eq!(
            find_queue("ajax", &site_config(), &directory),
            (
                System::Cups,
                Some("GET-PRINT.EXAMPLE.COM".to_string()),
                "ajax".to_string()
            )
        );
    }

    #[test]
    fn test_find_queue_site_lprng_queue() {
        let directory = StubDirectory {
            capabilities: HashMap::from([(
                "ashdown".to_string(),
                "ashdown:rp=ashdown:rm=MULCH.EXAMPLE.COM:ka#0:mc#0:".to_string(),
            )]),
            ..StubDirectory::default()
        };
        assert_eq!(
            find_queue("ashdown", &site_config(), &directory),
            (
                System::Lprng,
                Some("MULCH.EXAMPLE.COM".to_string()),
                "ashdown".to_string()
            )
        );
    }

    #[test]
    fn test_find_queue_misnamed_bounce_queue() {
        let directory = StubDirectory {
            device_uris: HashMap::from([(
                "w20".to_string(),
                "ipp://cluster-printers.example.com:631/printers/ajax".to_string(),
            )]),
            capabilities: HashMap::from([(
                "ajax".to_string(),
                "ajax:rp=ajax:rm=GET-PRINT.EXAMPLE.COM:ka#0:mc#0:".to_string(),
            )]),
            ipp_hosts: vec!["GET-PRINT.EXAMPLE.COM".to_string()],
            ..StubDirectory::default()
        };
        assert_eq!(
            find_queue("w20", &site_config(), &directory),
            (
                System::Cups,
                Some("GET-PRINT.EXAMPLE.COM".to_string()),
                "ajax".to_string()
            )
        );
    }

    #[test]
    fn test_find_queue_strips_instances() {
        let directory = StubDirectory {
            capabilities: HashMap::from([(
                "ajax".to_string(),
                "ajax:rp=ajax:rm=GET-PRINT.EXAMPLE.COM:ka#0:mc#0:".to_string(),
            )]),
            ipp_hosts: vec!["GET-PRINT.EXAMPLE.COM".to_string()],
            ..StubDirectory::default()
        };
        assert_eq!(
            find_queue("ajax/2sided", &site_config(), &directory),
            (
                System::Cups,
                Some("GET-PRINT.EXAMPLE.COM".to_string()),
                "ajax".to_string()
            )
        );
    }

    #[test]
    fn test_find_queue_no_capability_record() {
        let directory = StubDirectory::default();
        assert_eq!(
            find_queue("ajax", &site_config(), &directory),
            (System::Cups, None, "ajax".to_string())
        );
    }
}
