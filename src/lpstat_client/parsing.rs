//! Parsers for the plain text `lpstat` prints.
//!
//! The tools are always run with `LC_ALL=C`, so only the English wording
//! has to be understood here.

use crate::subsystem::models::Printer;

/// State of one queue as printed by `lpstat -p`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStatus {
    pub name: String,
    pub status: String,
    pub enabled: bool,
}

/// `device for <name>: <uri>` lines from `lpstat -v`, in order.
pub fn parse_devices(output: &str) -> Vec<(String, String)> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix("device for "))
        .filter_map(|rest| rest.split_once(": "))
        .map(|(name, uri)| (name.trim().to_string(), uri.trim().to_string()))
        .collect()
}

/// `printer <name> ...` lines from `lpstat -p`.
///
/// ```text
/// printer Lobby is idle.  enabled since Sat 17 Oct 2026 09:12:44 AM CEST
/// printer Office now printing Office-118.  enabled since Sat 17 Oct 2026 09:13:02 AM CEST
/// printer Basement disabled since Sat 17 Oct 2026 08:55:10 AM CEST -
///         Paused
/// ```
pub fn parse_queue_statuses(output: &str) -> Vec<QueueStatus> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix("printer "))
        .filter_map(|rest| {
            let (name, state) = rest.split_once(' ')?;
            let enabled = !state.starts_with("disabled");
            let status = if let Some(idle) = state.strip_prefix("is ") {
                idle.split(['.', ' ']).next().unwrap_or_default().to_string()
            } else if state.starts_with("now printing") {
                "printing".to_string()
            } else if !enabled {
                "disabled".to_string()
            } else {
                state.split("  ").next().unwrap_or_default().trim_end_matches('.').to_string()
            };
            Some(QueueStatus { name: name.to_string(), status, enabled })
        })
        .collect()
}

/// Whether `lpstat -a` reports the queue as accepting requests.
///
/// `None` when the queue does not appear in the output at all.
pub fn parse_accepting(output: &str, name: &str) -> Option<bool> {
    output.lines().find_map(|line| {
        let rest = line.strip_prefix(name)?.strip_prefix(' ')?;
        if rest.starts_with("accepting requests") {
            Some(true)
        } else if rest.starts_with("not accepting requests") {
            Some(false)
        } else {
            None
        }
    })
}

/// Joins `lpstat -v` devices with `lpstat -p` states, keeping device order.
///
/// A device without a status line gets the status `unknown`.
pub fn merge_printers(devices: Vec<(String, String)>, queues: &[QueueStatus]) -> Vec<Printer> {
    devices
        .into_iter()
        .map(|(name, uri)| {
            let status = queues
                .iter()
                .find(|q| q.name == name)
                .map(|q| q.status.clone())
                .unwrap_or_else(|| "unknown".to_string());
            Printer::new(name, uri, status)
        })
        .collect()
}

/// Combines `lpstat -p <name>` and `lpstat -a <name>` into one verdict.
///
/// The queue has to be started and accepting. A queue missing from the
/// `-a` output is judged on `-p` alone; `None` when `-p` does not list it.
pub fn enabled_state(printers_output: &str, accepting_output: &str, name: &str) -> Option<bool> {
    let enabled = parse_queue_statuses(printers_output)
        .into_iter()
        .find(|q| q.name == name)
        .map(|q| q.enabled)?;
    Some(enabled && parse_accepting(accepting_output, name).unwrap_or(true))
}

/// lpstat complains about unknown queues with
/// `lpstat: Invalid destination name in list "<name>".`
pub fn is_unknown_destination(stderr: &str) -> bool {
    stderr.contains("Invalid destination name") || stderr.contains("Unknown destination")
}

/// `lpstat -v` on a scheduler without any queues.
pub fn is_no_destinations(stderr: &str) -> bool {
    stderr.contains("No destinations added")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn devices_keep_lpstat_order() {
        let output = "device for Office: usb://HP/LaserJet%20P1102?serial=000000000Q8\n\
                      device for Lobby: ipp://lobby.local/ipp/print\n\
                      device for Label: socket://10.0.0.12:9100\n";
        assert_eq!(
            parse_devices(output),
            vec![
                ("Office".to_string(), "usb://HP/LaserJet%20P1102?serial=000000000Q8".to_string()),
                ("Lobby".to_string(), "ipp://lobby.local/ipp/print".to_string()),
                ("Label".to_string(), "socket://10.0.0.12:9100".to_string()),
            ]
        );
    }

    #[test]
    fn devices_ignore_unrelated_lines() {
        let output = "system default destination: Office\n\ndevice for Office: usb://Office\n";
        assert_eq!(parse_devices(output), vec![("Office".to_string(), "usb://Office".to_string())]);
        assert!(parse_devices("").is_empty());
    }

    #[test]
    fn queue_statuses_cover_idle_printing_and_disabled() {
        let output = "printer Lobby is idle.  enabled since Sat 17 Oct 2026 09:12:44 AM CEST\n\
                      printer Office now printing Office-118.  enabled since Sat 17 Oct 2026 09:13:02 AM CEST\n\
                      printer Basement disabled since Sat 17 Oct 2026 08:55:10 AM CEST -\n\
                      \tPaused\n";
        assert_eq!(
            parse_queue_statuses(output),
            vec![
                QueueStatus { name: "Lobby".to_string(), status: "idle".to_string(), enabled: true },
                QueueStatus { name: "Office".to_string(), status: "printing".to_string(), enabled: true },
                QueueStatus { name: "Basement".to_string(), status: "disabled".to_string(), enabled: false },
            ]
        );
    }

    #[test]
    fn accepting_is_looked_up_per_queue() {
        let output = "Office accepting requests since Sat 17 Oct 2026 09:13:02 AM CEST\n\
                      Office-Color not accepting requests since Sat 17 Oct 2026 08:00:00 AM CEST -\n\
                      \tRejecting Jobs\n";
        assert_eq!(parse_accepting(output, "Office"), Some(true));
        assert_eq!(parse_accepting(output, "Office-Color"), Some(false));
        assert_eq!(parse_accepting(output, "Lobby"), None);
    }

    #[test]
    fn merge_keeps_device_order_and_falls_back_to_unknown() {
        let devices = vec![
            ("Office".to_string(), "usb://Office".to_string()),
            ("Lobby".to_string(), "ipp://lobby.local".to_string()),
            ("New".to_string(), "socket://10.0.0.50:9100".to_string()),
        ];
        let queues = vec![
            QueueStatus { name: "Lobby".to_string(), status: "printing".to_string(), enabled: true },
            QueueStatus { name: "Office".to_string(), status: "disabled".to_string(), enabled: false },
        ];
        assert_eq!(
            merge_printers(devices, &queues),
            vec![
                Printer::new("Office", "usb://Office", "disabled"),
                Printer::new("Lobby", "ipp://lobby.local", "printing"),
                Printer::new("New", "socket://10.0.0.50:9100", "unknown"),
            ]
        );
    }

    #[test]
    fn enabled_needs_started_and_accepting() {
        let started = "printer Office is idle.  enabled since Sat 17 Oct 2026 09:12:44 AM CEST\n";
        let stopped = "printer Office disabled since Sat 17 Oct 2026 08:55:10 AM CEST -\n\tPaused\n";
        let accepting = "Office accepting requests since Sat 17 Oct 2026 09:13:02 AM CEST\n";
        let rejecting = "Office not accepting requests since Sat 17 Oct 2026 08:00:00 AM CEST -\n\tRejecting Jobs\n";

        assert_eq!(enabled_state(started, accepting, "Office"), Some(true));
        assert_eq!(enabled_state(stopped, accepting, "Office"), Some(false));
        assert_eq!(enabled_state(started, rejecting, "Office"), Some(false));
        assert_eq!(enabled_state(stopped, rejecting, "Office"), Some(false));
    }

    #[test]
    fn enabled_state_with_missing_lines() {
        let started = "printer Office is idle.  enabled since Sat 17 Oct 2026 09:12:44 AM CEST\n";
        let accepting = "Office accepting requests since Sat 17 Oct 2026 09:13:02 AM CEST\n";

        assert_eq!(enabled_state(started, "", "Office"), Some(true));
        assert_eq!(enabled_state("", accepting, "Office"), None);
        assert_eq!(enabled_state(started, accepting, "Lobby"), None);
    }

    #[test]
    fn lpstat_error_messages() {
        assert!(is_unknown_destination("lpstat: Invalid destination name in list \"Nope\".\n"));
        assert!(!is_unknown_destination("lpstat: Unable to connect to server\n"));
        assert!(is_no_destinations("lpstat: No destinations added.\n"));
    }
}
