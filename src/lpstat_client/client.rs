use std::process::{Command, Output};

use log::debug;
use snafu::{ensure, ResultExt};

use crate::subsystem::models::Printer;
use crate::subsystem::{
    EnableError, EnableSnafu, ListCommandSnafu, ListError, ListSpawnSnafu, LookupError, PrintSubsystem, QuerySnafu,
    UnknownPrinterSnafu,
};

use super::parsing::{
    enabled_state, is_no_destinations, is_unknown_destination, merge_printers, parse_devices, parse_queue_statuses,
};

/// Reaches CUPS through its command line tools.
#[derive(Debug, Default)]
pub struct CommandSubsystem;

impl CommandSubsystem {
    pub fn new() -> Self {
        CommandSubsystem
    }
}

fn run(program: &str, args: &[&str]) -> std::io::Result<Output> {
    debug!("Running {} {}", program, args.join(" "));
    Command::new(program).args(args).env("LC_ALL", "C").output()
}

fn describe(program: &str, args: &[&str]) -> String {
    format!("{} {}", program, args.join(" "))
}

/// What the tool said on stderr, or its exit status when it said nothing.
fn diagnostic(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr
    }
}

impl PrintSubsystem for CommandSubsystem {
    fn list_all_printers(&self) -> Result<Vec<Printer>, ListError> {
        let devices = run("lpstat", &["-v"]).context(ListSpawnSnafu { command: "lpstat -v" })?;
        if !devices.status.success() {
            let message = diagnostic(&devices);
            if is_no_destinations(&message) {
                return Ok(Vec::new());
            }
            return ListCommandSnafu { command: "lpstat -v", message }.fail();
        }
        let devices = parse_devices(&String::from_utf8_lossy(&devices.stdout));
        if devices.is_empty() {
            return Ok(Vec::new());
        }

        let queues = run("lpstat", &["-p"]).context(ListSpawnSnafu { command: "lpstat -p" })?;
        ensure!(
            queues.status.success(),
            ListCommandSnafu { command: "lpstat -p", message: diagnostic(&queues) }
        );
        let queues = parse_queue_statuses(&String::from_utf8_lossy(&queues.stdout));

        Ok(merge_printers(devices, &queues))
    }

    fn is_enabled(&self, name: &str) -> Result<bool, LookupError> {
        let mut outputs = Vec::with_capacity(2);

        for flag in ["-p", "-a"] {
            let args = [flag, name];
            let output = run("lpstat", &args).map_err(|e| LookupError::Query {
                name: name.to_string(),
                message: format!("could not run `{}`: {}", describe("lpstat", &args), e),
            })?;
            if !output.status.success() {
                let message = diagnostic(&output);
                if is_unknown_destination(&message) {
                    return UnknownPrinterSnafu { name }.fail();
                }
                return QuerySnafu { name, message }.fail();
            }

            outputs.push(String::from_utf8_lossy(&output.stdout).into_owned());
        }

        match enabled_state(&outputs[0], &outputs[1], name) {
            Some(enabled) => Ok(enabled),
            None => UnknownPrinterSnafu { name }.fail(),
        }
    }

    fn enable(&self, name: &str) -> Result<(), EnableError> {
        for program in ["cupsenable", "cupsaccept"] {
            let output = run(program, &[name]).map_err(|e| {
                EnableSnafu { name, message: format!("could not run `{}`: {}", describe(program, &[name]), e) }.build()
            })?;
            ensure!(output.status.success(), EnableSnafu { name, message: diagnostic(&output) });
        }
        Ok(())
    }
}
