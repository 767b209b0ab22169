//! Interactive session: keeps one controller alive and re-renders after
//! every command, the way the page re-renders after every state change.

use std::sync::Arc;

use anyhow::Result;
use client_core::{InteractionController, PlotCrosshair};
use shared::domain::{Alert, ProcessId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::render::{alert_notice, clock_diagram, process_table};

const HELP: &str = "\
commands:
  list                      refresh and show processes
  create <name>             create a process
  event <id>                record an internal event on a process
  sender <id>               select the sending process
  receiver <id>             select the receiving process
  message <text>            set the message content
  send                      send the message between the selected processes
  timeline                  refresh and draw the clock diagram
  hover <x> [id]            place the crosshair near clock x (optionally on a process row)
  leave                     remove the crosshair
  dismiss                   close the current alert
  help                      show this text
  quit                      leave the shell";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    List,
    Create(String),
    Event(ProcessId),
    Sender(ProcessId),
    Receiver(ProcessId),
    Message(String),
    Send,
    Timeline,
    Hover { x: f64, row: Option<ProcessId> },
    Leave,
    Dismiss,
    Help,
    Quit,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word {
            "list" | "ls" => Ok(Self::List),
            // Blank names are passed through so the controller can reject them.
            "create" => Ok(Self::Create(rest.to_string())),
            "event" => parse_id(rest).map(Self::Event),
            "sender" => parse_id(rest).map(Self::Sender),
            "receiver" => parse_id(rest).map(Self::Receiver),
            "message" | "msg" => Ok(Self::Message(rest.to_string())),
            "send" => Ok(Self::Send),
            "timeline" | "plot" => Ok(Self::Timeline),
            "hover" => {
                let mut parts = rest.split_whitespace();
                let x = parts
                    .next()
                    .ok_or_else(|| "usage: hover <x> [id]".to_string())?
                    .parse::<f64>()
                    .map_err(|_| "hover position must be a number".to_string())?;
                let row = parts.next().map(parse_id).transpose()?;
                Ok(Self::Hover { x, row })
            }
            "leave" => Ok(Self::Leave),
            "dismiss" => Ok(Self::Dismiss),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}', try 'help'")),
        }
    }
}

fn parse_id(raw: &str) -> Result<ProcessId, String> {
    raw.trim()
        .parse::<i64>()
        .map(ProcessId)
        .map_err(|_| format!("'{raw}' is not a process id"))
}

pub async fn run(controller: Arc<InteractionController>) -> Result<()> {
    let mut alerts = controller.notifications().subscribe();
    let watcher = tokio::spawn(async move {
        let mut last = None;
        while alerts.changed().await.is_ok() {
            let current = alerts.borrow_and_update().clone();
            if let Some(line) = alert_change(&mut last, current) {
                println!("{line}");
            }
        }
        debug!("alert watcher stopped");
    });

    // Failures are already on screen as an alert.
    let _ = controller.load().await;
    let mut crosshair = PlotCrosshair::new();
    print_processes(&controller).await;
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match ShellCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }
        execute(&controller, &mut crosshair, command).await;
    }

    watcher.abort();
    Ok(())
}

/// Line to print when the visible alert moved to `current`; repeats of the
/// last printed state are skipped.
fn alert_change(last: &mut Option<Alert>, current: Option<Alert>) -> Option<String> {
    if *last == current {
        return None;
    }
    let line = alert_notice(current.as_ref());
    *last = current;
    Some(line)
}

async fn execute(
    controller: &InteractionController,
    crosshair: &mut PlotCrosshair,
    command: ShellCommand,
) {
    match command {
        ShellCommand::List => {
            let _ = controller.refresh_processes().await;
            print_processes(controller).await;
        }
        ShellCommand::Create(name) => {
            controller.set_process_name(name).await;
            if controller.submit_process_form().await.is_ok() {
                print_processes(controller).await;
            }
        }
        ShellCommand::Event(process_id) => {
            if controller.create_event(process_id).await.is_ok() {
                print_processes(controller).await;
            }
        }
        ShellCommand::Sender(process_id) => {
            controller.select_sender(process_id).await;
            print_processes(controller).await;
        }
        ShellCommand::Receiver(process_id) => {
            controller.select_receiver(process_id).await;
            print_processes(controller).await;
        }
        ShellCommand::Message(content) => controller.set_message_content(content).await,
        ShellCommand::Send => {
            if controller.send_message().await.is_ok() {
                print_processes(controller).await;
            }
        }
        ShellCommand::Timeline => {
            let _ = controller.refresh_events().await;
            print_timeline(controller, crosshair).await;
        }
        ShellCommand::Hover { x, row } => {
            let timeline = controller.timeline().await;
            crosshair.on_hover_at(&timeline, x, row);
            print_timeline(controller, crosshair).await;
        }
        ShellCommand::Leave => {
            crosshair.on_leave();
            print_timeline(controller, crosshair).await;
        }
        ShellCommand::Dismiss => controller.notifications().dismiss(),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }
}

async fn print_processes(controller: &InteractionController) {
    let processes = controller.processes().await;
    let selection = controller.selection().await;
    print!("{}", process_table(&processes, selection));
}

async fn print_timeline(controller: &InteractionController, crosshair: &PlotCrosshair) {
    let timeline = controller.timeline().await;
    print!("{}", clock_diagram(&timeline, crosshair.selection()));
    if let (Some(at), Some(description)) = (crosshair.selection(), crosshair.describe(&timeline)) {
        println!("({}, P{}) {description}", at.x, at.y);
    }
}
