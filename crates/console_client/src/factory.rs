//! Startup assembly of concrete resource command sets.
//!
//! No process-wide registry: the full command surface is built once from a
//! transport and passed where needed.

use std::sync::Arc;

use futures::try_join;
use serde_json::Value;
use shared::{
    envelope::{as_f64, attr, child, child_text},
    error::Result,
    model::{EntityData, Model},
};

use crate::{
    command::TransportCommand,
    entities::EntitiesCommand,
    entity::{element_path, EntityCommand},
    transport::Transport,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub entity: EntityData,
    pub status: Option<String>,
    pub progress: Option<i64>,
    pub scanner_id: Option<String>,
}

impl Model for Task {
    fn type_name() -> &'static str {
        "task"
    }

    fn from_element(element: &Value) -> Self {
        Self {
            entity: EntityData::from_element(element),
            status: child_text(element, "status").map(str::to_owned),
            progress: child(element, "progress").and_then(shared::envelope::as_i64),
            scanner_id: child(element, "scanner")
                .and_then(|scanner| attr(scanner, "id"))
                .map(str::to_owned),
        }
    }

    fn id(&self) -> Option<&str> {
        self.entity.id.as_deref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scanner {
    pub entity: EntityData,
    pub host: Option<String>,
}

impl Model for Scanner {
    fn type_name() -> &'static str {
        "scanner"
    }

    fn from_element(element: &Value) -> Self {
        Self {
            entity: EntityData::from_element(element),
            host: child_text(element, "host").map(str::to_owned),
        }
    }

    fn id(&self) -> Option<&str> {
        self.entity.id.as_deref()
    }
}

/// A scan finding. Results are produced by the scanner, never edited, so the
/// listing is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub entity: EntityData,
    pub host: Option<String>,
    pub severity: Option<f64>,
}

impl Model for ScanResult {
    fn type_name() -> &'static str {
        "result"
    }

    fn from_element(element: &Value) -> Self {
        Self {
            entity: EntityData::from_element(element),
            host: child_text(element, "host").map(str::to_owned),
            severity: child(element, "severity").and_then(as_f64),
        }
    }

    fn id(&self) -> Option<&str> {
        self.entity.id.as_deref()
    }
}

/// The task's selected scanner next to the full scanner catalog, for
/// selection widgets.
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerSelection {
    pub selected: Option<String>,
    pub available: Vec<Scanner>,
}

pub struct TaskCommands {
    pub entity: EntityCommand<Task>,
    pub list: EntitiesCommand<Task>,
    scanners: EntitiesCommand<Scanner>,
}

impl TaskCommands {
    fn new(cmd: TransportCommand) -> Self {
        Self {
            entity: EntityCommand::new(
                cmd.clone(),
                element_path(&["get_tasks_response", "task"]),
            ),
            list: EntitiesCommand::new(
                cmd.clone(),
                "tasks",
                element_path(&["get_tasks_response"]),
            ),
            scanners: EntitiesCommand::new(
                cmd,
                "scanners",
                element_path(&["get_scanners_response"]),
            ),
        }
    }

    /// The task and the scanner catalog have no dependency on one another,
    /// so both reads go out concurrently and join.
    pub async fn scanner_selection(&self, task_id: &str) -> Result<ScannerSelection> {
        let (task, scanners) = try_join!(
            self.entity.get(task_id, None),
            self.scanners.get_all(None),
        )?;
        Ok(ScannerSelection {
            selected: task.and_then(|t| t.scanner_id),
            available: scanners.entities,
        })
    }
}

pub struct ResultCommands {
    pub entity: EntityCommand<ScanResult>,
    pub list: EntitiesCommand<ScanResult>,
}

impl ResultCommands {
    fn new(cmd: TransportCommand) -> Self {
        Self {
            entity: EntityCommand::new(
                cmd.clone(),
                element_path(&["get_results_response", "result"]),
            ),
            list: EntitiesCommand::read_only(
                cmd,
                "results",
                element_path(&["get_results_response"]),
            ),
        }
    }
}

/// Every resource command set the console uses, assembled once.
pub struct ConsoleCommands {
    pub tasks: TaskCommands,
    pub results: ResultCommands,
}

impl ConsoleCommands {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        let cmd = TransportCommand::new(transport);
        Self {
            tasks: TaskCommands::new(cmd.clone()),
            results: ResultCommands::new(cmd),
        }
    }
}
