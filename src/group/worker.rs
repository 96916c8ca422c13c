// src/group/worker.rs

//! Per-command worker: wait for dependencies, then run the command.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, trace};

use crate::errors::{CmdGroupError, Result};
use crate::exec::ProcessUnit;
use crate::group::CancelToken;

/// Name → unit lookup shared by all workers of one run.
pub type UnitIndex = HashMap<String, Arc<ProcessUnit>>;

/// Build the lookup table. Anonymous units are not addressable.
pub fn build_index(units: &[Arc<ProcessUnit>]) -> UnitIndex {
    units
        .iter()
        .filter(|u| !u.name().is_empty())
        .map(|u| (u.name().to_string(), Arc::clone(u)))
        .collect()
}

/// Whether every dependency of `unit` is ready.
///
/// Unknown names and self references are errors; they are only discovered
/// here, the first time the dependency list is inspected.
pub fn dependencies_ready(unit: &ProcessUnit, index: &UnitIndex) -> Result<bool> {
    for dep in unit.depends_on() {
        let Some(dep_unit) = index.get(dep) else {
            return Err(CmdGroupError::MissingDependency {
                command: unit.name().to_string(),
                dependency: dep.clone(),
            });
        };
        if dep == unit.name() {
            return Err(CmdGroupError::SelfDependency {
                command: unit.name().to_string(),
            });
        }
        if !dep_unit.is_ready() {
            trace!(command = %unit.name(), dependency = %dep, "dependency not ready yet");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Poll until `unit`'s dependencies are ready, then run it to completion.
///
/// The result is wrapped with the command's name, except for cancellation,
/// which is returned bare.
pub async fn run_worker(
    unit: Arc<ProcessUnit>,
    index: Arc<UnitIndex>,
    cancel: CancelToken,
    poll_interval: Duration,
) -> Result<()> {
    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(command = %unit.name(), "cancelled before start");
                return Err(CmdGroupError::Cancelled);
            }
            _ = ticker.tick() => {}
        }

        if dependencies_ready(&unit, &index).map_err(|e| e.for_command(unit.name()))? {
            break;
        }
    }

    debug!(command = %unit.name(), "dependencies ready; starting");
    unit.run(&cancel)
        .await
        .map_err(|e| e.for_command(unit.name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::CommandSpec;
    use crate::output::OutputSink;

    fn unit(name: &str, deps: &[&str]) -> Arc<ProcessUnit> {
        let spec = CommandSpec {
            name: name.to_string(),
            depends_on: deps.iter().map(|d| d.to_string()).collect(),
            ..CommandSpec::new("true")
        };
        let (sink, _) = OutputSink::buffer();
        Arc::new(ProcessUnit::new(spec, sink).unwrap())
    }

    #[test]
    fn no_dependencies_is_ready() {
        let a = unit("a", &[]);
        let index = build_index(&[a.clone()]);
        assert!(dependencies_ready(&a, &index).unwrap());
    }

    #[test]
    fn unready_dependency_blocks() {
        let a = unit("a", &[]);
        let b = unit("b", &["a"]);
        let index = build_index(&[a, b.clone()]);
        assert!(!dependencies_ready(&b, &index).unwrap());
    }

    #[test]
    fn missing_dependency_is_an_error() {
        let b = unit("b", &["ghost"]);
        let index = build_index(&[b.clone()]);
        let err = dependencies_ready(&b, &index).unwrap_err();
        assert!(matches!(
            err,
            CmdGroupError::MissingDependency { ref command, ref dependency }
                if command == "b" && dependency == "ghost"
        ));
    }

    #[test]
    fn self_dependency_is_an_error() {
        let a = unit("a", &["a"]);
        let index = build_index(&[a.clone()]);
        let err = dependencies_ready(&a, &index).unwrap_err();
        assert_eq!(err.to_string(), "a depends on itself");
    }

    #[test]
    fn anonymous_units_are_not_indexed() {
        let anon = unit("", &[]);
        let b = unit("b", &[""]);
        let index = build_index(&[anon, b.clone()]);
        assert_eq!(index.len(), 1);
        assert!(dependencies_ready(&b, &index).is_err());
    }
}
