use std::collections::BTreeMap;
use std::io::Write;

use bus::{Bus, Delivery};
use serde_json::Value;
use shared_state::{SharedStateError, StateHandle};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::script::{ScriptStep, Step};

#[derive(Error, Debug)]
pub(crate) enum SessionError {
    #[error("Unknown handle. line: {line}, handle: '{handle}'")]
    UnknownHandle { line: usize, handle: String },

    #[error("Handle already open. line: {line}, handle: '{handle}'")]
    HandleAlreadyOpen { line: usize, handle: String },

    #[error("Shared state error. line: {line}, cause: {source}")]
    State { line: usize, source: SharedStateError },

    #[error("Unable to write output. cause: {0}")]
    Output(#[from] std::io::Error),
}

/// Named handles on a single bus, driven by script steps.
pub(crate) struct Session<W> {
    bus: Bus,
    handles: BTreeMap<String, StateHandle<Value>>,
    output: W,
}

impl<W: Write> Session<W> {
    pub(crate) fn new(bus: Bus, output: W) -> Self {
        Self {
            bus,
            handles: BTreeMap::new(),
            output,
        }
    }

    pub(crate) fn run(&mut self, steps: &[ScriptStep]) -> Result<(), SessionError> {
        for script_step in steps {
            self.run_step(script_step)?;
        }

        let pending = self.bus.pending_count();
        if pending > 0 {
            warn!("Messages were never dispatched. count: {}", pending);
        }

        self.output.flush()?;

        Ok(())
    }

    fn run_step(&mut self, script_step: &ScriptStep) -> Result<(), SessionError> {
        let line = script_step.line;
        let state_error = |source: SharedStateError| SessionError::State {
            line,
            source,
        };

        match &script_step.step {
            Step::Open {
                handle,
                key,
                default,
            } => {
                if self.handles.contains_key(handle) {
                    return Err(SessionError::HandleAlreadyOpen {
                        line,
                        handle: handle.clone(),
                    });
                }

                let default = default.clone();
                let state_handle = shared_state::open(&self.bus, key, move || default.clone()).map_err(state_error)?;
                info!("Opened shared state. handle: '{}', key: '{}'", handle, key);

                self.handles
                    .insert(handle.clone(), state_handle);
            }
            Step::Write {
                handle,
                value,
            } => {
                self.handle(line, handle)?
                    .write(value.clone())
                    .map_err(state_error)?;
                debug!("Wrote shared state. handle: '{}'", handle);
            }
            Step::Merge {
                handle,
                partial,
            } => {
                self.handle(line, handle)?
                    .merge(partial)
                    .map_err(state_error)?;
                debug!("Merged shared state. handle: '{}'", handle);
            }
            Step::Reset {
                handle,
            } => {
                self.handle(line, handle)?
                    .reset()
                    .map_err(state_error)?;
                debug!("Reset shared state. handle: '{}'", handle);
            }
            Step::Read {
                handle,
            } => {
                let state_handle = self.handle(line, handle)?;
                let key = state_handle.key().clone();
                let value = state_handle.read();

                writeln!(self.output, "{} {} {}", handle, key, value)?;
            }
            Step::Dispatch => {
                if self.bus.config().delivery == Delivery::Immediate {
                    debug!("Nothing to dispatch, delivery is immediate. line: {}", line);
                }
                let count = self.bus.dispatch_pending();
                info!("Dispatched messages. count: {}", count);
            }
            Step::Close {
                handle,
            } => {
                let state_handle = self
                    .handles
                    .remove(handle)
                    .ok_or_else(|| SessionError::UnknownHandle {
                        line,
                        handle: handle.clone(),
                    })?;
                state_handle.close();
                info!("Closed shared state. handle: '{}'", handle);
            }
        }

        Ok(())
    }

    fn handle(&self, line: usize, handle: &str) -> Result<&StateHandle<Value>, SessionError> {
        self.handles
            .get(handle)
            .ok_or_else(|| SessionError::UnknownHandle {
                line,
                handle: handle.to_string(),
            })
    }
}
