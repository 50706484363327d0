use std::collections::BTreeMap;

use crate::models::command::{Action, Command, ModuleId, ModuleState};

/// Last known state per module.
///
/// SHOW and UPDATE overwrite the module's entry, HIDE removes it.
#[derive(Debug, Default)]
pub struct ModuleTable {
    entries: BTreeMap<ModuleId, ModuleState>,
}

impl ModuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, command: &Command) {
        match command.action {
            Action::Show | Action::Update => {
                self.entries.insert(
                    command.module.clone(),
                    ModuleState {
                        action: command.action,
                        payload: command.payload.clone(),
                    },
                );
            }
            Action::Hide => {
                self.entries.remove(&command.module);
            }
        }
    }

    pub fn get(&self, module: &ModuleId) -> Option<&ModuleState> {
        self.entries.get(module)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModuleId, &ModuleState)> {
        self.entries.iter()
    }
}
