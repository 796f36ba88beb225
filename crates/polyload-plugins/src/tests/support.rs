//! Test doubles shared by the loader unit tests and behaviour scenarios.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use polyload_sdk::{ENTRY_SYMBOL, PluginExport, Query, QueryError, QueryPlugin, QueryResult};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use crate::error::PluginError;
use crate::interpreter::{Environment, SEARCH_PATH_VARIABLE};
use crate::native::{LoadedModule, ModuleLoader};

/// Plugin that answers every query with the search text.
pub(crate) struct Echo;

impl QueryPlugin for Echo {
    fn query(&mut self, query: &Query) -> Result<Vec<QueryResult>, QueryError> {
        Ok(vec![QueryResult::new(query.search())])
    }
}

/// Fixed environment that never touches the real process state.
#[derive(Debug, Default, Clone)]
pub(crate) struct StaticEnvironment {
    search_path: Option<OsString>,
    files: HashSet<PathBuf>,
}

impl StaticEnvironment {
    pub(crate) fn with_search_path(mut self, value: impl Into<OsString>) -> Self {
        self.search_path = Some(value.into());
        self
    }

    pub(crate) fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }
}

impl Environment for StaticEnvironment {
    fn var_os(&self, key: &str) -> Option<OsString> {
        if key == SEARCH_PATH_VARIABLE {
            self.search_path.clone()
        } else {
            None
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.contains(path)
    }
}

/// Module loader that serves an echo plugin for every path except those
/// whose file name is marked as lacking the entry point.
#[derive(Debug, Default, Clone)]
pub(crate) struct StubModules {
    without_entry: HashSet<String>,
}

impl StubModules {
    pub(crate) fn without_entry(mut self, file_name: impl Into<String>) -> Self {
        self.without_entry.insert(file_name.into());
        self
    }
}

impl ModuleLoader for StubModules {
    fn open(&self, path: &Path) -> Result<LoadedModule, PluginError> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.without_entry.contains(&file_name) {
            return Err(PluginError::MissingEntryPoint {
                path: path.to_path_buf(),
                symbol: ENTRY_SYMBOL,
                message: String::from("symbol not found"),
            });
        }
        Ok(LoadedModule::from_entry(|| {
            PluginExport::new(|| Box::new(Echo) as Box<dyn QueryPlugin>)
        }))
    }
}

/// One tracing event seen by [`EventCapture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CapturedEvent {
    pub(crate) level: Level,
    pub(crate) target: String,
    pub(crate) plugin: Option<String>,
}

/// Records every tracing event emitted while an action runs.
#[derive(Debug, Default, Clone)]
pub(crate) struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl EventCapture {
    /// Runs `action` with this capture installed as the thread's subscriber.
    pub(crate) fn record<T>(&self, action: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::with_default(subscriber, action)
    }

    pub(crate) fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().expect("event log lock").clone()
    }

    pub(crate) fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level)
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for EventCapture {
    fn on_event(&self, event: &Event<'_>, _context: Context<'_, S>) {
        let mut plugin = PluginField::default();
        event.record(&mut plugin);
        self.events
            .lock()
            .expect("event log lock")
            .push(CapturedEvent {
                level: *event.metadata().level(),
                target: event.metadata().target().to_owned(),
                plugin: plugin.0,
            });
    }
}

/// Extracts the `plugin` field from an event.
#[derive(Default)]
struct PluginField(Option<String>);

impl Visit for PluginField {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "plugin" {
            self.0 = Some(value.to_owned());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "plugin" {
            self.0 = Some(format!("{value:?}"));
        }
    }
}
